use std::io::Write;
use std::time::Duration;

use crate::application::config::AppConfig;
use crate::application::services::monitor::MonitorService;
use crate::application::services::runner::{CancellationFlag, Runner};
use crate::domain::checks::HostContext;
use crate::domain::ports::history::HistoryStore;
use crate::domain::ports::notifier::Notifier;
use crate::domain::value_objects::category::CategorySelector;
use crate::domain::value_objects::output_mode::OutputMode;
use crate::presentation::cli::app::WatchArgs;
use crate::presentation::cli::formatters::text_fmt::render_cycle_line;

/// Sinks a `watch` cycle writes to.
pub struct WatchSinks<'a> {
    pub history: &'a dyn HistoryStore,
    pub notifier: Option<&'a dyn Notifier>,
}

/// Runs checks repeatedly until interrupted, printing one line per cycle.
/// With `--once`, runs a single cycle and prints its record as JSON.
///
/// Returns the exit code of the last cycle, or 1 for an invalid category.
///
/// # Errors
///
/// Returns an error if writing to `out` or serializing the record fails.
#[allow(clippy::too_many_arguments)]
pub async fn run_watch(
    args: &WatchArgs,
    config: &AppConfig,
    runner: &Runner,
    host: &HostContext<'_>,
    host_name: &str,
    sinks: WatchSinks<'_>,
    mode: OutputMode,
    cancel: &CancellationFlag,
    out: &mut impl Write,
) -> anyhow::Result<u8> {
    let selector: CategorySelector = match args.category.parse() {
        Ok(selector) => selector,
        Err(e) => {
            eprintln!("error: {e}");
            return Ok(1);
        }
    };

    let mut monitor = MonitorService::new(
        runner,
        sinks.history,
        sinks.notifier,
        host_name,
        config.alert_cooldown(),
    );

    if args.once {
        let outcome = monitor.run_cycle(selector, host, cancel).await;
        writeln!(out, "{}", serde_json::to_string_pretty(&outcome.record)?)?;
        return Ok(outcome.exit_code);
    }

    let interval = args
        .interval
        .map_or_else(|| config.monitor_interval(), |secs| Duration::from_secs(secs.max(1)));
    tracing::info!(interval_secs = interval.as_secs(), scope = %selector, "monitoring started");

    let mut write_error = None;
    let code = monitor
        .run_loop(selector, host, interval, cancel, |outcome| {
            let line = render_cycle_line(&outcome.record, outcome.alerts_sent, mode);
            if let Err(e) = writeln!(out, "{line}").and_then(|()| out.flush()) {
                write_error.get_or_insert(e);
                cancel.cancel();
            }
        })
        .await;

    match write_error {
        Some(e) => Err(e.into()),
        None => Ok(code),
    }
}
