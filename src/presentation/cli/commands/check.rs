use std::io::Write;

use anyhow::Context;

use crate::application::config::AppConfig;
use crate::application::services::runner::{CancellationFlag, Runner};
use crate::domain::checks::HostContext;
use crate::domain::value_objects::category::CategorySelector;
use crate::domain::value_objects::output_mode::OutputMode;
use crate::infrastructure::report::report_file::{report_stem, save_report};
use crate::presentation::cli::app::CheckArgs;
use crate::presentation::cli::formatters::json_fmt::render_json;
use crate::presentation::cli::formatters::report_fmt::{render_markdown, ReportContext};
use crate::presentation::cli::formatters::text_fmt::render_text;

/// Runs the selected checks, writes the chosen view to `out`, and optionally
/// persists a report. Returns the process exit code.
///
/// An invalid category is reported on stderr and yields exit code 1 without
/// running anything.
///
/// # Errors
///
/// Returns an error if writing to `out`, serializing, or saving the report fails.
#[allow(clippy::too_many_arguments)]
pub async fn run_check(
    args: &CheckArgs,
    config: &AppConfig,
    runner: &Runner,
    host: &HostContext<'_>,
    host_name: &str,
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

    if args.fix {
        tracing::warn!("--fix is not supported, no changes will be made");
    }

    let report = runner.run(selector, host, cancel).await;
    let summary = report.summary();
    tracing::info!(
        pass = summary.pass_count,
        warning = summary.warning_count,
        fail = summary.fail_count,
        info = summary.info_count,
        "checks finished"
    );

    let json = if mode == OutputMode::Json || (args.json && args.save_report) {
        Some(render_json(&report).context("Failed to serialize results")?)
    } else {
        None
    };

    match (&json, mode) {
        (Some(json), OutputMode::Json) => writeln!(out, "{json}")?,
        _ => write!(out, "{}", render_text(&report, mode))?,
    }

    if args.save_report {
        let dir = args
            .report_dir
            .clone()
            .unwrap_or_else(|| config.report_dir());
        let ctx = ReportContext::capture(host_name.to_string(), &config.report.env_vars);
        let markdown = render_markdown(&report, &ctx);
        let saved = save_report(
            &dir,
            &report_stem(ctx.generated_at),
            &markdown,
            json.as_deref().filter(|_| args.json),
        )?;
        eprintln!("Report saved to {}", saved.markdown.display());
        if let Some(path) = saved.json {
            eprintln!("JSON results saved to {}", path.display());
        }
    }

    Ok(report.exit_code())
}
