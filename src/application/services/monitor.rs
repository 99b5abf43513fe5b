use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, Utc};

use super::runner::{CancellationFlag, Runner};
use crate::domain::checks::HostContext;
use crate::domain::entities::alert::Alert;
use crate::domain::entities::metrics_record::MetricsRecord;
use crate::domain::ports::history::HistoryStore;
use crate::domain::ports::notifier::Notifier;
use crate::domain::value_objects::category::CategorySelector;

/// Suppresses repeats of the same alert inside a cooldown window.
#[derive(Debug)]
pub struct AlertThrottle {
    cooldown: Duration,
    last_sent: HashMap<String, DateTime<Utc>>,
}

impl AlertThrottle {
    #[must_use]
    pub fn new(cooldown: Duration) -> Self {
        Self {
            cooldown,
            last_sent: HashMap::new(),
        }
    }

    /// Records `key` as sent at `now` unless it was sent within the cooldown.
    pub fn should_send(&mut self, key: &str, now: DateTime<Utc>) -> bool {
        if let Some(last) = self.last_sent.get(key) {
            let elapsed = (now - *last).to_std().unwrap_or_default();
            if elapsed < self.cooldown {
                return false;
            }
        }
        self.last_sent.insert(key.to_string(), now);
        true
    }
}

/// What one `watch` cycle produced.
#[derive(Debug)]
pub struct CycleOutcome {
    pub record: MetricsRecord,
    pub exit_code: u8,
    pub alerts_sent: usize,
    pub history_path: Option<PathBuf>,
}

/// Repeats a run on an interval: record the cycle, then alert on findings.
pub struct MonitorService<'a> {
    runner: &'a Runner,
    history: &'a dyn HistoryStore,
    notifier: Option<&'a dyn Notifier>,
    host_name: &'a str,
    throttle: AlertThrottle,
}

impl<'a> MonitorService<'a> {
    #[must_use]
    pub fn new(
        runner: &'a Runner,
        history: &'a dyn HistoryStore,
        notifier: Option<&'a dyn Notifier>,
        host_name: &'a str,
        alert_cooldown: Duration,
    ) -> Self {
        Self {
            runner,
            history,
            notifier,
            host_name,
            throttle: AlertThrottle::new(alert_cooldown),
        }
    }

    /// Runs the selected checks once, appends the record to the history and
    /// sends alerts for warnings and failures not sent recently.
    ///
    /// History and alert failures are logged; they never end the cycle.
    pub async fn run_cycle(
        &mut self,
        selector: CategorySelector,
        host: &HostContext<'_>,
        cancel: &CancellationFlag,
    ) -> CycleOutcome {
        let report = self.runner.run(selector, host, cancel).await;
        let record = MetricsRecord::from_report(&report, self.host_name);

        let history_path = match self.history.append(&record) {
            Ok(path) => Some(path),
            Err(e) => {
                tracing::warn!("{e}");
                None
            }
        };

        let mut alerts_sent = 0;
        let now = Utc::now();
        for result in report.results().iter().filter(|r| r.status().needs_attention()) {
            let alert = Alert::from_result(result, self.host_name, now);
            if !self.throttle.should_send(&alert.key(), now) {
                tracing::debug!(alert = %alert.title, "alert suppressed by cooldown");
                continue;
            }
            tracing::warn!(status = %alert.status, "ALERT: {} - {}", alert.title, alert.message);
            let Some(notifier) = self.notifier else {
                continue;
            };
            match notifier.notify(&alert).await {
                Ok(()) => alerts_sent += 1,
                Err(e) => tracing::warn!(alert = %alert.title, "{e}"),
            }
        }

        CycleOutcome {
            exit_code: report.exit_code(),
            record,
            alerts_sent,
            history_path,
        }
    }

    /// Runs cycles every `interval` until `cancel` fires, calling `on_cycle`
    /// after each one. Returns the exit code of the last cycle.
    pub async fn run_loop(
        &mut self,
        selector: CategorySelector,
        host: &HostContext<'_>,
        interval: Duration,
        cancel: &CancellationFlag,
        mut on_cycle: impl FnMut(&CycleOutcome),
    ) -> u8 {
        let exit_code = loop {
            let outcome = self.run_cycle(selector, host, cancel).await;
            on_cycle(&outcome);
            if cancel.is_cancelled() {
                break outcome.exit_code;
            }
            tokio::select! {
                () = tokio::time::sleep(interval) => {}
                () = cancel.cancelled() => break outcome.exit_code,
            }
        };
        tracing::info!("monitoring stopped");
        exit_code
    }
}
