use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::Notify;

use crate::domain::checks::{default_checkers, Checker, HostContext};
use crate::domain::entities::check_result::CheckResult;
use crate::domain::entities::run_report::{ResultStore, RunReport};
use crate::domain::value_objects::category::{CategorySelector, ConfigurationError};
use crate::domain::value_objects::status::CheckStatus;

/// Shared flag set when the user interrupts a run.
///
/// The runner polls it between checkers, so the checker in flight always
/// finishes and its results are kept.
#[derive(Debug, Clone, Default)]
pub struct CancellationFlag(Arc<CancellationState>);

#[derive(Debug, Default)]
struct CancellationState {
    cancelled: AtomicBool,
    notify: Notify,
}

impl CancellationFlag {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.cancelled.store(true, Ordering::SeqCst);
        self.0.notify.notify_waiters();
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.cancelled.load(Ordering::SeqCst)
    }

    /// Resolves once `cancel` has been called.
    pub async fn cancelled(&self) {
        loop {
            // Registered before the check so a concurrent cancel is not missed
            let notified = self.0.notify.notified();
            if self.is_cancelled() {
                return;
            }
            notified.await;
        }
    }

    /// Spawns a task that sets the flag on Ctrl-C.
    pub fn cancel_on_ctrl_c(&self) {
        let flag = self.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::warn!("interrupt received, stopping after the current category");
                flag.cancel();
            }
        });
    }
}

/// Executes checkers in their fixed order and collects every result.
pub struct Runner {
    checkers: Vec<Box<dyn Checker>>,
}

impl Default for Runner {
    fn default() -> Self {
        Self::new(default_checkers())
    }
}

impl Runner {
    /// Checkers are ordered by category so registration order never matters.
    #[must_use]
    pub fn new(mut checkers: Vec<Box<dyn Checker>>) -> Self {
        checkers.sort_by_key(|c| c.category());
        Self { checkers }
    }

    /// Parses `selector` and runs the matching checkers.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::InvalidCategory` before any checker runs
    /// when `selector` names no category.
    pub async fn run_named(
        &self,
        selector: &str,
        host: &HostContext<'_>,
        cancel: &CancellationFlag,
    ) -> Result<RunReport, ConfigurationError> {
        let selector: CategorySelector = selector.parse()?;
        Ok(self.run(selector, host, cancel).await)
    }

    pub async fn run(
        &self,
        selector: CategorySelector,
        host: &HostContext<'_>,
        cancel: &CancellationFlag,
    ) -> RunReport {
        let started_at = Utc::now();
        let mut store = ResultStore::new();
        let mut cancelled = false;

        for checker in self.checkers.iter().filter(|c| selector.includes(c.category())) {
            if cancel.is_cancelled() {
                cancelled = true;
                break;
            }
            let category = checker.category();
            tracing::info!(%category, "running checks");
            let results = checker.check(host).await;
            for result in &results {
                log_result(result);
            }
            store.extend(results);
        }

        if cancelled {
            tracing::warn!(recorded = store.len(), "run cancelled, report is partial");
        }

        store.finalize(selector, started_at, cancelled)
    }
}

fn log_result(result: &CheckResult) {
    let category = result.category();
    let check = result.name();
    let message = result.message();
    match result.status() {
        CheckStatus::Pass | CheckStatus::Info => {
            tracing::info!(%category, check, status = %result.status(), "{message}");
        }
        CheckStatus::Warning => tracing::warn!(%category, check, "{message}"),
        CheckStatus::Fail => tracing::error!(%category, check, "{message}"),
    }
    if let Some(details) = result.details() {
        tracing::debug!(%category, check, details);
    }
}
