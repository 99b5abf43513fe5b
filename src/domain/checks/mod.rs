pub mod environment;
pub mod gpu;
pub mod model;
pub mod network;
pub mod processes;
pub mod scripts;
pub mod system;
#[cfg(test)]
pub(crate) mod test_support;

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::entities::check_result::CheckResult;
use crate::domain::entities::snapshot::SystemSnapshot;
use crate::domain::ports::collector::{CollectionError, SystemCollector};
use crate::domain::ports::command::CommandRunner;
use crate::domain::ports::network::PortProbe;
use crate::domain::value_objects::category::Category;
use crate::domain::value_objects::targets::CheckTargets;
use crate::domain::value_objects::thresholds::ThresholdSet;

/// Read-only view of the host handed to every checker.
pub struct HostContext<'a> {
    pub commands: &'a dyn CommandRunner,
    pub collector: &'a dyn SystemCollector,
    pub ports: &'a dyn PortProbe,
    pub thresholds: &'a ThresholdSet,
    pub targets: &'a CheckTargets,
    /// Upper bound for host queries that do not go through `commands`
    pub query_timeout: Duration,
}

impl HostContext<'_> {
    /// Takes a host snapshot, giving up after `query_timeout`.
    ///
    /// # Errors
    ///
    /// Returns the collector's error, or `CollectionError::TimedOut`.
    pub async fn snapshot(&self) -> Result<SystemSnapshot, CollectionError> {
        tokio::time::timeout(self.query_timeout, self.collector.collect())
            .await
            .map_err(|_| CollectionError::TimedOut(self.query_timeout))?
    }
}

/// Why bounded blocking work produced no answer.
#[derive(Error, Debug)]
pub enum HostQueryError {
    #[error("no answer within {0:?}")]
    TimedOut(Duration),
    #[error("host query failed: {0}")]
    Panicked(String),
}

/// Runs synchronous filesystem work on the blocking pool, abandoning it after
/// `limit`. An abandoned task finishes in the background.
///
/// # Errors
///
/// Returns `HostQueryError` on timeout or when the work panicked.
pub async fn blocking_with_timeout<T, F>(limit: Duration, work: F) -> Result<T, HostQueryError>
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    match tokio::time::timeout(limit, tokio::task::spawn_blocking(work)).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => Err(HostQueryError::Panicked(e.to_string())),
        Err(_) => Err(HostQueryError::TimedOut(limit)),
    }
}

/// Inspects one category of the host and reports what it observed.
///
/// Checkers never fail: every problem, including a missing or hung external
/// tool, is expressed as a `CheckResult`.
#[async_trait]
pub trait Checker: Send + Sync {
    fn category(&self) -> Category;

    async fn check(&self, host: &HostContext<'_>) -> Vec<CheckResult>;
}

/// One checker per category, in execution order
#[must_use]
pub fn default_checkers() -> Vec<Box<dyn Checker>> {
    vec![
        Box::new(environment::EnvironmentChecker),
        Box::new(model::ModelChecker),
        Box::new(gpu::GpuChecker),
        Box::new(system::SystemChecker),
        Box::new(network::NetworkChecker),
        Box::new(processes::ProcessChecker),
        Box::new(scripts::ScriptChecker),
    ]
}

/// Turns a file, package or tool name into a result-name fragment.
#[must_use]
pub fn slug(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c.to_ascii_lowercase());
        } else if !out.ends_with('_') {
            out.push('_');
        }
    }
    out.trim_matches('_').to_string()
}
