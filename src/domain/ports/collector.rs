use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::entities::snapshot::SystemSnapshot;

/// Why a host snapshot could not be taken.
#[derive(Error, Debug)]
pub enum CollectionError {
    #[error("host metrics unavailable: {0}")]
    Unavailable(String),
    #[error("{resource} is not readable: {reason}")]
    Unreadable { resource: String, reason: String },
    #[error("host metrics did not respond within {0:?}")]
    TimedOut(Duration),
}

/// Source of the host-wide figures evaluated by the system and process checks.
#[async_trait]
pub trait SystemCollector: Send + Sync {
    /// Takes one snapshot of memory, load, filesystems, processes and limits.
    ///
    /// # Errors
    ///
    /// Returns `CollectionError` when the host refuses or cannot provide the
    /// figures; the system category then records a single failure.
    async fn collect(&self) -> Result<SystemSnapshot, CollectionError>;
}
