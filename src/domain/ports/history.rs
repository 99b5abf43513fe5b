use std::path::PathBuf;

use thiserror::Error;

use crate::domain::entities::metrics_record::MetricsRecord;

#[derive(Error, Debug)]
#[error("cannot append to history {}: {reason}", .path.display())]
pub struct HistoryError {
    pub path: PathBuf,
    pub reason: String,
}

/// Append-only store for `watch` cycles.
pub trait HistoryStore: Send + Sync {
    /// Appends one record, returning where it was written.
    ///
    /// # Errors
    ///
    /// Returns `HistoryError` when the record cannot be serialized or written.
    fn append(&self, record: &MetricsRecord) -> Result<PathBuf, HistoryError>;
}
