use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, Utc};

use crate::domain::entities::metrics_record::MetricsRecord;
use crate::domain::ports::history::{HistoryError, HistoryStore};

/// Appends one JSON object per line to `metrics-YYYY-mm-dd.jsonl`, one file
/// per local day.
pub struct JsonlHistory {
    dir: PathBuf,
}

impl JsonlHistory {
    #[must_use]
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    #[must_use]
    pub fn file_for(&self, at: DateTime<Utc>) -> PathBuf {
        let day = at.with_timezone(&Local).format("%Y-%m-%d");
        self.dir.join(format!("metrics-{day}.jsonl"))
    }
}

fn history_error(path: &Path, reason: impl ToString) -> HistoryError {
    HistoryError {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    }
}

impl HistoryStore for JsonlHistory {
    fn append(&self, record: &MetricsRecord) -> Result<PathBuf, HistoryError> {
        let path = self.file_for(record.timestamp);
        std::fs::create_dir_all(&self.dir).map_err(|e| history_error(&self.dir, e))?;
        let line = serde_json::to_string(record).map_err(|e| history_error(&path, e))?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| history_error(&path, e))?;
        writeln!(file, "{line}").map_err(|e| history_error(&path, e))?;

        tracing::debug!(path = %path.display(), "cycle appended to history");
        Ok(path)
    }
}
