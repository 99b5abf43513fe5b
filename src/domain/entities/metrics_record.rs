use chrono::{DateTime, Utc};
use serde::Serialize;

use super::check_result::CheckResult;
use super::run_report::{RunReport, Summary};

/// One line of the `watch` history: a whole run with its counts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsRecord {
    pub timestamp: DateTime<Utc>,
    pub host: String,
    pub scope: String,
    pub duration_ms: i64,
    pub cancelled: bool,
    pub summary: Summary,
    pub results: Vec<CheckResult>,
}

impl MetricsRecord {
    #[must_use]
    pub fn from_report(report: &RunReport, host: &str) -> Self {
        Self {
            timestamp: report.finished_at(),
            host: host.to_string(),
            scope: report.selector().to_string(),
            duration_ms: (report.finished_at() - report.started_at()).num_milliseconds(),
            cancelled: report.cancelled(),
            summary: report.summary(),
            results: report.results().to_vec(),
        }
    }
}
