use crate::domain::entities::run_report::RunReport;

/// Result records as a pretty-printed JSON array, in execution order.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn render_json(report: &RunReport) -> serde_json::Result<String> {
    serde_json::to_string_pretty(report.results())
}
