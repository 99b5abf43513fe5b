use std::fmt::Write as _;

use super::style::{dimmed, sanitize_terminal, status_label};
use chrono::Local;

use crate::domain::entities::check_result::CheckResult;
use crate::domain::entities::metrics_record::MetricsRecord;
use crate::domain::entities::run_report::RunReport;
use crate::domain::value_objects::status::CheckStatus;
use crate::domain::value_objects::category::Category;
use crate::domain::value_objects::output_mode::OutputMode;

/// Human-readable view of a run: one line per result, grouped by category,
/// then the three counts.
#[must_use]
pub fn render_text(report: &RunReport, mode: OutputMode) -> String {
    let mut out = String::new();

    for category in Category::ALL {
        for result in report.results().iter().filter(|r| r.category() == category) {
            let _ = writeln!(out, "{}", result_line(result, mode));
        }
    }

    if report.cancelled() {
        let _ = writeln!(out, "Run interrupted; results above are partial.");
    }

    let summary = report.summary();
    let _ = writeln!(out, "pass_count: {}", summary.pass_count);
    let _ = writeln!(out, "warning_count: {}", summary.warning_count);
    let _ = writeln!(out, "fail_count: {}", summary.fail_count);
    out
}

/// One line per `watch` cycle: local time, scope, overall status and counts.
#[must_use]
pub fn render_cycle_line(record: &MetricsRecord, alerts_sent: usize, mode: OutputMode) -> String {
    let summary = &record.summary;
    let overall = if summary.fail_count > 0 {
        CheckStatus::Fail
    } else if summary.warning_count > 0 {
        CheckStatus::Warning
    } else {
        CheckStatus::Pass
    };
    let stamp = record.timestamp.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S");
    format!(
        "{} [{}] {}: pass_count={} warning_count={} fail_count={} alerts_sent={}",
        dimmed(&stamp.to_string(), mode),
        record.scope,
        status_label(overall, mode),
        summary.pass_count,
        summary.warning_count,
        summary.fail_count,
        alerts_sent
    )
}

/// `[category] name: STATUS - message (details)`; multi-line details are
/// folded with `; ` so each result stays on one line.
fn result_line(result: &CheckResult, mode: OutputMode) -> String {
    let mut line = format!(
        "[{}] {}: {} - {}",
        result.category(),
        sanitize_terminal(result.name()),
        status_label(result.status(), mode),
        sanitize_terminal(result.message())
    );
    if let Some(details) = result.details().filter(|d| !d.trim().is_empty()) {
        let folded = details
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect::<Vec<_>>()
            .join("; ");
        let _ = write!(
            line,
            " {}",
            dimmed(&format!("({})", sanitize_terminal(&folded)), mode)
        );
    }
    line
}
