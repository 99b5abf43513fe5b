use std::fmt::Write as _;

use chrono::{DateTime, Local};

use crate::domain::entities::check_result::CheckResult;
use crate::domain::entities::run_report::RunReport;
use crate::domain::value_objects::category::Category;
use crate::domain::value_objects::status::CheckStatus;

/// Statement written when nothing needs attention.
pub const READY_STATEMENT: &str = "All checks passed. The system is ready for inference serving.";

const MASK: &str = "********";
const SECRET_MARKERS: &[&str] = &["KEY", "TOKEN", "SECRET", "PASSWORD"];

/// Facts about the invocation that the report header and appendix need.
#[derive(Debug, Clone)]
pub struct ReportContext {
    pub generated_at: DateTime<Local>,
    pub version: String,
    pub host: String,
    /// Captured variables in display order; `None` when unset
    pub env: Vec<(String, Option<String>)>,
}

impl ReportContext {
    /// Captures the named variables from the current process environment.
    #[must_use]
    pub fn capture(host: String, env_vars: &[String]) -> Self {
        Self {
            generated_at: Local::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            host,
            env: env_vars
                .iter()
                .map(|k| (k.clone(), std::env::var(k).ok()))
                .collect(),
        }
    }
}

/// Values of variables whose name looks secret are replaced wholesale.
#[must_use]
pub fn mask_env_value(key: &str, value: &str) -> String {
    let upper = key.to_uppercase();
    if SECRET_MARKERS.iter().any(|m| upper.contains(m)) && !value.is_empty() {
        MASK.to_string()
    } else {
        value.to_string()
    }
}

fn cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', "<br>")
}

/// Markdown document persisted by `check --save-report`.
#[must_use]
pub fn render_markdown(report: &RunReport, ctx: &ReportContext) -> String {
    let mut out = String::new();
    let summary = report.summary();

    let _ = writeln!(out, "# Inference Host Health Report\n");
    let _ = writeln!(
        out,
        "- **Generated:** {}",
        ctx.generated_at.format("%Y-%m-%d %H:%M:%S %:z")
    );
    let _ = writeln!(out, "- **Version:** {}", ctx.version);
    let _ = writeln!(out, "- **Host:** {}", ctx.host);
    let _ = writeln!(
        out,
        "- **Started:** {}",
        report.started_at().with_timezone(&Local).format("%Y-%m-%d %H:%M:%S")
    );
    let elapsed = (report.finished_at() - report.started_at())
        .to_std()
        .unwrap_or_default();
    let _ = writeln!(out, "- **Duration:** {:.1}s", elapsed.as_secs_f64());
    let _ = writeln!(out, "- **Scope:** {}", report.selector());
    if report.cancelled() {
        let _ = writeln!(out, "- **Note:** run interrupted, results are partial");
    }

    let _ = writeln!(out, "\n## Summary\n");
    let _ = writeln!(out, "| Status | Count |");
    let _ = writeln!(out, "|--------|-------|");
    let _ = writeln!(out, "| PASS | {} |", summary.pass_count);
    let _ = writeln!(out, "| WARNING | {} |", summary.warning_count);
    let _ = writeln!(out, "| FAIL | {} |", summary.fail_count);
    let _ = writeln!(out, "| INFO | {} |", summary.info_count);
    let _ = writeln!(out, "| **Total** | {} |", summary.total());

    let _ = writeln!(out, "\n## Detailed Results");
    for category in Category::ALL {
        let results: Vec<&CheckResult> = report
            .results()
            .iter()
            .filter(|r| r.category() == category)
            .collect();
        if results.is_empty() {
            continue;
        }
        let counts = report.summary_for(category);
        let _ = writeln!(out, "\n### {}\n", category.title());
        let _ = writeln!(
            out,
            "_{} pass, {} warning, {} fail, {} info_\n",
            counts.pass_count, counts.warning_count, counts.fail_count, counts.info_count
        );
        let _ = writeln!(out, "| Status | Check | Message | Details |");
        let _ = writeln!(out, "|--------|-------|---------|---------|");
        for r in results {
            let _ = writeln!(
                out,
                "| {} {} | {} | {} | {} |",
                r.status().emoji(),
                r.status(),
                cell(r.name()),
                cell(r.message()),
                cell(r.details().unwrap_or(""))
            );
        }
    }

    let _ = writeln!(out, "\n## Environment Variables\n");
    if ctx.env.is_empty() {
        let _ = writeln!(out, "_No variables configured._");
    } else {
        let _ = writeln!(out, "| Variable | Value |");
        let _ = writeln!(out, "|----------|-------|");
        for (key, value) in &ctx.env {
            let shown = value
                .as_deref()
                .map_or_else(|| "_(unset)_".to_string(), |v| cell(&mask_env_value(key, v)));
            let _ = writeln!(out, "| {key} | {shown} |");
        }
    }

    let _ = writeln!(out, "\n## Recommendations\n");
    if summary.is_clean() {
        let _ = writeln!(out, "{READY_STATEMENT}");
    } else {
        write_findings(&mut out, report, CheckStatus::Fail, "Critical");
        write_findings(&mut out, report, CheckStatus::Warning, "Warnings");
    }

    out
}

fn write_findings(out: &mut String, report: &RunReport, status: CheckStatus, heading: &str) {
    let mut findings = report.with_status(status).peekable();
    if findings.peek().is_none() {
        return;
    }
    let _ = writeln!(out, "### {heading}\n");
    for r in findings {
        let _ = write!(out, "- **{}/{}**: {}", r.category(), r.name(), r.message());
        match r.details() {
            Some(details) => {
                let _ = writeln!(out, " ({})", details.replace('\n', "; "));
            }
            None => out.push('\n'),
        }
    }
    out.push('\n');
}
