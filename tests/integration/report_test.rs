#![allow(clippy::expect_used)]

mod common;

use chrono::{Local, TimeZone};
use common::ProvisionedHost;
use preflight::application::services::runner::{CancellationFlag, Runner};
use preflight::domain::entities::run_report::RunReport;
use preflight::domain::value_objects::category::CategorySelector;
use preflight::domain::value_objects::output_mode::OutputMode;
use preflight::infrastructure::report::report_file::{report_stem, save_report};
use preflight::presentation::cli::formatters::json_fmt::render_json;
use preflight::presentation::cli::formatters::report_fmt::{
    render_markdown, ReportContext, READY_STATEMENT,
};
use preflight::presentation::cli::formatters::text_fmt::render_text;

async fn run(host: &ProvisionedHost) -> RunReport {
    Runner::default()
        .run(CategorySelector::All, &host.host(), &CancellationFlag::new())
        .await
}

fn context() -> ReportContext {
    ReportContext {
        generated_at: Local
            .with_ymd_and_hms(2026, 10, 16, 8, 30, 0)
            .single()
            .expect("valid time"),
        version: "0.1.0".into(),
        host: "gpu-node-01".into(),
        env: vec![
            ("MODEL_PATH".into(), Some("/models/qwen3".into())),
            ("VLLM_API_KEY".into(), Some("sk-live-123".into())),
            ("HF_TOKEN".into(), None),
        ],
    }
}

// ---------------------------------------------------------------------------
// Text and structured views
// ---------------------------------------------------------------------------

#[tokio::test]
async fn text_and_json_views_agree() {
    let mut host = ProvisionedHost::healthy();
    host.ports.0 = vec![8888];
    host.commands = std::mem::take(&mut host.commands).without("nvidia-smi");
    let report = run(&host).await;

    let text = render_text(&report, OutputMode::Plain);
    let json = render_json(&report).expect("json");
    let records: Vec<serde_json::Value> = serde_json::from_str(&json).expect("parse");

    let lines: Vec<&str> = text.lines().filter(|l| l.starts_with('[')).collect();
    assert_eq!(lines.len(), records.len());
    for (line, record) in lines.iter().zip(&records) {
        let prefix = format!(
            "[{}] {}: {} - {}",
            record["category"].as_str().expect("category"),
            record["name"].as_str().expect("name"),
            record["status"].as_str().expect("status"),
            record["message"].as_str().expect("message"),
        );
        assert!(line.starts_with(&prefix), "{line} vs {prefix}");
    }

    let summary = report.summary();
    assert!(text.ends_with(&format!(
        "pass_count: {}\nwarning_count: {}\nfail_count: {}\n",
        summary.pass_count, summary.warning_count, summary.fail_count
    )));
}

// ---------------------------------------------------------------------------
// Markdown report
// ---------------------------------------------------------------------------

#[tokio::test]
async fn clean_run_reports_ready() {
    let host = ProvisionedHost::healthy();
    let report = run(&host).await;
    let markdown = render_markdown(&report, &context());

    assert!(markdown.contains(READY_STATEMENT));
    assert!(!markdown.contains("### Critical"));
    assert!(!markdown.contains("### Warnings"));
    assert!(markdown.contains("- **Host:** gpu-node-01"));
}

#[tokio::test]
async fn findings_are_listed_under_their_headings() {
    let mut host = ProvisionedHost::healthy();
    host.ports.0 = vec![8000];
    host.targets.model.path = "/nonexistent/preflight-model".into();
    let report = run(&host).await;
    let markdown = render_markdown(&report, &context());

    let critical = markdown.find("### Critical").expect("critical heading");
    let warnings = markdown.find("### Warnings").expect("warnings heading");
    assert!(critical < warnings);
    assert!(markdown[critical..warnings].contains("model directory not found"));
    assert!(markdown[warnings..].contains("port_8000"));
    assert!(!markdown.contains(READY_STATEMENT));
}

#[tokio::test]
async fn secrets_are_masked_in_environment_table() {
    let host = ProvisionedHost::healthy();
    let report = run(&host).await;
    let markdown = render_markdown(&report, &context());

    assert!(markdown.contains("/models/qwen3"));
    assert!(!markdown.contains("sk-live-123"));
    assert!(markdown.contains("********"));
    assert!(markdown.contains("_(unset)_"));
}

#[tokio::test]
async fn saved_report_writes_markdown_and_json_siblings() {
    let host = ProvisionedHost::healthy();
    let report = run(&host).await;
    let ctx = context();
    let dir = tempfile::tempdir().expect("tempdir");
    let reports = dir.path().join("logs");

    let saved = save_report(
        &reports,
        &report_stem(ctx.generated_at),
        &render_markdown(&report, &ctx),
        Some(&render_json(&report).expect("json")),
    )
    .expect("save");

    assert_eq!(
        saved.markdown,
        reports.join("health-report-20261016-083000.md")
    );
    let json_path = saved.json.expect("json sibling");
    assert_eq!(json_path, reports.join("health-report-20261016-083000.json"));
    let records: Vec<serde_json::Value> =
        serde_json::from_str(&std::fs::read_to_string(json_path).expect("read")).expect("parse");
    assert_eq!(records.len(), report.len());
}
