#![allow(clippy::expect_used)]

mod common;

use common::ProvisionedHost;
use preflight::application::config::AppConfig;
use preflight::application::services::runner::{CancellationFlag, Runner};
use preflight::domain::value_objects::category::{CategorySelector, ConfigurationError};
use preflight::domain::value_objects::output_mode::OutputMode;
use preflight::domain::value_objects::status::CheckStatus;
use preflight::presentation::cli::app::CheckArgs;
use preflight::presentation::cli::commands::check::run_check;

// ---------------------------------------------------------------------------
// Selector
// ---------------------------------------------------------------------------

#[tokio::test]
async fn invalid_selector_runs_nothing() {
    let host = ProvisionedHost::healthy();
    let err = Runner::default()
        .run_named("gpus", &host.host(), &CancellationFlag::new())
        .await
        .expect_err("unknown category");

    assert!(matches!(err, ConfigurationError::InvalidCategory { ref given } if given == "gpus"));
    assert!(err.to_string().contains("environment"));
}

#[tokio::test]
async fn invalid_category_exits_one_with_empty_output() {
    let host = ProvisionedHost::healthy();
    let args = CheckArgs {
        category: "bogus".into(),
        ..CheckArgs::default()
    };
    let mut out = Vec::new();
    let code = run_check(
        &args,
        &AppConfig::default(),
        &Runner::default(),
        &host.host(),
        "gpu-node-01",
        OutputMode::Plain,
        &CancellationFlag::new(),
        &mut out,
    )
    .await
    .expect("run_check");

    assert_eq!(code, 1);
    assert!(out.is_empty());
}

#[tokio::test]
async fn single_category_selector() {
    let host = ProvisionedHost::healthy();
    let report = Runner::default()
        .run_named("network", &host.host(), &CancellationFlag::new())
        .await
        .expect("valid selector");

    assert!(!report.results().is_empty());
    assert!(report
        .results()
        .iter()
        .all(|r| r.category().as_str() == "network"));
    assert_eq!(report.selector().to_string(), "network");
}

// ---------------------------------------------------------------------------
// Counts and exit code
// ---------------------------------------------------------------------------

#[tokio::test]
async fn counts_sum_to_result_length() {
    let mut host = ProvisionedHost::healthy();
    host.ports.0 = vec![8080];
    host.targets.model.path = "/nonexistent/preflight-model".into();
    let report = Runner::default()
        .run(CategorySelector::All, &host.host(), &CancellationFlag::new())
        .await;

    let summary = report.summary();
    assert_eq!(summary.total(), report.results().len());
    assert_eq!(
        summary.pass_count + summary.warning_count + summary.fail_count + summary.info_count,
        report.len()
    );
    assert!(summary.warning_count >= 1);
    assert_eq!(summary.fail_count, 1);
}

#[tokio::test]
async fn exit_code_tracks_failures_only() {
    let mut host = ProvisionedHost::healthy();
    host.ports.0 = vec![8000, 8001];
    let warned = Runner::default()
        .run(CategorySelector::All, &host.host(), &CancellationFlag::new())
        .await;
    assert!(warned.summary().warning_count >= 2);
    assert_eq!(warned.exit_code(), 0);

    host.targets.model.path = "/nonexistent/preflight-model".into();
    let failed = Runner::default()
        .run(CategorySelector::All, &host.host(), &CancellationFlag::new())
        .await;
    assert_eq!(failed.exit_code(), 1);
    assert_eq!(failed.with_status(CheckStatus::Fail).count(), 1);
}

// ---------------------------------------------------------------------------
// Cancellation
// ---------------------------------------------------------------------------

#[tokio::test]
async fn cancelled_before_start_records_nothing() {
    let host = ProvisionedHost::healthy();
    let cancel = CancellationFlag::new();
    cancel.cancel();
    let report = Runner::default()
        .run(CategorySelector::All, &host.host(), &cancel)
        .await;

    assert!(report.cancelled());
    assert!(report.results().is_empty());
    assert_eq!(report.exit_code(), 0);
}
