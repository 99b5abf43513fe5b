#![allow(clippy::expect_used)]

mod common;

use std::time::Duration;

use common::ProvisionedHost;
use preflight::application::services::monitor::MonitorService;
use preflight::application::services::runner::{CancellationFlag, Runner};
use preflight::domain::value_objects::category::CategorySelector;
use preflight::infrastructure::notifications::webhook::WebhookNotifier;
use preflight::infrastructure::report::history_file::JsonlHistory;
use serde_json::json;
use wiremock::matchers::{body_partial_json, method};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn busy_port_is_alerted_once_and_every_cycle_is_recorded() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({
            "title": "network/port_8000",
            "status": "WARNING",
            "host": "gpu-node-01"
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let mut host = ProvisionedHost::healthy();
    host.ports.0 = vec![8000];
    let history_dir = tempfile::tempdir().expect("tempdir");
    let history = JsonlHistory::new(history_dir.path().to_path_buf());
    let webhook = WebhookNotifier::new(&server.uri()).expect("webhook");
    let runner = Runner::default();
    let mut monitor = MonitorService::new(
        &runner,
        &history,
        Some(&webhook),
        "gpu-node-01",
        Duration::from_secs(3600),
    );
    let cancel = CancellationFlag::new();

    let first = monitor
        .run_cycle(CategorySelector::All, &host.host(), &cancel)
        .await;
    let second = monitor
        .run_cycle(CategorySelector::All, &host.host(), &cancel)
        .await;

    assert_eq!(first.exit_code, 0);
    assert_eq!(first.alerts_sent, 1);
    assert_eq!(second.alerts_sent, 0);

    let path = first.history_path.expect("history written");
    assert_eq!(second.history_path.as_ref(), Some(&path));
    let content = std::fs::read_to_string(&path).expect("read history");
    let lines: Vec<serde_json::Value> = content
        .lines()
        .map(|l| serde_json::from_str(l).expect("json line"))
        .collect();
    assert_eq!(lines.len(), 2);
    assert!(lines.iter().all(|l| l["summary"]["warning_count"] == 1));
    assert!(lines.iter().all(|l| l["summary"]["fail_count"] == 0));
}

#[tokio::test]
async fn healthy_host_sends_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let host = ProvisionedHost::healthy();
    let history_dir = tempfile::tempdir().expect("tempdir");
    let history = JsonlHistory::new(history_dir.path().to_path_buf());
    let webhook = WebhookNotifier::new(&server.uri()).expect("webhook");
    let runner = Runner::default();
    let mut monitor = MonitorService::new(
        &runner,
        &history,
        Some(&webhook),
        "gpu-node-01",
        Duration::from_secs(3600),
    );

    let outcome = monitor
        .run_cycle(CategorySelector::All, &host.host(), &CancellationFlag::new())
        .await;
    assert_eq!(outcome.alerts_sent, 0);
    assert_eq!(outcome.record.summary.warning_count, 0);
    assert_eq!(outcome.record.summary.fail_count, 0);
}
