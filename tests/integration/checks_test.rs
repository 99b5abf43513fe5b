#![allow(clippy::expect_used)]

mod common;

use std::time::{Duration, Instant};

use common::{ok, ProvisionedHost, StalledCollector};
use preflight::application::services::runner::{CancellationFlag, Runner};
use preflight::domain::entities::run_report::RunReport;
use preflight::domain::value_objects::category::{Category, CategorySelector};
use preflight::domain::value_objects::status::CheckStatus;

async fn run_all(host: &ProvisionedHost) -> RunReport {
    Runner::default()
        .run(CategorySelector::All, &host.host(), &CancellationFlag::new())
        .await
}

fn only(report: &RunReport, category: Category) -> Vec<(String, CheckStatus)> {
    report
        .results()
        .iter()
        .filter(|r| r.category() == category)
        .map(|r| (r.name().to_string(), r.status()))
        .collect()
}

// ---------------------------------------------------------------------------
// Healthy host
// ---------------------------------------------------------------------------

#[tokio::test]
async fn healthy_host_has_no_failures_or_warnings() {
    let host = ProvisionedHost::healthy();
    let report = run_all(&host).await;

    let flagged: Vec<String> = report
        .results()
        .iter()
        .filter(|r| r.status().needs_attention())
        .map(|r| format!("{}/{}: {}", r.category(), r.name(), r.message()))
        .collect();
    assert!(flagged.is_empty(), "unexpected findings: {flagged:?}");
    assert_eq!(report.exit_code(), 0);
}

#[tokio::test]
async fn results_follow_category_order() {
    let host = ProvisionedHost::healthy();
    let report = run_all(&host).await;

    let mut seen: Vec<Category> = report.results().iter().map(|r| r.category()).collect();
    seen.dedup();
    assert_eq!(seen, Category::ALL.to_vec());
}

#[tokio::test]
async fn gpu_fixture_yields_four_devices() {
    let host = ProvisionedHost::healthy();
    let report = run_all(&host).await;
    let gpu = only(&report, Category::Gpu);

    assert!(gpu.contains(&("gpu_count".into(), CheckStatus::Pass)));
    for index in 0..4 {
        assert!(gpu.contains(&(format!("gpu{index}_memory"), CheckStatus::Pass)));
        assert!(gpu.contains(&(format!("gpu{index}_temperature"), CheckStatus::Pass)));
    }
    assert!(gpu.contains(&("driver".into(), CheckStatus::Info)));
}

#[tokio::test]
async fn identical_hosts_give_identical_results() {
    let host = ProvisionedHost::healthy();
    let first = run_all(&host).await;
    let second = run_all(&host).await;

    let key = |report: &RunReport| -> Vec<(Category, String, CheckStatus)> {
        report
            .results()
            .iter()
            .map(|r| (r.category(), r.name().to_string(), r.status()))
            .collect()
    };
    assert_eq!(key(&first), key(&second));
}

// ---------------------------------------------------------------------------
// Missing dependencies
// ---------------------------------------------------------------------------

#[tokio::test]
async fn absent_model_directory_is_a_single_failure() {
    let mut host = ProvisionedHost::healthy();
    host.targets.model.path = host.model_dir.path().join("does-not-exist");
    let report = run_all(&host).await;

    assert_eq!(
        only(&report, Category::Model),
        vec![("directory".to_string(), CheckStatus::Fail)]
    );
    assert_eq!(report.exit_code(), 1);
}

#[tokio::test]
async fn absent_hardware_tool_is_a_single_failure() {
    let mut host = ProvisionedHost::healthy();
    host.commands = std::mem::take(&mut host.commands).without("nvidia-smi");
    let report = run_all(&host).await;

    assert_eq!(
        only(&report, Category::Gpu),
        vec![("hardware_tool".to_string(), CheckStatus::Fail)]
    );
    let tool = report
        .results()
        .iter()
        .find(|r| r.name() == "tool_nvidia_smi")
        .expect("tool result");
    assert_eq!(tool.status(), CheckStatus::Warning);
}

#[tokio::test]
async fn missing_runtime_stops_environment_checks() {
    let mut host = ProvisionedHost::healthy();
    host.commands = std::mem::take(&mut host.commands).without("python3");
    let report = run_all(&host).await;

    assert_eq!(
        only(&report, Category::Environment),
        vec![("runtime".to_string(), CheckStatus::Fail)]
    );
    // Other categories still run.
    assert!(!only(&report, Category::Scripts).is_empty());
}

#[tokio::test]
async fn unavailable_snapshot_fails_system_only() {
    let mut host = ProvisionedHost::healthy();
    host.collector.0 = None;
    let report = run_all(&host).await;

    assert_eq!(
        only(&report, Category::System),
        vec![("snapshot".to_string(), CheckStatus::Fail)]
    );
    assert_eq!(report.summary().fail_count, 1);
}

#[tokio::test]
async fn stalled_metrics_source_fails_system_without_hanging() {
    let mut host = ProvisionedHost::healthy();
    host.query_timeout = Duration::from_millis(100);
    let collector = StalledCollector;
    let mut ctx = host.host();
    ctx.collector = &collector;

    let started = Instant::now();
    let report = Runner::default()
        .run(CategorySelector::All, &ctx, &CancellationFlag::new())
        .await;

    assert!(started.elapsed() < Duration::from_secs(10));
    assert_eq!(
        only(&report, Category::System),
        vec![("snapshot".to_string(), CheckStatus::Fail)]
    );
    let system = report
        .results()
        .iter()
        .find(|r| r.category() == Category::System)
        .expect("system result");
    assert_eq!(system.details(), Some("host metrics did not respond within 100ms"));
}

#[tokio::test]
async fn busy_port_and_missing_package_are_reported() {
    let mut host = ProvisionedHost::healthy();
    host.ports.0 = vec![8000];
    host.commands = std::mem::take(&mut host.commands)
        .without("python3")
        .on("python3", "--version", ok("Python 3.11.9\n"))
        .on("python3", "torch.cuda", ok("True\n4\n12.4\n"))
        .on("python3", "torch.__version__", ok("2.4.0\n"))
        .on(
            "python3",
            "flash_attn",
            Ok(preflight::domain::ports::command::CommandOutput {
                exit_code: Some(1),
                stdout: String::new(),
                stderr: "PackageNotFoundError: flash_attn\n".into(),
            }),
        )
        .on("python3", "importlib.metadata", ok("1.0.0\n"))
        .on_path("python3");
    let report = run_all(&host).await;

    let network = only(&report, Category::Network);
    assert!(network.contains(&("port_8000".into(), CheckStatus::Warning)));
    assert!(network.contains(&("port_8001".into(), CheckStatus::Pass)));

    let environment = only(&report, Category::Environment);
    assert!(environment.contains(&("package_flash_attn".into(), CheckStatus::Warning)));
    assert!(environment.contains(&("package_vllm".into(), CheckStatus::Pass)));
    assert_eq!(report.exit_code(), 0);
}
