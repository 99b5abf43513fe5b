use async_trait::async_trait;

use super::{Checker, HostContext};
use crate::domain::entities::check_result::CheckResult;
use crate::domain::entities::snapshot::SystemSnapshot;
use crate::domain::value_objects::category::Category;
use crate::domain::value_objects::targets::SystemTarget;
use crate::domain::value_objects::thresholds::ThresholdSet;

const CATEGORY: Category = Category::System;

/// Grades host memory, swap, disk, file-descriptor limit and load.
pub struct SystemChecker;

#[async_trait]
impl Checker for SystemChecker {
    fn category(&self) -> Category {
        CATEGORY
    }

    async fn check(&self, host: &HostContext<'_>) -> Vec<CheckResult> {
        match host.snapshot().await {
            Ok(snapshot) => evaluate_snapshot(&snapshot, host.thresholds, &host.targets.system),
            Err(e) => vec![
                CheckResult::fail(CATEGORY, "snapshot", "system metrics unavailable")
                    .with_details(e.to_string()),
            ],
        }
    }
}

#[must_use]
pub fn evaluate_snapshot(
    snapshot: &SystemSnapshot,
    thresholds: &ThresholdSet,
    target: &SystemTarget,
) -> Vec<CheckResult> {
    let mut results = Vec::with_capacity(5);
    let memory = &snapshot.memory;

    let total_gb = memory.total_gb();
    let available = format!("{:.1} GB available", memory.available_gb());
    results.push(if total_gb < thresholds.min_memory_gb {
        CheckResult::warning(
            CATEGORY,
            "memory",
            format!(
                "{total_gb:.1} GB RAM, {:.0} GB recommended",
                thresholds.min_memory_gb
            ),
        )
    } else {
        CheckResult::pass(CATEGORY, "memory", format!("{total_gb:.1} GB RAM"))
    }
    .with_details(available));

    results.push(if memory.swap_total_mb == 0 {
        CheckResult::info(CATEGORY, "swap", "no swap configured")
    } else if memory.swap_used_mb > 0 {
        CheckResult::warning(CATEGORY, "swap", "swap in use")
            .with_details(format!(
                "{} / {} MiB",
                memory.swap_used_mb, memory.swap_total_mb
            ))
    } else {
        CheckResult::pass(CATEGORY, "swap", "swap unused")
    });

    let disk_path = target.disk_path.display().to_string();
    results.push(match snapshot.disk_for(&target.disk_path) {
        None => CheckResult::warning(CATEGORY, "disk_usage", "no filesystem found")
            .with_details(disk_path),
        Some(disk) if disk.usage_percent > thresholds.max_disk_usage_percent => {
            CheckResult::warning(
                CATEGORY,
                "disk_usage",
                format!("{:.1}% used on {}", disk.usage_percent, disk.mount_point),
            )
            .with_details(format!("{:.1} GB free", disk.available_gb))
        }
        Some(disk) => CheckResult::pass(
            CATEGORY,
            "disk_usage",
            format!("{:.1}% used on {}", disk.usage_percent, disk.mount_point),
        )
        .with_details(format!("{:.1} GB free", disk.available_gb)),
    });

    let minimum = thresholds.min_open_files;
    results.push(match snapshot.open_files_limit {
        None => CheckResult::info(CATEGORY, "open_files", "open file limit unavailable"),
        Some(limit) if limit < minimum => CheckResult::warning(
            CATEGORY,
            "open_files",
            format!("open file limit {limit} below {minimum}"),
        )
        .with_details(format!("raise with: ulimit -n {minimum}")),
        Some(limit) => {
            CheckResult::pass(CATEGORY, "open_files", format!("open file limit {limit}"))
        }
    });

    let cpu = &snapshot.cpu;
    results.push(
        CheckResult::info(
            CATEGORY,
            "load_average",
            format!(
                "{:.2} {:.2} {:.2}",
                cpu.load_avg_1m, cpu.load_avg_5m, cpu.load_avg_15m
            ),
        )
        .with_details(format!("{} cores", cpu.core_count)),
    );

    results
}
