use async_trait::async_trait;

use super::{Checker, HostContext};
use crate::domain::entities::check_result::CheckResult;
use crate::domain::entities::gpu::{GpuDevice, GPU_QUERY_FIELDS};
use crate::domain::ports::command::{CommandError, CommandOutput};
use crate::domain::value_objects::category::Category;
use crate::domain::value_objects::thresholds::ThresholdSet;

const CATEGORY: Category = Category::Gpu;

/// Hardware query tool shipped with the accelerator driver
pub const HARDWARE_TOOL: &str = "nvidia-smi";

/// Exit status `nvidia-smi` uses when the driver works but sees no board.
const NO_DEVICES_STATUS: i32 = 6;

/// Queries accelerator inventory, memory and temperature.
pub struct GpuChecker;

#[async_trait]
impl Checker for GpuChecker {
    fn category(&self) -> Category {
        CATEGORY
    }

    async fn check(&self, host: &HostContext<'_>) -> Vec<CheckResult> {
        let query = format!("--query-gpu={GPU_QUERY_FIELDS}");
        let output = match host
            .commands
            .run(HARDWARE_TOOL, &[query.as_str(), "--format=csv,noheader,nounits"])
            .await
        {
            Ok(out) if out.success() => out,
            Ok(out) if reports_no_devices(&out) => {
                let mut results = vec![CheckResult::pass(
                    CATEGORY,
                    "hardware_tool",
                    format!("{HARDWARE_TOOL} available"),
                )];
                results.extend(evaluate_devices(&[], host.thresholds));
                return results;
            }
            Ok(out) => {
                let code = out
                    .exit_code
                    .map_or_else(|| "signal".to_string(), |c| c.to_string());
                return vec![CheckResult::fail(
                    CATEGORY,
                    "hardware_tool",
                    format!("{HARDWARE_TOOL} exited with status {code}"),
                )
                .with_details(out.first_error_line().to_string())];
            }
            Err(CommandError::NotFound(_)) => {
                return vec![CheckResult::fail(
                    CATEGORY,
                    "hardware_tool",
                    format!("{HARDWARE_TOOL} not found"),
                )
                .with_details("accelerator driver utilities are not installed")];
            }
            Err(e) => {
                return vec![CheckResult::fail(
                    CATEGORY,
                    "hardware_tool",
                    "hardware query failed",
                )
                .with_details(e.to_string())];
            }
        };

        let mut results = vec![CheckResult::pass(
            CATEGORY,
            "hardware_tool",
            format!("{HARDWARE_TOOL} available"),
        )];

        let devices = match GpuDevice::parse_csv(&output.stdout) {
            Ok(devices) => devices,
            Err(e) => {
                results.push(
                    CheckResult::fail(CATEGORY, "hardware_query", "unparseable hardware query output")
                        .with_details(e.to_string()),
                );
                return results;
            }
        };

        results.extend(evaluate_devices(&devices, host.thresholds));
        results
    }
}

fn reports_no_devices(out: &CommandOutput) -> bool {
    out.exit_code == Some(NO_DEVICES_STATUS)
        || out.stdout.contains("No devices were found")
        || out.stderr.contains("No devices were found")
}

/// Grades a parsed device inventory.
#[must_use]
pub fn evaluate_devices(devices: &[GpuDevice], thresholds: &ThresholdSet) -> Vec<CheckResult> {
    let mut results = Vec::new();

    if let Some(first) = devices.first() {
        results.push(CheckResult::info(
            CATEGORY,
            "driver",
            format!("driver {}", first.driver_version),
        ));
    }

    let count = devices.len();
    let wanted = thresholds.recommended_gpu_count;
    results.push(match count {
        0 => CheckResult::fail(CATEGORY, "gpu_count", "no GPUs detected"),
        n if n < wanted => CheckResult::warning(
            CATEGORY,
            "gpu_count",
            format!("{n} GPU(s) detected, {wanted} recommended"),
        ),
        n => CheckResult::pass(CATEGORY, "gpu_count", format!("{n} GPU(s) detected")),
    });

    for device in devices {
        let i = device.index;
        let total_gb = device.memory_total_gb();
        let details = format!(
            "{}: {} / {} MiB used",
            device.name, device.memory_used_mb, device.memory_total_mb
        );
        results.push(if total_gb < thresholds.min_gpu_memory_gb {
            CheckResult::warning(
                CATEGORY,
                format!("gpu{i}_memory"),
                format!(
                    "{total_gb:.1} GB below recommended {:.0} GB",
                    thresholds.min_gpu_memory_gb
                ),
            )
        } else {
            CheckResult::pass(CATEGORY, format!("gpu{i}_memory"), format!("{total_gb:.1} GB"))
        }
        .with_details(details));

        let name = format!("gpu{i}_memory_usage");
        let usage = device.memory_usage_percent();
        let limit = thresholds.max_gpu_memory_usage_percent;
        let utilization = device
            .utilization_percent
            .map_or_else(|| "utilization not reported".to_string(), |u| format!("{u}% utilization"));
        results.push(if usage > limit {
            CheckResult::warning(
                CATEGORY,
                name,
                format!("{usage:.1}% memory used, above {limit:.0}%"),
            )
        } else {
            CheckResult::pass(CATEGORY, name, format!("{usage:.1}% memory used"))
        }
        .with_details(utilization));

        let name = format!("gpu{i}_temperature");
        results.push(match device.temperature_c {
            Some(t) if f64::from(t) > thresholds.max_gpu_temperature_c => CheckResult::warning(
                CATEGORY,
                name,
                format!("{t}°C exceeds {:.0}°C", thresholds.max_gpu_temperature_c),
            ),
            Some(t) => CheckResult::pass(CATEGORY, name, format!("{t}°C")),
            None => CheckResult::info(CATEGORY, name, "temperature not reported"),
        });
    }

    results
}
