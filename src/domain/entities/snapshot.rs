use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::disk::DiskInfo;
use super::process::ProcessInfo;

/// Host resource state captured at a point in time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemSnapshot {
    pub timestamp: DateTime<Utc>,
    pub memory: MemoryInfo,
    pub cpu: CpuInfo,
    #[serde(default)]
    pub processes: Vec<ProcessInfo>,
    #[serde(default)]
    pub disks: Vec<DiskInfo>,
    /// Soft `RLIMIT_NOFILE` of the current process, when readable
    #[serde(default)]
    pub open_files_limit: Option<u64>,
}

/// System memory usage information
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryInfo {
    pub total_mb: u64,
    pub used_mb: u64,
    pub available_mb: u64,
    pub swap_total_mb: u64,
    pub swap_used_mb: u64,
}

impl MemoryInfo {
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn total_gb(&self) -> f64 {
        self.total_mb as f64 / 1024.0
    }

    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn available_gb(&self) -> f64 {
        self.available_mb as f64 / 1024.0
    }
}

/// CPU topology and load
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CpuInfo {
    pub core_count: usize,
    pub load_avg_1m: f64,
    pub load_avg_5m: f64,
    pub load_avg_15m: f64,
}

impl SystemSnapshot {
    /// Disk holding `path`: the entry with the longest mount point that prefixes it.
    #[must_use]
    pub fn disk_for(&self, path: &std::path::Path) -> Option<&DiskInfo> {
        self.disks
            .iter()
            .filter(|d| path.starts_with(&d.mount_point))
            .max_by_key(|d| d.mount_point.len())
    }
}
