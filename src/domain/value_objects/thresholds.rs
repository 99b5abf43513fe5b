use serde::{Deserialize, Serialize};

/// Policy bounds that turn host measurements into PASS/WARNING/FAIL
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdSet {
    /// Oldest acceptable interpreter release (major, minor)
    pub min_interpreter_version: (u32, u32),
    /// Model directory size below which a warning is raised
    pub min_model_size_gb: f64,
    /// Number of accelerators the deployment is sized for
    pub recommended_gpu_count: usize,
    /// Per-device memory below which a warning is raised
    pub min_gpu_memory_gb: f64,
    /// Device memory usage percentage above which a warning is raised
    pub max_gpu_memory_usage_percent: f64,
    /// Device temperature (°C) above which a warning is raised
    pub max_gpu_temperature_c: f64,
    /// Total host RAM below which a warning is raised
    pub min_memory_gb: f64,
    /// Disk usage percentage above which a warning is raised
    pub max_disk_usage_percent: f64,
    /// Soft open-file limit below which a warning is raised
    pub min_open_files: u64,
}

impl Default for ThresholdSet {
    fn default() -> Self {
        Self {
            min_interpreter_version: (3, 10),
            min_model_size_gb: 10.0,
            recommended_gpu_count: 4,
            min_gpu_memory_gb: 40.0,
            max_gpu_memory_usage_percent: 95.0,
            max_gpu_temperature_c: 85.0,
            min_memory_gb: 64.0,
            max_disk_usage_percent: 90.0,
            min_open_files: 65_536,
        }
    }
}
