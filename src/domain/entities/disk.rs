use serde::{Deserialize, Serialize};

/// Usage of one mounted filesystem
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiskInfo {
    pub mount_point: String,
    pub total_gb: f64,
    pub available_gb: f64,
    pub usage_percent: f64,
    pub filesystem: String,
}

impl DiskInfo {
    #[must_use]
    pub fn used_gb(&self) -> f64 {
        (self.total_gb - self.available_gb).max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn used_gb_never_negative() {
        let disk = DiskInfo {
            mount_point: "/".to_string(),
            total_gb: 100.0,
            available_gb: 120.0,
            usage_percent: 0.0,
            filesystem: "xfs".to_string(),
        };
        assert!(disk.used_gb().abs() < f64::EPSILON);
    }

    #[test]
    fn used_gb_is_total_minus_available() {
        let disk = DiskInfo {
            mount_point: "/models".to_string(),
            total_gb: 2000.0,
            available_gb: 500.0,
            usage_percent: 75.0,
            filesystem: "ext4".to_string(),
        };
        assert!((disk.used_gb() - 1500.0).abs() < f64::EPSILON);
    }
}
