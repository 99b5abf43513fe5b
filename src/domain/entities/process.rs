use serde::{Deserialize, Serialize};

/// Information about a running process
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessInfo {
    pub pid: u32,
    pub name: String,
    pub cmdline: String,
    pub cpu_percent: f32,
    pub rss_mb: u64,
}

impl ProcessInfo {
    /// Case-insensitive match of `pattern` against the name or command line.
    #[must_use]
    pub fn matches(&self, pattern: &str) -> bool {
        let pattern = pattern.to_lowercase();
        self.name.to_lowercase().contains(&pattern)
            || self.cmdline.to_lowercase().contains(&pattern)
    }
}
