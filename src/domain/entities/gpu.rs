use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One accelerator as reported by the hardware query tool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GpuDevice {
    pub index: u32,
    pub name: String,
    pub memory_total_mb: u64,
    pub memory_used_mb: u64,
    pub utilization_percent: Option<u32>,
    pub temperature_c: Option<u32>,
    pub driver_version: String,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("line {line}: {reason}")]
pub struct GpuParseError {
    pub line: usize,
    pub reason: String,
}

/// Number of columns in `GPU_QUERY_FIELDS`.
const GPU_FIELD_COUNT: usize = 7;

/// Fields requested from `nvidia-smi --query-gpu`, in column order.
pub const GPU_QUERY_FIELDS: &str =
    "index,name,memory.total,memory.used,utilization.gpu,temperature.gpu,driver_version";

impl GpuDevice {
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn memory_total_gb(&self) -> f64 {
        self.memory_total_mb as f64 / 1024.0
    }

    /// Share of device memory in use, 0 when the board reports no memory.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn memory_usage_percent(&self) -> f64 {
        if self.memory_total_mb == 0 {
            return 0.0;
        }
        self.memory_used_mb as f64 / self.memory_total_mb as f64 * 100.0
    }

    /// Parses `--format=csv,noheader,nounits` output, one device per line.
    ///
    /// # Errors
    ///
    /// Returns `GpuParseError` when a line has the wrong column count or a
    /// numeric column cannot be parsed.
    pub fn parse_csv(output: &str) -> Result<Vec<Self>, GpuParseError> {
        output
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(i, line)| Self::parse_line(i + 1, line))
            .collect()
    }

    fn parse_line(line_no: usize, line: &str) -> Result<Self, GpuParseError> {
        let fields: Vec<&str> = line.split(',').map(str::trim).collect();
        if fields.len() != GPU_FIELD_COUNT {
            return Err(GpuParseError {
                line: line_no,
                reason: format!(
                    "expected {GPU_FIELD_COUNT} columns, got {}",
                    fields.len()
                ),
            });
        }
        let required = |idx: usize, what: &str| {
            fields[idx].parse::<u64>().map_err(|e| GpuParseError {
                line: line_no,
                reason: format!("invalid {what} '{}': {e}", fields[idx]),
            })
        };

        let index = u32::try_from(required(0, "index")?).map_err(|e| GpuParseError {
            line: line_no,
            reason: format!("index out of range: {e}"),
        })?;

        Ok(Self {
            index,
            name: fields[1].to_string(),
            memory_total_mb: required(2, "memory.total")?,
            memory_used_mb: required(3, "memory.used")?,
            // "[N/A]" is reported for sensors the board does not expose
            utilization_percent: fields[4].parse().ok(),
            temperature_c: fields[5].parse().ok(),
            driver_version: fields[6].to_string(),
        })
    }
}
