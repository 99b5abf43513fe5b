pub mod alert;
pub mod check_result;
pub mod disk;
pub mod gpu;
pub mod metrics_record;
pub mod process;
pub mod run_report;
pub mod snapshot;

pub use alert::Alert;
pub use check_result::CheckResult;
pub use disk::DiskInfo;
pub use gpu::{GpuDevice, GpuParseError, GPU_QUERY_FIELDS};
pub use metrics_record::MetricsRecord;
pub use process::ProcessInfo;
pub use run_report::{ResultStore, RunReport, Summary};
pub use snapshot::{CpuInfo, MemoryInfo, SystemSnapshot};
