use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use nix::sys::resource::{getrlimit, Resource};
use sysinfo::{Disk, Disks, Process, ProcessesToUpdate, System};

use crate::domain::entities::{
    disk::DiskInfo,
    process::ProcessInfo,
    snapshot::{CpuInfo, MemoryInfo, SystemSnapshot},
};
use crate::domain::ports::collector::{CollectionError, SystemCollector};

const MIB: u64 = 1_048_576;
const GIB: f64 = 1_073_741_824.0;

/// Kernel-provided trees whose mounts never hold model weights or logs.
const VIRTUAL_MOUNT_ROOTS: &[&str] = &["/proc", "/sys", "/dev", "/run"];

/// Host metrics read through `sysinfo`, plus the open-file limit from `getrlimit`.
///
/// `System` is refreshed in place, hence the mutex behind `&self`. Refreshing
/// walks `/proc` synchronously, so it runs on the blocking pool.
pub struct SysinfoCollector {
    system: Arc<Mutex<System>>,
}

impl SysinfoCollector {
    #[must_use]
    pub fn new() -> Self {
        Self {
            system: Arc::new(Mutex::new(System::new_all())),
        }
    }

    /// Host name for report headers, falling back to `unknown`.
    #[must_use]
    pub fn host_name() -> String {
        System::host_name().unwrap_or_else(|| "unknown".to_string())
    }
}

impl Default for SysinfoCollector {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SystemCollector for SysinfoCollector {
    async fn collect(&self) -> Result<SystemSnapshot, CollectionError> {
        let system = Arc::clone(&self.system);
        tokio::task::spawn_blocking(move || take_snapshot(&system))
            .await
            .map_err(|e| CollectionError::Unavailable(format!("snapshot task failed: {e}")))?
    }
}

fn take_snapshot(system: &Mutex<System>) -> Result<SystemSnapshot, CollectionError> {
    let mut system = system
        .lock()
        .map_err(|e| CollectionError::Unavailable(format!("sysinfo lock poisoned: {e}")))?;
    system.refresh_memory();
    system.refresh_processes(ProcessesToUpdate::All, true);

    let memory = MemoryInfo {
        total_mb: system.total_memory() / MIB,
        used_mb: system.used_memory() / MIB,
        available_mb: system.available_memory() / MIB,
        swap_total_mb: system.total_swap() / MIB,
        swap_used_mb: system.used_swap() / MIB,
    };
    if memory.total_mb == 0 {
        return Err(CollectionError::Unreadable {
            resource: "memory counters".into(),
            reason: "kernel reported zero total memory".into(),
        });
    }

    let load = System::load_average();
    let cpu = CpuInfo {
        core_count: system.cpus().len(),
        load_avg_1m: load.one,
        load_avg_5m: load.five,
        load_avg_15m: load.fifteen,
    };
    let processes = system.processes().values().map(process_info).collect();
    drop(system);

    Ok(SystemSnapshot {
        timestamp: chrono::Utc::now(),
        memory,
        cpu,
        processes,
        disks: mounted_filesystems(),
        open_files_limit: open_files_limit(),
    })
}

fn process_info(process: &Process) -> ProcessInfo {
    let name = process.name().to_string_lossy().into_owned();
    let args: Vec<String> = process
        .cmd()
        .iter()
        .map(|a| a.to_string_lossy().into_owned())
        .collect();
    ProcessInfo {
        pid: process.pid().as_u32(),
        cmdline: if args.is_empty() {
            format!("[{name}]")
        } else {
            args.join(" ")
        },
        name,
        cpu_percent: process.cpu_usage(),
        rss_mb: process.memory() / MIB,
    }
}

/// Mounted filesystems with a real size, virtual kernel trees excluded.
///
/// The list is rebuilt on each call so volumes mounted since the previous
/// snapshot are seen.
fn mounted_filesystems() -> Vec<DiskInfo> {
    Disks::new_with_refreshed_list()
        .iter()
        .filter(|d| d.total_space() > 0 && !is_virtual_mount(d.mount_point()))
        .map(disk_info)
        .collect()
}

fn is_virtual_mount(mount_point: &Path) -> bool {
    VIRTUAL_MOUNT_ROOTS
        .iter()
        .any(|root| mount_point.starts_with(root))
}

#[allow(clippy::cast_precision_loss)]
fn disk_info(disk: &Disk) -> DiskInfo {
    let total = disk.total_space();
    let available = disk.available_space().min(total);
    let used = total - available;
    DiskInfo {
        mount_point: disk.mount_point().to_string_lossy().into_owned(),
        total_gb: total as f64 / GIB,
        available_gb: available as f64 / GIB,
        usage_percent: used as f64 / total as f64 * 100.0,
        filesystem: disk.file_system().to_string_lossy().into_owned(),
    }
}

/// Soft `RLIMIT_NOFILE` of this process, inherited by anything it launches.
fn open_files_limit() -> Option<u64> {
    match getrlimit(Resource::RLIMIT_NOFILE) {
        Ok((soft, _hard)) => Some(soft),
        Err(e) => {
            tracing::debug!("getrlimit(RLIMIT_NOFILE) failed: {e}");
            None
        }
    }
}
