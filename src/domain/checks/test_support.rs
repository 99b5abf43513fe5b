//! In-memory ports for checker unit tests.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;

use super::HostContext;
use crate::domain::entities::snapshot::{CpuInfo, MemoryInfo, SystemSnapshot};
use crate::domain::ports::collector::{CollectionError, SystemCollector};
use crate::domain::ports::command::{CommandError, CommandOutput, CommandRunner};
use crate::domain::ports::network::{PortProbe, PortState};
use crate::domain::value_objects::targets::CheckTargets;
use crate::domain::value_objects::thresholds::ThresholdSet;

pub fn ok(stdout: &str) -> Result<CommandOutput, CommandError> {
    Ok(CommandOutput {
        exit_code: Some(0),
        stdout: stdout.to_string(),
        stderr: String::new(),
    })
}

pub fn exit(code: i32, stderr: &str) -> Result<CommandOutput, CommandError> {
    Ok(CommandOutput {
        exit_code: Some(code),
        stdout: String::new(),
        stderr: stderr.to_string(),
    })
}

/// Answers the first registered `(program, needle)` whose needle appears in
/// the joined arguments; anything else is `NotFound`.
#[derive(Default)]
pub struct FakeCommands {
    replies: Vec<(String, String, Result<CommandOutput, CommandError>)>,
    on_path: Vec<String>,
}

impl FakeCommands {
    pub fn on(
        mut self,
        program: &str,
        needle: &str,
        reply: Result<CommandOutput, CommandError>,
    ) -> Self {
        self.replies
            .push((program.to_string(), needle.to_string(), reply));
        self
    }

    pub fn on_path(mut self, program: &str) -> Self {
        self.on_path.push(program.to_string());
        self
    }
}

#[async_trait]
impl CommandRunner for FakeCommands {
    async fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput, CommandError> {
        let joined = args.join(" ");
        self.replies
            .iter()
            .find(|(p, needle, _)| p == program && joined.contains(needle.as_str()))
            .map_or_else(
                || Err(CommandError::NotFound(program.to_string())),
                |(_, _, reply)| reply.clone(),
            )
    }

    fn which(&self, program: &str) -> Option<PathBuf> {
        self.on_path
            .iter()
            .any(|p| p == program)
            .then(|| PathBuf::from("/usr/bin").join(program))
    }
}

pub struct FakeCollector(pub Option<SystemSnapshot>);

#[async_trait]
impl SystemCollector for FakeCollector {
    async fn collect(&self) -> Result<SystemSnapshot, CollectionError> {
        self.0
            .clone()
            .ok_or_else(|| CollectionError::Unavailable("no snapshot".into()))
    }
}

/// Answers only after the given delay.
pub struct SlowCollector(pub Duration);

#[async_trait]
impl SystemCollector for SlowCollector {
    async fn collect(&self) -> Result<SystemSnapshot, CollectionError> {
        tokio::time::sleep(self.0).await;
        Ok(snapshot())
    }
}

#[derive(Default)]
pub struct FakePorts(pub Vec<u16>);

impl PortProbe for FakePorts {
    fn probe(&self, port: u16) -> Result<PortState, crate::domain::ports::network::PortProbeError> {
        Ok(if self.0.contains(&port) {
            PortState::InUse
        } else {
            PortState::Free
        })
    }
}

pub fn snapshot() -> SystemSnapshot {
    SystemSnapshot {
        timestamp: Utc::now(),
        memory: MemoryInfo {
            total_mb: 256 * 1024,
            used_mb: 32 * 1024,
            available_mb: 224 * 1024,
            swap_total_mb: 0,
            swap_used_mb: 0,
        },
        cpu: CpuInfo {
            core_count: 64,
            load_avg_1m: 1.5,
            load_avg_5m: 1.2,
            load_avg_15m: 1.0,
        },
        processes: Vec::new(),
        disks: Vec::new(),
        open_files_limit: Some(1_048_576),
    }
}

pub struct Fixture {
    pub commands: FakeCommands,
    pub collector: FakeCollector,
    pub ports: FakePorts,
    pub thresholds: ThresholdSet,
    pub targets: CheckTargets,
    pub query_timeout: Duration,
}

impl Fixture {
    pub fn new(commands: FakeCommands) -> Self {
        Self {
            commands,
            collector: FakeCollector(Some(snapshot())),
            ports: FakePorts::default(),
            thresholds: ThresholdSet::default(),
            targets: CheckTargets::default(),
            query_timeout: Duration::from_secs(5),
        }
    }

    pub fn host(&self) -> HostContext<'_> {
        HostContext {
            commands: &self.commands,
            collector: &self.collector,
            ports: &self.ports,
            thresholds: &self.thresholds,
            targets: &self.targets,
            query_timeout: self.query_timeout,
        }
    }
}
