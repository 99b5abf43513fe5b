//! Fakes and a fully provisioned host shared by the integration tests.

#![allow(dead_code)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use tempfile::TempDir;

use preflight::domain::checks::HostContext;
use preflight::domain::entities::snapshot::SystemSnapshot;
use preflight::domain::ports::collector::{CollectionError, SystemCollector};
use preflight::domain::ports::command::{CommandError, CommandOutput, CommandRunner};
use preflight::domain::ports::network::{PortProbe, PortProbeError, PortState};
use preflight::domain::value_objects::targets::CheckTargets;
use preflight::domain::value_objects::thresholds::ThresholdSet;

pub fn fixture_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

pub fn load_snapshot(name: &str) -> SystemSnapshot {
    let json = fs::read_to_string(fixture_path(name)).expect("Failed to read fixture");
    serde_json::from_str(&json).expect("Failed to parse fixture")
}

pub fn load_text(name: &str) -> String {
    fs::read_to_string(fixture_path(name)).expect("Failed to read fixture")
}

pub fn ok(stdout: &str) -> Result<CommandOutput, CommandError> {
    Ok(CommandOutput {
        exit_code: Some(0),
        stdout: stdout.to_string(),
        stderr: String::new(),
    })
}

/// Replies keyed on program name plus a substring of the joined arguments.
#[derive(Default)]
pub struct ScriptedCommands {
    replies: Vec<(String, String, Result<CommandOutput, CommandError>)>,
    on_path: Vec<String>,
}

impl ScriptedCommands {
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

    pub fn without(mut self, program: &str) -> Self {
        self.replies.retain(|(p, _, _)| p != program);
        self.on_path.retain(|p| p != program);
        self
    }

    pub fn on_path(mut self, program: &str) -> Self {
        self.on_path.push(program.to_string());
        self
    }
}

#[async_trait]
impl CommandRunner for ScriptedCommands {
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

pub struct FixedCollector(pub Option<SystemSnapshot>);

#[async_trait]
impl SystemCollector for FixedCollector {
    async fn collect(&self) -> Result<SystemSnapshot, CollectionError> {
        self.0
            .clone()
            .ok_or_else(|| CollectionError::Unreadable {
                resource: "/proc/meminfo".into(),
                reason: "permission denied".into(),
            })
    }
}

/// Never answers within any reasonable timeout.
pub struct StalledCollector;

#[async_trait]
impl SystemCollector for StalledCollector {
    async fn collect(&self) -> Result<SystemSnapshot, CollectionError> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Err(CollectionError::Unavailable("unreachable".into()))
    }
}

#[derive(Default)]
pub struct BusyPorts(pub Vec<u16>);

impl PortProbe for BusyPorts {
    fn probe(&self, port: u16) -> Result<PortState, PortProbeError> {
        Ok(if self.0.contains(&port) {
            PortState::InUse
        } else {
            PortState::Free
        })
    }
}

/// A host on which every check passes, backed by temporary directories.
pub struct ProvisionedHost {
    pub commands: ScriptedCommands,
    pub collector: FixedCollector,
    pub ports: BusyPorts,
    pub thresholds: ThresholdSet,
    pub targets: CheckTargets,
    pub query_timeout: Duration,
    pub model_dir: TempDir,
    pub scripts_dir: TempDir,
}

impl ProvisionedHost {
    pub fn healthy() -> Self {
        let model_dir = tempfile::tempdir().expect("model tempdir");
        for file in [
            "config.json",
            "tokenizer.json",
            "tokenizer_config.json",
            "generation_config.json",
        ] {
            fs::write(model_dir.path().join(file), "{}").expect("write model file");
        }
        fs::write(
            model_dir.path().join("model-00001-of-00001.safetensors"),
            vec![0u8; 4096],
        )
        .expect("write shard");

        let scripts_dir = tempfile::tempdir().expect("scripts tempdir");
        for script in [
            "start_vllm_optimized.sh",
            "start_pipeline.sh",
            "performance_test.sh",
        ] {
            let path = scripts_dir.path().join(script);
            fs::write(&path, "#!/bin/sh\nexit 0\n").expect("write script");
            fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).expect("chmod");
        }

        let commands = ScriptedCommands::default()
            .on("python3", "--version", ok("Python 3.11.9\n"))
            .on("python3", "torch.cuda", ok("True\n4\n12.4\n"))
            .on("python3", "torch.__version__", ok("2.4.0+cu124\n"))
            .on("python3", "importlib.metadata", ok("1.0.0\n"))
            .on(
                "nvidia-smi",
                "--query-gpu",
                ok(&load_text("nvidia_smi_4gpu.csv")),
            )
            .on("ufw", "status", ok("Status: active\n"))
            .on("tmux", "list-sessions", ok("vllm: 1 windows (created Fri Oct 16 08:00:00 2026)\n"))
            .on_path("python3")
            .on_path("nvidia-smi")
            .on_path("curl")
            .on_path("jq")
            .on_path("tmux");

        let mut targets = CheckTargets::default();
        targets.model.path = model_dir.path().to_path_buf();
        targets.scripts.dirs = vec![scripts_dir.path().to_path_buf()];

        let thresholds = ThresholdSet {
            min_model_size_gb: 0.0,
            ..ThresholdSet::default()
        };

        Self {
            commands,
            collector: FixedCollector(Some(load_snapshot("snapshot_healthy.json"))),
            ports: BusyPorts::default(),
            thresholds,
            targets,
            query_timeout: Duration::from_secs(5),
            model_dir,
            scripts_dir,
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
