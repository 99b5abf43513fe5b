use std::path::PathBuf;

/// What each checker inspects on the host.
///
/// Built from the application configuration with every path already expanded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckTargets {
    pub environment: EnvironmentTarget,
    pub model: ModelTarget,
    pub system: SystemTarget,
    pub network: NetworkTarget,
    pub processes: ProcessTarget,
    pub scripts: ScriptTarget,
}

/// Python runtime hosting the inference server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvironmentTarget {
    /// Interpreter inside the runtime environment
    pub interpreter: String,
    /// Environment prefix that must exist before the interpreter is trusted
    pub prefix: Option<PathBuf>,
    /// Library providing accelerator support
    pub accelerator_library: String,
    /// Packages whose absence fails the run
    pub required_packages: Vec<String>,
    /// Packages whose absence only warns
    pub recommended_packages: Vec<String>,
}

impl Default for EnvironmentTarget {
    fn default() -> Self {
        Self {
            interpreter: "python3".into(),
            prefix: None,
            accelerator_library: "torch".into(),
            required_packages: vec!["vllm".into()],
            recommended_packages: vec!["transformers".into(), "flash_attn".into()],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelTarget {
    pub path: PathBuf,
    pub required_files: Vec<String>,
    pub optional_files: Vec<String>,
    /// File extensions counted as weight shards
    pub weight_extensions: Vec<String>,
}

impl Default for ModelTarget {
    fn default() -> Self {
        Self {
            path: PathBuf::from("/models/qwen3"),
            required_files: vec![
                "config.json".into(),
                "tokenizer.json".into(),
                "tokenizer_config.json".into(),
            ],
            optional_files: vec!["generation_config.json".into()],
            weight_extensions: vec!["safetensors".into(), "bin".into()],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemTarget {
    /// Path whose filesystem usage is checked
    pub disk_path: PathBuf,
}

impl Default for SystemTarget {
    fn default() -> Self {
        Self {
            disk_path: PathBuf::from("/"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkTarget {
    pub ports: Vec<u16>,
    /// Program and arguments reporting firewall state
    pub firewall_command: Vec<String>,
}

impl Default for NetworkTarget {
    fn default() -> Self {
        Self {
            ports: vec![8000, 8001, 8080, 8888],
            firewall_command: vec!["ufw".into(), "status".into()],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessTarget {
    /// Substrings matched against process names and command lines
    pub patterns: Vec<String>,
    /// Program and arguments listing managed terminal sessions
    pub session_command: Vec<String>,
}

impl Default for ProcessTarget {
    fn default() -> Self {
        Self {
            patterns: vec!["vllm".into()],
            session_command: vec!["tmux".into(), "list-sessions".into()],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptTarget {
    pub dirs: Vec<PathBuf>,
    pub key_scripts: Vec<String>,
    pub tools: Vec<String>,
}

impl Default for ScriptTarget {
    fn default() -> Self {
        Self {
            dirs: vec![PathBuf::from("scripts"), PathBuf::from("scripts/experimental")],
            key_scripts: vec![
                "start_vllm_optimized.sh".into(),
                "start_pipeline.sh".into(),
                "performance_test.sh".into(),
            ],
            tools: vec![
                "nvidia-smi".into(),
                "curl".into(),
                "jq".into(),
                "tmux".into(),
            ],
        }
    }
}
