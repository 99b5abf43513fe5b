use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::domain::value_objects::targets::{
    CheckTargets, EnvironmentTarget, ModelTarget, NetworkTarget, ProcessTarget, ScriptTarget,
    SystemTarget,
};
use crate::domain::value_objects::thresholds::ThresholdSet;

/// Top-level application configuration loaded from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub environment: EnvironmentConfig,
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub thresholds: ThresholdConfig,
    #[serde(default)]
    pub network: NetworkConfig,
    #[serde(default)]
    pub processes: ProcessConfig,
    #[serde(default)]
    pub scripts: ScriptConfig,
    #[serde(default)]
    pub report: ReportConfig,
    #[serde(default)]
    pub probe: ProbeConfig,
    #[serde(default)]
    pub monitor: MonitorConfig,
}

/// General settings: timeouts, report location, disk to watch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    #[serde(default = "default_command_timeout")]
    pub command_timeout_secs: u64,
    /// Bound for metric snapshots and the model directory scan
    #[serde(default = "default_query_timeout")]
    pub query_timeout_secs: u64,
    #[serde(default = "default_report_dir")]
    pub report_dir: String,
    #[serde(default = "default_disk_path")]
    pub disk_path: String,
}

/// Python runtime hosting the inference server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvironmentConfig {
    #[serde(default = "default_interpreter")]
    pub interpreter: String,
    /// Virtual environment or conda prefix; checked before the interpreter runs
    #[serde(default)]
    pub prefix: Option<String>,
    #[serde(default = "default_accelerator_library")]
    pub accelerator_library: String,
    #[serde(default = "default_required_packages")]
    pub required_packages: Vec<String>,
    #[serde(default = "default_recommended_packages")]
    pub recommended_packages: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    #[serde(default = "default_model_path")]
    pub path: String,
    #[serde(default = "default_required_files")]
    pub required_files: Vec<String>,
    #[serde(default = "default_optional_files")]
    pub optional_files: Vec<String>,
    #[serde(default = "default_weight_extensions")]
    pub weight_extensions: Vec<String>,
}

/// Pass/warn/fail boundaries for host measurements.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThresholdConfig {
    /// Oldest acceptable interpreter, as `major.minor`
    #[serde(default = "default_min_python")]
    pub min_python_version: String,
    #[serde(default = "default_min_model_size")]
    pub min_model_size_gb: f64,
    #[serde(default = "default_gpu_count")]
    pub recommended_gpu_count: usize,
    #[serde(default = "default_min_gpu_memory")]
    pub min_gpu_memory_gb: f64,
    #[serde(default = "default_max_gpu_memory_usage")]
    pub max_gpu_memory_usage_percent: f64,
    #[serde(default = "default_max_gpu_temp")]
    pub max_gpu_temperature_c: f64,
    #[serde(default = "default_min_memory")]
    pub min_memory_gb: f64,
    #[serde(default = "default_max_disk_usage")]
    pub max_disk_usage_percent: f64,
    #[serde(default = "default_min_open_files")]
    pub min_open_files: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    #[serde(default = "default_ports")]
    pub ports: Vec<u16>,
    #[serde(default = "default_firewall_command")]
    pub firewall_command: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessConfig {
    #[serde(default = "default_process_patterns")]
    pub patterns: Vec<String>,
    #[serde(default = "default_session_command")]
    pub session_command: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScriptConfig {
    #[serde(default = "default_script_dirs")]
    pub dirs: Vec<String>,
    #[serde(default = "default_key_scripts")]
    pub key_scripts: Vec<String>,
    #[serde(default = "default_tools")]
    pub tools: Vec<String>,
}

/// Environment variables captured in the persisted report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    #[serde(default = "default_env_vars")]
    pub env_vars: Vec<String>,
}

/// Defaults for the `probe` command; every field can be overridden on the CLI.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_probe_model")]
    pub model: String,
    #[serde(default = "default_prompt")]
    pub prompt: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_requests")]
    pub requests: u32,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

/// Settings for the `watch` command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    #[serde(default = "default_monitor_interval")]
    pub interval_secs: u64,
    /// Directory receiving one `metrics-YYYY-mm-dd.jsonl` file per day
    #[serde(default = "default_history_dir")]
    pub history_dir: String,
    /// Slack-compatible or generic JSON webhook; alerts are only logged when unset
    #[serde(default)]
    pub webhook_url: Option<String>,
    /// Minimum delay before the same finding is alerted again
    #[serde(default = "default_alert_cooldown")]
    pub alert_cooldown_secs: u64,
}

// --- Defaults ---

const fn default_command_timeout() -> u64 {
    5
}

const fn default_query_timeout() -> u64 {
    30
}

const fn default_monitor_interval() -> u64 {
    30
}

fn default_history_dir() -> String {
    "logs/metrics".into()
}

const fn default_alert_cooldown() -> u64 {
    3600
}

fn default_report_dir() -> String {
    "logs".into()
}

fn default_disk_path() -> String {
    "/".into()
}

fn default_interpreter() -> String {
    "python3".into()
}

fn default_accelerator_library() -> String {
    "torch".into()
}

fn default_required_packages() -> Vec<String> {
    vec!["vllm".into()]
}

fn default_recommended_packages() -> Vec<String> {
    vec!["transformers".into(), "flash_attn".into()]
}

// NOTE: Stored as raw string with tilde, expanded with shellexpand when converted.
fn default_model_path() -> String {
    "/models/qwen3".into()
}

fn default_required_files() -> Vec<String> {
    vec![
        "config.json".into(),
        "tokenizer.json".into(),
        "tokenizer_config.json".into(),
    ]
}

fn default_optional_files() -> Vec<String> {
    vec!["generation_config.json".into()]
}

fn default_weight_extensions() -> Vec<String> {
    vec!["safetensors".into(), "bin".into()]
}

fn default_min_python() -> String {
    "3.10".into()
}

const fn default_min_model_size() -> f64 {
    10.0
}

const fn default_gpu_count() -> usize {
    4
}

const fn default_min_gpu_memory() -> f64 {
    40.0
}

const fn default_max_gpu_memory_usage() -> f64 {
    95.0
}

const fn default_max_gpu_temp() -> f64 {
    85.0
}

const fn default_min_memory() -> f64 {
    64.0
}

const fn default_max_disk_usage() -> f64 {
    90.0
}

const fn default_min_open_files() -> u64 {
    65_536
}

fn default_ports() -> Vec<u16> {
    vec![8000, 8001, 8080, 8888]
}

fn default_firewall_command() -> Vec<String> {
    vec!["ufw".into(), "status".into()]
}

fn default_process_patterns() -> Vec<String> {
    vec!["vllm".into()]
}

fn default_session_command() -> Vec<String> {
    vec!["tmux".into(), "list-sessions".into()]
}

fn default_script_dirs() -> Vec<String> {
    vec!["scripts".into(), "scripts/experimental".into()]
}

fn default_key_scripts() -> Vec<String> {
    vec![
        "start_vllm_optimized.sh".into(),
        "start_pipeline.sh".into(),
        "performance_test.sh".into(),
    ]
}

fn default_tools() -> Vec<String> {
    vec![
        "nvidia-smi".into(),
        "curl".into(),
        "jq".into(),
        "tmux".into(),
    ]
}

fn default_env_vars() -> Vec<String> {
    vec![
        "CUDA_VISIBLE_DEVICES".into(),
        "MODEL_PATH".into(),
        "MAX_MODEL_LENGTH".into(),
        "SERVER_IP".into(),
        "VLLM_API_KEY".into(),
        "HF_HOME".into(),
        "HF_TOKEN".into(),
    ]
}

fn default_endpoint() -> String {
    "http://localhost:8000".into()
}

fn default_probe_model() -> String {
    "qwen3".into()
}

fn default_prompt() -> String {
    "Say 'OK' if you're working.".into()
}

const fn default_max_tokens() -> u32 {
    5
}

const fn default_requests() -> u32 {
    3
}

const fn default_request_timeout() -> u64 {
    30
}

// --- Default impls ---

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            command_timeout_secs: default_command_timeout(),
            query_timeout_secs: default_query_timeout(),
            report_dir: default_report_dir(),
            disk_path: default_disk_path(),
        }
    }
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            interpreter: default_interpreter(),
            prefix: None,
            accelerator_library: default_accelerator_library(),
            required_packages: default_required_packages(),
            recommended_packages: default_recommended_packages(),
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            path: default_model_path(),
            required_files: default_required_files(),
            optional_files: default_optional_files(),
            weight_extensions: default_weight_extensions(),
        }
    }
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            min_python_version: default_min_python(),
            min_model_size_gb: default_min_model_size(),
            recommended_gpu_count: default_gpu_count(),
            min_gpu_memory_gb: default_min_gpu_memory(),
            max_gpu_memory_usage_percent: default_max_gpu_memory_usage(),
            max_gpu_temperature_c: default_max_gpu_temp(),
            min_memory_gb: default_min_memory(),
            max_disk_usage_percent: default_max_disk_usage(),
            min_open_files: default_min_open_files(),
        }
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            ports: default_ports(),
            firewall_command: default_firewall_command(),
        }
    }
}

impl Default for ProcessConfig {
    fn default() -> Self {
        Self {
            patterns: default_process_patterns(),
            session_command: default_session_command(),
        }
    }
}

impl Default for ScriptConfig {
    fn default() -> Self {
        Self {
            dirs: default_script_dirs(),
            key_scripts: default_key_scripts(),
            tools: default_tools(),
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            env_vars: default_env_vars(),
        }
    }
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            model: default_probe_model(),
            prompt: default_prompt(),
            max_tokens: default_max_tokens(),
            requests: default_requests(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_monitor_interval(),
            history_dir: default_history_dir(),
            webhook_url: None,
            alert_cooldown_secs: default_alert_cooldown(),
        }
    }
}

// --- AppConfig methods ---

impl AppConfig {
    /// Load from a specific path, or create a default config file if missing
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, the TOML content is invalid,
    /// or the default config file cannot be written.
    pub fn load_or_create(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load_from(path)
        } else {
            let config = Self::default();
            config.save_to(path)?;
            tracing::info!(path = %path.display(), "created default configuration");
            Ok(config)
        }
    }

    /// Load from a specific path
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or the TOML content is invalid.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        toml::from_str(&content).context("Failed to parse config file")
    }

    /// Save config to a specific path, creating parent directories if needed
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created,
    /// serialization fails, or the file cannot be written.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let parent = path.parent().unwrap_or_else(|| Path::new("."));
        std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        std::fs::write(path, self.to_toml()?).context("Failed to write config file")?;
        Ok(())
    }

    /// Effective configuration rendered as TOML.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }

    /// Default config location: `<config dir>/preflight/config.toml`.
    ///
    /// # Errors
    ///
    /// Returns an error if the platform has no config directory.
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().context("Could not determine config directory")?;
        Ok(config_dir.join("preflight").join("config.toml"))
    }

    /// A zero timeout would fail every command, so one second is the floor.
    #[must_use]
    pub fn command_timeout(&self) -> Duration {
        Duration::from_secs(self.general.command_timeout_secs.max(1))
    }

    #[must_use]
    pub fn query_timeout(&self) -> Duration {
        Duration::from_secs(self.general.query_timeout_secs.max(1))
    }

    /// Delay between `watch` cycles, at least one second.
    #[must_use]
    pub fn monitor_interval(&self) -> Duration {
        Duration::from_secs(self.monitor.interval_secs.max(1))
    }

    #[must_use]
    pub fn alert_cooldown(&self) -> Duration {
        Duration::from_secs(self.monitor.alert_cooldown_secs)
    }

    #[must_use]
    pub fn history_dir(&self) -> PathBuf {
        expand_path(&self.monitor.history_dir)
    }

    #[must_use]
    pub fn report_dir(&self) -> PathBuf {
        expand_path(&self.general.report_dir)
    }
}

fn expand_path(raw: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(raw).into_owned())
}

/// Parses `major.minor`; anything unparseable yields `None`.
fn parse_major_minor(raw: &str) -> Option<(u32, u32)> {
    let (major, minor) = raw.trim().split_once('.')?;
    Some((major.parse().ok()?, minor.parse().ok()?))
}

impl From<&ThresholdConfig> for ThresholdSet {
    fn from(config: &ThresholdConfig) -> Self {
        let defaults = Self::default();

        let min_interpreter_version = parse_major_minor(&config.min_python_version)
            .unwrap_or_else(|| {
                tracing::warn!(
                    value = %config.min_python_version,
                    "invalid min_python_version, using default"
                );
                defaults.min_interpreter_version
            });

        // Negative sizes and temperatures make no sense; percentages stay in range
        Self {
            min_interpreter_version,
            min_model_size_gb: config.min_model_size_gb.max(0.0),
            recommended_gpu_count: config.recommended_gpu_count.max(1),
            min_gpu_memory_gb: config.min_gpu_memory_gb.max(0.0),
            max_gpu_memory_usage_percent: config.max_gpu_memory_usage_percent.clamp(0.0, 100.0),
            max_gpu_temperature_c: config.max_gpu_temperature_c.clamp(0.0, 150.0),
            min_memory_gb: config.min_memory_gb.max(0.0),
            max_disk_usage_percent: config.max_disk_usage_percent.clamp(0.0, 100.0),
            min_open_files: config.min_open_files,
        }
    }
}

impl From<&AppConfig> for CheckTargets {
    fn from(config: &AppConfig) -> Self {
        let env = &config.environment;
        let model = &config.model;
        Self {
            environment: EnvironmentTarget {
                interpreter: shellexpand::tilde(&env.interpreter).into_owned(),
                prefix: env.prefix.as_deref().map(expand_path),
                accelerator_library: env.accelerator_library.clone(),
                required_packages: env.required_packages.clone(),
                recommended_packages: env.recommended_packages.clone(),
            },
            model: ModelTarget {
                path: expand_path(&model.path),
                required_files: model.required_files.clone(),
                optional_files: model.optional_files.clone(),
                weight_extensions: model.weight_extensions.clone(),
            },
            system: SystemTarget {
                disk_path: expand_path(&config.general.disk_path),
            },
            network: NetworkTarget {
                ports: config.network.ports.clone(),
                firewall_command: config.network.firewall_command.clone(),
            },
            processes: ProcessTarget {
                patterns: config.processes.patterns.clone(),
                session_command: config.processes.session_command.clone(),
            },
            scripts: ScriptTarget {
                dirs: config.scripts.dirs.iter().map(|d| expand_path(d)).collect(),
                key_scripts: config.scripts.key_scripts.clone(),
                tools: config.scripts.tools.clone(),
            },
        }
    }
}
