use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// preflight: readiness checks for an LLM inference host
///
/// Inspects the Python runtime, model files, GPUs, host resources, ports,
/// processes and operational scripts, then reports what needs attention.
#[derive(Parser, Debug)]
#[command(name = "preflight")]
#[command(version, about, long_about)]
pub struct Cli {
    /// Subcommand to execute (defaults to `check`)
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Path to custom config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log progress to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Log every external call and its details to stderr
    #[arg(long, global = true)]
    pub debug: bool,

    /// Disable terminal colors
    #[arg(long, global = true)]
    pub no_color: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run health checks and report the results
    #[command(alias = "c")]
    Check(CheckArgs),

    /// Measure a running inference server
    #[command(alias = "p")]
    Probe(ProbeArgs),

    /// Re-run checks on an interval, keeping a JSONL history and sending alerts
    #[command(alias = "w")]
    Watch(WatchArgs),

    /// Show or initialize the configuration file
    Config {
        /// Write the default configuration file
        #[arg(long)]
        init: bool,
    },
}

#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct CheckArgs {
    /// Category to check: all, environment, model, gpu, system, network, processes, scripts
    #[arg(default_value = "all")]
    pub category: String,

    /// Output results as a JSON array
    #[arg(long)]
    pub json: bool,

    /// Write a markdown report (and a JSON sibling with --json)
    #[arg(long)]
    pub save_report: bool,

    /// Directory for saved reports (default: config `general.report_dir`)
    #[arg(long, value_name = "DIR")]
    pub report_dir: Option<PathBuf>,

    /// Accepted for compatibility; no repairs are attempted
    #[arg(long)]
    pub fix: bool,
}

impl Default for CheckArgs {
    fn default() -> Self {
        Self {
            category: "all".into(),
            json: false,
            save_report: false,
            report_dir: None,
            fix: false,
        }
    }
}

#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct WatchArgs {
    /// Category to watch (same values as `check`)
    #[arg(default_value = "all")]
    pub category: String,

    /// Seconds between cycles (default: config `monitor.interval_secs`)
    #[arg(long, value_name = "SECS")]
    pub interval: Option<u64>,

    /// Run a single cycle, print its record as JSON and exit
    #[arg(long)]
    pub once: bool,
}

impl Default for WatchArgs {
    fn default() -> Self {
        Self {
            category: "all".into(),
            interval: None,
            once: false,
        }
    }
}

#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct ProbeArgs {
    /// Server base URL (default: config `probe.endpoint`)
    #[arg(long, value_name = "URL")]
    pub endpoint: Option<String>,

    /// Bearer token for the server
    #[arg(long, env = "VLLM_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Served model name (default: config `probe.model`)
    #[arg(long)]
    pub model: Option<String>,

    /// Prompt sent with each completion request
    #[arg(long)]
    pub prompt: Option<String>,

    /// Completion length per request
    #[arg(long)]
    pub max_tokens: Option<u32>,

    /// Number of completion requests
    #[arg(short = 'n', long)]
    pub requests: Option<u32>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap_or_else(|e| panic!("{e}"))
    }

    #[test]
    fn no_command_returns_none() {
        assert!(parse(&["preflight"]).command.is_none());
    }

    #[test]
    fn check_defaults_to_all() {
        let cli = parse(&["preflight", "check"]);
        assert!(matches!(cli.command, Some(Commands::Check(ref a)) if *a == CheckArgs::default()));
    }

    #[test]
    fn check_with_category_and_flags() {
        let cli = parse(&[
            "preflight",
            "check",
            "gpu",
            "--json",
            "--save-report",
            "--report-dir",
            "/tmp/reports",
            "--fix",
        ]);
        let Some(Commands::Check(args)) = cli.command else {
            panic!("expected check");
        };
        assert_eq!(args.category, "gpu");
        assert!(args.json);
        assert!(args.save_report);
        assert!(args.fix);
        assert_eq!(args.report_dir, Some(PathBuf::from("/tmp/reports")));
    }

    #[test]
    fn check_alias() {
        let cli = parse(&["preflight", "c", "model"]);
        assert!(matches!(cli.command, Some(Commands::Check(ref a)) if a.category == "model"));
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = parse(&["preflight", "check", "--verbose", "--no-color", "--debug"]);
        assert!(cli.verbose);
        assert!(cli.no_color);
        assert!(cli.debug);
    }

    #[test]
    fn parse_global_config() {
        let cli = parse(&["preflight", "--config", "/tmp/test.toml", "check"]);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/test.toml")));
    }

    #[test]
    fn probe_overrides() {
        let cli = parse(&[
            "preflight",
            "probe",
            "--endpoint",
            "http://10.0.0.5:8000",
            "--model",
            "qwen3",
            "-n",
            "5",
            "--max-tokens",
            "64",
            "--api-key",
            "secret",
        ]);
        let Some(Commands::Probe(args)) = cli.command else {
            panic!("expected probe");
        };
        assert_eq!(args.endpoint.as_deref(), Some("http://10.0.0.5:8000"));
        assert_eq!(args.requests, Some(5));
        assert_eq!(args.max_tokens, Some(64));
        assert_eq!(args.api_key.as_deref(), Some("secret"));
    }

    #[test]
    fn watch_flags() {
        let cli = parse(&["preflight", "watch", "gpu", "--interval", "60", "--once"]);
        let Some(Commands::Watch(args)) = cli.command else {
            panic!("expected watch");
        };
        assert_eq!(args.category, "gpu");
        assert_eq!(args.interval, Some(60));
        assert!(args.once);

        let cli = parse(&["preflight", "w"]);
        let Some(Commands::Watch(args)) = cli.command else {
            panic!("expected watch");
        };
        assert_eq!(args.category, "all");
        assert!(args.interval.is_none());
    }

    #[test]
    fn config_init() {
        let cli = parse(&["preflight", "config", "--init"]);
        assert!(matches!(cli.command, Some(Commands::Config { init: true })));
    }

    #[test]
    fn unknown_flag_is_rejected() {
        assert!(Cli::try_parse_from(["preflight", "check", "--bogus"]).is_err());
    }
}
