use std::io::IsTerminal;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use preflight::application::config::AppConfig;
use preflight::domain::ports::notifier::Notifier;
use preflight::application::services::runner::{CancellationFlag, Runner};
use preflight::domain::checks::HostContext;
use preflight::domain::value_objects::output_mode::OutputMode;
use preflight::domain::value_objects::targets::CheckTargets;
use preflight::domain::value_objects::thresholds::ThresholdSet;
use preflight::infrastructure::collectors::sysinfo_collector::SysinfoCollector;
use preflight::infrastructure::command::process_runner::TokioCommandRunner;
use preflight::infrastructure::network::tcp_port_probe::TcpPortProbe;
use preflight::infrastructure::notifications::webhook::WebhookNotifier;
use preflight::infrastructure::report::history_file::JsonlHistory;
use preflight::presentation::cli::app::{CheckArgs, Cli, Commands};
use preflight::presentation::cli::commands::check::run_check;
use preflight::presentation::cli::commands::config::run_config;
use preflight::presentation::cli::commands::probe::run_probe_command;
use preflight::presentation::cli::commands::watch::{run_watch, WatchSinks};

fn setup_tracing(verbose: bool, debug: bool) {
    let filter = if debug {
        EnvFilter::new("debug")
    } else if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::new("warn")
    };
    // stdout carries results only
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn output_mode(json: bool, no_color: bool) -> OutputMode {
    OutputMode::from_flags(json, no_color || !std::io::stdout().is_terminal())
}

fn main() -> anyhow::Result<ExitCode> {
    let runtime = tokio::runtime::Runtime::new()?;
    let code = runtime.block_on(run());
    // A hung filesystem or metrics query must not hold the process open
    runtime.shutdown_background();
    code
}

async fn run() -> anyhow::Result<ExitCode> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // --help and --version are not errors
            let code = u8::from(e.use_stderr());
            e.print()?;
            return Ok(ExitCode::from(code));
        }
    };

    setup_tracing(cli.verbose, cli.debug);

    let command = cli
        .command
        .unwrap_or_else(|| Commands::Check(CheckArgs::default()));

    let config_path = match cli.config {
        Some(ref path) => path.clone(),
        None => AppConfig::config_path()?,
    };
    let config = match (&command, cli.config.is_some()) {
        (Commands::Config { .. }, _) if !config_path.exists() => AppConfig::default(),
        (_, true) | (Commands::Config { .. }, _) => AppConfig::load_from(&config_path)?,
        (_, false) => AppConfig::load_or_create(&config_path)?,
    };

    let mut stdout = std::io::stdout();

    // Manual DI: main.rs is the only place that knows concrete types
    let commands = TokioCommandRunner::new(config.command_timeout());
    let collector = SysinfoCollector::new();
    let ports = TcpPortProbe::default();
    let thresholds = ThresholdSet::from(&config.thresholds);
    let targets = CheckTargets::from(&config);
    let host = HostContext {
        commands: &commands,
        collector: &collector,
        ports: &ports,
        thresholds: &thresholds,
        targets: &targets,
        query_timeout: config.query_timeout(),
    };
    let host_name = SysinfoCollector::host_name();

    let code = match command {
        Commands::Check(args) => {
            let cancel = CancellationFlag::new();
            cancel.cancel_on_ctrl_c();

            run_check(
                &args,
                &config,
                &Runner::default(),
                &host,
                &host_name,
                output_mode(args.json, cli.no_color),
                &cancel,
                &mut stdout,
            )
            .await?
        }
        Commands::Watch(args) => {
            let history = JsonlHistory::new(config.history_dir());
            let webhook = config
                .monitor
                .webhook_url
                .as_deref()
                .map(WebhookNotifier::new)
                .transpose()?;
            let cancel = CancellationFlag::new();
            cancel.cancel_on_ctrl_c();

            run_watch(
                &args,
                &config,
                &Runner::default(),
                &host,
                &host_name,
                WatchSinks {
                    history: &history,
                    notifier: webhook.as_ref().map(|w| w as &dyn Notifier),
                },
                output_mode(false, cli.no_color),
                &cancel,
                &mut stdout,
            )
            .await?
        }
        Commands::Probe(args) => {
            let mode = output_mode(args.json, cli.no_color);
            run_probe_command(&args, &config.probe, mode, &mut stdout).await?
        }
        Commands::Config { init } => run_config(&config, &config_path, init, &mut stdout)?,
    };

    Ok(ExitCode::from(code))
}
