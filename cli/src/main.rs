//! CLI entrypoint for roundtable
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use clap::Parser;
use roundtable_application::{ChatProgressNotifier, CoordinatorError, RoundRobinCoordinator};
use roundtable_domain::{OutputFormat, RunStatus};
use roundtable_infrastructure::{ConfigLoader, FileConfig, JsonlConversationLogger, build_coordinator};
use roundtable_presentation::{
    Cli, ConsoleFormatter, OutputConfig, OutputFormatter, ProgressReporter, SimpleProgress,
};
use std::io::{IsTerminal, Read};
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_deref());
        return Ok(ExitCode::SUCCESS);
    }

    let config = load_config(&cli)?;

    // Initialize logging based on verbosity level; keep the guard alive so
    // buffered file output is flushed on exit
    let log_dir = cli.log_dir.as_deref().or(config.logging.log_dir.as_deref());
    let _log_guard = init_logging(cli.verbose, log_dir)?;

    info!("Starting roundtable");

    let task = read_task(cli.task.clone())?;

    let output = OutputConfig {
        format: cli
            .output
            .map(OutputFormat::from)
            .or(config.output.format)
            .unwrap_or_default(),
        color: config.output.color && !cli.no_color,
        stats: config.output.stats,
        show_progress: !cli.quiet,
    };
    output.apply_color();

    // === Dependency Injection ===
    let mut coordinator = build_coordinator(&config).context("Failed to assemble the chat")?;
    if let Some(max_steps) = cli.max_steps {
        coordinator = coordinator.with_max_steps(max_steps)?;
    }

    if output.show_progress {
        let progress = progress_for(coordinator.config().max_steps, output.streams_messages());
        coordinator = coordinator.with_progress(progress);
    }

    if let Some(path) = cli
        .conversation_log
        .as_deref()
        .or(config.logging.conversation_log.as_deref())
    {
        coordinator = attach_conversation_log(coordinator, path);
    }

    let cancellation = CancellationToken::new();
    coordinator = coordinator.with_cancellation(cancellation.clone());
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Received Ctrl+C, stopping after the current turn");
            cancellation.cancel();
        }
    });

    let formatter = if output.streams_messages() {
        ConsoleFormatter::new().without_transcript()
    } else {
        ConsoleFormatter::new()
    }
    .with_stats(output.stats);

    match coordinator.run_task(task).await {
        Ok(outcome) => {
            println!("{}", formatter.render(&outcome, output.format));
            Ok(match outcome.status {
                RunStatus::Cancelled => ExitCode::from(130),
                _ => ExitCode::SUCCESS,
            })
        }
        Err(error @ CoordinatorError::ParticipantFailed { .. }) => {
            eprintln!("{}", formatter.format_failure(coordinator.transcript(), &error));
            Ok(ExitCode::FAILURE)
        }
        Err(error) => Err(error.into()),
    }
}

fn load_config(cli: &Cli) -> Result<FileConfig> {
    if cli.no_config {
        return Ok(ConfigLoader::load_defaults());
    }
    if let Some(path) = &cli.config
        && !path.exists()
    {
        bail!("Config file not found: {}", path.display());
    }
    ConfigLoader::load(cli.config.as_deref()).context("Failed to load configuration")
}

fn init_logging(verbose: u8, log_dir: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace", // -vvv or more
    };

    let stderr_layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    let Some(dir) = log_dir else {
        tracing_subscriber::registry()
            .with(EnvFilter::new(level))
            .with(stderr_layer)
            .init();
        return Ok(None);
    };

    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create log directory {}", dir.display()))?;
    let (writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::daily(dir, "roundtable.log"));

    tracing_subscriber::registry()
        .with(EnvFilter::new(level))
        .with(stderr_layer)
        .with(fmt::layer().with_ansi(false).with_writer(writer))
        .init();
    Ok(Some(guard))
}

/// Task from the command line, or from piped stdin
fn read_task(task: Option<String>) -> Result<String> {
    if let Some(task) = task {
        return Ok(task);
    }

    let mut stdin = std::io::stdin();
    if stdin.is_terminal() {
        bail!("A task is required. Pass it as an argument or pipe it on stdin.");
    }
    let mut task = String::new();
    stdin
        .read_to_string(&mut task)
        .context("Failed to read the task from stdin")?;

    let task = task.trim();
    if task.is_empty() {
        bail!("The task read from stdin is empty");
    }
    Ok(task.to_string())
}

/// Spinner on a terminal, plain lines when stderr is redirected
fn progress_for(max_steps: usize, stream_messages: bool) -> Arc<dyn ChatProgressNotifier> {
    if std::io::stderr().is_terminal() {
        let reporter = ProgressReporter::new(max_steps);
        if stream_messages {
            Arc::new(reporter)
        } else {
            Arc::new(reporter.without_messages())
        }
    } else {
        let progress = SimpleProgress::new(max_steps);
        if stream_messages {
            Arc::new(progress)
        } else {
            Arc::new(progress.without_messages())
        }
    }
}

fn attach_conversation_log(coordinator: RoundRobinCoordinator, path: &Path) -> RoundRobinCoordinator {
    match JsonlConversationLogger::create(path) {
        Ok(logger) => {
            info!("Writing conversation log to {}", logger.path().display());
            coordinator.with_logger(Arc::new(logger))
        }
        Err(e) => {
            warn!("Could not open conversation log {}: {}", path.display(), e);
            coordinator
        }
    }
}
