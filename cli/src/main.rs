//! CLI entrypoint for dialectic
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use clap::Parser;
use dialectic_application::{
    CompositeSink, EngineEventSink, RunDebateInput, RunDebateUseCase,
};
use dialectic_domain::{DebateEngineOutput, DebateLedger, OutputFormat, PersonaId, Topic};
use dialectic_infrastructure::{
    ConfigLoader, DebateScript, JsonlEventLog, ScriptedDebate, read_events,
};
use dialectic_presentation::{
    Cli, ConsoleFormatter, OutputFormatter, ProgressReporter, SimpleProgress,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_ref());
        return Ok(());
    }

    // === Configuration ===
    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
            .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?
    };
    config.validate().context("Invalid configuration")?;

    let log_file = cli
        .log_file
        .clone()
        .or_else(|| config.log.file.as_ref().map(PathBuf::from));
    let _log_guard = init_logging(cli.verbose, log_file.as_deref())?;

    ConsoleFormatter::set_color(config.output.color);
    let format = config.output.resolve_format(cli.output.map(Into::into));

    info!("Starting dialectic");

    // Replay mode: rebuild the result from a recorded event log
    if let Some(path) = &cli.replay {
        let events = read_events(path)?;
        info!("Replaying {} events from {}", events.len(), path.display());
        let ledger = DebateLedger::replay(&events);
        let output = DebateEngineOutput::from_ledger(&ledger, 0);
        println!("{}", ConsoleFormatter.render(&output, format));
        return Ok(());
    }

    let Some(script_path) = &cli.script else {
        bail!("--script is required unless --replay is given");
    };
    let script = DebateScript::from_path(script_path)?;
    let debate = Arc::new(ScriptedDebate::new(script));

    let topic = match (&cli.topic, debate.topic()) {
        (Some(topic), _) => match Topic::try_new(topic.clone()) {
            Some(topic) => topic,
            None => bail!("Topic cannot be empty"),
        },
        (None, Some(topic)) => topic,
        (None, None) => bail!("No topic given. Use --topic or set `topic` in the script."),
    };
    let personas: Vec<PersonaId> = if cli.personas.is_empty() {
        debate.personas().to_vec()
    } else {
        cli.personas.iter().map(|p| PersonaId::new(p.as_str())).collect()
    };

    // The script cannot produce more turns than it has
    let mut params = config.debate.to_engine_params();
    let requested = cli.max_turns.unwrap_or(params.max_turns);
    if requested > debate.len() {
        warn!(
            "Clamping max turns from {} to the script length {}",
            requested,
            debate.len()
        );
    }
    params.max_turns = requested.min(debate.len());

    let input = RunDebateInput::new(topic.clone(), personas.clone()).with_params(params);

    // === Dependency Injection ===
    let cancellation = CancellationToken::new();
    let ctrl_c_token = cancellation.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            ctrl_c_token.cancel();
        }
    });

    let use_case =
        RunDebateUseCase::new(debate.clone(), debate).with_cancellation(cancellation);

    let events_path = cli
        .events
        .clone()
        .or_else(|| config.log.events.as_ref().map(PathBuf::from));
    let event_log = events_path.as_ref().and_then(|p| JsonlEventLog::new(p));
    if let (Some(path), None) = (&events_path, &event_log) {
        warn!("Event log disabled: cannot write {}", path.display());
    }

    let reporter = ProgressReporter::new();
    let mut sinks = CompositeSink::new(Vec::new());
    if !cli.quiet && format != OutputFormat::Json {
        print_header(&topic, &personas);
        if config.output.show_progress {
            sinks.push(&reporter);
        } else {
            sinks.push(&SimpleProgress);
        }
    }
    if let Some(log) = &event_log {
        sinks.push(log as &dyn EngineEventSink);
    }

    match use_case.execute_with_events(input, &sinks).await {
        Ok(output) => {
            println!("{}", ConsoleFormatter.render(&output, format));
            if let Some(log) = &event_log {
                info!("Event log written to {}", log.path().display());
            }
            Ok(())
        }
        Err(e) => {
            if let Some(partial) = e.partial_output() {
                println!("{}", ConsoleFormatter.render(partial, format));
            }
            bail!("Debate failed: {}", e)
        }
    }
}

fn print_header(topic: &Topic, personas: &[PersonaId]) {
    let names: Vec<&str> = personas.iter().map(|p| p.as_str()).collect();
    println!();
    println!("+============================================================+");
    println!("|              Dialectic - Structured Debate                 |");
    println!("+============================================================+");
    println!();
    println!("Topic: {}", topic);
    println!("Personas: {}", names.join(", "));
    println!();
}

/// Initialize logging based on verbosity level. With a log file the
/// returned guard must live until exit so buffered lines get written.
fn init_logging(verbose: u8, log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let filter = match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    let Some(path) = log_file else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
        return Ok(None);
    };

    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let Some(file_name) = path.file_name() else {
        bail!("Invalid log file path: {}", path.display());
    };
    std::fs::create_dir_all(directory)
        .with_context(|| format!("Cannot create log directory {}", directory.display()))?;

    let appender = tracing_appender::rolling::never(directory, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(writer)
        .init();
    Ok(Some(guard))
}
