use std::env;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn, LevelFilter};
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};
use tokio_util::sync::CancellationToken;

mod cli;
mod models;
mod sources;
mod authorization;
mod output;
mod runner;
mod collectors;
mod platform;
mod config;
mod constants;

#[cfg(test)]
mod test_utils;

use authorization::AuthorizationGate;
use cli::{Args, Commands};
use config::{load_or_create_config, SessionConfig};
use models::SessionReport;
use output::OutputSink;
use platform::PlatformGate;
use runner::SourceRunner;
use sources::SourceRegistry;

fn main() -> Result<()> {
    // Parse arguments
    let args = Args::parse();

    // Initialize logging
    initialize_logging(args.verbose)?;

    // Handle subcommands
    if let Some(cmd) = &args.command {
        return handle_subcommand(cmd, &args);
    }

    info!("Starting collection session");

    // Load configuration and assemble the session
    let config = load_or_create_config(args.config.as_deref())?;
    let registry = build_registry(&config, &args);
    let sink = Arc::new(setup_output_sink(&config, &args)?);

    // Run the session on a multi-threaded runtime
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(num_cpus::get())
        .enable_all()
        .build()
        .context("Failed to create Tokio runtime")?;

    let report = runtime.block_on(run_session(&registry, sink, &config, &args))?;

    if report.failed > 0 {
        warn!(
            "Collection finished with {} failed source(s), see {}",
            report.failed,
            constants::SESSION_REPORT_FILENAME
        );
    } else {
        info!("Collection completed successfully");
    }
    Ok(())
}

/// Initialize logging with the specified verbosity level
fn initialize_logging(verbose: bool) -> Result<()> {
    let log_level = if verbose { LevelFilter::Debug } else { LevelFilter::Info };
    TermLogger::init(
        log_level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    ).context("Failed to initialize logger")?;
    Ok(())
}

/// Handle subcommands (init-config and list-sources)
fn handle_subcommand(cmd: &Commands, args: &Args) -> Result<()> {
    match cmd {
        Commands::InitConfig { path } => {
            info!("Creating default configuration file at {}", path.display());
            SessionConfig::default().save_to_yaml_file(path)?;
            info!("Configuration created successfully");
            Ok(())
        }
        Commands::ListSources => list_sources(args),
    }
}

/// Print every registered source with its readiness on this host
fn list_sources(args: &Args) -> Result<()> {
    let config = load_or_create_config(args.config.as_deref())?;
    let registry = build_registry(&config, args);
    let gate = PlatformGate::default();

    for source in registry.sources() {
        let status = if !source.is_enabled() {
            "disabled"
        } else if gate.satisfies(source.as_ref()) {
            "ready"
        } else {
            "needs authorization"
        };

        let tokens: Vec<String> = source
            .required_authorizations()
            .iter()
            .map(|t| t.to_string())
            .collect();

        if tokens.is_empty() {
            println!("{:<24} {}", source.id(), status);
        } else {
            println!("{:<24} {:<20} requires: {}", source.id(), status, tokens.join(", "));
        }
    }
    Ok(())
}

/// Assemble the registry, honoring config-level disables and the
/// --sources selection
fn build_registry(config: &SessionConfig, args: &Args) -> SourceRegistry {
    let registry = collectors::builtin_registry(&config.disabled_sources);

    if let Some(selection) = &args.sources {
        let requested: Vec<&str> = selection
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect();

        for id in &requested {
            if registry.get(id).is_none() {
                warn!("Unknown source id requested: {}", id);
            }
        }

        let filtered = registry.filtered(&requested);
        if filtered.is_empty() {
            warn!("No sources match the requested ids: {}", selection);
            info!("Using all registered sources instead");
            registry
        } else {
            filtered
        }
    } else {
        registry
    }
}

/// Resolve the output directory and prepare it for this run
fn setup_output_sink(config: &SessionConfig, args: &Args) -> Result<OutputSink> {
    let output_dir = args
        .output
        .clone()
        .or_else(|| config.output_dir.clone())
        .unwrap_or_else(|| env::temp_dir().join(constants::DEFAULT_OUTPUT_DIR_NAME));

    let sink = OutputSink::new(output_dir);
    let clear = config.clear_output && !args.keep_existing;
    sink.prepare(clear)?;

    Ok(sink)
}

/// Drive one full session: grant requests, concurrent collection,
/// report and marker
async fn run_session(
    registry: &SourceRegistry,
    sink: Arc<OutputSink>,
    config: &SessionConfig,
    args: &Args,
) -> Result<SessionReport> {
    let gate = Arc::new(PlatformGate::default());
    let mut runner = SourceRunner::new(gate, sink).with_grant_policy(config.grant_policy());

    let cancel = CancellationToken::new();
    spawn_shutdown_listener(cancel.clone());

    if args.no_grant_requests {
        info!("Skipping authorization requests (--no-grant-requests)");
    } else if !runner.request_missing_grants(registry, &cancel).await {
        warn!("Some required authorizations were not granted; affected sources will be skipped");
    }

    runner.run(registry).await
}

/// Cancel pending grant waits when the operator interrupts the run
fn spawn_shutdown_listener(cancel: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, abandoning pending authorization waits");
            cancel.cancel();
        }
    });
}
