//! pga - Public Git Archive mirror tool
//!
//! This is the main CLI application. It resolves configuration, wires the
//! storage roots and catalog into an operations context, and renders the
//! events and the final report of the ops crate.

mod cli;
mod display;
mod error;
mod events;
mod logging;

use crate::cli::{Cli, Commands};
use crate::display::OutputRenderer;
use crate::error::CliError;
use crate::events::EventHandler;
use clap::Parser;
use pga_config::Config;
use pga_events::{EventReceiver, EventSender};
use pga_guard::ConcurrencyBudget;
use pga_index::Filter;
use pga_net::{NetClient, NetConfig};
use pga_ops::{ItemSource, OperationResult, OpsContextBuilder, StatusRequest};
use pga_store::LocalFs;
use std::path::Path;
use std::process;
use std::sync::Arc;
use tokio::select;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let json_mode = cli.global.json;

    if let Err(e) = run(cli).await {
        error!("Application error: {}", e);
        if !json_mode {
            eprintln!("Error: {e}");
        }
        process::exit(1);
    }
}

/// Main application logic
async fn run(cli: Cli) -> Result<(), CliError> {
    // Load configuration with proper precedence:
    // 1. Start with file config (or defaults)
    let mut config = Config::load_or_default(cli.global.config.as_deref()).await?;

    // 2. Merge environment variables
    config.merge_env()?;

    // 3. Apply CLI flags (highest precedence)
    apply_cli_config(&mut config, &cli.global, &cli.command);
    config.validate()?;

    // The log directory lives under the configured cache, so tracing can
    // only start once configuration is resolved
    init_tracing(cli.global.json, cli.global.debug, &config.logs_path());
    info!("Starting pga v{}", env!("CARGO_PKG_VERSION"));

    let Commands::Status(args) = &cli.command;
    if args.stdin && !cli.global.json {
        eprintln!("getting siva files by name from stdin");
        eprintln!("filter flags will be ignored");
    }

    let (event_sender, event_receiver) = pga_events::channel();

    let color = cli.global.color.unwrap_or(config.general.color);
    let ops_ctx = build_ops_context(event_sender, config)?;

    let renderer = OutputRenderer::new(cli.global.json, color);

    let colors_enabled = match color {
        pga_types::ColorChoice::Always => true,
        pga_types::ColorChoice::Never => false,
        pga_types::ColorChoice::Auto => console::Term::stderr().features().colors_supported(),
    };
    let mut event_handler = EventHandler::new(colors_enabled, cli.global.debug, cli.global.json);

    let result =
        execute_command_with_events(cli.command, ops_ctx, event_receiver, &mut event_handler)
            .await?;

    renderer.render_result(&result)?;

    info!("Command completed successfully");
    Ok(())
}

/// Execute command with concurrent event handling
async fn execute_command_with_events(
    command: Commands,
    ops_ctx: pga_ops::OpsCtx,
    mut event_receiver: EventReceiver,
    event_handler: &mut EventHandler,
) -> Result<OperationResult, CliError> {
    let mut command_future = Box::pin(execute_command(command, ops_ctx));

    loop {
        select! {
            result = &mut command_future => {
                // Drain any remaining events
                while let Ok(event) = event_receiver.try_recv() {
                    event_handler.handle_event(event);
                }
                return result;
            }

            event = event_receiver.recv() => {
                match event {
                    Some(event) => event_handler.handle_event(event),
                    None => { /* Channel closed: keep waiting for command to finish */ }
                }
            }
        }
    }
}

/// Execute the specified command
async fn execute_command(
    command: Commands,
    ctx: pga_ops::OpsCtx,
) -> Result<OperationResult, CliError> {
    match command {
        Commands::Status(args) => {
            let source = if args.stdin {
                ItemSource::Stdin
            } else {
                ItemSource::Catalog {
                    location: None,
                    filter: Filter::new(args.url.as_deref(), &args.langs)?,
                }
            };
            let request = StatusRequest {
                source,
                jobs: ConcurrencyBudget::from(ctx.config.jobs()?),
            };
            let report = pga_ops::status(&ctx, request).await?;
            Ok(OperationResult::StatusReport(report))
        }
    }
}

/// Build operations context with all required components
fn build_ops_context(event_sender: EventSender, config: Config) -> Result<pga_ops::OpsCtx, CliError> {
    let net = NetClient::new(NetConfig::from_config(
        &config.network,
        config.general.jobs,
    ))?;
    let local = Arc::new(LocalFs::new(config.output_path()));
    let remote = pga_store::open(&config.source.url, &net)?;

    let ctx = OpsContextBuilder::new()
        .with_net(net)
        .with_local(local)
        .with_remote(remote)
        .with_event_sender(event_sender)
        .with_config(config)
        .build()?;

    Ok(ctx)
}

/// Initialize tracing/logging
fn init_tracing(json_mode: bool, debug_enabled_flag: bool, log_dir: &Path) {
    let debug_enabled = std::env::var("RUST_LOG").is_ok() || debug_enabled_flag;
    let debug_filter = || {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,pga=debug,pga_ops=debug"))
    };

    if json_mode {
        // JSON mode: suppress all console output to avoid contaminating JSON
        if debug_enabled {
            if let Some(file) = create_log_file(log_dir) {
                tracing_subscriber::fmt()
                    .json()
                    .with_writer(file)
                    .with_env_filter(debug_filter())
                    .init();
                return;
            }
        }
        tracing_subscriber::fmt()
            .with_writer(std::io::sink)
            .with_env_filter("off")
            .init();
    } else if debug_enabled {
        // Debug mode: structured JSON logs to file
        if let Err(e) = std::fs::create_dir_all(log_dir) {
            eprintln!("Warning: Failed to create log directory: {e}");
        }
        let log_file = log_file_path(log_dir);

        match std::fs::File::create(&log_file) {
            Ok(file) => {
                tracing_subscriber::fmt()
                    .json()
                    .with_writer(file)
                    .with_env_filter(debug_filter())
                    .init();

                eprintln!("Debug logging enabled: {}", log_file.display());
            }
            Err(e) => {
                eprintln!("Warning: Failed to create log file: {e}");
                tracing_subscriber::fmt()
                    .with_writer(std::io::stderr)
                    .with_env_filter(
                        tracing_subscriber::EnvFilter::try_from_default_env()
                            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
                    )
                    .init();
            }
        }
    } else {
        // Normal mode: minimal logging to stderr
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .init();
    }
}

fn log_file_path(log_dir: &Path) -> std::path::PathBuf {
    log_dir.join(format!(
        "pga-{}.log",
        chrono::Utc::now().format("%Y%m%d-%H%M%S")
    ))
}

fn create_log_file(log_dir: &Path) -> Option<std::fs::File> {
    std::fs::create_dir_all(log_dir).ok()?;
    std::fs::File::create(log_file_path(log_dir)).ok()
}

/// Apply CLI configuration overrides (highest precedence)
fn apply_cli_config(config: &mut Config, global: &cli::GlobalArgs, command: &Commands) {
    if let Some(color) = global.color {
        config.general.color = color;
    }

    let Commands::Status(args) = command;
    if let Some(output) = &args.output {
        config.paths.output = Some(output.clone());
    }
    if let Some(jobs) = args.jobs {
        config.general.jobs = jobs;
    }
    if let Some(index) = &args.index {
        config.source.index = Some(index.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_cli_flags_override_config() {
        let cli = Cli::try_parse_from([
            "pga",
            "--color",
            "never",
            "status",
            "-o",
            "/srv/pga",
            "-j",
            "3",
            "--index",
            "/tmp/latest.csv",
        ])
        .unwrap();
        let mut config = Config::default();
        apply_cli_config(&mut config, &cli.global, &cli.command);

        assert_eq!(config.general.color, pga_types::ColorChoice::Never);
        assert_eq!(config.general.jobs, 3);
        assert_eq!(config.output_path(), PathBuf::from("/srv/pga"));
        assert_eq!(config.index_location(), "/tmp/latest.csv");
    }

    #[test]
    fn test_absent_flags_keep_config() {
        let cli = Cli::try_parse_from(["pga", "status"]).unwrap();
        let mut config = Config::default();
        config.general.jobs = 7;
        apply_cli_config(&mut config, &cli.global, &cli.command);

        assert_eq!(config.general.jobs, 7);
        assert_eq!(config.output_path(), PathBuf::from("."));
    }

    #[test]
    fn test_log_file_name() {
        let path = log_file_path(Path::new("/var/log/pga"));
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("pga-"));
        assert!(name.ends_with(".log"));
    }
}
