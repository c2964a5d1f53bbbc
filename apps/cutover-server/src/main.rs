use std::path::PathBuf;

use anyhow::{Context, Result};
use axum::http::StatusCode;
use clap::{Parser, Subcommand};
use cutover_bootstrap::{AppConfig, CliArgs};
use migration_control::MigrationControlModule;
use tokio_util::sync::CancellationToken;
use tower_http::timeout::TimeoutLayer;

/// Cutover Server - migration control plane for strangler-fig service migrations
#[derive(Parser)]
#[command(name = "cutover-server")]
#[command(about = "Cutover Server - migration control plane for strangler-fig service migrations")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port override for HTTP server (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Print effective configuration (YAML) and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the server
    Run,
    /// Validate configuration and exit
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let args = CliArgs {
        config: cli.config,
        port: cli.port,
        verbose: cli.verbose,
    };

    // Layered config:
    // 1) defaults -> 2) YAML (if provided) -> 3) env (CUTOVER__*) -> 4) CLI overrides
    let mut config = AppConfig::load_layered(args.config.as_deref())?;
    config.apply_cli_overrides(&args);

    if cli.print_config {
        println!("Effective configuration:\n{}", config.to_yaml()?);
        return Ok(());
    }

    cutover_bootstrap::init_logging(&config.logging)?;

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_server(config).await,
        Commands::Check => check_config(&config),
    }
}

fn check_config(config: &AppConfig) -> Result<()> {
    tracing::info!("Checking configuration...");
    config.validate()?;
    println!("Configuration is valid");
    println!("{}", config.to_yaml()?);
    Ok(())
}

async fn run_server(config: AppConfig) -> Result<()> {
    config.validate()?;
    tracing::info!("Cutover Server starting");

    let module = MigrationControlModule::from_config(&config.migration)?;
    let router = module.router().layer(TimeoutLayer::with_status_code(
        StatusCode::GATEWAY_TIMEOUT,
        config.request_timeout(),
    ));

    let addr = config.bind_addr()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!(%addr, "HTTP server listening");

    let cancel = CancellationToken::new();
    let signals = cutover_bootstrap::cancel_on_shutdown(cancel.clone());

    let shutdown = cancel.clone();
    axum::serve(listener, router)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
        .context("HTTP server failed")?;

    cancel.cancel();
    module.shutdown();
    if let Err(e) = signals.await {
        tracing::warn!(error = %e, "Signal task ended abnormally");
    }

    tracing::info!("Cutover Server stopped");
    Ok(())
}
