//! fpx-dash - Forum post exploration dashboard
//!
//! Loads the labeled forum dataset once, then serves charts, label/author
//! exploration and the labeling rules over HTTP. A dataset that cannot be
//! loaded aborts startup.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use fpx_common::config::{resolve_dataset_path, DecodePolicy, SessionConfig, TomlConfig, DATASET_ENV_VAR};
use fpx_common::Session;
use fpx_dash::{build_router, AppState};
use tokio::signal;
use tracing::{error, info};

/// Command-line arguments for fpx-dash
#[derive(Parser, Debug)]
#[command(name = "fpx-dash")]
#[command(about = "Forum post exploration dashboard")]
#[command(version)]
struct Args {
    /// Labeled CSV dataset (overrides FPX_DATASET and the config file)
    #[arg(short, long)]
    dataset: Option<PathBuf>,

    /// Port to listen on
    #[arg(short, long, env = "FPX_PORT")]
    port: Option<u16>,

    /// TOML configuration file
    #[arg(short, long, env = "FPX_CONFIG")]
    config: Option<PathBuf>,

    /// Skip rows with malformed tags instead of aborting
    #[arg(long)]
    skip_malformed: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Config is read before tracing starts so its log level can apply
    let config = TomlConfig::load(args.config.as_deref()).context("Failed to load configuration")?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("fpx_dash={0},fpx_common={0},tower_http=info", config.logging.level).into()),
        )
        .init();

    // Build identification first, before the dataset load
    info!(
        "Starting fpx-dash v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let dataset_path = resolve_dataset_path(args.dataset.as_deref(), DATASET_ENV_VAR, &config);
    let mut session_config = SessionConfig::from_toml(dataset_path, &config);
    if args.skip_malformed {
        session_config.decode_policy = DecodePolicy::Skip;
    }

    let session = match Session::init(&session_config) {
        Ok(session) => session,
        Err(e) => {
            error!("Failed to load dataset: {}", e);
            return Err(e).context("Dataset load failed");
        }
    };

    let app = build_router(AppState::new(session));

    let port = args.port.unwrap_or(config.port);
    let addr: SocketAddr = format!("{}:{}", config.bind_address, port)
        .parse()
        .with_context(|| format!("Invalid bind address {}:{}", config.bind_address, port))?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;
    info!("fpx-dash listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}
