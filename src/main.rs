#![forbid(unsafe_code)]

//! `pivotd` — local control-plane daemon binary.
//!
//! Bootstraps configuration and the loot directory, then serves the
//! JSON control API on localhost until ctrl-c/SIGTERM.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, ValueEnum};
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use pivotd::api::{self, AppState};
use pivotd::config::ConfigStore;
use pivotd::paths::{init_loot_dir, AppDirs};
use pivotd::{AppError, Result};

#[derive(Debug, Copy, Clone, Eq, PartialEq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "pivotd", about = "Local pivoting control-plane daemon", version, long_about = None)]
struct Cli {
    /// Address the control API binds to.
    #[arg(long, default_value = "127.0.0.1:8080")]
    bind: SocketAddr,

    /// Override the settings file path.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log output format (text or json).
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,
}

fn main() -> Result<()> {
    let args = Cli::parse();
    init_tracing(args.log_format)?;
    info!("pivotd bootstrap");

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|err| AppError::Config(format!("failed to build tokio runtime: {err}")))?
        .block_on(run(args))
}

async fn run(args: Cli) -> Result<()> {
    let mut dirs = AppDirs::discover()?;
    if let Some(path) = args.config {
        dirs.config_path = path;
    }

    // Missing loot dir is not fatal; scouting recreates what it needs.
    if let Err(err) = init_loot_dir(&dirs).await {
        warn!(%err, "failed to initialize loot directory");
    }

    let store = ConfigStore::new(dirs.config_path.clone());
    let state = Arc::new(AppState::new(store, dirs));
    let router = api::router(Arc::clone(&state));

    let listener = tokio::net::TcpListener::bind(args.bind)
        .await
        .map_err(|err| AppError::Config(format!("failed to bind {}: {err}", args.bind)))?;

    info!(bind = %args.bind, "pivotd control API listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|err| AppError::Config(format!("server error: {err}")))?;

    info!("shutdown signal received");

    // Release any managed services before exit.
    let _ = state.proxy.stop().await;
    let _ = state.file_server.stop().await;

    info!("pivotd shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();

    #[cfg(unix)]
    {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = ctrl_c => {}
                    _ = sigterm.recv() => {}
                }
            }
            Err(err) => {
                tracing::warn!(%err, "failed to register SIGTERM handler, using ctrl-c only");
                let _ = ctrl_c.await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        if let Err(err) = ctrl_c.await {
            tracing::error!(%err, "ctrl-c signal handler failed");
        }
    }
}

fn init_tracing(log_format: LogFormat) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = fmt().with_env_filter(env_filter);

    match log_format {
        LogFormat::Text => subscriber
            .try_init()
            .map_err(|err| AppError::Config(format!("failed to init tracing: {err}")))?,
        LogFormat::Json => subscriber
            .json()
            .try_init()
            .map_err(|err| AppError::Config(format!("failed to init tracing: {err}")))?,
    }

    Ok(())
}
