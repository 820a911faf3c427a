// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Central Log Service
//
//  Ingest:  POST /log (axum on tokio)
//  Storage: one shared append-only text file
//  Config:  optional YAML + CENTRALLOG_* env overrides
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

use centrallog_api::server::{self, AppState};
use centrallog_core::ServiceConfig;
use centrallog_sink::LogFile;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, Level};
use tracing_subscriber::fmt::writer::MakeWriterExt;

#[derive(Parser, Debug)]
#[command(name = "centrallog", version, about = "Central Log Service — HTTP log ingestion")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "/etc/centrallog/centrallog.yaml")]
    config: PathBuf,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Listen address, overrides `server.addr`
    #[arg(long)]
    addr: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // ── Tracing ──
    // Warnings and errors go to stderr, everything else to stdout.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level)),
        )
        .with_writer(
            std::io::stderr
                .with_max_level(Level::WARN)
                .or_else(std::io::stdout),
        )
        .with_target(false)
        .init();

    info!(version = env!("CARGO_PKG_VERSION"), "Central Log Service starting");

    // ── Config ──
    let mut config = if cli.config.exists() {
        info!(path = %cli.config.display(), "Loading config file");
        ServiceConfig::load(&cli.config)?
    } else {
        info!("No config file found, using defaults");
        ServiceConfig::from_env()?
    };
    if let Some(addr) = cli.addr {
        config.server.addr = addr;
    }

    // ── Log file ──
    // Directory creation is attempted once; a failure here only surfaces to
    // callers as a write failure later.
    let log_file = LogFile::new(config.log_file_path());
    if let Err(e) = log_file.ensure_dir().await {
        error!(error = %e, "Failed to create log directory");
    }

    let state = Arc::new(AppState::new(log_file));
    server::start(&config.server.addr, state, shutdown_signal()).await?;

    info!("Central Log Service stopped");
    Ok(())
}

/// Resolves on SIGINT (Ctrl+C) or SIGTERM (docker stop).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, stopping...");
}
