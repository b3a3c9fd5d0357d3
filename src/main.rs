//! Credential Expiry Exporter
//!
//! Serves `/metrics` for Prometheus, reporting the remaining validity of
//! every application secret and certificate in the directory.

use clap::Parser;
use credential_expiry_exporter::{
    config::ExporterConfig,
    directory::GraphDirectory,
    metrics::{CredentialCollector, ScrapeServer},
};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};

/// Prometheus exporter for application secret and certificate expiration.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port to serve metrics on, overriding the configured bind address.
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    info!("Credential Expiry Exporter v{}", credential_expiry_exporter::VERSION);

    let config = match &cli.config {
        Some(path) => ExporterConfig::from_file(path)?,
        None => ExporterConfig::default(),
    };
    let mut config = config.with_env();
    if let Some(port) = cli.port {
        config.server.bind_addr.set_port(port);
    }
    config.validate()?;

    match config.directory.redacted_proxy() {
        Some(proxy) => info!(%proxy, "Using outbound proxy"),
        None => info!("No outbound proxy configured"),
    }

    let directory = GraphDirectory::new(config.directory.clone())?;
    let timeout = Duration::from_secs(config.directory.timeout_secs);
    let collector = CredentialCollector::new(directory, timeout)?;

    ScrapeServer::new(config.server.bind_addr, collector)
        .run(shutdown_signal())
        .await?;

    info!("Exporter stopped");
    Ok(())
}

/// Resolves on Ctrl-C or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl-C, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}
