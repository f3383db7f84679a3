//! prometheus-healthz - health endpoint for Prometheus alerting rules.

use clap::Parser;
use healthz_server::{Cli, HealthzServer};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Cli::parse().into_config()?;

    info!(
        addr = %config.bind_addr,
        path = %config.path,
        query = %config.query,
        upstream = %config.upstream_uri,
        "starting prometheus-healthz"
    );

    let bind_addr = config.bind_addr;
    let server = HealthzServer::new(config)?;

    if let Err(e) = server.serve_with_shutdown(bind_addr, shutdown_signal()).await {
        error!("Health server error: {}", e);
        std::process::exit(1);
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
