//! Vitals server - host health reporting and user management over HTTP

use anyhow::Result;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use vitals_lib::{HealthReporter, ServiceMetrics, UserRegistry};

mod api;
mod config;

const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing with JSON output and env filter
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().json())
        .init();

    info!(version = SERVER_VERSION, "Starting vitals-server");

    // Load configuration
    let config = config::ServerConfig::load()?;
    info!(environment = %config.environment, port = config.api_port, "Server configured");

    // The reporter's start instant anchors the uptime figure
    let reporter = HealthReporter::new();
    let registry = UserRegistry::new();

    let metrics = ServiceMetrics::new();
    metrics.set_users_registered(registry.count().await as i64);

    // Create shared application state
    let app_state = Arc::new(api::AppState::new(reporter, registry, metrics));

    // Serve until the listener fails or a shutdown signal arrives
    let server = tokio::spawn(api::serve(config.api_port, app_state));

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("SIGINT received, shutting down");
        }
        result = server => {
            result??;
        }
    }

    Ok(())
}
