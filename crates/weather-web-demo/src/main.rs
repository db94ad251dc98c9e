//! Weather Web Demo - HTTP front end for the weather SDK
//!
//! Serves current weather from the default provider configured through the
//! environment (OPENWEATHER_API_KEY, SDK_OPERATING_MODE and friends).

mod error;
mod server;
mod types;

use crate::error::Result;
use crate::server::{start_server, ServerState, SharedState};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{prelude::*, EnvFilter};
use weather_sdk::{mask_api_key, ProviderRegistry, SdkConfig};

const DEFAULT_PORT: u16 = 8080;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let env_filter = EnvFilter::from_default_env()
        .add_directive("weather_web_demo=info".parse()?)
        .add_directive("weather_sdk=info".parse()?);

    // Use JSON format for GCP Cloud Logging when LOG_FORMAT=json
    if std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false)
    {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_stackdriver::layer())
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    };

    info!("Starting Weather Web Demo...");

    let config = SdkConfig::from_env();
    let port = load_port();
    info!("Port: {}", port);
    info!("API URL: {}", config.api_url);
    info!("API key: {}", mask_api_key(&config.api_key));
    info!("Operating mode: {}", config.mode);
    info!(
        "Cache: capacity {}, TTL {} seconds",
        config.provider.cache_capacity,
        config.provider.cache_ttl.as_secs()
    );

    let registry = ProviderRegistry::from_config(&config);
    let state: SharedState<_> = Arc::new(ServerState::new(registry));

    let result = start_server(state.clone(), port, shutdown_signal()).await;

    // Stop polling tasks whether the server exited cleanly or not
    state.registry.shutdown_all().await;
    result?;

    info!("Weather Web Demo stopped");
    Ok(())
}

fn load_port() -> u16 {
    std::env::var("PORT")
        .ok()
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(DEFAULT_PORT)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
