//! Creatordash API Server
//!
//! Run with: cargo run --bin creatordash
//!
//! Configuration is read from `config.toml` (see `creatordash-cli config`)
//! with `CREATORDASH_*` environment overrides. Without a gateway URL the
//! server serves in-memory demo data for the user id `demo`.

use creatordash::api::{serve, AppState};
use creatordash::config::{Config, LoggingConfig};
use creatordash::gateway::{Gateway, InMemoryGateway, RestGateway};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load_default();
    init_tracing(&config.logging);

    tracing::info!("Starting Creatordash API server v{}", env!("CARGO_PKG_VERSION"));

    let gateway: Arc<dyn Gateway> = if config.gateway.is_configured() {
        tracing::info!("Backend gateway: {}", config.gateway.url);
        let gateway = RestGateway::new(config.gateway.clone())?;

        match gateway.health_check().await {
            Ok(_) => tracing::info!("Backend connection verified"),
            Err(e) => tracing::warn!("Backend not available: {} (requests will fail until it is)", e),
        }

        Arc::new(gateway)
    } else {
        tracing::info!("No gateway URL configured, serving demo data (set CREATORDASH_GATEWAY_URL)");
        Arc::new(InMemoryGateway::demo())
    };

    let state = AppState::new(gateway, config.api.clone(), config.payout.clone());

    tracing::info!("Starting server on {}:{}", config.api.host, config.api.port);
    serve(state, &config.api).await?;

    tracing::info!("Creatordash API server stopped");
    Ok(())
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("creatordash={},tower_http=debug", logging.level).into()
    });

    let registry = tracing_subscriber::registry().with(filter);

    if logging.format == "json" {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}
