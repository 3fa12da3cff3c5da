//! Haletix Server - Theater Box Office
//!
//! Local REST API server for box-office management.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use haletix_server::{
    api,
    config::AppConfig,
    repository::{store::FileStore, Repository},
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Load configuration
    let config = AppConfig::load().context("Failed to load configuration")?;

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("haletix_server={},tower_http=debug", config.logging.level).into());

    let registry = tracing_subscriber::registry().with(filter);
    if config.logging.format == "json" {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    tracing::info!("Starting Haletix Server v{}", env!("CARGO_PKG_VERSION"));

    // Open the store and load every collection
    let store = FileStore::open(&config.storage.data_dir)
        .with_context(|| format!("Failed to open data directory {}", config.storage.data_dir.display()))?;
    let repository = Repository::open(Arc::new(store), &config.storage.key_prefix)
        .context("Failed to load collections")?;

    tracing::info!("Loaded data from {}", config.storage.data_dir.display());

    // Save server address before moving config
    let addr = SocketAddr::new(
        config.server.host.parse().context("Invalid host address")?,
        config.server.port,
    );

    let state = AppState::new(config, repository);
    let app = api::create_router(state);

    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
