//! Folio catalog server binary.

use std::sync::Arc;

use folio_server::cache::DerivedKeyCache;
use folio_server::metrics::init_metrics;
use folio_server::settings::{self, LoggingSettings};
use folio_server::{AppState, CatalogService, run_server_with_state};
use folio_store::InMemoryStore;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

fn init_tracing(logging: &LoggingSettings) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(logging.level.to_string()));

    let registry = tracing_subscriber::registry().with(filter);

    if logging.json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let settings = settings::load()?;

    init_tracing(&settings.logging);

    tracing::info!("Starting Folio Server v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        store_timeout_ms = settings.store.timeout.as_millis() as u64,
        cache_timeout_ms = settings.cache.operation_timeout.as_millis() as u64,
        "Loaded configuration"
    );

    let prometheus_handle = init_metrics()?;

    let store = Arc::new(InMemoryStore::new());
    tracing::info!(store = "in-memory", "Entity store ready");

    let cache = DerivedKeyCache::new(settings.cache.clone());
    tracing::info!(backend = cache.backend_name(), "Cache ready");

    let catalog = CatalogService::new(store, cache).with_store_timeout(settings.store.timeout);
    let state = AppState::new(catalog);

    run_server_with_state(settings.server.addr, state, prometheus_handle).await?;

    Ok(())
}
