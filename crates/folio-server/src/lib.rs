//! Folio Server - HTTP catalog server with a derived-key read-through cache.
//!
//! The crate wires the [`service::CatalogService`] (store + cache) to an
//! axum router. Reads are served from the cache when possible; writes
//! evict the keys derived from the affected rows before touching the store.

pub mod cache;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod server;
pub mod service;
pub mod settings;
pub mod state;

pub use error::AppError;
pub use handlers::health::HealthResponse;
pub use server::{create_router, create_router_with_state, run_server_with_state};
pub use service::{CatalogError, CatalogService};
pub use state::AppState;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
