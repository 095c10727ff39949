//! Application state.

use std::sync::Arc;

use crate::service::CatalogService;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// The cache-coherent catalog service.
    catalog: Arc<CatalogService>,
}

impl AppState {
    /// Creates a new AppState around the given catalog service.
    pub fn new(catalog: CatalogService) -> Self {
        Self {
            catalog: Arc::new(catalog),
        }
    }

    /// Returns a reference to the catalog service.
    pub fn catalog(&self) -> &CatalogService {
        self.catalog.as_ref()
    }
}
