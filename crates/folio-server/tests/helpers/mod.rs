//! Test helpers para folio-server.

#![allow(dead_code, unused_imports)]

pub mod client;
pub mod stores;

pub use client::{TestClient, TestResponse};
pub use stores::{CacheOp, CountingStore, FailingCacheBackend, RecordingBackend};

use folio_core::BookDraft;
use folio_server::cache::{CacheSettings, DerivedKeyCache, MokaBackend};
use folio_server::metrics::CacheMetrics;
use folio_server::{AppState, CatalogService, create_router};
use std::sync::Arc;

/// Servicio cableado con dobles observables.
pub struct Harness {
    pub store: Arc<CountingStore>,
    pub backend: Arc<RecordingBackend>,
    pub catalog: CatalogService,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_settings(CacheSettings::default())
    }

    pub fn with_settings(settings: CacheSettings) -> Self {
        let store = Arc::new(CountingStore::new());
        let metrics = CacheMetrics::new();
        let backend = Arc::new(RecordingBackend::new(MokaBackend::new(
            &settings,
            metrics.clone(),
        )));
        let cache = DerivedKeyCache::with_backend(backend.clone(), settings, metrics);
        let catalog = CatalogService::new(store.clone(), cache);

        Self {
            store,
            backend,
            catalog,
        }
    }

    /// Router HTTP sobre el mismo servicio.
    pub fn client(&self) -> TestClient {
        TestClient::new(create_router(AppState::new(self.catalog.clone())))
    }
}

/// Catalogo sobre un backend de cache que siempre falla.
pub fn catalog_with_failing_cache() -> (CatalogService, Arc<FailingCacheBackend>) {
    let backend = Arc::new(FailingCacheBackend::default());
    let cache = DerivedKeyCache::with_backend(
        backend.clone(),
        CacheSettings::default(),
        CacheMetrics::new(),
    );
    let catalog = CatalogService::new(Arc::new(CountingStore::new()), cache);
    (catalog, backend)
}

/// Crea un TestClient sobre un catalogo vacio.
pub fn client() -> TestClient {
    Harness::new().client()
}

pub fn draft(title: &str, author: &str, category: &str) -> BookDraft {
    BookDraft::new(title, author, category).expect("valid draft")
}
