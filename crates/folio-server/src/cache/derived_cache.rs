//! Derived-key cache client.

use folio_core::{Book, CategoryName};
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

use crate::cache::backend::{CacheBackend, CacheError, CacheValue};
use crate::cache::keys::{CacheKey, CacheRegion};
use crate::cache::moka_backend::MokaBackend;
use crate::metrics::CacheMetrics;

/// Configuracion de una region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionSettings {
    /// TTL por defecto de las entries de la region (default: 300s)
    pub ttl: Duration,
    /// Maximo numero de entries (default: 10000)
    pub max_capacity: u64,
}

impl Default for RegionSettings {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(300),
            max_capacity: 10_000,
        }
    }
}

/// Configuracion del cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheSettings {
    pub books_by_category: RegionSettings,
    pub book_by_title_and_author: RegionSettings,
    /// Limite para cada llamada al backend (default: 250ms)
    pub operation_timeout: Duration,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            books_by_category: RegionSettings::default(),
            book_by_title_and_author: RegionSettings::default(),
            operation_timeout: Duration::from_millis(250),
        }
    }
}

impl CacheSettings {
    /// Retorna la configuracion de una region.
    pub fn region(&self, region: CacheRegion) -> &RegionSettings {
        match region {
            CacheRegion::BooksByCategory => &self.books_by_category,
            CacheRegion::BookByTitleAndAuthor => &self.book_by_title_and_author,
        }
    }

    /// Retorna la configuracion mutable de una region.
    pub fn region_mut(&mut self, region: CacheRegion) -> &mut RegionSettings {
        match region {
            CacheRegion::BooksByCategory => &mut self.books_by_category,
            CacheRegion::BookByTitleAndAuthor => &mut self.book_by_title_and_author,
        }
    }
}

/// Cache de resultados indexado por keys derivadas.
///
/// Es el cliente de cache que se construye una vez al inicio y se inyecta
/// en el servicio. Nunca falla: un error del backend en lectura es un miss
/// y un error en escritura o invalidacion se registra y se descarta.
///
/// # Examples
///
/// ```no_run
/// use folio_server::cache::{CacheKey, CacheSettings, CacheValue, DerivedKeyCache};
///
/// # #[tokio::main]
/// # async fn main() {
/// let cache = DerivedKeyCache::new(CacheSettings::default());
/// let key = CacheKey::category("Classics");
///
/// cache.put(key.clone(), CacheValue::books(Vec::new())).await;
///
/// if let Some(books) = cache.get_books(&"Classics".into()).await {
///     println!("Cache hit with {} books", books.len());
/// }
///
/// cache.evict(&key).await;
/// # }
/// ```
#[derive(Clone)]
pub struct DerivedKeyCache {
    backend: Arc<dyn CacheBackend>,
    settings: CacheSettings,
    metrics: CacheMetrics,
}

impl DerivedKeyCache {
    /// Crea un cache en memoria (Moka) con la configuracion dada.
    pub fn new(settings: CacheSettings) -> Self {
        let metrics = CacheMetrics::new();
        let backend = MokaBackend::new(&settings, metrics.clone());
        Self::with_backend(Arc::new(backend), settings, metrics)
    }

    /// Crea un cache sobre un backend arbitrario.
    pub fn with_backend(
        backend: Arc<dyn CacheBackend>,
        settings: CacheSettings,
        metrics: CacheMetrics,
    ) -> Self {
        Self {
            backend,
            settings,
            metrics,
        }
    }

    /// Obtiene un valor del cache si existe y no expiro.
    pub async fn get(&self, key: &CacheKey) -> Option<CacheValue> {
        let region = key.region();
        let start = Instant::now();
        let result = self.guarded("get", self.backend.get(key)).await;
        self.metrics.record_operation_duration("get", start.elapsed());

        match result {
            Ok(Some(value)) => {
                self.metrics.record_hit(region);
                Some(value)
            },
            Ok(None) => {
                self.metrics.record_miss(region);
                None
            },
            Err(e) => {
                warn!(key = %key, error = %e, "Cache read failed, treating as miss");
                self.metrics.record_miss(region);
                None
            },
        }
    }

    /// Obtiene la lista cacheada para una categoria.
    pub async fn get_books(&self, category: &CategoryName) -> Option<Arc<[Book]>> {
        self.get(&CacheKey::category(category.clone()))
            .await
            .and_then(CacheValue::into_books)
    }

    /// Obtiene el libro cacheado para un par titulo/autor.
    pub async fn get_book(&self, title: &str, author: &str) -> Option<Arc<Book>> {
        self.get(&CacheKey::title_author(title, author))
            .await
            .and_then(CacheValue::into_book)
    }

    /// Inserta un valor con el TTL por defecto de su region.
    pub async fn put(&self, key: CacheKey, value: CacheValue) {
        let ttl = self.settings.region(key.region()).ttl;
        self.put_with_ttl(key, value, ttl).await;
    }

    /// Inserta un valor con un TTL explicito. Sobrescribe cualquier valor previo.
    pub async fn put_with_ttl(&self, key: CacheKey, value: CacheValue, ttl: Duration) {
        let region = key.region();
        let label = key.to_string();
        let start = Instant::now();

        match self
            .guarded("put", self.backend.put(key, value, ttl))
            .await
        {
            Ok(()) => {
                self.metrics.record_put(region);
                debug!(key = %label, ttl_secs = ttl.as_secs(), "Cache entry stored");
            },
            Err(e) => warn!(key = %label, error = %e, "Cache write failed, ignoring"),
        }

        self.metrics.record_operation_duration("put", start.elapsed());
        self.refresh_entry_gauge();
    }

    /// Invalida una entrada especifica. Idempotente.
    pub async fn evict(&self, key: &CacheKey) {
        let start = Instant::now();

        match self.guarded("evict", self.backend.evict(key)).await {
            Ok(()) => {
                self.metrics.record_invalidation(key.region());
                debug!(key = %key, "Cache entry evicted");
            },
            Err(e) => warn!(
                key = %key,
                error = %e,
                "Cache eviction failed, entry may be stale until its TTL expires"
            ),
        }

        self.metrics.record_operation_duration("evict", start.elapsed());
        self.refresh_entry_gauge();
    }

    /// Invalida todas las entradas.
    pub async fn clear(&self) {
        if let Err(e) = self.guarded("clear", self.backend.clear()).await {
            warn!(error = %e, "Cache clear failed");
        }
        self.refresh_entry_gauge();
    }

    /// Retorna el numero aproximado de entries en cache.
    pub fn entry_count(&self) -> u64 {
        self.backend.entry_count()
    }

    /// Retorna las metricas para acceso externo.
    pub fn metrics(&self) -> &CacheMetrics {
        &self.metrics
    }

    pub fn settings(&self) -> &CacheSettings {
        &self.settings
    }

    /// Retorna el nombre del backend.
    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    /// Runs a backend call under the configured operation timeout and
    /// counts failures.
    async fn guarded<T, F>(&self, operation: &'static str, call: F) -> Result<T, CacheError>
    where
        F: Future<Output = Result<T, CacheError>>,
    {
        let limit = self.settings.operation_timeout;
        let result = match tokio::time::timeout(limit, call).await {
            Ok(result) => result,
            Err(_) => Err(CacheError::Timeout {
                operation,
                millis: limit.as_millis() as u64,
            }),
        };

        if result.is_err() {
            self.metrics.record_failure(operation);
        }
        result
    }

    /// Actualiza el gauge de entry count.
    ///
    /// Expired entries leave the count lazily, so scrapes refresh it too.
    pub fn refresh_entry_gauge(&self) {
        self.metrics.set_entry_count(self.backend.entry_count());
    }
}
