//! Cache metrics recording.

use metrics::{counter, gauge, histogram};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use crate::cache::CacheRegion;

/// Describe las series `folio_cache_*` en el recorder global.
pub fn register_cache_metrics() {
    metrics::describe_counter!("folio_cache_hits_total", "Total number of cache hits");
    metrics::describe_counter!("folio_cache_misses_total", "Total number of cache misses");
    metrics::describe_counter!("folio_cache_puts_total", "Total number of cache writes");
    metrics::describe_counter!(
        "folio_cache_invalidations_total",
        "Total number of explicit cache evictions requested by writes"
    );
    metrics::describe_counter!(
        "folio_cache_evictions_total",
        "Total number of entries removed from the cache, by cause"
    );
    metrics::describe_counter!(
        "folio_cache_failures_total",
        "Total number of cache backend failures swallowed by the service"
    );
    metrics::describe_gauge!("folio_cache_entries", "Current number of entries in cache");
    metrics::describe_histogram!(
        "folio_cache_operation_seconds",
        "Latency of cache backend calls, per operation"
    );
}

/// Contadores del cache derivado, por region.
/// Usa atomic counters internos para maximo rendimiento; los contadores
/// internos permiten inspeccionar el cache sin un recorder instalado.
#[derive(Debug, Clone, Default)]
pub struct CacheMetrics {
    hits: Arc<AtomicU64>,
    misses: Arc<AtomicU64>,
    puts: Arc<AtomicU64>,
    invalidations: Arc<AtomicU64>,
    failures: Arc<AtomicU64>,
}

impl CacheMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registra un cache hit
    pub fn record_hit(&self, region: CacheRegion) {
        self.hits.fetch_add(1, Ordering::Relaxed);
        counter!("folio_cache_hits_total", "region" => region.name()).increment(1);
    }

    /// Registra un cache miss
    pub fn record_miss(&self, region: CacheRegion) {
        self.misses.fetch_add(1, Ordering::Relaxed);
        counter!("folio_cache_misses_total", "region" => region.name()).increment(1);
    }

    /// Registra una escritura
    pub fn record_put(&self, region: CacheRegion) {
        self.puts.fetch_add(1, Ordering::Relaxed);
        counter!("folio_cache_puts_total", "region" => region.name()).increment(1);
    }

    /// Registra una invalidacion explicita
    pub fn record_invalidation(&self, region: CacheRegion) {
        self.invalidations.fetch_add(1, Ordering::Relaxed);
        counter!("folio_cache_invalidations_total", "region" => region.name()).increment(1);
    }

    /// Registra un fallo del backend (tratado como miss o ignorado)
    pub fn record_failure(&self, operation: &'static str) {
        self.failures.fetch_add(1, Ordering::Relaxed);
        counter!("folio_cache_failures_total", "operation" => operation).increment(1);
    }

    /// Registra una eviction
    pub fn record_eviction(&self, reason: &'static str) {
        counter!("folio_cache_evictions_total", "reason" => reason).increment(1);
    }

    /// Publica el numero de entradas vivas.
    pub fn set_entry_count(&self, count: u64) {
        gauge!("folio_cache_entries").set(count as f64);
    }

    /// Latencia de una llamada al backend.
    pub fn record_operation_duration(&self, operation: &'static str, duration: Duration) {
        histogram!("folio_cache_operation_seconds", "operation" => operation)
            .record(duration.as_secs_f64());
    }

    /// Fraccion de lecturas servidas desde el cache; 0 sin lecturas.
    pub fn hit_rate(&self) -> f64 {
        match self.hits() + self.misses() {
            0 => 0.0,
            reads => self.hits() as f64 / reads as f64,
        }
    }

    /// Retorna el numero de hits
    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    /// Lecturas que fueron al store.
    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    /// Retorna el numero de escrituras
    pub fn puts(&self) -> u64 {
        self.puts.load(Ordering::Relaxed)
    }

    /// Retorna el numero de invalidaciones explicitas
    pub fn invalidations(&self) -> u64 {
        self.invalidations.load(Ordering::Relaxed)
    }

    /// Retorna el numero de fallos del backend
    pub fn failures(&self) -> u64 {
        self.failures.load(Ordering::Relaxed)
    }

    /// Total de operaciones de cache observadas.
    pub fn operations(&self) -> u64 {
        self.hits() + self.misses() + self.puts() + self.invalidations()
    }
}
