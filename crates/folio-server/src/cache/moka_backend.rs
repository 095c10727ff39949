//! In-process cache backend using Moka.

use async_trait::async_trait;
use moka::Expiry;
use moka::future::Cache;
use moka::notification::RemovalCause;
use std::time::{Duration, Instant};

use crate::cache::backend::{CacheBackend, CacheError, CacheValue};
use crate::cache::derived_cache::{CacheSettings, RegionSettings};
use crate::cache::keys::{CacheKey, CacheRegion};
use crate::metrics::CacheMetrics;

/// Entry with its own time-to-live.
#[derive(Debug, Clone)]
struct Entry {
    value: CacheValue,
    ttl: Duration,
}

/// Expira cada entry segun el TTL con que fue escrita.
/// Un overwrite reinicia el TTL.
struct EntryExpiry;

impl Expiry<CacheKey, Entry> for EntryExpiry {
    fn expire_after_create(
        &self,
        _key: &CacheKey,
        value: &Entry,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(value.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &CacheKey,
        value: &Entry,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(value.ttl)
    }
}

/// Backend de cache usando Moka, una instancia por region.
/// Thread-safe y async-friendly.
#[derive(Clone)]
pub struct MokaBackend {
    by_category: Cache<CacheKey, Entry>,
    by_title_author: Cache<CacheKey, Entry>,
}

impl MokaBackend {
    /// Crea un backend con la configuracion dada.
    pub fn new(settings: &CacheSettings, metrics: CacheMetrics) -> Self {
        Self {
            by_category: build_region(settings.region(CacheRegion::BooksByCategory), &metrics),
            by_title_author: build_region(
                settings.region(CacheRegion::BookByTitleAndAuthor),
                &metrics,
            ),
        }
    }

    fn region(&self, region: CacheRegion) -> &Cache<CacheKey, Entry> {
        match region {
            CacheRegion::BooksByCategory => &self.by_category,
            CacheRegion::BookByTitleAndAuthor => &self.by_title_author,
        }
    }

    /// Sincroniza el cache (para tests principalmente).
    /// Fuerza la limpieza de entries expiradas y pendientes.
    pub async fn sync(&self) {
        self.by_category.run_pending_tasks().await;
        self.by_title_author.run_pending_tasks().await;
    }
}

fn build_region(settings: &RegionSettings, metrics: &CacheMetrics) -> Cache<CacheKey, Entry> {
    // Configurar listener para evictions
    let eviction_metrics = metrics.clone();

    Cache::builder()
        .max_capacity(settings.max_capacity)
        .expire_after(EntryExpiry)
        .eviction_listener(move |_key, _value, cause| {
            let reason = match cause {
                RemovalCause::Expired => "ttl",
                RemovalCause::Size => "capacity",
                RemovalCause::Explicit => "manual",
                RemovalCause::Replaced => "replaced",
            };
            eviction_metrics.record_eviction(reason);
        })
        .build()
}

#[async_trait]
impl CacheBackend for MokaBackend {
    async fn get(&self, key: &CacheKey) -> Result<Option<CacheValue>, CacheError> {
        Ok(self
            .region(key.region())
            .get(key)
            .await
            .map(|entry| entry.value))
    }

    async fn put(&self, key: CacheKey, value: CacheValue, ttl: Duration) -> Result<(), CacheError> {
        self.region(key.region())
            .insert(key, Entry { value, ttl })
            .await;
        Ok(())
    }

    async fn evict(&self, key: &CacheKey) -> Result<(), CacheError> {
        self.region(key.region()).invalidate(key).await;
        Ok(())
    }

    async fn clear(&self) -> Result<(), CacheError> {
        self.by_category.invalidate_all();
        self.by_title_author.invalidate_all();
        Ok(())
    }

    fn entry_count(&self) -> u64 {
        self.by_category.entry_count() + self.by_title_author.entry_count()
    }

    fn name(&self) -> &str {
        "moka"
    }
}
