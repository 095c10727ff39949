//! Store and cache doubles that observe what the service does.

use async_trait::async_trait;
use folio_core::{Book, BookId, Category, CategoryName};
use folio_server::cache::{CacheBackend, CacheError, CacheKey, CacheValue, MokaBackend};
use folio_store::{EntityStore, InMemoryStore, StoreError};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// InMemoryStore que cuenta las consultas recibidas.
#[derive(Default)]
pub struct CountingStore {
    inner: InMemoryStore,
    category_reads: AtomicUsize,
    title_author_reads: AtomicUsize,
    id_reads: AtomicUsize,
    category_inserts: AtomicUsize,
}

impl CountingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn inner(&self) -> &InMemoryStore {
        &self.inner
    }

    pub fn category_reads(&self) -> usize {
        self.category_reads.load(Ordering::SeqCst)
    }

    pub fn title_author_reads(&self) -> usize {
        self.title_author_reads.load(Ordering::SeqCst)
    }

    pub fn id_reads(&self) -> usize {
        self.id_reads.load(Ordering::SeqCst)
    }

    pub fn category_inserts(&self) -> usize {
        self.category_inserts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EntityStore for CountingStore {
    async fn find_by_id(&self, id: BookId) -> Result<Option<Book>, StoreError> {
        self.id_reads.fetch_add(1, Ordering::SeqCst);
        self.inner.find_by_id(id).await
    }

    async fn find_by_category_name(&self, name: &CategoryName) -> Result<Vec<Book>, StoreError> {
        self.category_reads.fetch_add(1, Ordering::SeqCst);
        self.inner.find_by_category_name(name).await
    }

    async fn find_by_title_author(
        &self,
        title: &str,
        author: &str,
    ) -> Result<Option<Book>, StoreError> {
        self.title_author_reads.fetch_add(1, Ordering::SeqCst);
        self.inner.find_by_title_author(title, author).await
    }

    async fn find_category_by_name(
        &self,
        name: &CategoryName,
    ) -> Result<Option<Category>, StoreError> {
        self.inner.find_category_by_name(name).await
    }

    async fn insert_category(&self, name: &CategoryName) -> Result<Category, StoreError> {
        self.category_inserts.fetch_add(1, Ordering::SeqCst);
        self.inner.insert_category(name).await
    }

    async fn insert_book(
        &self,
        title: &str,
        author: &str,
        category: &Category,
    ) -> Result<Book, StoreError> {
        self.inner.insert_book(title, author, category).await
    }

    async fn save_book(&self, book: &Book) -> Result<Book, StoreError> {
        self.inner.save_book(book).await
    }

    async fn delete_by_id(&self, id: BookId) -> Result<(), StoreError> {
        self.inner.delete_by_id(id).await
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        self.inner.health_check().await
    }

    fn name(&self) -> &str {
        "counting"
    }
}

/// Una operacion observada sobre el backend de cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheOp {
    Get(CacheKey),
    Put(CacheKey),
    Evict(CacheKey),
}

/// Backend Moka que registra cada operacion en orden.
pub struct RecordingBackend {
    inner: MokaBackend,
    ops: Mutex<Vec<CacheOp>>,
}

impl RecordingBackend {
    pub fn new(inner: MokaBackend) -> Self {
        Self {
            inner,
            ops: Mutex::new(Vec::new()),
        }
    }

    pub fn ops(&self) -> Vec<CacheOp> {
        self.ops.lock().unwrap().clone()
    }

    pub fn evictions(&self) -> Vec<CacheKey> {
        self.ops()
            .into_iter()
            .filter_map(|op| match op {
                CacheOp::Evict(key) => Some(key),
                _ => None,
            })
            .collect()
    }

    pub fn puts(&self) -> Vec<CacheKey> {
        self.ops()
            .into_iter()
            .filter_map(|op| match op {
                CacheOp::Put(key) => Some(key),
                _ => None,
            })
            .collect()
    }

    pub fn reset(&self) {
        self.ops.lock().unwrap().clear();
    }

    /// Lectura directa, sin registrar la operacion.
    pub async fn peek(&self, key: &CacheKey) -> Option<CacheValue> {
        self.inner.get(key).await.unwrap()
    }

    fn record(&self, op: CacheOp) {
        self.ops.lock().unwrap().push(op);
    }
}

#[async_trait]
impl CacheBackend for RecordingBackend {
    async fn get(&self, key: &CacheKey) -> Result<Option<CacheValue>, CacheError> {
        self.record(CacheOp::Get(key.clone()));
        self.inner.get(key).await
    }

    async fn put(&self, key: CacheKey, value: CacheValue, ttl: Duration) -> Result<(), CacheError> {
        self.record(CacheOp::Put(key.clone()));
        self.inner.put(key, value, ttl).await
    }

    async fn evict(&self, key: &CacheKey) -> Result<(), CacheError> {
        self.record(CacheOp::Evict(key.clone()));
        self.inner.evict(key).await
    }

    async fn clear(&self) -> Result<(), CacheError> {
        self.inner.clear().await
    }

    fn entry_count(&self) -> u64 {
        self.inner.entry_count()
    }

    fn name(&self) -> &str {
        "recording"
    }
}

/// Backend de cache inalcanzable: todas las operaciones fallan.
#[derive(Default)]
pub struct FailingCacheBackend {
    attempts: AtomicUsize,
}

impl FailingCacheBackend {
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    fn fail<T>(&self) -> Result<T, CacheError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(CacheError::Unavailable("connection refused".to_string()))
    }
}

#[async_trait]
impl CacheBackend for FailingCacheBackend {
    async fn get(&self, _key: &CacheKey) -> Result<Option<CacheValue>, CacheError> {
        self.fail()
    }

    async fn put(
        &self,
        _key: CacheKey,
        _value: CacheValue,
        _ttl: Duration,
    ) -> Result<(), CacheError> {
        self.fail()
    }

    async fn evict(&self, _key: &CacheKey) -> Result<(), CacheError> {
        self.fail()
    }

    async fn clear(&self) -> Result<(), CacheError> {
        self.fail()
    }

    fn entry_count(&self) -> u64 {
        0
    }

    fn name(&self) -> &str {
        "failing"
    }
}
