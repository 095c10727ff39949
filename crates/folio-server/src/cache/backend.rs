//! Cache backend abstraction.

use async_trait::async_trait;
use folio_core::Book;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::cache::keys::CacheKey;

/// Error del backend de cache.
///
/// Ninguno de estos errores llega al cliente: el cache nunca es
/// autoritativo, asi que `DerivedKeyCache` los registra y los descarta.
#[derive(Debug, Clone, Error)]
pub enum CacheError {
    #[error("cache backend unavailable: {0}")]
    Unavailable(String),

    #[error("cache operation '{operation}' timed out after {millis}ms")]
    Timeout {
        operation: &'static str,
        millis: u64,
    },
}

/// Valor almacenado bajo una key derivada.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheValue {
    /// Resultado de una consulta por categoria (puede estar vacio).
    Books(Arc<[Book]>),
    /// Resultado de una consulta por titulo y autor.
    Book(Arc<Book>),
}

impl CacheValue {
    pub fn books(books: Vec<Book>) -> Self {
        Self::Books(books.into())
    }

    pub fn book(book: Book) -> Self {
        Self::Book(Arc::new(book))
    }

    /// Returns the list if this value holds one.
    pub fn into_books(self) -> Option<Arc<[Book]>> {
        match self {
            Self::Books(books) => Some(books),
            Self::Book(_) => None,
        }
    }

    /// Returns the single book if this value holds one.
    pub fn into_book(self) -> Option<Arc<Book>> {
        match self {
            Self::Book(book) => Some(book),
            Self::Books(_) => None,
        }
    }
}

/// Storage behind the derived-key cache.
///
/// A backend may be remote and may fail; callers decide what a failure
/// means. Entries must disappear atomically: a reader sees either the
/// whole value or a miss.
#[async_trait]
pub trait CacheBackend: Send + Sync {
    /// Returns the live value for `key`; expired entries are misses.
    async fn get(&self, key: &CacheKey) -> Result<Option<CacheValue>, CacheError>;

    /// Inserts or overwrites `key`, expiring it after `ttl`.
    async fn put(&self, key: CacheKey, value: CacheValue, ttl: Duration) -> Result<(), CacheError>;

    /// Removes `key` if present. Removing a missing key succeeds.
    async fn evict(&self, key: &CacheKey) -> Result<(), CacheError>;

    /// Removes every entry in every region.
    async fn clear(&self) -> Result<(), CacheError>;

    /// Approximate number of live entries.
    fn entry_count(&self) -> u64;

    /// Returns the name of this backend, for logging.
    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::BookId;

    #[test]
    fn test_value_accessors() {
        let book = Book::new(BookId::new(1), "Emma", "Austen", "Classics");

        let list = CacheValue::books(vec![book.clone()]);
        assert_eq!(list.clone().into_books().unwrap().len(), 1);
        assert!(list.into_book().is_none());

        let single = CacheValue::book(book.clone());
        assert_eq!(*single.clone().into_book().unwrap(), book);
        assert!(single.into_books().is_none());
    }

    #[test]
    fn test_empty_list_is_a_value() {
        let empty = CacheValue::books(Vec::new());
        assert_eq!(empty.into_books().map(|b| b.len()), Some(0));
    }
}
