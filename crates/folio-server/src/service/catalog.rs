//! Cache-coherent catalog service.
//!
//! Reads go through the derived-key cache. Writes resolve the derived
//! keys of the row as it is *before* the mutation, evict them, and only
//! then touch the store:
//!
//! ```text
//! read:   cache hit ──────────────────────────────► caller
//!         cache miss ─► store ─► cache put ───────► caller
//! write:  store (pre-image) ─► evict pre-image keys ─► store (mutate)
//!                           ─► evict post-image keys if they changed
//! ```
//!
//! A reader racing a writer can repopulate a key with stale data right
//! after the writer evicted it. That window is bounded by the region TTL.

use folio_core::{Book, BookDraft, BookId, Category, CategoryName};
use folio_store::{EntityStore, StoreError};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument};

use crate::cache::{CacheKey, CacheValue, DerivedKeyCache, DerivedKeys};
use crate::service::error::CatalogError;

/// Default deadline for a single store call.
pub const DEFAULT_STORE_TIMEOUT: Duration = Duration::from_secs(5);

/// Outcome of a find-or-create on a category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryResolution {
    /// The category was already there (possibly inserted by a concurrent writer).
    Existing(Category),
    /// This call inserted it.
    Inserted(Category),
}

impl CategoryResolution {
    pub fn category(&self) -> &Category {
        match self {
            Self::Existing(c) | Self::Inserted(c) => c,
        }
    }

    pub fn into_category(self) -> Category {
        match self {
            Self::Existing(c) | Self::Inserted(c) => c,
        }
    }

    pub fn was_inserted(&self) -> bool {
        matches!(self, Self::Inserted(_))
    }
}

/// Servicio de catalogo: la unica fuente de la semantica read-through /
/// write-invalidate.
///
/// Both collaborators are injected; the service owns no global state and
/// is cheap to clone.
#[derive(Clone)]
pub struct CatalogService {
    store: Arc<dyn EntityStore>,
    cache: DerivedKeyCache,
    store_timeout: Duration,
}

impl CatalogService {
    /// Creates a new service over the given store and cache.
    pub fn new(store: Arc<dyn EntityStore>, cache: DerivedKeyCache) -> Self {
        Self {
            store,
            cache,
            store_timeout: DEFAULT_STORE_TIMEOUT,
        }
    }

    /// Sets the deadline applied to every store call.
    pub fn with_store_timeout(mut self, timeout: Duration) -> Self {
        self.store_timeout = timeout;
        self
    }

    /// Returns the cache client.
    pub fn cache(&self) -> &DerivedKeyCache {
        &self.cache
    }

    /// Returns the store.
    pub fn store(&self) -> &dyn EntityStore {
        self.store.as_ref()
    }

    /// Lists the books of a category.
    ///
    /// An unknown category yields an empty list, and that empty list is
    /// cached like any other result.
    #[instrument(skip(self), fields(category = %category))]
    pub async fn list_by_category(&self, category: &CategoryName) -> Result<Vec<Book>, CatalogError> {
        if let Some(books) = self.cache.get_books(category).await {
            debug!(count = books.len(), "Serving books from cache");
            return Ok(books.to_vec());
        }

        let books = self
            .bounded(
                "find_by_category_name",
                self.store.find_by_category_name(category),
            )
            .await?;

        self.cache
            .put(
                CacheKey::category(category.clone()),
                CacheValue::books(books.clone()),
            )
            .await;

        info!(count = books.len(), "Books by category loaded from store");
        Ok(books)
    }

    /// Finds a book by its (title, author) pair.
    ///
    /// # Errors
    ///
    /// - `CatalogError::NotFound` if no book matches; misses are not cached
    #[instrument(skip(self))]
    pub async fn find_by_title_author(
        &self,
        title: &str,
        author: &str,
    ) -> Result<Book, CatalogError> {
        if let Some(book) = self.cache.get_book(title, author).await {
            debug!(id = %book.id, "Serving book from cache");
            return Ok(Book::clone(&book));
        }

        let book = self
            .bounded(
                "find_by_title_author",
                self.store.find_by_title_author(title, author),
            )
            .await?
            .ok_or_else(|| CatalogError::title_author_not_found(title, author))?;

        self.cache
            .put(
                CacheKey::title_author(title, author),
                CacheValue::book(book.clone()),
            )
            .await;

        info!(id = %book.id, "Book by title and author loaded from store");
        Ok(book)
    }

    /// Creates a book, creating its category on first use.
    #[instrument(skip(self, draft), fields(category = %draft.category()))]
    pub async fn create(&self, draft: &BookDraft) -> Result<Book, CatalogError> {
        let category = self
            .find_or_create_category(draft.category())
            .await?
            .into_category();

        let book = self
            .bounded(
                "insert_book",
                self.store
                    .insert_book(draft.title(), draft.author(), &category),
            )
            .await?;

        // The new row changes the listing of its category
        self.cache.evict(&CacheKey::category(category.name)).await;

        info!(id = %book.id, "Book created");
        Ok(book)
    }

    /// Replaces title, author and category of an existing book.
    ///
    /// # Errors
    ///
    /// - `CatalogError::NotFound` if `id` does not exist; nothing is evicted
    #[instrument(skip(self, draft), fields(id = %id, category = %draft.category()))]
    pub async fn update(&self, id: BookId, draft: &BookDraft) -> Result<Book, CatalogError> {
        // 1. Target category
        let category = self
            .find_or_create_category(draft.category())
            .await?
            .into_category();

        // 2. Pre-image
        let existing = self
            .bounded("find_by_id", self.store.find_by_id(id))
            .await?
            .ok_or_else(|| CatalogError::book_not_found(id))?;

        // 3. Derived keys of the pre-image, not of the new values
        let stale = DerivedKeys::of(&existing);

        // 4-5. Evict them before the row changes
        self.cache.evict(&stale.category).await;
        self.cache.evict(&stale.title_author).await;

        // 6. Mutate
        let mut updated = existing;
        updated.title = draft.title().to_string();
        updated.author = draft.author().to_string();
        updated.category = category.name;

        let saved = match self
            .bounded("save_book", self.store.save_book(&updated))
            .await
        {
            Ok(book) => book,
            // Deleted between fetch and save
            Err(StoreError::NotFound(_)) => return Err(CatalogError::book_not_found(id)),
            Err(e) => return Err(e.into()),
        };

        let fresh = DerivedKeys::of(&saved);
        if fresh.category != stale.category {
            self.cache.evict(&fresh.category).await;
        }
        if fresh.title_author != stale.title_author {
            self.cache.evict(&fresh.title_author).await;
        }

        info!("Book updated");
        Ok(saved)
    }

    /// Deletes a book.
    ///
    /// # Errors
    ///
    /// - `CatalogError::NotFound` if `id` does not exist; nothing is evicted
    #[instrument(skip(self), fields(id = %id))]
    pub async fn delete(&self, id: BookId) -> Result<(), CatalogError> {
        let existing = self
            .bounded("find_by_id", self.store.find_by_id(id))
            .await?
            .ok_or_else(|| CatalogError::book_not_found(id))?;

        let stale = DerivedKeys::of(&existing);
        self.cache.evict(&stale.category).await;
        self.cache.evict(&stale.title_author).await;

        self.bounded("delete_by_id", self.store.delete_by_id(id))
            .await?;

        info!("Book deleted");
        Ok(())
    }

    /// Looks up a category by name and inserts it if absent.
    ///
    /// The insert is optimistic: when a concurrent writer wins, the
    /// store's uniqueness constraint rejects this insert and the category
    /// is fetched again.
    #[instrument(skip(self), fields(category = %name))]
    pub async fn find_or_create_category(
        &self,
        name: &CategoryName,
    ) -> Result<CategoryResolution, CatalogError> {
        if let Some(category) = self
            .bounded("find_category_by_name", self.store.find_category_by_name(name))
            .await?
        {
            return Ok(CategoryResolution::Existing(category));
        }

        match self
            .bounded("insert_category", self.store.insert_category(name))
            .await
        {
            Ok(category) => {
                info!("Category created");
                Ok(CategoryResolution::Inserted(category))
            },
            Err(e) if e.is_constraint_violation() => {
                debug!(error = %e, "Category inserted concurrently, re-fetching");
                match self
                    .bounded("find_category_by_name", self.store.find_category_by_name(name))
                    .await?
                {
                    Some(category) => Ok(CategoryResolution::Existing(category)),
                    None => Err(e.into()),
                }
            },
            Err(e) => Err(e.into()),
        }
    }

    /// Probes the store under the same deadline as any other call.
    pub async fn store_health(&self) -> Result<(), CatalogError> {
        self.bounded("health_check", self.store.health_check())
            .await
            .map_err(CatalogError::from)
    }

    /// Runs a store call under the configured deadline.
    async fn bounded<T, F>(&self, operation: &'static str, call: F) -> Result<T, StoreError>
    where
        F: Future<Output = Result<T, StoreError>>,
    {
        match tokio::time::timeout(self.store_timeout, call).await {
            Ok(result) => result,
            Err(_) => {
                debug!(operation, "Store call exceeded its deadline");
                Err(StoreError::Timeout {
                    millis: self.store_timeout.as_millis() as u64,
                })
            },
        }
    }
}
