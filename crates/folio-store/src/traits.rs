//! Entity store trait definition.

use async_trait::async_trait;
use folio_core::{Book, BookId, Category, CategoryName};

use crate::error::StoreError;

/// Persistence for books and categories.
///
/// This trait abstracts over the relational backend so that the catalog
/// service can be wired against an in-process store in tests and a real
/// database in production.
///
/// # Implementors
///
/// - `InMemoryStore` - transactional in-process tables
///
/// # Consistency
///
/// Implementations must guarantee that category names are unique and that
/// each single-row mutation is atomic. Nothing else is promised: two calls
/// are not isolated from each other.
#[async_trait]
pub trait EntityStore: Send + Sync {
    /// Looks up a book by its primary id.
    async fn find_by_id(&self, id: BookId) -> Result<Option<Book>, StoreError>;

    /// Returns every book currently filed under `name`, ordered by id.
    ///
    /// An unknown category yields an empty list, not an error.
    async fn find_by_category_name(&self, name: &CategoryName) -> Result<Vec<Book>, StoreError>;

    /// Returns the lowest-id book with the given title and author.
    async fn find_by_title_author(
        &self,
        title: &str,
        author: &str,
    ) -> Result<Option<Book>, StoreError>;

    /// Looks up a category by its natural key.
    async fn find_category_by_name(
        &self,
        name: &CategoryName,
    ) -> Result<Option<Category>, StoreError>;

    /// Inserts a new category.
    ///
    /// # Errors
    ///
    /// - `StoreError::ConstraintViolation` if a category with this name already exists
    async fn insert_category(&self, name: &CategoryName) -> Result<Category, StoreError>;

    /// Inserts a new book and returns it with its store-assigned id.
    ///
    /// # Errors
    ///
    /// - `StoreError::ConstraintViolation` if `category` does not exist
    async fn insert_book(
        &self,
        title: &str,
        author: &str,
        category: &Category,
    ) -> Result<Book, StoreError>;

    /// Overwrites the row with `book.id`.
    ///
    /// # Errors
    ///
    /// - `StoreError::NotFound` if the row was deleted in the meantime
    /// - `StoreError::ConstraintViolation` if the referenced category does not exist
    async fn save_book(&self, book: &Book) -> Result<Book, StoreError>;

    /// Deletes the row with `id`. Deleting a missing row is a no-op.
    async fn delete_by_id(&self, id: BookId) -> Result<(), StoreError>;

    /// Verifies that the store is reachable.
    async fn health_check(&self) -> Result<(), StoreError>;

    /// Returns the name of this store, for logging.
    fn name(&self) -> &str;
}
