//! In-process entity store.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use folio_core::{Book, BookId, Category, CategoryName};
use parking_lot::RwLock;
use tracing::{debug, trace};

use crate::error::StoreError;
use crate::traits::EntityStore;

const CATEGORY_PK: &str = "categories_pkey";
const BOOK_CATEGORY_FK: &str = "books_category_name_fkey";

/// Tables guarded by a single lock: one lock acquisition is one transaction.
#[derive(Debug, Default)]
struct Tables {
    books: BTreeMap<BookId, Book>,
    categories: HashMap<CategoryName, Category>,
    next_id: u64,
}

impl Tables {
    fn allocate_id(&mut self) -> BookId {
        self.next_id += 1;
        BookId::new(self.next_id)
    }

    fn require_category(&self, name: &CategoryName) -> Result<(), StoreError> {
        if self.categories.contains_key(name) {
            Ok(())
        } else {
            Err(StoreError::constraint(
                BOOK_CATEGORY_FK,
                format!("category '{}' does not exist", name),
            ))
        }
    }
}

/// A transactional store kept in memory.
///
/// Books live in an id-ordered table, categories in a table keyed by
/// name. Ids are allocated from a sequence starting at 1 and are never
/// reused.
///
/// Two knobs exist for exercising callers: an artificial per-operation
/// latency and an availability switch that makes every call fail with
/// `StoreError::Unavailable`.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
    unavailable: AtomicBool,
    latency: Option<Duration>,
}

impl InMemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty store that sleeps `latency` before every operation.
    pub fn with_latency(latency: Duration) -> Self {
        Self {
            latency: Some(latency),
            ..Self::default()
        }
    }

    /// Makes every subsequent call fail (or succeed again).
    pub fn set_available(&self, available: bool) {
        self.unavailable.store(!available, Ordering::SeqCst);
    }

    /// Number of category rows.
    pub fn category_count(&self) -> usize {
        self.tables.read().categories.len()
    }

    /// Number of book rows.
    pub fn book_count(&self) -> usize {
        self.tables.read().books.len()
    }

    async fn enter(&self, operation: &'static str) -> Result<(), StoreError> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::unavailable(format!(
                "in-memory store switched off during {}",
                operation
            )));
        }

        trace!(operation, "store operation");
        Ok(())
    }
}

#[async_trait]
impl EntityStore for InMemoryStore {
    async fn find_by_id(&self, id: BookId) -> Result<Option<Book>, StoreError> {
        self.enter("find_by_id").await?;
        Ok(self.tables.read().books.get(&id).cloned())
    }

    async fn find_by_category_name(&self, name: &CategoryName) -> Result<Vec<Book>, StoreError> {
        self.enter("find_by_category_name").await?;
        let tables = self.tables.read();
        Ok(tables
            .books
            .values()
            .filter(|book| book.is_in(name))
            .cloned()
            .collect())
    }

    async fn find_by_title_author(
        &self,
        title: &str,
        author: &str,
    ) -> Result<Option<Book>, StoreError> {
        self.enter("find_by_title_author").await?;
        let tables = self.tables.read();
        Ok(tables
            .books
            .values()
            .find(|book| book.matches(title, author))
            .cloned())
    }

    async fn find_category_by_name(
        &self,
        name: &CategoryName,
    ) -> Result<Option<Category>, StoreError> {
        self.enter("find_category_by_name").await?;
        Ok(self.tables.read().categories.get(name).cloned())
    }

    async fn insert_category(&self, name: &CategoryName) -> Result<Category, StoreError> {
        self.enter("insert_category").await?;
        let mut tables = self.tables.write();

        if tables.categories.contains_key(name) {
            return Err(StoreError::constraint(
                CATEGORY_PK,
                format!("duplicate key '{}'", name),
            ));
        }

        let category = Category::new(name.clone());
        tables.categories.insert(name.clone(), category.clone());
        debug!(category = %name, "Category inserted");

        Ok(category)
    }

    async fn insert_book(
        &self,
        title: &str,
        author: &str,
        category: &Category,
    ) -> Result<Book, StoreError> {
        self.enter("insert_book").await?;
        let mut tables = self.tables.write();
        tables.require_category(&category.name)?;

        let id = tables.allocate_id();
        let book = Book::new(id, title, author, category.name.clone());
        tables.books.insert(id, book.clone());
        debug!(id = %id, "Book inserted");

        Ok(book)
    }

    async fn save_book(&self, book: &Book) -> Result<Book, StoreError> {
        self.enter("save_book").await?;
        let mut tables = self.tables.write();
        tables.require_category(&book.category)?;

        match tables.books.get_mut(&book.id) {
            Some(row) => {
                *row = book.clone();
                debug!(id = %book.id, "Book saved");
                Ok(book.clone())
            },
            None => Err(StoreError::not_found(format!("book {}", book.id))),
        }
    }

    async fn delete_by_id(&self, id: BookId) -> Result<(), StoreError> {
        self.enter("delete_by_id").await?;
        if self.tables.write().books.remove(&id).is_some() {
            debug!(id = %id, "Book deleted");
        }
        Ok(())
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        self.enter("health_check").await
    }

    fn name(&self) -> &str {
        "in-memory"
    }
}
