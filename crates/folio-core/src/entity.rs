//! Catalog entities.

use serde::{Deserialize, Serialize};

use crate::types::{BookId, CategoryName};

/// A book row as persisted by the store.
///
/// Every book references exactly one category by name.
///
/// # Example
///
/// ```
/// use folio_core::{Book, BookId};
///
/// let book = Book::new(BookId::new(1), "Emma", "Jane Austen", "Classics");
/// assert_eq!(book.category.as_str(), "Classics");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub author: String,
    pub category: CategoryName,
}

impl Book {
    /// Creates a new Book.
    pub fn new(
        id: BookId,
        title: impl Into<String>,
        author: impl Into<String>,
        category: impl Into<CategoryName>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            author: author.into(),
            category: category.into(),
        }
    }

    /// Returns true if the book is filed under the given category.
    pub fn is_in(&self, category: &CategoryName) -> bool {
        &self.category == category
    }

    /// Returns true if the book matches the given (title, author) pair.
    pub fn matches(&self, title: &str, author: &str) -> bool {
        self.title == title && self.author == author
    }
}

/// A category row. Categories are created on first use and never removed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Category {
    pub name: CategoryName,
}

impl Category {
    /// Creates a new Category.
    pub fn new(name: impl Into<CategoryName>) -> Self {
        Self { name: name.into() }
    }
}
