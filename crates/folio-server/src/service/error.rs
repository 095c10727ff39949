//! Errors surfaced by the catalog service.

use folio_core::BookId;
use folio_store::StoreError;
use thiserror::Error;

/// What could not be found.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotFoundKind {
    #[error("Book with id {0} not found")]
    BookById(BookId),

    #[error("Book '{title}' by '{author}' not found")]
    BookByTitleAuthor { title: String, author: String },
}

/// Error del servicio de catalogo.
///
/// A category-creation race never shows up here: the service recovers
/// from it by re-fetching. Cache failures never show up either.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// La entidad pedida no existe.
    #[error("{0}")]
    NotFound(NotFoundKind),

    /// Error del store, propagado sin reintentos.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl CatalogError {
    pub fn book_not_found(id: BookId) -> Self {
        Self::NotFound(NotFoundKind::BookById(id))
    }

    pub fn title_author_not_found(title: impl Into<String>, author: impl Into<String>) -> Self {
        Self::NotFound(NotFoundKind::BookByTitleAuthor {
            title: title.into(),
            author: author.into(),
        })
    }

    /// Returns true if the requested entity does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Returns true if the store is unreachable or too slow.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Store(e) if e.is_transient())
    }
}
