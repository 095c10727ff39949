//! Folio Core - Domain types for the book catalog.
//!
//! This crate provides the entities shared by the store and the server:
//! books, categories, their identifiers and the validation rules applied
//! to client-supplied fields.

pub mod entity;
pub mod error;
pub mod types;
pub mod validation;

pub use entity::{Book, Category};
pub use error::{FolioError, Result};
pub use types::{BookId, CategoryName};
pub use validation::{BookDraft, FieldBounds};

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
