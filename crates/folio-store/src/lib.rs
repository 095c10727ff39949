//! # Folio Store
//!
//! Persistence collaborator for the Folio catalog service.
//!
//! The store owns the only hard consistency guarantees of the system:
//! uniqueness of categories by name and atomicity of single-row
//! mutations. Everything in front of it (caches, services) treats it as
//! the source of truth.
//!
//! ## Example
//!
//! ```
//! use folio_core::CategoryName;
//! use folio_store::{EntityStore, InMemoryStore};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), folio_store::StoreError> {
//! let store = InMemoryStore::new();
//! let category = store.insert_category(&CategoryName::from("Classics")).await?;
//! let book = store.insert_book("Emma", "Jane Austen", &category).await?;
//!
//! let found = store.find_by_id(book.id).await?;
//! assert_eq!(found, Some(book));
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod memory;
pub mod traits;

// Re-exports
pub use error::StoreError;
pub use memory::InMemoryStore;
pub use traits::EntityStore;

// Re-export folio_core for consumers
pub use folio_core;
