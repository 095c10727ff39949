//! Catalog service: read-through and write-invalidate orchestration.

mod catalog;
mod error;

pub use catalog::{CatalogService, CategoryResolution, DEFAULT_STORE_TIMEOUT};
pub use error::{CatalogError, NotFoundKind};
