//! Cache module for the Folio catalog server.
//!
//! This module provides a cache keyed by derived fields (category name,
//! title and author) instead of book ids, split into independently
//! configured regions, with TTL-based expiration, explicit eviction and
//! metrics. Moka is the default backend.

pub mod backend;
pub mod derived_cache;
pub mod keys;
pub mod moka_backend;

// Re-exports
pub use backend::{CacheBackend, CacheError, CacheValue};
pub use derived_cache::{CacheSettings, DerivedKeyCache, RegionSettings};
pub use keys::{CacheKey, CacheRegion, DerivedKeys};
pub use moka_backend::MokaBackend;
