//! Error types for Folio domain operations.
//!
//! Domain errors cover what can go wrong before a request ever reaches
//! the store: malformed fields and malformed identifiers. Store and cache
//! failures live in their own crates.
//!
//! # Example
//!
//! ```
//! use folio_core::{FolioError, Result};
//!
//! fn parse_title(title: &str) -> Result<String> {
//!     if title.trim().is_empty() {
//!         return Err(FolioError::validation("title", "Book title must be set"));
//!     }
//!     Ok(title.to_string())
//! }
//!
//! assert!(parse_title("Emma").is_ok());
//! assert!(parse_title("  ").unwrap_err().is_validation());
//! ```

use thiserror::Error;

/// Main error type for domain-level failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FolioError {
    /// One or more fields failed validation.
    #[error("{message}")]
    Validation {
        /// Field (or comma separated fields) that failed validation
        field: String,
        /// Human readable description, violations joined with "; "
        message: String,
    },

    /// An identifier supplied by a client is not a positive integer.
    #[error("Identifier must be a positive number, got '{0}'")]
    InvalidId(String),
}

impl FolioError {
    /// Creates a Validation error.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Creates an InvalidId error.
    pub fn invalid_id(raw: impl Into<String>) -> Self {
        Self::InvalidId(raw.into())
    }

    /// Returns true for any error caused by bad client input.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. } | Self::InvalidId(_))
    }

    /// Merges several field violations into a single error.
    ///
    /// Returns `None` when the list is empty.
    pub fn combine(errors: Vec<FolioError>) -> Option<Self> {
        if errors.is_empty() {
            return None;
        }

        let mut fields = Vec::with_capacity(errors.len());
        let mut messages = Vec::with_capacity(errors.len());
        for error in errors {
            match error {
                Self::Validation { field, message } => {
                    fields.push(field);
                    messages.push(message);
                },
                other => {
                    fields.push("id".to_string());
                    messages.push(other.to_string());
                },
            }
        }

        Some(Self::Validation {
            field: fields.join(","),
            message: messages.join("; "),
        })
    }
}

/// Result alias for domain operations.
pub type Result<T> = std::result::Result<T, FolioError>;
