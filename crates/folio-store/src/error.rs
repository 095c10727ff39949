//! Error types for entity stores.

/// Errors that can occur when talking to an entity store.
#[derive(Debug, Clone, thiserror::Error)]
pub enum StoreError {
    /// The row addressed by a mutation does not exist.
    #[error("record not found: {0}")]
    NotFound(String),

    /// A uniqueness or foreign key constraint rejected the write.
    #[error("constraint '{constraint}' violated: {detail}")]
    ConstraintViolation { constraint: String, detail: String },

    /// The store is not reachable.
    #[error("store unavailable: {reason}")]
    Unavailable { reason: String },

    /// The operation did not complete before its deadline.
    #[error("store operation timed out after {millis}ms")]
    Timeout { millis: u64 },

    /// Any other failure reported by the store.
    #[error("internal store error: {0}")]
    Internal(String),
}

impl StoreError {
    /// Creates a new not found error.
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    /// Creates a new constraint violation error.
    pub fn constraint(constraint: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::ConstraintViolation {
            constraint: constraint.into(),
            detail: detail.into(),
        }
    }

    /// Creates a new unavailable error.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable {
            reason: reason.into(),
        }
    }

    /// Returns true if this is a constraint violation.
    pub fn is_constraint_violation(&self) -> bool {
        matches!(self, Self::ConstraintViolation { .. })
    }

    /// Returns true if this is a transient error that might succeed on retry.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Unavailable { .. } | Self::Timeout { .. })
    }
}
