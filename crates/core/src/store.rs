//! Errors shared by every store trait.

use punchcard_shared::AppError;
use thiserror::Error;

/// Failure reported by a store implementation.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A uniqueness constraint rejected the write.
    #[error("conflict: {0}")]
    Conflict(String),

    /// A persisted row cannot be mapped back into a domain value.
    #[error("corrupt row: {0}")]
    Corrupt(String),

    /// The backing store failed.
    #[error("store failure: {0}")]
    Backend(String),
}

impl StoreError {
    /// Create a backend error.
    #[must_use]
    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }

    /// Create a corrupt row error.
    #[must_use]
    pub fn corrupt(msg: impl Into<String>) -> Self {
        Self::Corrupt(msg.into())
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict(msg) => Self::Conflict(msg),
            StoreError::Corrupt(msg) => Self::Internal(msg),
            StoreError::Backend(msg) => Self::Database(msg),
        }
    }
}
