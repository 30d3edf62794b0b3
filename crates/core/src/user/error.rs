//! User error types.

use punchcard_shared::{AppError, ValidationErrors, types::UserId};
use thiserror::Error;

use crate::store::StoreError;

/// User-related errors.
#[derive(Debug, Error)]
pub enum UserError {
    /// Registration input failed one or more checks.
    #[error("invalid registration: {0}")]
    Validation(ValidationErrors),

    /// User not found.
    #[error("user not found: {0}")]
    NotFound(UserId),

    /// Store operation failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<UserError> for AppError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::Validation(errors) => Self::Validation(errors),
            UserError::NotFound(id) => Self::NotFound(format!("user {id}")),
            UserError::Store(e) => e.into(),
        }
    }
}
