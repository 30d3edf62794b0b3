//! Achievement error types.

use punchcard_shared::{
    AppError, ValidationErrors,
    types::{AchievementId, UserId},
};
use thiserror::Error;

use crate::store::StoreError;

/// Achievement-related errors.
#[derive(Debug, Error)]
pub enum AchievementError {
    /// Achievement form failed one or more checks.
    #[error("invalid achievement: {0}")]
    Validation(ValidationErrors),

    /// Achievement not found.
    #[error("achievement not found: {0}")]
    NotFound(AchievementId),

    /// The user has no progress row for the achievement.
    #[error("no progress for user {user_id} on achievement {achievement_id}")]
    ProgressNotFound {
        /// The achievement.
        achievement_id: AchievementId,
        /// The user.
        user_id: UserId,
    },

    /// Another caller completed the progress row first.
    #[error("achievement {achievement_id} was already completed for user {user_id}")]
    AlreadyCompleted {
        /// The achievement.
        achievement_id: AchievementId,
        /// The user.
        user_id: UserId,
    },

    /// The progress row has not reached its total yet.
    #[error("progress for user {user_id} on achievement {achievement_id} is not finished")]
    Unfinished {
        /// The achievement.
        achievement_id: AchievementId,
        /// The user.
        user_id: UserId,
    },

    /// The achievement is outside its validity window today.
    #[error("achievement {0} is not active")]
    Inactive(AchievementId),

    /// Store operation failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<AchievementError> for AppError {
    fn from(err: AchievementError) -> Self {
        match err {
            AchievementError::Validation(errors) => Self::Validation(errors),
            e @ (AchievementError::NotFound(_) | AchievementError::ProgressNotFound { .. }) => {
                Self::NotFound(e.to_string())
            }
            e @ AchievementError::AlreadyCompleted { .. } => Self::Conflict(e.to_string()),
            e @ (AchievementError::Unfinished { .. } | AchievementError::Inactive(_)) => {
                Self::BusinessRule(e.to_string())
            }
            AchievementError::Store(e) => e.into(),
        }
    }
}
