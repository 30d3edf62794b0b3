//! Coupon error types.

use punchcard_shared::{
    AppError, ValidationErrors,
    types::{CouponId, RestaurantId},
};
use thiserror::Error;

use crate::store::StoreError;

/// Coupon-related errors.
#[derive(Debug, Error)]
pub enum CouponError {
    /// Coupon form failed one or more checks.
    #[error("invalid coupon: {0}")]
    Validation(ValidationErrors),

    /// Coupon not found.
    #[error("coupon not found: {0}")]
    NotFound(CouponId),

    /// The coupon exists but its restaurant does not.
    #[error("restaurant not found: {0}")]
    RestaurantNotFound(RestaurantId),

    /// Coupon is deleted or outside its validity window.
    #[error("coupon {0} is not available")]
    Unavailable(CouponId),

    /// User level at the restaurant is below the coupon's minimum.
    #[error("level {actual} is below the required level {required}")]
    LevelTooLow {
        /// Coupon minimum level.
        required: i32,
        /// User level at the restaurant.
        actual: i32,
    },

    /// Balance does not cover the coupon cost.
    #[error("coupon costs {required} points but only {available} are available")]
    InsufficientPoints {
        /// Coupon cost.
        required: i32,
        /// Current balance.
        available: i32,
    },

    /// Store operation failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<CouponError> for AppError {
    fn from(err: CouponError) -> Self {
        match err {
            CouponError::Validation(errors) => Self::Validation(errors),
            e @ (CouponError::NotFound(_) | CouponError::RestaurantNotFound(_)) => {
                Self::NotFound(e.to_string())
            }
            e @ (CouponError::Unavailable(_)
            | CouponError::LevelTooLow { .. }
            | CouponError::InsufficientPoints { .. }) => Self::BusinessRule(e.to_string()),
            CouponError::Store(e) => e.into(),
        }
    }
}
