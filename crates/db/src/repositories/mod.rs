//! Repository abstractions for data access.
//!
//! Each repository implements one `punchcard-core` store trait, hiding the
//! `SeaORM` implementation details from the services.

pub mod achievement;
pub mod coupon;
pub mod points;
pub mod progress;
pub mod restaurant;
pub mod user;

pub use achievement::AchievementRepository;
pub use coupon::CouponRepository;
pub use points::PointsRepository;
pub use progress::ProgressRepository;
pub use restaurant::RestaurantRepository;
pub use user::UserRepository;

use punchcard_core::StoreError;
use sea_orm::{DbErr, SqlErr};

/// Maps a database error onto the store error the services understand.
///
/// Unique and primary key violations become `StoreError::Conflict`.
pub(crate) fn store_error(err: DbErr) -> StoreError {
    if let Some(SqlErr::UniqueConstraintViolation(detail)) = err.sql_err() {
        return StoreError::Conflict(detail);
    }
    tracing::error!(error = %err, "database operation failed");
    StoreError::backend(err.to_string())
}
