//! `SeaORM` entity definitions.

pub mod achievements;
pub mod coupons;
pub mod customer_achievement_progress;
pub mod points;
pub mod restaurants;
pub mod users;
