//! Per-user, per-restaurant point and experience balances.
//!
//! A balance row appears the first time a user is credited at a restaurant
//! and is never removed. Achievement completions credit it (see
//! [`crate::achievement::ProgressStore::complete`]); coupon redemptions
//! debit it.

use std::future::Future;

use punchcard_shared::types::{RestaurantId, UserId};
use serde::{Deserialize, Serialize};

use crate::level::LevelCurve;
use crate::store::StoreError;

/// Points and experience a user holds at one restaurant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointsBalance {
    /// Owner of the balance.
    pub user_id: UserId,
    /// Restaurant the balance is spendable at.
    pub restaurant_id: RestaurantId,
    /// Spendable points.
    pub points: i32,
    /// Accumulated experience; never decreases.
    pub experience: i32,
}

impl PointsBalance {
    /// A balance for a pair that has never been credited.
    #[must_use]
    pub const fn empty(user_id: UserId, restaurant_id: RestaurantId) -> Self {
        Self {
            user_id,
            restaurant_id,
            points: 0,
            experience: 0,
        }
    }

    /// Level reached at this restaurant.
    #[must_use]
    pub fn level(&self, curve: &LevelCurve) -> i32 {
        curve.level_for_experience(self.experience)
    }
}

/// Balance persistence.
pub trait PointsStore: Send + Sync {
    /// Find the balance for a (user, restaurant) pair.
    fn find(
        &self,
        user_id: UserId,
        restaurant_id: RestaurantId,
    ) -> impl Future<Output = Result<Option<PointsBalance>, StoreError>> + Send;

    /// All balances of a user, ordered by restaurant.
    fn list_for_user(
        &self,
        user_id: UserId,
    ) -> impl Future<Output = Result<Vec<PointsBalance>, StoreError>> + Send;

    /// Add points and experience, creating the row on first credit.
    fn credit(
        &self,
        user_id: UserId,
        restaurant_id: RestaurantId,
        points: i32,
        experience: i32,
    ) -> impl Future<Output = Result<PointsBalance, StoreError>> + Send;

    /// Subtract `points` only if the current balance covers it.
    ///
    /// Returns `None` when the row is missing or the balance is too low.
    fn debit(
        &self,
        user_id: UserId,
        restaurant_id: RestaurantId,
        points: i32,
    ) -> impl Future<Output = Result<Option<PointsBalance>, StoreError>> + Send;
}
