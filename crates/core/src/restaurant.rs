//! Restaurants that own coupons, achievements and point balances.

use std::future::Future;

use punchcard_shared::types::RestaurantId;
use serde::{Deserialize, Serialize};

use crate::store::StoreError;

/// A participating restaurant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Restaurant {
    /// Restaurant ID.
    pub id: RestaurantId,
    /// Display name.
    pub name: String,
    /// Street address.
    pub address: String,
}

/// Input for registering a restaurant.
#[derive(Debug, Clone)]
pub struct NewRestaurant {
    /// Display name.
    pub name: String,
    /// Street address.
    pub address: String,
}

/// Restaurant persistence.
///
/// Restaurants are read-only to the loyalty logic; `create` exists for
/// onboarding and seeding.
pub trait RestaurantStore: Send + Sync {
    /// Insert a restaurant.
    fn create(
        &self,
        input: NewRestaurant,
    ) -> impl Future<Output = Result<Restaurant, StoreError>> + Send;

    /// Find a restaurant by ID.
    fn find_by_id(
        &self,
        id: RestaurantId,
    ) -> impl Future<Output = Result<Option<Restaurant>, StoreError>> + Send;
}
