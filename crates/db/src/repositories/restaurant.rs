//! Restaurant repository for database operations.

use punchcard_core::StoreError;
use punchcard_core::restaurant::{NewRestaurant, Restaurant, RestaurantStore};
use punchcard_shared::types::RestaurantId;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};

use super::store_error;
use crate::entities::restaurants;

/// Restaurant repository implementation.
#[derive(Debug, Clone)]
pub struct RestaurantRepository {
    db: DatabaseConnection,
}

impl RestaurantRepository {
    /// Creates a new restaurant repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl RestaurantStore for RestaurantRepository {
    async fn create(&self, input: NewRestaurant) -> Result<Restaurant, StoreError> {
        let model = restaurants::ActiveModel {
            name: Set(input.name),
            address: Set(input.address),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(store_error)?;

        tracing::info!(restaurant_id = model.id, "registered restaurant");
        Ok(to_domain(model))
    }

    async fn find_by_id(&self, id: RestaurantId) -> Result<Option<Restaurant>, StoreError> {
        let model = restaurants::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await
            .map_err(store_error)?;

        Ok(model.map(to_domain))
    }
}

pub(crate) fn to_domain(model: restaurants::Model) -> Restaurant {
    Restaurant {
        id: RestaurantId::new(model.id),
        name: model.name,
        address: model.address,
    }
}
