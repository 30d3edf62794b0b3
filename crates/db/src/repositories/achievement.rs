//! Achievement repository for database operations.
//!
//! The requirement is stored as JSON in a single column.

use punchcard_core::StoreError;
use punchcard_core::achievement::{
    Achievement, AchievementStore, CreateAchievementInput, Requirement,
};
use punchcard_shared::types::{AchievementId, RestaurantId};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};

use super::store_error;
use crate::entities::{achievements, customer_achievement_progress};

/// Achievement repository implementation.
#[derive(Debug, Clone)]
pub struct AchievementRepository {
    db: DatabaseConnection,
}

impl AchievementRepository {
    /// Creates a new achievement repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl AchievementStore for AchievementRepository {
    async fn create(&self, input: CreateAchievementInput) -> Result<Achievement, StoreError> {
        let requirement = serde_json::to_value(&input.requirement)
            .map_err(|e| StoreError::backend(format!("cannot encode requirement: {e}")))?;

        let model = achievements::ActiveModel {
            restaurant_id: Set(input.restaurant_id.into_inner()),
            name: Set(input.name),
            experience: Set(input.experience),
            points: Set(input.points),
            requirement: Set(requirement),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(store_error)?;

        tracing::info!(
            achievement_id = model.id,
            restaurant_id = model.restaurant_id,
            "created achievement"
        );
        to_domain(model)
    }

    async fn find_by_id(&self, id: AchievementId) -> Result<Option<Achievement>, StoreError> {
        achievements::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await
            .map_err(store_error)?
            .map(to_domain)
            .transpose()
    }

    async fn list_by_restaurant(
        &self,
        restaurant_id: RestaurantId,
    ) -> Result<Vec<Achievement>, StoreError> {
        achievements::Entity::find()
            .filter(achievements::Column::RestaurantId.eq(restaurant_id.into_inner()))
            .order_by_asc(achievements::Column::Id)
            .all(&self.db)
            .await
            .map_err(store_error)?
            .into_iter()
            .map(to_domain)
            .collect()
    }

    async fn delete(&self, id: AchievementId) -> Result<bool, StoreError> {
        let txn = self.db.begin().await.map_err(store_error)?;

        // Progress rows go first so the delete does not rely on FK cascades.
        let progress = customer_achievement_progress::Entity::delete_many()
            .filter(customer_achievement_progress::Column::AchievementId.eq(id.into_inner()))
            .exec(&txn)
            .await
            .map_err(store_error)?;
        let result = achievements::Entity::delete_by_id(id.into_inner())
            .exec(&txn)
            .await
            .map_err(store_error)?;

        txn.commit().await.map_err(store_error)?;

        tracing::info!(
            achievement_id = %id,
            progress_rows = progress.rows_affected,
            deleted = result.rows_affected > 0,
            "deleted achievement"
        );
        Ok(result.rows_affected > 0)
    }
}

/// Convert database model to domain achievement.
fn to_domain(model: achievements::Model) -> Result<Achievement, StoreError> {
    let requirement: Requirement = serde_json::from_value(model.requirement).map_err(|e| {
        StoreError::corrupt(format!(
            "achievement {} has an unreadable requirement: {e}",
            model.id
        ))
    })?;

    Ok(Achievement {
        id: AchievementId::new(model.id),
        restaurant_id: RestaurantId::new(model.restaurant_id),
        name: model.name,
        experience: model.experience,
        points: model.points,
        requirement,
    })
}
