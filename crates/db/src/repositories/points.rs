//! Points repository for database operations.
//!
//! Credits are a single upsert; debits are a conditional update, so a
//! balance never goes negative under concurrent spends.

use punchcard_core::StoreError;
use punchcard_core::points::{PointsBalance, PointsStore};
use punchcard_shared::types::{RestaurantId, UserId};
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set, TransactionTrait,
};

use super::store_error;
use crate::entities::points;

/// Points repository implementation.
#[derive(Debug, Clone)]
pub struct PointsRepository {
    db: DatabaseConnection,
}

impl PointsRepository {
    /// Creates a new points repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

/// Adds to a balance, inserting the row on first credit.
pub(crate) async fn upsert_credit<C: ConnectionTrait>(
    conn: &C,
    user_id: UserId,
    restaurant_id: RestaurantId,
    points: i32,
    experience: i32,
) -> Result<(), DbErr> {
    let row = points::ActiveModel {
        user_id: Set(user_id.into_inner()),
        restaurant_id: Set(restaurant_id.into_inner()),
        points: Set(points),
        experience: Set(experience),
    };

    points::Entity::insert(row)
        .on_conflict(
            OnConflict::columns([points::Column::UserId, points::Column::RestaurantId])
                .value(
                    points::Column::Points,
                    Expr::col((points::Entity, points::Column::Points)).add(points),
                )
                .value(
                    points::Column::Experience,
                    Expr::col((points::Entity, points::Column::Experience)).add(experience),
                )
                .to_owned(),
        )
        .exec_without_returning(conn)
        .await?;

    tracing::debug!(%user_id, %restaurant_id, points, experience, "credited balance");
    Ok(())
}

async fn find_in<C: ConnectionTrait>(
    conn: &C,
    user_id: UserId,
    restaurant_id: RestaurantId,
) -> Result<Option<PointsBalance>, DbErr> {
    let model = points::Entity::find_by_id((user_id.into_inner(), restaurant_id.into_inner()))
        .one(conn)
        .await?;
    Ok(model.map(to_domain))
}

impl PointsStore for PointsRepository {
    async fn find(
        &self,
        user_id: UserId,
        restaurant_id: RestaurantId,
    ) -> Result<Option<PointsBalance>, StoreError> {
        find_in(&self.db, user_id, restaurant_id)
            .await
            .map_err(store_error)
    }

    async fn list_for_user(&self, user_id: UserId) -> Result<Vec<PointsBalance>, StoreError> {
        let models = points::Entity::find()
            .filter(points::Column::UserId.eq(user_id.into_inner()))
            .order_by_asc(points::Column::RestaurantId)
            .all(&self.db)
            .await
            .map_err(store_error)?;

        Ok(models.into_iter().map(to_domain).collect())
    }

    async fn credit(
        &self,
        user_id: UserId,
        restaurant_id: RestaurantId,
        points: i32,
        experience: i32,
    ) -> Result<PointsBalance, StoreError> {
        let txn = self.db.begin().await.map_err(store_error)?;
        upsert_credit(&txn, user_id, restaurant_id, points, experience)
            .await
            .map_err(store_error)?;
        let balance = find_in(&txn, user_id, restaurant_id)
            .await
            .map_err(store_error)?;
        txn.commit().await.map_err(store_error)?;

        balance.ok_or_else(|| {
            StoreError::backend(format!(
                "balance for user {user_id} at restaurant {restaurant_id} vanished after credit"
            ))
        })
    }

    async fn debit(
        &self,
        user_id: UserId,
        restaurant_id: RestaurantId,
        points: i32,
    ) -> Result<Option<PointsBalance>, StoreError> {
        let txn = self.db.begin().await.map_err(store_error)?;
        let result = points::Entity::update_many()
            .col_expr(
                points::Column::Points,
                Expr::col(points::Column::Points).sub(points),
            )
            .filter(points::Column::UserId.eq(user_id.into_inner()))
            .filter(points::Column::RestaurantId.eq(restaurant_id.into_inner()))
            .filter(points::Column::Points.gte(points))
            .exec(&txn)
            .await
            .map_err(store_error)?;

        if result.rows_affected == 0 {
            txn.rollback().await.map_err(store_error)?;
            return Ok(None);
        }

        let balance = find_in(&txn, user_id, restaurant_id)
            .await
            .map_err(store_error)?;
        txn.commit().await.map_err(store_error)?;

        tracing::info!(%user_id, %restaurant_id, points, "debited balance");
        Ok(balance)
    }
}

/// Convert database model to domain balance.
fn to_domain(model: points::Model) -> PointsBalance {
    PointsBalance {
        user_id: UserId::new(model.user_id),
        restaurant_id: RestaurantId::new(model.restaurant_id),
        points: model.points,
        experience: model.experience,
    }
}
