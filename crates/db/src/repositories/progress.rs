//! Achievement progress repository for database operations.
//!
//! Increments only apply while `progress < total`, and completion deletes
//! the full row and credits the balance in one transaction. A row is therefore
//! rewarded at most once no matter how many requests race on it.

use punchcard_core::StoreError;
use punchcard_core::achievement::{Progress, ProgressStore, Reward};
use punchcard_shared::types::{AchievementId, UserId};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set, TransactionTrait,
};

use super::{points::upsert_credit, store_error};
use crate::entities::customer_achievement_progress as progress;

/// Progress repository implementation.
#[derive(Debug, Clone)]
pub struct ProgressRepository {
    db: DatabaseConnection,
}

impl ProgressRepository {
    /// Creates a new progress repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

async fn find_in<C: ConnectionTrait>(
    conn: &C,
    achievement_id: AchievementId,
    user_id: UserId,
) -> Result<Option<Progress>, DbErr> {
    let model = progress::Entity::find_by_id((achievement_id.into_inner(), user_id.into_inner()))
        .one(conn)
        .await?;
    Ok(model.map(to_domain))
}

impl ProgressStore for ProgressRepository {
    async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Progress>, StoreError> {
        let models = progress::Entity::find()
            .filter(progress::Column::UserId.eq(user_id.into_inner()))
            .order_by_asc(progress::Column::AchievementId)
            .all(&self.db)
            .await
            .map_err(store_error)?;

        Ok(models.into_iter().map(to_domain).collect())
    }

    async fn find(
        &self,
        achievement_id: AchievementId,
        user_id: UserId,
    ) -> Result<Option<Progress>, StoreError> {
        find_in(&self.db, achievement_id, user_id)
            .await
            .map_err(store_error)
    }

    async fn create(
        &self,
        achievement_id: AchievementId,
        user_id: UserId,
        total: i32,
    ) -> Result<Progress, StoreError> {
        let row = progress::ActiveModel {
            achievement_id: Set(achievement_id.into_inner()),
            user_id: Set(user_id.into_inner()),
            progress: Set(0),
            total: Set(total),
        };

        progress::Entity::insert(row)
            .exec_without_returning(&self.db)
            .await
            .map_err(store_error)?;

        tracing::debug!(%achievement_id, %user_id, total, "started progress");
        Ok(Progress {
            user_id,
            achievement_id,
            progress: 0,
            total,
        })
    }

    async fn increment(
        &self,
        achievement_id: AchievementId,
        user_id: UserId,
    ) -> Result<Option<Progress>, StoreError> {
        let txn = self.db.begin().await.map_err(store_error)?;

        let result = progress::Entity::update_many()
            .col_expr(
                progress::Column::Progress,
                Expr::col(progress::Column::Progress).add(1),
            )
            .filter(progress::Column::AchievementId.eq(achievement_id.into_inner()))
            .filter(progress::Column::UserId.eq(user_id.into_inner()))
            .filter(Expr::col(progress::Column::Progress).lt(Expr::col(progress::Column::Total)))
            .exec(&txn)
            .await
            .map_err(store_error)?;

        if result.rows_affected == 0 {
            txn.rollback().await.map_err(store_error)?;
            return Ok(None);
        }

        // Our update holds the row lock, so this read sees our increment.
        let row = find_in(&txn, achievement_id, user_id)
            .await
            .map_err(store_error)?;
        txn.commit().await.map_err(store_error)?;
        Ok(row)
    }

    async fn complete(&self, row: &Progress, reward: &Reward) -> Result<bool, StoreError> {
        let txn = self.db.begin().await.map_err(store_error)?;

        let deleted = progress::Entity::delete_many()
            .filter(progress::Column::AchievementId.eq(row.achievement_id.into_inner()))
            .filter(progress::Column::UserId.eq(row.user_id.into_inner()))
            .filter(Expr::col(progress::Column::Progress).eq(Expr::col(progress::Column::Total)))
            .exec(&txn)
            .await
            .map_err(store_error)?;

        if deleted.rows_affected == 0 {
            txn.rollback().await.map_err(store_error)?;
            tracing::debug!(
                achievement_id = %row.achievement_id,
                user_id = %row.user_id,
                "progress missing or unfinished"
            );
            return Ok(false);
        }

        upsert_credit(
            &txn,
            row.user_id,
            reward.restaurant_id,
            reward.points,
            reward.experience,
        )
        .await
        .map_err(store_error)?;
        txn.commit().await.map_err(store_error)?;

        tracing::info!(
            achievement_id = %row.achievement_id,
            user_id = %row.user_id,
            points = reward.points,
            experience = reward.experience,
            "completed achievement"
        );
        Ok(true)
    }
}

/// Convert database model to domain progress.
fn to_domain(model: progress::Model) -> Progress {
    Progress {
        user_id: UserId::new(model.user_id),
        achievement_id: AchievementId::new(model.achievement_id),
        progress: model.progress,
        total: model.total,
    }
}
