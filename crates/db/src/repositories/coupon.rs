//! Coupon repository for database operations.
//!
//! A coupon's validity is stored as two nullable date columns; both null
//! means indefinite.

use punchcard_core::StoreError;
use punchcard_core::coupon::{Coupon, CouponStore, NewCoupon};
use punchcard_core::restaurant::Restaurant;
use punchcard_core::validity::Validity;
use punchcard_shared::types::{CouponId, RestaurantId};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

use super::{restaurant, store_error};
use crate::entities::{coupons, restaurants};

/// Coupon repository implementation.
#[derive(Debug, Clone)]
pub struct CouponRepository {
    db: DatabaseConnection,
}

impl CouponRepository {
    /// Creates a new coupon repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl CouponStore for CouponRepository {
    async fn create(&self, input: NewCoupon) -> Result<Coupon, StoreError> {
        let model = coupons::ActiveModel {
            restaurant_id: Set(input.restaurant_id.into_inner()),
            name: Set(input.name),
            description: Set(input.description),
            points: Set(input.points),
            level: Set(input.level),
            begin: Set(input.validity.begin()),
            expiration: Set(input.validity.end()),
            deleted: Set(false),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(store_error)?;

        tracing::info!(
            coupon_id = model.id,
            restaurant_id = model.restaurant_id,
            "created coupon"
        );
        to_domain(model)
    }

    async fn find_by_id(&self, id: CouponId) -> Result<Option<Coupon>, StoreError> {
        coupons::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await
            .map_err(store_error)?
            .map(to_domain)
            .transpose()
    }

    async fn find_with_restaurant(
        &self,
        id: CouponId,
    ) -> Result<Option<(Coupon, Option<Restaurant>)>, StoreError> {
        let row = coupons::Entity::find_by_id(id.into_inner())
            .find_also_related(restaurants::Entity)
            .one(&self.db)
            .await
            .map_err(store_error)?;

        row.map(|(coupon, owner)| Ok((to_domain(coupon)?, owner.map(restaurant::to_domain))))
            .transpose()
    }

    async fn list_by_restaurant(
        &self,
        restaurant_id: RestaurantId,
    ) -> Result<Vec<Coupon>, StoreError> {
        coupons::Entity::find()
            .filter(coupons::Column::RestaurantId.eq(restaurant_id.into_inner()))
            .order_by_asc(coupons::Column::Id)
            .all(&self.db)
            .await
            .map_err(store_error)?
            .into_iter()
            .map(to_domain)
            .collect()
    }

    async fn mark_deleted(&self, id: CouponId) -> Result<bool, StoreError> {
        let result = coupons::Entity::update_many()
            .col_expr(
                coupons::Column::Deleted,
                sea_orm::sea_query::Expr::value(true),
            )
            .filter(coupons::Column::Id.eq(id.into_inner()))
            .exec(&self.db)
            .await
            .map_err(store_error)?;

        tracing::debug!(coupon_id = %id, rows = result.rows_affected, "soft-deleted coupon");
        Ok(result.rows_affected > 0)
    }
}

/// Convert database model to domain coupon.
fn to_domain(model: coupons::Model) -> Result<Coupon, StoreError> {
    let validity = Validity::from_columns(model.begin, model.expiration).ok_or_else(|| {
        StoreError::corrupt(format!("coupon {} has an invalid date window", model.id))
    })?;

    Ok(Coupon {
        id: CouponId::new(model.id),
        restaurant_id: RestaurantId::new(model.restaurant_id),
        name: model.name,
        description: model.description,
        points: model.points,
        level: model.level,
        validity,
        deleted: model.deleted,
    })
}
