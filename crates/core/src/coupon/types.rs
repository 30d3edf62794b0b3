//! Coupon domain types.

use chrono::NaiveDate;
use punchcard_shared::types::{CouponId, RestaurantId};
use serde::{Deserialize, Serialize};

use crate::validity::{Validity, WindowStatus};

/// Where today falls relative to a coupon's validity window.
pub type CouponStatus = WindowStatus;

/// A coupon offered by a restaurant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coupon {
    /// Coupon ID.
    pub id: CouponId,
    /// Owning restaurant.
    pub restaurant_id: RestaurantId,
    /// Coupon name.
    pub name: String,
    /// Free-text description.
    pub description: String,
    /// Point cost.
    pub points: i32,
    /// Minimum level at the restaurant needed to redeem.
    pub level: i32,
    /// Validity window.
    pub validity: Validity,
    /// Soft-delete flag.
    pub deleted: bool,
}

impl Coupon {
    /// Classifies `date` against the validity window.
    #[must_use]
    pub fn status_on(&self, date: NaiveDate) -> CouponStatus {
        self.validity.status_on(date)
    }

    /// Returns true unless the coupon is deleted or its window has ended.
    ///
    /// Coupons whose window has not opened yet still count as valid.
    #[must_use]
    pub fn is_valid_on(&self, date: NaiveDate) -> bool {
        !self.deleted && !self.validity.has_ended_on(date)
    }

    /// Returns true if the coupon can be redeemed on `date`.
    #[must_use]
    pub fn is_redeemable_on(&self, date: NaiveDate) -> bool {
        !self.deleted && self.status_on(date) == CouponStatus::Active
    }
}

/// Coupon fields plus today's status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CouponDetails {
    /// The coupon.
    #[serde(flatten)]
    pub coupon: Coupon,
    /// Status on the day of the lookup.
    pub status: CouponStatus,
}

/// Coupon form as submitted by an owner.
#[derive(Debug, Clone)]
pub struct CreateCouponInput {
    /// Owning restaurant.
    pub restaurant_id: RestaurantId,
    /// Coupon name.
    pub name: String,
    /// Point cost.
    pub points: i32,
    /// Free-text description.
    pub description: String,
    /// Minimum level.
    pub level: i32,
    /// First valid day, required unless indefinite.
    pub begin: Option<NaiveDate>,
    /// Last valid day, required unless indefinite.
    pub expiration: Option<NaiveDate>,
    /// No validity window; supplied dates are ignored.
    pub indefinite: bool,
}

/// Validated coupon ready to insert.
#[derive(Debug, Clone)]
pub struct NewCoupon {
    /// Owning restaurant.
    pub restaurant_id: RestaurantId,
    /// Coupon name.
    pub name: String,
    /// Free-text description.
    pub description: String,
    /// Point cost.
    pub points: i32,
    /// Minimum level.
    pub level: i32,
    /// Validity window.
    pub validity: Validity,
}
