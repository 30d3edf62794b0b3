//! Coupons: creation, validity windows, soft delete and redemption.

mod error;
mod service;
mod types;

#[cfg(test)]
mod props;

pub use error::CouponError;
pub use service::{CouponService, CouponStore, filter_valid_on};
pub use types::{Coupon, CouponDetails, CouponStatus, CreateCouponInput, NewCoupon};
