//! Core loyalty program logic for Punchcard.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! Persistence is reached through the store traits each module defines; the
//! `punchcard-db` crate implements them with SeaORM and [`memory`] implements
//! them with in-process maps.
//!
//! # Modules
//!
//! - `user` - Registration, login lookup and account types
//! - `coupon` - Coupon creation, validity windows, soft delete and redemption
//! - `achievement` - Achievement definitions and per-user progress
//! - `points` - Per-restaurant point and experience balances
//! - `restaurant` - Restaurants that own coupons, achievements and balances
//! - `level` - Experience to level curve
//! - `validity` - Date windows shared by coupons and achievements

pub mod achievement;
pub mod coupon;
pub mod level;
pub mod memory;
pub mod points;
pub mod restaurant;
pub mod store;
pub mod user;
pub mod validity;

pub use store::StoreError;
