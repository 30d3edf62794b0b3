//! Typed IDs for type-safe entity references.
//!
//! Every table uses a serial integer key. Wrapping the raw `i32` prevents
//! passing a `CouponId` where an `AchievementId` is expected.

use serde::{Deserialize, Serialize};

/// Macro to generate typed ID wrappers around serial keys.
macro_rules! typed_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i32);

        impl $name {
            /// Wraps a raw database key.
            #[must_use]
            pub const fn new(raw: i32) -> Self {
                Self(raw)
            }

            /// Returns the raw database key.
            #[must_use]
            pub const fn into_inner(self) -> i32 {
                self.0
            }
        }

        impl From<i32> for $name {
            fn from(raw: i32) -> Self {
                Self(raw)
            }
        }

        impl From<$name> for i32 {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = std::num::ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(s.trim().parse()?))
            }
        }
    };
}

typed_id!(UserId, "Unique identifier for a user account.");
typed_id!(RestaurantId, "Unique identifier for a restaurant.");
typed_id!(CouponId, "Unique identifier for a coupon.");
typed_id!(AchievementId, "Unique identifier for an achievement definition.");

#[cfg(test)]
#[path = "id_tests.rs"]
mod tests;
