//! Property-based tests for coupon validity.

use chrono::{Duration, NaiveDate};
use proptest::prelude::*;
use punchcard_shared::types::{CouponId, RestaurantId};

use super::service::filter_valid_on;
use super::types::{Coupon, CouponStatus};
use crate::validity::{DateWindow, Validity};

fn base_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2020, 1, 1).unwrap()
}

/// Strategy for a validity window within a few years of the base date.
fn arb_validity() -> impl Strategy<Value = Validity> {
    prop_oneof![
        1 => Just(Validity::Indefinite),
        4 => (0i64..1000, 0i64..200).prop_map(|(start, len)| {
            let begin = base_date() + Duration::days(start);
            Validity::Window(DateWindow::new(begin, begin + Duration::days(len)).unwrap())
        }),
    ]
}

fn arb_coupon() -> impl Strategy<Value = Coupon> {
    (1i32..10_000, arb_validity(), any::<bool>(), 0i32..500).prop_map(
        |(id, validity, deleted, points)| Coupon {
            id: CouponId::new(id),
            restaurant_id: RestaurantId::new(1),
            name: format!("coupon {id}"),
            description: String::new(),
            points,
            level: 0,
            validity,
            deleted,
        },
    )
}

fn arb_today() -> impl Strategy<Value = NaiveDate> {
    (0i64..1300).prop_map(|offset| base_date() + Duration::days(offset))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Filtering never keeps a deleted or expired coupon, and never drops a live one.
    #[test]
    fn prop_filter_valid_excludes_deleted_and_expired(
        coupons in prop::collection::vec(arb_coupon(), 0..20),
        today in arb_today(),
    ) {
        let kept = filter_valid_on(coupons.clone(), today);

        for coupon in &kept {
            prop_assert!(!coupon.deleted);
            prop_assert!(coupon.validity.end().is_none_or(|end| end >= today));
        }

        let expected = coupons
            .iter()
            .filter(|c| !c.deleted && c.status_on(today) != CouponStatus::After)
            .count();
        prop_assert_eq!(kept.len(), expected);
    }

    /// Status matches the window bounds; indefinite coupons are always active.
    #[test]
    fn prop_status_matches_window(coupon in arb_coupon(), today in arb_today()) {
        let status = coupon.status_on(today);
        match coupon.validity {
            Validity::Indefinite => prop_assert_eq!(status, CouponStatus::Active),
            Validity::Window(w) => {
                if today > w.end() {
                    prop_assert_eq!(status, CouponStatus::After);
                } else if today < w.begin() {
                    prop_assert_eq!(status, CouponStatus::Before);
                } else {
                    prop_assert_eq!(status, CouponStatus::Active);
                }
            }
        }
    }

    /// A stored window always satisfies begin <= expiration.
    #[test]
    fn prop_window_is_ordered(coupon in arb_coupon()) {
        if let (Some(begin), Some(end)) = (coupon.validity.begin(), coupon.validity.end()) {
            prop_assert!(begin <= end);
        }
    }
}
