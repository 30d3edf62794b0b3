use super::*;
use std::str::FromStr;

#[test]
fn test_typed_id_roundtrips_raw_key() {
    let id = CouponId::new(42);
    assert_eq!(id.into_inner(), 42);
    assert_eq!(i32::from(id), 42);
    assert_eq!(CouponId::from(42), id);
}

#[test]
fn test_typed_id_display() {
    assert_eq!(format!("{}", UserId::new(7)), "7");
}

#[test]
fn test_typed_id_from_str() {
    assert_eq!(RestaurantId::from_str("12").unwrap(), RestaurantId::new(12));
    assert_eq!(RestaurantId::from_str(" 3 ").unwrap(), RestaurantId::new(3));
}

#[test]
fn test_typed_id_from_str_error() {
    assert!(AchievementId::from_str("invalid").is_err());
    assert!(AchievementId::from_str("").is_err());
}

#[test]
fn test_typed_id_serializes_transparently() {
    let json = serde_json::to_string(&UserId::new(5)).unwrap();
    assert_eq!(json, "5");
    let back: UserId = serde_json::from_str(&json).unwrap();
    assert_eq!(back, UserId::new(5));
}

#[test]
fn test_typed_id_ordering_follows_raw_key() {
    let mut ids = vec![CouponId::new(4), CouponId::new(1), CouponId::new(3)];
    ids.sort();
    assert_eq!(ids, vec![CouponId::new(1), CouponId::new(3), CouponId::new(4)]);
}
