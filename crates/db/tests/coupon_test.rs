//! Integration tests for the coupon repository.

mod common;

use std::sync::Arc;

use chrono::NaiveDate;
use punchcard_core::coupon::{CouponError, CouponService, CouponStore, CreateCouponInput, NewCoupon};
use punchcard_core::level::LevelCurve;
use punchcard_core::points::PointsStore;
use punchcard_core::validity::{DateWindow, Validity};
use punchcard_db::{CouponRepository, PointsRepository};
use punchcard_shared::types::{CouponId, RestaurantId};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn new_coupon(restaurant_id: RestaurantId, name: &str, validity: Validity) -> NewCoupon {
    NewCoupon {
        restaurant_id,
        name: name.to_string(),
        description: "2 off".to_string(),
        points: 20,
        level: 1,
        validity,
    }
}

#[tokio::test]
async fn test_coupon_validity_roundtrip() {
    let db = common::setup().await;
    let rid = common::restaurant(&db, "Noodle Bar").await;
    let repo = CouponRepository::new(db);

    let window = Validity::Window(DateWindow::new(date(2020, 5, 1), date(2020, 6, 30)).unwrap());
    let dated = repo.create(new_coupon(rid, "dated", window)).await.unwrap();
    let open = repo
        .create(new_coupon(rid, "open", Validity::Indefinite))
        .await
        .unwrap();

    let found = repo.find_by_id(dated.id).await.unwrap().unwrap();
    assert_eq!(found, dated);
    assert_eq!(found.validity, window);
    assert!(!found.deleted);

    let found = repo.find_by_id(open.id).await.unwrap().unwrap();
    assert_eq!(found.validity, Validity::Indefinite);
}

#[tokio::test]
async fn test_list_and_soft_delete() {
    let db = common::setup().await;
    let rid = common::restaurant(&db, "Noodle Bar").await;
    let other = common::restaurant(&db, "Taco Stand").await;
    let repo = CouponRepository::new(db);

    let first = repo
        .create(new_coupon(rid, "first", Validity::Indefinite))
        .await
        .unwrap();
    let second = repo
        .create(new_coupon(rid, "second", Validity::Indefinite))
        .await
        .unwrap();
    repo.create(new_coupon(other, "elsewhere", Validity::Indefinite))
        .await
        .unwrap();

    assert!(repo.mark_deleted(first.id).await.unwrap());
    assert!(repo.mark_deleted(first.id).await.unwrap());
    assert!(!repo.mark_deleted(CouponId::new(999)).await.unwrap());

    let listed = repo.list_by_restaurant(rid).await.unwrap();
    let names: Vec<_> = listed.iter().map(|c| (c.id, c.deleted)).collect();
    assert_eq!(names, vec![(first.id, true), (second.id, false)]);
}

#[tokio::test]
async fn test_find_with_restaurant() {
    let db = common::setup().await;
    let rid = common::restaurant(&db, "Noodle Bar").await;
    let repo = CouponRepository::new(db);
    let coupon = repo
        .create(new_coupon(rid, "open", Validity::Indefinite))
        .await
        .unwrap();

    let (found, owner) = repo.find_with_restaurant(coupon.id).await.unwrap().unwrap();
    assert_eq!(found.id, coupon.id);
    assert_eq!(owner.map(|r| r.name), Some("Noodle Bar".to_string()));

    assert!(
        repo.find_with_restaurant(CouponId::new(999))
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn test_redeem_through_service() {
    let db = common::setup().await;
    let rid = common::restaurant(&db, "Noodle Bar").await;
    let user = common::customer(&db, "ada@example.com").await;
    let points = Arc::new(PointsRepository::new(db.clone()));
    let service = CouponService::new(
        Arc::new(CouponRepository::new(db)),
        points.clone(),
        LevelCurve::default(),
    );

    let coupon = service
        .create_coupon(CreateCouponInput {
            restaurant_id: rid,
            name: "Free drink".to_string(),
            points: 30,
            description: "Any size".to_string(),
            level: 1,
            begin: None,
            expiration: None,
            indefinite: true,
        })
        .await
        .unwrap();

    // Level 1 needs 100 experience.
    points.credit(user, rid, 40, 99).await.unwrap();
    assert!(matches!(
        service.redeem(user, coupon.id).await,
        Err(CouponError::LevelTooLow { required: 1, actual: 0 })
    ));

    points.credit(user, rid, 0, 1).await.unwrap();
    let balance = service.redeem(user, coupon.id).await.unwrap();
    assert_eq!((balance.points, balance.experience), (10, 100));

    assert!(matches!(
        service.redeem(user, coupon.id).await,
        Err(CouponError::InsufficientPoints { required: 30, available: 10 })
    ));

    let restaurant = service.restaurant_of(coupon.id).await.unwrap();
    assert_eq!(restaurant.id, rid);
}
