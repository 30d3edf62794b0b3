//! Coupon service implementation.

use std::future::Future;
use std::sync::Arc;

use chrono::NaiveDate;
use punchcard_shared::{
    ValidationErrors,
    types::{CouponId, RestaurantId, UserId},
};

use super::error::CouponError;
use super::types::{Coupon, CouponDetails, CouponStatus, CreateCouponInput, NewCoupon};
use crate::level::LevelCurve;
use crate::points::{PointsBalance, PointsStore};
use crate::restaurant::Restaurant;
use crate::store::StoreError;
use crate::validity::{DateWindow, Validity, today};

/// Store trait for coupons.
///
/// This trait is implemented by the db crate to provide actual database operations.
pub trait CouponStore: Send + Sync {
    /// Insert a coupon with the deleted flag cleared.
    fn create(&self, input: NewCoupon) -> impl Future<Output = Result<Coupon, StoreError>> + Send;

    /// Find coupon by ID, deleted or not.
    fn find_by_id(
        &self,
        id: CouponId,
    ) -> impl Future<Output = Result<Option<Coupon>, StoreError>> + Send;

    /// Find a coupon together with its owning restaurant.
    fn find_with_restaurant(
        &self,
        id: CouponId,
    ) -> impl Future<Output = Result<Option<(Coupon, Option<Restaurant>)>, StoreError>> + Send;

    /// All coupons of a restaurant ordered by ID, deleted ones included.
    fn list_by_restaurant(
        &self,
        restaurant_id: RestaurantId,
    ) -> impl Future<Output = Result<Vec<Coupon>, StoreError>> + Send;

    /// Set the deleted flag. Returns false if the coupon does not exist.
    fn mark_deleted(&self, id: CouponId) -> impl Future<Output = Result<bool, StoreError>> + Send;
}

/// Drops deleted coupons and coupons whose window ended before `date`.
///
/// Coupons that have not opened yet are kept. Order is preserved.
#[must_use]
pub fn filter_valid_on(coupons: Vec<Coupon>, date: NaiveDate) -> Vec<Coupon> {
    coupons.into_iter().filter(|c| c.is_valid_on(date)).collect()
}

/// Validates a coupon form, collecting every failed check.
fn validate(input: CreateCouponInput) -> Result<NewCoupon, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    errors.check(input.points < 0, "Invalid amount for points.");
    errors.check(
        input.name.is_empty(),
        "Invalid coupon name, please give your coupon a name.",
    );
    errors.check(
        input.level < 0,
        "Invalid level requirement, please give a non-negative value.",
    );

    let validity = if input.indefinite {
        Some(Validity::Indefinite)
    } else {
        match (input.begin, input.expiration) {
            (Some(begin), Some(expiration)) => {
                let window = DateWindow::new(begin, expiration).map(Validity::Window);
                errors.check(
                    window.is_none(),
                    "Invalid date interval, begin date must be before expiration date.",
                );
                window
            }
            _ => {
                errors.push("Missing start or expiration date.");
                None
            }
        }
    };

    errors.into_result()?;
    let validity = validity.unwrap_or(Validity::Indefinite);

    Ok(NewCoupon {
        restaurant_id: input.restaurant_id,
        name: input.name,
        description: input.description,
        points: input.points,
        level: input.level,
        validity,
    })
}

/// Coupon management and redemption.
pub struct CouponService<C: CouponStore, P: PointsStore> {
    coupons: Arc<C>,
    points: Arc<P>,
    levels: LevelCurve,
}

impl<C: CouponStore, P: PointsStore> CouponService<C, P> {
    /// Create a new coupon service.
    #[must_use]
    pub fn new(coupons: Arc<C>, points: Arc<P>, levels: LevelCurve) -> Self {
        Self {
            coupons,
            points,
            levels,
        }
    }

    /// Validate and insert a coupon.
    ///
    /// # Errors
    ///
    /// Returns `CouponError::Validation` with every failed check, or a store error.
    pub async fn create_coupon(&self, input: CreateCouponInput) -> Result<Coupon, CouponError> {
        let new_coupon = validate(input).map_err(CouponError::Validation)?;
        Ok(self.coupons.create(new_coupon).await?)
    }

    /// Status of a coupon today.
    #[must_use]
    pub fn coupon_status(&self, coupon: &Coupon) -> CouponStatus {
        coupon.status_on(today())
    }

    /// Drops deleted and expired coupons, judged against today.
    #[must_use]
    pub fn filter_valid(&self, coupons: Vec<Coupon>) -> Vec<Coupon> {
        filter_valid_on(coupons, today())
    }

    /// Soft-delete a coupon. Deleting an already deleted coupon succeeds.
    ///
    /// # Errors
    ///
    /// Returns `CouponError::NotFound` if the coupon does not exist.
    pub async fn soft_delete(&self, id: CouponId) -> Result<(), CouponError> {
        if self.coupons.mark_deleted(id).await? {
            Ok(())
        } else {
            Err(CouponError::NotFound(id))
        }
    }

    /// Every coupon of a restaurant, deleted ones included.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    pub async fn list_for_restaurant(
        &self,
        restaurant_id: RestaurantId,
    ) -> Result<Vec<Coupon>, CouponError> {
        Ok(self.coupons.list_by_restaurant(restaurant_id).await?)
    }

    /// Coupons of a restaurant a customer may still see.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    pub async fn list_valid_for_restaurant(
        &self,
        restaurant_id: RestaurantId,
    ) -> Result<Vec<Coupon>, CouponError> {
        let coupons = self.list_for_restaurant(restaurant_id).await?;
        Ok(self.filter_valid(coupons))
    }

    /// A coupon with its status today.
    ///
    /// # Errors
    ///
    /// Returns `CouponError::NotFound` if the coupon does not exist.
    pub async fn coupon_details(&self, id: CouponId) -> Result<CouponDetails, CouponError> {
        let coupon = self.get(id).await?;
        let status = self.coupon_status(&coupon);
        Ok(CouponDetails { coupon, status })
    }

    /// The restaurant that owns a coupon.
    ///
    /// # Errors
    ///
    /// Returns `CouponError::NotFound` for an unknown coupon and
    /// `CouponError::RestaurantNotFound` when its restaurant is gone.
    pub async fn restaurant_of(&self, id: CouponId) -> Result<Restaurant, CouponError> {
        let (coupon, restaurant) = self
            .coupons
            .find_with_restaurant(id)
            .await?
            .ok_or(CouponError::NotFound(id))?;
        restaurant.ok_or(CouponError::RestaurantNotFound(coupon.restaurant_id))
    }

    /// The ID of the restaurant that owns a coupon.
    ///
    /// # Errors
    ///
    /// Returns `CouponError::NotFound` if the coupon does not exist.
    pub async fn restaurant_id_of(&self, id: CouponId) -> Result<RestaurantId, CouponError> {
        self.get(id).await.map(|coupon| coupon.restaurant_id)
    }

    /// Spend points on a coupon.
    ///
    /// The coupon must be live today, the user's level at the restaurant must
    /// reach the coupon level, and the balance must cover the cost. Returns
    /// the balance after the debit.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, `Unavailable`, `LevelTooLow` or `InsufficientPoints`.
    pub async fn redeem(
        &self,
        user_id: UserId,
        coupon_id: CouponId,
    ) -> Result<PointsBalance, CouponError> {
        let coupon = self.get(coupon_id).await?;
        if !coupon.is_redeemable_on(today()) {
            return Err(CouponError::Unavailable(coupon_id));
        }

        let balance = self
            .points
            .find(user_id, coupon.restaurant_id)
            .await?
            .unwrap_or_else(|| PointsBalance::empty(user_id, coupon.restaurant_id));

        let level = balance.level(&self.levels);
        if level < coupon.level {
            return Err(CouponError::LevelTooLow {
                required: coupon.level,
                actual: level,
            });
        }

        if coupon.points == 0 {
            return Ok(balance);
        }
        if balance.points < coupon.points {
            return Err(CouponError::InsufficientPoints {
                required: coupon.points,
                available: balance.points,
            });
        }

        // The store re-checks the balance; a concurrent spend may have won.
        self.points
            .debit(user_id, coupon.restaurant_id, coupon.points)
            .await?
            .ok_or(CouponError::InsufficientPoints {
                required: coupon.points,
                available: balance.points,
            })
    }

    /// Find a coupon or fail with `NotFound`.
    ///
    /// # Errors
    ///
    /// Returns `CouponError::NotFound` if the coupon does not exist.
    pub async fn get(&self, id: CouponId) -> Result<Coupon, CouponError> {
        self.coupons
            .find_by_id(id)
            .await?
            .ok_or(CouponError::NotFound(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryStore;
    use crate::restaurant::{NewRestaurant, RestaurantStore};
    use chrono::Duration;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    const BEGIN: (i32, u32, u32) = (2020, 5, 1);
    const END: (i32, u32, u32) = (2020, 6, 30);

    fn service() -> (CouponService<InMemoryStore, InMemoryStore>, Arc<InMemoryStore>) {
        let store = Arc::new(InMemoryStore::new());
        let service = CouponService::new(store.clone(), store.clone(), LevelCurve::default());
        (service, store)
    }

    fn form(restaurant_id: RestaurantId, name: &str, points: i32) -> CreateCouponInput {
        CreateCouponInput {
            restaurant_id,
            name: name.to_string(),
            points,
            description: format!("{} off", points / 10),
            level: 0,
            begin: Some(date(BEGIN.0, BEGIN.1, BEGIN.2)),
            expiration: Some(date(END.0, END.1, END.2)),
            indefinite: false,
        }
    }

    fn live_form(restaurant_id: RestaurantId, points: i32, level: i32) -> CreateCouponInput {
        CreateCouponInput {
            level,
            indefinite: true,
            begin: None,
            expiration: None,
            ..form(restaurant_id, "live", points)
        }
    }

    async fn restaurant(store: &InMemoryStore) -> RestaurantId {
        RestaurantStore::create(
            store,
            NewRestaurant {
                name: "Noodle Bar".to_string(),
                address: "1 Main St".to_string(),
            },
        )
        .await
        .unwrap()
        .id
    }

    #[tokio::test]
    async fn test_create_coupon_with_window() {
        let (service, _) = service();
        let coupon = service
            .create_coupon(form(RestaurantId::new(12), "test1", 10))
            .await
            .unwrap();

        assert_eq!(coupon.restaurant_id, RestaurantId::new(12));
        assert_eq!(coupon.validity.begin(), Some(date(2020, 5, 1)));
        assert_eq!(coupon.validity.end(), Some(date(2020, 6, 30)));
        assert!(!coupon.deleted);
    }

    #[tokio::test]
    async fn test_create_indefinite_ignores_dates() {
        let (service, _) = service();
        let input = CreateCouponInput {
            indefinite: true,
            begin: Some(date(2020, 6, 30)),
            expiration: Some(date(2020, 5, 1)),
            ..form(RestaurantId::new(1), "forever", 5)
        };

        let coupon = service.create_coupon(input).await.unwrap();
        assert!(coupon.validity.is_indefinite());
    }

    #[tokio::test]
    async fn test_create_collects_every_error() {
        let (service, store) = service();
        let input = CreateCouponInput {
            name: String::new(),
            points: -1,
            level: -3,
            begin: Some(date(2020, 6, 30)),
            expiration: Some(date(2020, 5, 1)),
            ..form(RestaurantId::new(1), "", 0)
        };

        let Err(CouponError::Validation(errors)) = service.create_coupon(input).await else {
            panic!("expected validation errors");
        };
        assert_eq!(
            errors.messages(),
            [
                "Invalid amount for points.",
                "Invalid coupon name, please give your coupon a name.",
                "Invalid level requirement, please give a non-negative value.",
                "Invalid date interval, begin date must be before expiration date.",
            ]
        );
        assert_eq!(store.coupon_count(), 0);
    }

    #[tokio::test]
    async fn test_create_requires_both_dates() {
        let (service, _) = service();
        let input = CreateCouponInput {
            expiration: None,
            ..form(RestaurantId::new(1), "half", 5)
        };

        let Err(CouponError::Validation(errors)) = service.create_coupon(input).await else {
            panic!("expected validation errors");
        };
        assert_eq!(errors.messages(), ["Missing start or expiration date."]);
    }

    #[tokio::test]
    async fn test_delete_one_leaves_other_unchanged() {
        let (service, _) = service();
        let c1 = service
            .create_coupon(form(RestaurantId::new(12), "test1", 10))
            .await
            .unwrap();
        let c2 = service
            .create_coupon(form(RestaurantId::new(12), "test2", 20))
            .await
            .unwrap();

        service.soft_delete(c1.id).await.unwrap();

        let after1 = service.get(c1.id).await.unwrap();
        assert_eq!(after1, Coupon { deleted: true, ..c1 });
        let after2 = service.get(c2.id).await.unwrap();
        assert_eq!(after2, c2);
        assert!(!after2.deleted);
    }

    #[tokio::test]
    async fn test_delete_many_in_any_order() {
        for order in [[0usize, 3], [3, 0]] {
            let (service, _) = service();
            let mut coupons = Vec::new();
            for (rid, name, points) in [(12, "test1", 10), (14, "test2", 20), (2, "test3", 100), (12, "test4", 250)] {
                coupons.push(
                    service
                        .create_coupon(form(RestaurantId::new(rid), name, points))
                        .await
                        .unwrap(),
                );
            }

            for i in order {
                service.soft_delete(coupons[i].id).await.unwrap();
            }

            for (i, original) in coupons.into_iter().enumerate() {
                let stored = service.get(original.id).await.unwrap();
                let expected_deleted = i == 0 || i == 3;
                assert_eq!(stored, Coupon { deleted: expected_deleted, ..original });
            }
        }
    }

    #[tokio::test]
    async fn test_soft_delete_is_idempotent_and_reports_missing() {
        let (service, _) = service();
        let coupon = service
            .create_coupon(form(RestaurantId::new(1), "test1", 10))
            .await
            .unwrap();

        service.soft_delete(coupon.id).await.unwrap();
        service.soft_delete(coupon.id).await.unwrap();
        assert!(service.get(coupon.id).await.unwrap().deleted);

        let missing = CouponId::new(999);
        assert!(matches!(
            service.soft_delete(missing).await,
            Err(CouponError::NotFound(id)) if id == missing
        ));
    }

    #[tokio::test]
    async fn test_restaurant_lookups() {
        let (service, store) = service();
        let rid = restaurant(&store).await;
        let coupon = service.create_coupon(form(rid, "test1", 10)).await.unwrap();
        let orphan = service
            .create_coupon(form(RestaurantId::new(77), "orphan", 10))
            .await
            .unwrap();

        let found = service.restaurant_of(coupon.id).await.unwrap();
        assert_eq!(found.name, "Noodle Bar");
        assert_eq!(found.address, "1 Main St");
        assert_eq!(service.restaurant_id_of(coupon.id).await.unwrap(), rid);

        assert!(matches!(
            service.restaurant_of(orphan.id).await,
            Err(CouponError::RestaurantNotFound(id)) if id == RestaurantId::new(77)
        ));
        assert!(matches!(
            service.restaurant_of(CouponId::new(404)).await,
            Err(CouponError::NotFound(_))
        ));
        assert!(matches!(
            service.restaurant_id_of(CouponId::new(404)).await,
            Err(CouponError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_details_and_listing() {
        let (service, _) = service();
        let rid = RestaurantId::new(3);
        let expired = service.create_coupon(form(rid, "old", 10)).await.unwrap();
        let live = service.create_coupon(live_form(rid, 5, 0)).await.unwrap();
        let gone = service.create_coupon(live_form(rid, 7, 0)).await.unwrap();
        service.soft_delete(gone.id).await.unwrap();

        let details = service.coupon_details(expired.id).await.unwrap();
        assert_eq!(details.status, CouponStatus::After);
        assert_eq!(
            service.coupon_details(live.id).await.unwrap().status,
            CouponStatus::Active
        );

        assert_eq!(service.list_for_restaurant(rid).await.unwrap().len(), 3);
        let valid = service.list_valid_for_restaurant(rid).await.unwrap();
        assert_eq!(valid, vec![live]);
    }

    #[test]
    fn test_filter_valid_keeps_upcoming_and_indefinite() {
        let today = date(2020, 4, 15);
        let window = |b, e| Validity::Window(DateWindow::new(b, e).unwrap());
        let coupon = |id, validity, deleted| Coupon {
            id: CouponId::new(id),
            restaurant_id: RestaurantId::new(1),
            name: format!("c{id}"),
            description: String::new(),
            points: 1,
            level: 0,
            validity,
            deleted,
        };

        let coupons = vec![
            coupon(1, window(date(2020, 5, 1), date(2020, 6, 30)), false),
            coupon(2, window(date(2020, 1, 1), date(2020, 4, 14)), false),
            coupon(3, Validity::Indefinite, false),
            coupon(4, Validity::Indefinite, true),
            coupon(5, window(date(2020, 4, 1), date(2020, 4, 15)), false),
        ];

        let ids: Vec<i32> = filter_valid_on(coupons, today)
            .into_iter()
            .map(|c| c.id.into_inner())
            .collect();
        assert_eq!(ids, vec![1, 3, 5]);
    }

    #[tokio::test]
    async fn test_redeem_debits_balance() {
        let (service, store) = service();
        let rid = RestaurantId::new(1);
        let user = UserId::new(1);
        let coupon = service.create_coupon(live_form(rid, 30, 1)).await.unwrap();
        store.credit(user, rid, 50, 100).await.unwrap();

        let balance = service.redeem(user, coupon.id).await.unwrap();
        assert_eq!(balance.points, 20);
        assert_eq!(balance.experience, 100);
    }

    #[tokio::test]
    async fn test_redeem_failures() {
        let (service, store) = service();
        let rid = RestaurantId::new(1);
        let user = UserId::new(1);
        store.credit(user, rid, 10, 0).await.unwrap();

        let pricey = service.create_coupon(live_form(rid, 30, 0)).await.unwrap();
        assert!(matches!(
            service.redeem(user, pricey.id).await,
            Err(CouponError::InsufficientPoints { required: 30, available: 10 })
        ));

        let gated = service.create_coupon(live_form(rid, 5, 2)).await.unwrap();
        assert!(matches!(
            service.redeem(user, gated.id).await,
            Err(CouponError::LevelTooLow { required: 2, actual: 0 })
        ));

        let expired = service.create_coupon(form(rid, "old", 1)).await.unwrap();
        assert!(matches!(
            service.redeem(user, expired.id).await,
            Err(CouponError::Unavailable(_))
        ));

        let upcoming = service
            .create_coupon(CreateCouponInput {
                begin: Some(today() + Duration::days(10)),
                expiration: Some(today() + Duration::days(20)),
                ..form(rid, "soon", 1)
            })
            .await
            .unwrap();
        assert!(matches!(
            service.redeem(user, upcoming.id).await,
            Err(CouponError::Unavailable(_))
        ));

        let deleted = service.create_coupon(live_form(rid, 1, 0)).await.unwrap();
        service.soft_delete(deleted.id).await.unwrap();
        assert!(matches!(
            service.redeem(user, deleted.id).await,
            Err(CouponError::Unavailable(_))
        ));

        assert!(matches!(
            service.redeem(user, CouponId::new(404)).await,
            Err(CouponError::NotFound(_))
        ));
        assert_eq!(store.find(user, rid).await.unwrap().unwrap().points, 10);
    }

    #[tokio::test]
    async fn test_free_coupon_needs_no_balance() {
        let (service, _) = service();
        let rid = RestaurantId::new(1);
        let coupon = service.create_coupon(live_form(rid, 0, 0)).await.unwrap();

        let balance = service.redeem(UserId::new(8), coupon.id).await.unwrap();
        assert_eq!(balance, PointsBalance::empty(UserId::new(8), rid));
    }
}
