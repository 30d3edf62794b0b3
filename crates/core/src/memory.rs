//! In-memory implementation of every store trait.
//!
//! All tables sit behind one mutex, so each trait method is atomic with
//! respect to the others. Used by unit tests and for running the services
//! without a database.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use punchcard_shared::types::{AchievementId, CouponId, RestaurantId, UserId};

use crate::achievement::{
    Achievement, AchievementStore, CreateAchievementInput, Progress, ProgressStore, Reward,
};
use crate::coupon::{Coupon, CouponStore, NewCoupon};
use crate::points::{PointsBalance, PointsStore};
use crate::restaurant::{NewRestaurant, Restaurant, RestaurantStore};
use crate::store::StoreError;
use crate::user::{AccountType, NewUser, User, UserStore};

#[derive(Debug, Default)]
struct State {
    next_id: i32,
    users: BTreeMap<UserId, User>,
    restaurants: BTreeMap<RestaurantId, Restaurant>,
    coupons: BTreeMap<CouponId, Coupon>,
    achievements: BTreeMap<AchievementId, Achievement>,
    progress: BTreeMap<(UserId, AchievementId), Progress>,
    points: BTreeMap<(UserId, RestaurantId), PointsBalance>,
}

impl State {
    /// IDs are shared across tables, like a single sequence.
    fn allocate(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }

    fn credit(
        &mut self,
        user_id: UserId,
        restaurant_id: RestaurantId,
        points: i32,
        experience: i32,
    ) -> Result<PointsBalance, StoreError> {
        let current = self
            .points
            .get(&(user_id, restaurant_id))
            .copied()
            .unwrap_or_else(|| PointsBalance::empty(user_id, restaurant_id));
        let updated = PointsBalance {
            points: current.points.checked_add(points).ok_or_else(overflow)?,
            experience: current
                .experience
                .checked_add(experience)
                .ok_or_else(overflow)?,
            ..current
        };
        self.points.insert((user_id, restaurant_id), updated);
        Ok(updated)
    }
}

fn overflow() -> StoreError {
    StoreError::backend("points balance out of range")
}

/// Store backed by ordered maps.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: Mutex<State>,
}

impl InMemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored accounts.
    pub fn user_count(&self) -> usize {
        self.state.lock().map_or(0, |s| s.users.len())
    }

    /// Number of stored coupons, deleted ones included.
    pub fn coupon_count(&self) -> usize {
        self.state.lock().map_or(0, |s| s.coupons.len())
    }

    fn state(&self) -> Result<MutexGuard<'_, State>, StoreError> {
        self.state
            .lock()
            .map_err(|_| StoreError::backend("in-memory store lock poisoned"))
    }
}

impl UserStore for InMemoryStore {
    async fn create(&self, input: NewUser) -> Result<User, StoreError> {
        let mut state = self.state()?;
        if state.users.values().any(|u| u.email == input.email) {
            return Err(StoreError::Conflict(format!(
                "email {} already registered",
                input.email
            )));
        }

        let user = User {
            id: UserId::new(state.allocate()),
            name: input.name,
            email: input.email,
            password_digest: input.password_digest,
            account_type: input.account_type,
        };
        state.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, StoreError> {
        Ok(self.state()?.users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(self
            .state()?
            .users
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn find_by_credentials(
        &self,
        email: &str,
        password_digest: &str,
    ) -> Result<Option<User>, StoreError> {
        Ok(self
            .state()?
            .users
            .values()
            .find(|u| u.email == email && u.password_digest == password_digest)
            .cloned())
    }

    async fn set_account_type(
        &self,
        id: UserId,
        account_type: AccountType,
    ) -> Result<bool, StoreError> {
        let mut state = self.state()?;
        Ok(state
            .users
            .get_mut(&id)
            .map(|u| u.account_type = account_type)
            .is_some())
    }
}

impl RestaurantStore for InMemoryStore {
    async fn create(&self, input: NewRestaurant) -> Result<Restaurant, StoreError> {
        let mut state = self.state()?;
        let restaurant = Restaurant {
            id: RestaurantId::new(state.allocate()),
            name: input.name,
            address: input.address,
        };
        state.restaurants.insert(restaurant.id, restaurant.clone());
        Ok(restaurant)
    }

    async fn find_by_id(&self, id: RestaurantId) -> Result<Option<Restaurant>, StoreError> {
        Ok(self.state()?.restaurants.get(&id).cloned())
    }
}

impl CouponStore for InMemoryStore {
    async fn create(&self, input: NewCoupon) -> Result<Coupon, StoreError> {
        let mut state = self.state()?;
        let coupon = Coupon {
            id: CouponId::new(state.allocate()),
            restaurant_id: input.restaurant_id,
            name: input.name,
            description: input.description,
            points: input.points,
            level: input.level,
            validity: input.validity,
            deleted: false,
        };
        state.coupons.insert(coupon.id, coupon.clone());
        Ok(coupon)
    }

    async fn find_by_id(&self, id: CouponId) -> Result<Option<Coupon>, StoreError> {
        Ok(self.state()?.coupons.get(&id).cloned())
    }

    async fn find_with_restaurant(
        &self,
        id: CouponId,
    ) -> Result<Option<(Coupon, Option<Restaurant>)>, StoreError> {
        let state = self.state()?;
        Ok(state.coupons.get(&id).map(|coupon| {
            let restaurant = state.restaurants.get(&coupon.restaurant_id).cloned();
            (coupon.clone(), restaurant)
        }))
    }

    async fn list_by_restaurant(
        &self,
        restaurant_id: RestaurantId,
    ) -> Result<Vec<Coupon>, StoreError> {
        Ok(self
            .state()?
            .coupons
            .values()
            .filter(|c| c.restaurant_id == restaurant_id)
            .cloned()
            .collect())
    }

    async fn mark_deleted(&self, id: CouponId) -> Result<bool, StoreError> {
        let mut state = self.state()?;
        Ok(state
            .coupons
            .get_mut(&id)
            .map(|c| c.deleted = true)
            .is_some())
    }
}

impl PointsStore for InMemoryStore {
    async fn find(
        &self,
        user_id: UserId,
        restaurant_id: RestaurantId,
    ) -> Result<Option<PointsBalance>, StoreError> {
        Ok(self.state()?.points.get(&(user_id, restaurant_id)).copied())
    }

    async fn list_for_user(&self, user_id: UserId) -> Result<Vec<PointsBalance>, StoreError> {
        Ok(self
            .state()?
            .points
            .values()
            .filter(|b| b.user_id == user_id)
            .copied()
            .collect())
    }

    async fn credit(
        &self,
        user_id: UserId,
        restaurant_id: RestaurantId,
        points: i32,
        experience: i32,
    ) -> Result<PointsBalance, StoreError> {
        self.state()?
            .credit(user_id, restaurant_id, points, experience)
    }

    async fn debit(
        &self,
        user_id: UserId,
        restaurant_id: RestaurantId,
        points: i32,
    ) -> Result<Option<PointsBalance>, StoreError> {
        let mut state = self.state()?;
        let Some(balance) = state
            .points
            .get_mut(&(user_id, restaurant_id))
            .filter(|b| b.points >= points)
        else {
            return Ok(None);
        };
        balance.points = balance.points.checked_sub(points).ok_or_else(overflow)?;
        Ok(Some(*balance))
    }
}

impl AchievementStore for InMemoryStore {
    async fn create(&self, input: CreateAchievementInput) -> Result<Achievement, StoreError> {
        let mut state = self.state()?;
        let achievement = Achievement {
            id: AchievementId::new(state.allocate()),
            restaurant_id: input.restaurant_id,
            name: input.name,
            experience: input.experience,
            points: input.points,
            requirement: input.requirement,
        };
        state
            .achievements
            .insert(achievement.id, achievement.clone());
        Ok(achievement)
    }

    async fn find_by_id(&self, id: AchievementId) -> Result<Option<Achievement>, StoreError> {
        Ok(self.state()?.achievements.get(&id).cloned())
    }

    async fn list_by_restaurant(
        &self,
        restaurant_id: RestaurantId,
    ) -> Result<Vec<Achievement>, StoreError> {
        Ok(self
            .state()?
            .achievements
            .values()
            .filter(|a| a.restaurant_id == restaurant_id)
            .cloned()
            .collect())
    }

    async fn delete(&self, id: AchievementId) -> Result<bool, StoreError> {
        let mut state = self.state()?;
        if state.achievements.remove(&id).is_none() {
            return Ok(false);
        }
        state.progress.retain(|(_, aid), _| *aid != id);
        Ok(true)
    }
}

impl ProgressStore for InMemoryStore {
    async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Progress>, StoreError> {
        Ok(self
            .state()?
            .progress
            .values()
            .filter(|p| p.user_id == user_id)
            .copied()
            .collect())
    }

    async fn find(
        &self,
        achievement_id: AchievementId,
        user_id: UserId,
    ) -> Result<Option<Progress>, StoreError> {
        Ok(self
            .state()?
            .progress
            .get(&(user_id, achievement_id))
            .copied())
    }

    async fn create(
        &self,
        achievement_id: AchievementId,
        user_id: UserId,
        total: i32,
    ) -> Result<Progress, StoreError> {
        let mut state = self.state()?;
        let key = (user_id, achievement_id);
        if state.progress.contains_key(&key) {
            return Err(StoreError::Conflict(format!(
                "progress for user {user_id} on achievement {achievement_id} exists"
            )));
        }

        let row = Progress {
            user_id,
            achievement_id,
            progress: 0,
            total,
        };
        state.progress.insert(key, row);
        Ok(row)
    }

    async fn increment(
        &self,
        achievement_id: AchievementId,
        user_id: UserId,
    ) -> Result<Option<Progress>, StoreError> {
        let mut state = self.state()?;
        Ok(state
            .progress
            .get_mut(&(user_id, achievement_id))
            .filter(|p| p.progress < p.total)
            .map(|p| {
                p.progress += 1;
                *p
            }))
    }

    async fn complete(&self, progress: &Progress, reward: &Reward) -> Result<bool, StoreError> {
        let mut state = self.state()?;
        let key = (progress.user_id, progress.achievement_id);
        if !state.progress.get(&key).is_some_and(|p| p.progress == p.total) {
            return Ok(false);
        }
        state.credit(
            progress.user_id,
            reward.restaurant_id,
            reward.points,
            reward.experience,
        )?;
        state.progress.remove(&key);
        Ok(true)
    }
}
