//! Achievement domain types.

use punchcard_shared::types::{AchievementId, RestaurantId, UserId};
use serde::{Deserialize, Serialize};

use super::requirement::Requirement;

/// An achievement offered by a restaurant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Achievement {
    /// Achievement ID.
    pub id: AchievementId,
    /// Owning restaurant.
    pub restaurant_id: RestaurantId,
    /// Achievement name.
    pub name: String,
    /// Experience awarded on completion.
    pub experience: i32,
    /// Points awarded on completion.
    pub points: i32,
    /// What must be done, and when.
    pub requirement: Requirement,
}

impl Achievement {
    /// Progress total needed to complete.
    #[must_use]
    pub const fn target(&self) -> i32 {
        self.requirement.target()
    }

    /// What completing this achievement pays out.
    #[must_use]
    pub const fn reward(&self) -> Reward {
        Reward {
            restaurant_id: self.restaurant_id,
            points: self.points,
            experience: self.experience,
        }
    }
}

/// Achievement form as submitted by an owner.
#[derive(Debug, Clone)]
pub struct CreateAchievementInput {
    /// Owning restaurant.
    pub restaurant_id: RestaurantId,
    /// Achievement name.
    pub name: String,
    /// Experience awarded on completion.
    pub experience: i32,
    /// Points awarded on completion.
    pub points: i32,
    /// What must be done, and when.
    pub requirement: Requirement,
}

/// Achievement form carrying a legacy-encoded requirement.
#[derive(Debug, Clone)]
pub struct LegacyAchievementInput {
    /// Owning restaurant.
    pub restaurant_id: RestaurantId,
    /// Achievement name.
    pub name: String,
    /// Experience awarded on completion.
    pub experience: i32,
    /// Points awarded on completion.
    pub points: i32,
    /// Legacy goal type code.
    pub type_code: i32,
    /// `item;amount;indefinite;begin;end`.
    pub value: String,
}

/// A user's progress toward one achievement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    /// The user.
    pub user_id: UserId,
    /// The achievement.
    pub achievement_id: AchievementId,
    /// Counted actions so far.
    pub progress: i32,
    /// Counted actions needed.
    pub total: i32,
}

impl Progress {
    /// Returns true once the target is reached.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.progress >= self.total
    }
}

/// An achievement the user has not started, shown with zero progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AchievementWithProgress {
    /// The achievement.
    #[serde(flatten)]
    pub achievement: Achievement,
    /// Always 0 for a not-started achievement.
    pub progress: i32,
    /// Progress total needed.
    pub total: i32,
}

/// What a completion pays out, and where.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reward {
    /// Restaurant whose balance is credited.
    pub restaurant_id: RestaurantId,
    /// Points credited.
    pub points: i32,
    /// Experience credited.
    pub experience: i32,
}

/// Result of counting one action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ProgressOutcome {
    /// Progress advanced but the target is not reached.
    Advanced(Progress),
    /// The target was reached; the reward was credited and the row removed.
    Completed {
        /// The user.
        user_id: UserId,
        /// The completed achievement.
        achievement_id: AchievementId,
        /// What was credited.
        reward: Reward,
    },
}
