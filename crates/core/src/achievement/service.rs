//! Achievement service implementation.

use std::collections::HashSet;
use std::future::Future;
use std::sync::Arc;

use punchcard_shared::{
    ValidationErrors,
    types::{AchievementId, RestaurantId, UserId},
};

use super::error::AchievementError;
use super::requirement::{Goal, Requirement};
use super::types::{
    Achievement, AchievementWithProgress, CreateAchievementInput, LegacyAchievementInput,
    Progress, ProgressOutcome, Reward,
};
use crate::store::StoreError;
use crate::validity::{WindowStatus, today};

/// Store trait for achievement definitions.
///
/// This trait is implemented by the db crate to provide actual database operations.
pub trait AchievementStore: Send + Sync {
    /// Insert an achievement.
    fn create(
        &self,
        input: CreateAchievementInput,
    ) -> impl Future<Output = Result<Achievement, StoreError>> + Send;

    /// Find achievement by ID.
    fn find_by_id(
        &self,
        id: AchievementId,
    ) -> impl Future<Output = Result<Option<Achievement>, StoreError>> + Send;

    /// All achievements of a restaurant ordered by ID.
    fn list_by_restaurant(
        &self,
        restaurant_id: RestaurantId,
    ) -> impl Future<Output = Result<Vec<Achievement>, StoreError>> + Send;

    /// Delete an achievement and every progress row for it.
    ///
    /// Returns false if the achievement does not exist.
    fn delete(&self, id: AchievementId) -> impl Future<Output = Result<bool, StoreError>> + Send;
}

/// Store trait for progress rows.
///
/// `increment` and `complete` are guarded so that a row is completed at
/// most once, however many callers race on it.
pub trait ProgressStore: Send + Sync {
    /// All progress rows of a user ordered by achievement.
    fn list_for_user(
        &self,
        user_id: UserId,
    ) -> impl Future<Output = Result<Vec<Progress>, StoreError>> + Send;

    /// Find the row for an (achievement, user) pair.
    fn find(
        &self,
        achievement_id: AchievementId,
        user_id: UserId,
    ) -> impl Future<Output = Result<Option<Progress>, StoreError>> + Send;

    /// Insert a row with zero progress. An existing row is a `StoreError::Conflict`.
    fn create(
        &self,
        achievement_id: AchievementId,
        user_id: UserId,
        total: i32,
    ) -> impl Future<Output = Result<Progress, StoreError>> + Send;

    /// Add one to `progress` if it is still below `total`.
    ///
    /// Returns the updated row, or `None` if the row is missing or already full.
    fn increment(
        &self,
        achievement_id: AchievementId,
        user_id: UserId,
    ) -> impl Future<Output = Result<Option<Progress>, StoreError>> + Send;

    /// Delete the row and credit `reward` to the user's balance, atomically.
    ///
    /// Only a stored row with `progress == total` is consumed. Returns false,
    /// crediting nothing, if the row is gone or not full.
    fn complete(
        &self,
        progress: &Progress,
        reward: &Reward,
    ) -> impl Future<Output = Result<bool, StoreError>> + Send;
}

/// Validates an achievement form, collecting every failed check.
fn validate(input: &CreateAchievementInput) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();

    errors.check(
        input.name.is_empty(),
        "Invalid achievement name, please give your achievement a name.",
    );
    errors.check(input.experience < 0, "Invalid amount for experience.");
    errors.check(input.points < 0, "Invalid amount for points.");
    errors.check(
        input.requirement.target() < 1,
        "Invalid requirement amount, please give a positive value.",
    );
    if let Goal::PurchaseItem { item, .. } = &input.requirement.goal {
        errors.check(item.is_empty(), "Missing item for the achievement requirement.");
    }

    errors.into_result()
}

/// Achievement definitions and progress tracking.
pub struct AchievementService<A: AchievementStore, G: ProgressStore> {
    achievements: Arc<A>,
    progress: Arc<G>,
}

impl<A: AchievementStore, G: ProgressStore> AchievementService<A, G> {
    /// Create a new achievement service.
    #[must_use]
    pub fn new(achievements: Arc<A>, progress: Arc<G>) -> Self {
        Self {
            achievements,
            progress,
        }
    }

    /// Validate and insert an achievement.
    ///
    /// # Errors
    ///
    /// Returns `AchievementError::Validation` with every failed check.
    pub async fn create_achievement(
        &self,
        input: CreateAchievementInput,
    ) -> Result<Achievement, AchievementError> {
        validate(&input).map_err(AchievementError::Validation)?;
        let achievement = self.achievements.create(input).await?;
        Ok(achievement)
    }

    /// Decode a legacy requirement, then validate and insert.
    ///
    /// A malformed requirement is reported next to the other form errors.
    ///
    /// # Errors
    ///
    /// Returns `AchievementError::Validation` with every failed check.
    pub async fn create_achievement_from_legacy(
        &self,
        input: LegacyAchievementInput,
    ) -> Result<Achievement, AchievementError> {
        match Requirement::parse_legacy(input.type_code, &input.value) {
            Ok(requirement) => {
                self.create_achievement(CreateAchievementInput {
                    restaurant_id: input.restaurant_id,
                    name: input.name,
                    experience: input.experience,
                    points: input.points,
                    requirement,
                })
                .await
            }
            Err(parse_error) => {
                // Run the remaining checks against a placeholder goal.
                let placeholder = CreateAchievementInput {
                    restaurant_id: input.restaurant_id,
                    name: input.name,
                    experience: input.experience,
                    points: input.points,
                    requirement: Requirement {
                        goal: Goal::Visit { times: 1 },
                        validity: crate::validity::Validity::Indefinite,
                    },
                };
                let mut errors = validate(&placeholder).err().unwrap_or_default();
                errors.push(parse_error.to_string());
                Err(AchievementError::Validation(errors))
            }
        }
    }

    /// Delete an achievement and all progress toward it.
    ///
    /// # Errors
    ///
    /// Returns `AchievementError::NotFound` if the achievement does not exist.
    pub async fn delete_achievement(&self, id: AchievementId) -> Result<(), AchievementError> {
        if self.achievements.delete(id).await? {
            Ok(())
        } else {
            Err(AchievementError::NotFound(id))
        }
    }

    /// Find an achievement or fail with `NotFound`.
    ///
    /// # Errors
    ///
    /// Returns `AchievementError::NotFound` if the achievement does not exist.
    pub async fn get(&self, id: AchievementId) -> Result<Achievement, AchievementError> {
        self.achievements
            .find_by_id(id)
            .await?
            .ok_or(AchievementError::NotFound(id))
    }

    /// Every achievement of a restaurant.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    pub async fn list_for_restaurant(
        &self,
        restaurant_id: RestaurantId,
    ) -> Result<Vec<Achievement>, AchievementError> {
        Ok(self.achievements.list_by_restaurant(restaurant_id).await?)
    }

    /// Achievements of a restaurant whose window has not ended.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    pub async fn list_active_achievements(
        &self,
        restaurant_id: RestaurantId,
    ) -> Result<Vec<Achievement>, AchievementError> {
        let today = today();
        let mut achievements = self.list_for_restaurant(restaurant_id).await?;
        achievements.retain(|a| !a.requirement.validity.has_ended_on(today));
        Ok(achievements)
    }

    /// All progress rows of a user.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    pub async fn get_progress_for_user(
        &self,
        user_id: UserId,
    ) -> Result<Vec<Progress>, AchievementError> {
        Ok(self.progress.list_for_user(user_id).await?)
    }

    /// The achievements among `achievements` the user has not started,
    /// each with zero progress.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    pub async fn achievements_without_progress(
        &self,
        achievements: Vec<Achievement>,
        user_id: UserId,
    ) -> Result<Vec<AchievementWithProgress>, AchievementError> {
        let started: HashSet<AchievementId> = self
            .get_progress_for_user(user_id)
            .await?
            .into_iter()
            .map(|p| p.achievement_id)
            .collect();

        Ok(achievements
            .into_iter()
            .filter(|a| !started.contains(&a.id))
            .map(|achievement| AchievementWithProgress {
                total: achievement.target(),
                progress: 0,
                achievement,
            })
            .collect())
    }

    /// The user's progress row for an achievement.
    ///
    /// # Errors
    ///
    /// Returns `AchievementError::ProgressNotFound` if there is none.
    pub async fn find_progress(
        &self,
        achievement_id: AchievementId,
        user_id: UserId,
    ) -> Result<Progress, AchievementError> {
        self.progress
            .find(achievement_id, user_id)
            .await?
            .ok_or(AchievementError::ProgressNotFound {
                achievement_id,
                user_id,
            })
    }

    /// Where a completion of the achievement pays out, and how much.
    ///
    /// # Errors
    ///
    /// Returns `AchievementError::NotFound` if the achievement does not exist.
    pub async fn reward_lookup(&self, id: AchievementId) -> Result<Reward, AchievementError> {
        self.get(id).await.map(|a| a.reward())
    }

    /// Count one action against an existing progress row.
    ///
    /// Reaching the total completes the achievement.
    ///
    /// # Errors
    ///
    /// Returns `ProgressNotFound` when the row is gone, or `AlreadyCompleted`
    /// when a concurrent caller completed it first.
    pub async fn increment_progress(
        &self,
        progress: &Progress,
    ) -> Result<ProgressOutcome, AchievementError> {
        let (achievement_id, user_id) = (progress.achievement_id, progress.user_id);

        let row = match self.progress.increment(achievement_id, user_id).await? {
            Some(row) => row,
            // Either gone, or full and not yet consumed.
            None => match self.progress.find(achievement_id, user_id).await? {
                Some(row) if row.is_complete() => row,
                _ => {
                    return Err(AchievementError::ProgressNotFound {
                        achievement_id,
                        user_id,
                    });
                }
            },
        };

        if !row.is_complete() {
            return Ok(ProgressOutcome::Advanced(row));
        }

        let reward = self.complete(&row).await?;
        Ok(ProgressOutcome::Completed {
            user_id,
            achievement_id,
            reward,
        })
    }

    /// Credit the reward for a full progress row and remove the row.
    ///
    /// # Errors
    ///
    /// Returns `Unfinished` for a row below its total, `NotFound` if the
    /// achievement is gone, or `AlreadyCompleted` if the row was consumed by
    /// another caller.
    pub async fn complete(&self, progress: &Progress) -> Result<Reward, AchievementError> {
        if !progress.is_complete() {
            return Err(AchievementError::Unfinished {
                achievement_id: progress.achievement_id,
                user_id: progress.user_id,
            });
        }

        let reward = self.reward_lookup(progress.achievement_id).await?;

        if self.progress.complete(progress, &reward).await? {
            Ok(reward)
        } else {
            Err(AchievementError::AlreadyCompleted {
                achievement_id: progress.achievement_id,
                user_id: progress.user_id,
            })
        }
    }

    /// Record one qualifying action by a user, starting progress if needed.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown achievement and `Inactive` when the
    /// achievement is outside its window today.
    pub async fn record_progress(
        &self,
        user_id: UserId,
        achievement_id: AchievementId,
    ) -> Result<ProgressOutcome, AchievementError> {
        let achievement = self.get(achievement_id).await?;
        if achievement.requirement.status_on(today()) != WindowStatus::Active {
            return Err(AchievementError::Inactive(achievement_id));
        }

        let row = match self.progress.find(achievement_id, user_id).await? {
            Some(row) => row,
            None => match self
                .progress
                .create(achievement_id, user_id, achievement.target())
                .await
            {
                Ok(row) => row,
                Err(StoreError::Conflict(_)) => self.find_progress(achievement_id, user_id).await?,
                Err(e) => return Err(e.into()),
            },
        };

        self.increment_progress(&row).await
    }
}
