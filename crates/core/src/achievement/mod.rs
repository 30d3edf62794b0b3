//! Achievement definitions and per-user progress.
//!
//! Per (user, achievement) the lifecycle is:
//! not started → in progress (`0 < progress < total`) → completed.
//! Completion credits the reward to the user's balance at the restaurant
//! and removes the progress row in one store operation. Progress never
//! goes backwards.

mod error;
mod requirement;
mod service;
mod types;


pub use error::AchievementError;
pub use requirement::{Goal, Requirement, RequirementError};
pub use service::{AchievementService, AchievementStore, ProgressStore};
pub use types::{
    Achievement, AchievementWithProgress, CreateAchievementInput, LegacyAchievementInput,
    Progress, ProgressOutcome, Reward,
};
