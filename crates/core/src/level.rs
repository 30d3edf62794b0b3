//! Experience to level curve.
//!
//! Level `n` is reached at `base * n * (n + 1) / 2` experience. With the
//! default base of 100 that is 100, 300, 600, ... and 505000 for level 100.

use punchcard_shared::config::ProgramConfig;

/// Default experience needed for level 1.
pub const DEFAULT_BASE_EXPERIENCE: i32 = 100;

/// Triangular level curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelCurve {
    base: i64,
}

impl Default for LevelCurve {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_EXPERIENCE)
    }
}

impl From<&ProgramConfig> for LevelCurve {
    fn from(config: &ProgramConfig) -> Self {
        Self::new(config.level_base_experience)
    }
}

impl LevelCurve {
    /// Creates a curve. Non-positive bases are raised to 1.
    #[must_use]
    pub fn new(base_experience: i32) -> Self {
        Self {
            base: i64::from(base_experience.max(1)),
        }
    }

    /// Total experience needed to reach `level`, saturating for huge levels.
    #[must_use]
    pub fn threshold(&self, level: i32) -> i64 {
        let n = i64::from(level.max(0));
        self.base.saturating_mul(n).saturating_mul(n + 1) / 2
    }

    /// Highest level reached with `experience`.
    #[must_use]
    pub fn level_for_experience(&self, experience: i32) -> i32 {
        let experience = i64::from(experience.max(0));
        let mut level = 0;
        while self.threshold(level + 1) <= experience {
            level += 1;
        }
        level
    }

    /// Experience earned past the threshold of `level`.
    #[must_use]
    pub fn experience_since_last_level(&self, level: i32, experience: i32) -> i64 {
        i64::from(experience) - self.threshold(level)
    }

    /// Experience still missing for the next level.
    #[must_use]
    pub fn experience_to_next_level(&self, experience: i32) -> i64 {
        let next = self.level_for_experience(experience) + 1;
        self.threshold(next) - i64::from(experience.max(0))
    }
}
