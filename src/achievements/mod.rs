//! Achievement system.
//!
//! Progress on every achievement is recomputed from cumulative stats after
//! each finished run. Unlocking is one-way: once `unlocked_at` is set it is
//! never cleared, even if the underlying counter later drops (a broken
//! streak does not revoke a streak badge).

pub mod definitions;

pub use definitions::default_achievements;

use crate::recording::types::RunRecord;
use crate::storage::config::UserProfile;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Achievement category, each backed by one cumulative counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AchievementCategory {
    /// Lifetime distance in meters
    Distance,
    /// Current daily streak
    Streak,
    /// Number of claimed territories
    Territory,
    /// Number of finished runs
    Runs,
    /// Best max speed of any run (m/s)
    Speed,
}

impl AchievementCategory {
    /// Storage key for this category.
    pub fn as_str(&self) -> &'static str {
        match self {
            AchievementCategory::Distance => "distance",
            AchievementCategory::Streak => "streak",
            AchievementCategory::Territory => "territory",
            AchievementCategory::Runs => "runs",
            AchievementCategory::Speed => "speed",
        }
    }
}

impl std::str::FromStr for AchievementCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "distance" => Ok(AchievementCategory::Distance),
            "streak" => Ok(AchievementCategory::Streak),
            "territory" => Ok(AchievementCategory::Territory),
            "runs" => Ok(AchievementCategory::Runs),
            "speed" => Ok(AchievementCategory::Speed),
            other => Err(format!("unknown achievement category: {}", other)),
        }
    }
}

impl std::fmt::Display for AchievementCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An achievement and the user's progress on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Achievement {
    /// Stable key, e.g. `dist_10k`
    pub id: String,
    /// Display title
    pub title: String,
    /// Description
    pub description: String,
    /// Icon name
    pub icon: String,
    /// Counter value needed to unlock
    pub requirement: f64,
    /// Latest counter value
    pub current: f64,
    /// Counter this achievement tracks
    pub category: AchievementCategory,
    /// When first unlocked
    pub unlocked_at: Option<DateTime<Utc>>,
}

impl Achievement {
    /// Create a locked achievement with no progress.
    pub fn new(
        id: &str,
        title: &str,
        description: &str,
        icon: &str,
        category: AchievementCategory,
        requirement: f64,
    ) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            description: description.to_string(),
            icon: icon.to_string(),
            requirement,
            current: 0.0,
            category,
            unlocked_at: None,
        }
    }

    /// Whether the achievement has been unlocked.
    pub fn is_unlocked(&self) -> bool {
        self.unlocked_at.is_some()
    }

    /// Set progress to `value`. Returns true if this call unlocked it.
    pub fn update(&mut self, value: f64, now: DateTime<Utc>) -> bool {
        self.current = value;
        if self.unlocked_at.is_none() && self.current >= self.requirement {
            self.unlocked_at = Some(now);
            return true;
        }
        false
    }

    /// Progress percentage (0..100).
    pub fn percentage(&self) -> f32 {
        if self.requirement <= 0.0 {
            return if self.is_unlocked() { 100.0 } else { 0.0 };
        }
        ((self.current / self.requirement) * 100.0).clamp(0.0, 100.0) as f32
    }
}

/// Lifetime counters feeding achievement progress.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CumulativeStats {
    /// Finished runs
    pub total_runs: u32,
    /// Lifetime distance in meters
    pub total_distance_meters: f64,
    /// Current daily streak
    pub current_streak: u32,
    /// Claimed territories
    pub total_territories: usize,
    /// Highest max speed over all runs (m/s)
    pub best_max_speed: f64,
}

impl CumulativeStats {
    /// Gather counters from a profile, its run history and territory count.
    pub fn collect(profile: &UserProfile, runs: &[RunRecord], total_territories: usize) -> Self {
        Self {
            total_runs: profile.total_runs,
            total_distance_meters: profile.total_distance_meters,
            current_streak: profile.current_streak,
            total_territories,
            best_max_speed: runs.iter().map(|r| r.max_speed).fold(0.0, f64::max),
        }
    }

    /// Counter value for a category.
    pub fn counter(&self, category: AchievementCategory) -> f64 {
        match category {
            AchievementCategory::Runs => f64::from(self.total_runs),
            AchievementCategory::Distance => self.total_distance_meters,
            AchievementCategory::Streak => f64::from(self.current_streak),
            AchievementCategory::Territory => self.total_territories as f64,
            AchievementCategory::Speed => self.best_max_speed,
        }
    }
}

/// Result of re-evaluating every achievement.
#[derive(Debug, Clone, PartialEq)]
pub struct AchievementEvaluation {
    /// All achievements with refreshed progress
    pub achievements: Vec<Achievement>,
    /// Ids unlocked by this evaluation
    pub newly_unlocked: Vec<String>,
}

impl AchievementEvaluation {
    /// Newly unlocked achievements in catalogue order.
    pub fn unlocked(&self) -> impl Iterator<Item = &Achievement> {
        self.achievements
            .iter()
            .filter(move |a| self.newly_unlocked.contains(&a.id))
    }
}

/// Refresh progress and unlock anything whose requirement is now met.
pub fn evaluate(
    achievements: &[Achievement],
    stats: &CumulativeStats,
    now: DateTime<Utc>,
) -> AchievementEvaluation {
    let mut newly_unlocked = Vec::new();

    let achievements = achievements
        .iter()
        .cloned()
        .map(|mut achievement| {
            if achievement.update(stats.counter(achievement.category), now) {
                tracing::info!("Achievement unlocked: {}", achievement.title);
                newly_unlocked.push(achievement.id.clone());
            }
            achievement
        })
        .collect();

    AchievementEvaluation {
        achievements,
        newly_unlocked,
    }
}

/// Number of unlocked achievements.
pub fn unlocked_count(achievements: &[Achievement]) -> usize {
    achievements.iter().filter(|a| a.is_unlocked()).count()
}

/// Share of achievements unlocked, as a percentage.
pub fn completion_percentage(achievements: &[Achievement]) -> f32 {
    if achievements.is_empty() {
        return 0.0;
    }
    (unlocked_count(achievements) as f32 / achievements.len() as f32) * 100.0
}
