//! Progression engine: XP, levels, streaks and lifetime totals.
//!
//! Every finished run goes through [`apply_run`] exactly once. The profile
//! is taken by reference and an updated copy is returned, so callers can
//! persist the new snapshot before adopting it.

pub mod level;
pub mod streak;

pub use level::{level_for_xp, level_progress, xp_for_level, xp_for_next_level, xp_for_run};
pub use streak::{is_streak_active, next_streak};

use crate::recording::types::RunRecord;
use crate::storage::config::UserProfile;
use chrono::NaiveDate;

/// Summary of what one run changed on the profile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressionUpdate {
    /// XP credited for the run
    pub xp_gained: u64,
    /// Level before the run
    pub previous_level: u32,
    /// Level after the run
    pub new_level: u32,
    /// Streak after the run
    pub current_streak: u32,
    /// Longest streak after the run
    pub longest_streak: u32,
}

impl ProgressionUpdate {
    /// Whether the run pushed the user into a higher level.
    pub fn leveled_up(&self) -> bool {
        self.new_level > self.previous_level
    }
}

/// Apply a finished run completed on `today` to `profile`.
pub fn apply_run(
    profile: &UserProfile,
    run: &RunRecord,
    today: NaiveDate,
) -> (UserProfile, ProgressionUpdate) {
    let mut next = profile.clone();

    next.xp = profile.xp.saturating_add(run.xp_earned);
    next.level = level_for_xp(next.xp);
    next.total_distance_meters = profile.total_distance_meters + run.distance_meters;
    next.total_runs = profile.total_runs.saturating_add(1);

    next.current_streak = next_streak(profile.last_run_date, today, profile.current_streak);
    next.longest_streak = profile.longest_streak.max(next.current_streak);
    next.last_run_date = Some(today);
    next.updated_at = run.created_at;

    let update = ProgressionUpdate {
        xp_gained: run.xp_earned,
        previous_level: level_for_xp(profile.xp),
        new_level: next.level,
        current_streak: next.current_streak,
        longest_streak: next.longest_streak,
    };

    (next, update)
}
