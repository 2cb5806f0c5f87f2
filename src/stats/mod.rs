//! Read-only views over run history.
//!
//! Everything here is recomputed from `(runs, now)` on demand; nothing is
//! cached alongside the stored state.

pub mod format;

pub use format::{format_distance, format_duration, format_pace};

use crate::progression;
use crate::recording::types::RunRecord;
use crate::storage::config::UserProfile;
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

/// Days covered by the weekly views.
pub const WEEK_DAYS: usize = 7;

/// Runs created within the last seven days.
pub fn weekly_runs(runs: &[RunRecord], now: DateTime<Utc>) -> Vec<&RunRecord> {
    let week_ago = now - Duration::days(WEEK_DAYS as i64);
    runs.iter().filter(|r| r.created_at >= week_ago).collect()
}

/// Distance run on the current UTC calendar day.
pub fn today_distance(runs: &[RunRecord], now: DateTime<Utc>) -> f64 {
    let today = now.date_naive();
    runs.iter()
        .filter(|r| r.completed_on() == today)
        .map(|r| r.distance_meters)
        .sum()
}

/// Distance run within the last seven days.
pub fn weekly_distance(runs: &[RunRecord], now: DateTime<Utc>) -> f64 {
    weekly_runs(runs, now)
        .iter()
        .map(|r| r.distance_meters)
        .sum()
}

/// Distance per day for the last week. Index 6 is the most recent 24 hours.
///
/// Buckets are whole days elapsed since `now`, not calendar days.
pub fn weekly_chart(runs: &[RunRecord], now: DateTime<Utc>) -> [f64; WEEK_DAYS] {
    let mut data = [0.0; WEEK_DAYS];

    for run in weekly_runs(runs, now) {
        let days_ago = (now - run.created_at).num_days();
        if (0..WEEK_DAYS as i64).contains(&days_ago) {
            data[WEEK_DAYS - 1 - days_ago as usize] += run.distance_meters;
        }
    }

    data
}

/// Total active time over all runs, in seconds.
pub fn total_duration(runs: &[RunRecord]) -> u64 {
    runs.iter().map(|r| u64::from(r.duration_seconds)).sum()
}

/// Lifetime average speed in m/s, or 0 without any recorded time.
pub fn lifetime_pace(profile: &UserProfile, runs: &[RunRecord]) -> f64 {
    let duration = total_duration(runs);
    if runs.is_empty() || duration == 0 {
        return 0.0;
    }
    profile.total_distance_meters / duration as f64
}

/// Fraction of the way from the current level to the next.
pub fn level_progress(profile: &UserProfile) -> f64 {
    progression::level_progress(profile.xp)
}

/// Snapshot of the numbers shown on a stats screen.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsSummary {
    pub total_distance_meters: f64,
    pub total_runs: u32,
    pub territories: usize,
    pub current_streak: u32,
    /// False once a full day has passed without a run
    pub streak_active: bool,
    pub longest_streak: u32,
    pub level: u32,
    pub xp: u64,
    pub xp_for_next_level: u64,
    pub level_progress: f64,
    pub weekly_runs: usize,
    pub weekly_distance_meters: f64,
    pub today_distance_meters: f64,
    pub weekly_chart: [f64; WEEK_DAYS],
    pub total_duration_seconds: u64,
    /// Lifetime average speed in m/s
    pub lifetime_pace: f64,
}

impl StatsSummary {
    pub fn compute(
        profile: &UserProfile,
        runs: &[RunRecord],
        territories: usize,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            total_distance_meters: profile.total_distance_meters,
            total_runs: profile.total_runs,
            territories,
            current_streak: profile.current_streak,
            streak_active: progression::is_streak_active(profile.last_run_date, now.date_naive()),
            longest_streak: profile.longest_streak,
            level: profile.level,
            xp: profile.xp,
            xp_for_next_level: progression::xp_for_next_level(profile.level),
            level_progress: level_progress(profile),
            weekly_runs: weekly_runs(runs, now).len(),
            weekly_distance_meters: weekly_distance(runs, now),
            today_distance_meters: today_distance(runs, now),
            weekly_chart: weekly_chart(runs, now),
            total_duration_seconds: total_duration(runs),
            lifetime_pace: lifetime_pace(profile, runs),
        }
    }
}
