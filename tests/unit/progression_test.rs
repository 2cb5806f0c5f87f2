//! Unit tests for XP, levels and profile progression.

use chrono::{Duration, NaiveDate, TimeZone, Utc};
use runconquer::progression::{
    apply_run, level_for_xp, level_progress, xp_for_level, xp_for_next_level, xp_for_run,
};
use runconquer::recording::RunRecord;
use runconquer::UserProfile;
use uuid::Uuid;

fn run(distance: f64, duration: u32) -> RunRecord {
    let end = Utc.with_ymd_and_hms(2024, 7, 1, 7, 0, 0).unwrap();
    RunRecord {
        id: Uuid::new_v4(),
        start_time: end - Duration::seconds(i64::from(duration)),
        end_time: end,
        duration_seconds: duration,
        distance_meters: distance,
        avg_pace: distance / f64::from(duration),
        max_speed: 3.2,
        path: Vec::new(),
        xp_earned: xp_for_run(distance, duration),
        territory_gained: (distance / 100.0).floor() as u32,
        created_at: end,
    }
}

// =============================================================================
// XP and levels
// =============================================================================

#[test]
fn test_xp_for_run() {
    assert_eq!(xp_for_run(1200.0, 600), 12_010);
    assert_eq!(xp_for_run(0.0, 59), 0);
    assert_eq!(xp_for_run(12.34, 61), 124);
}

#[test]
fn test_level_thresholds() {
    assert_eq!(level_for_xp(0), 1);
    assert_eq!(level_for_xp(99), 1);
    assert_eq!(level_for_xp(100), 2);
    assert_eq!(level_for_xp(399), 2);
    assert_eq!(level_for_xp(400), 3);
    assert_eq!(level_for_xp(12_010), 11);

    assert_eq!(xp_for_level(1), 0);
    assert_eq!(xp_for_level(11), 10_000);
    assert_eq!(xp_for_next_level(11), 12_100);
}

#[test]
fn test_level_brackets_consistent() {
    for xp in (0..200_000).step_by(37) {
        let level = level_for_xp(xp);
        assert!(xp_for_level(level) <= xp, "xp {}", xp);
        assert!(xp < xp_for_next_level(level), "xp {}", xp);
    }
}

#[test]
fn test_level_progress_range() {
    for xp in [0, 1, 99, 100, 250, 12_010, 1_000_000] {
        let progress = level_progress(xp);
        assert!((0.0..1.0).contains(&progress), "xp {} -> {}", xp, progress);
    }
}

// =============================================================================
// Applying runs
// =============================================================================

#[test]
fn test_first_run() {
    let profile = UserProfile::new("ana".to_string(), "ana@example.com".to_string());
    let today = NaiveDate::from_ymd_opt(2024, 7, 1).unwrap();

    let (updated, update) = apply_run(&profile, &run(1200.0, 600), today);

    assert_eq!(updated.xp, 12_010);
    assert_eq!(updated.level, 11);
    assert_eq!(updated.total_runs, 1);
    assert_eq!(updated.total_distance_meters, 1200.0);
    assert_eq!(updated.current_streak, 1);
    assert_eq!(updated.longest_streak, 1);
    assert_eq!(updated.last_run_date, Some(today));
    assert!(update.leveled_up());
    assert_eq!(update.previous_level, 1);

    // Input profile untouched
    assert_eq!(profile.xp, 0);
}

#[test]
fn test_totals_are_monotonic() {
    let mut profile = UserProfile::new("ana".to_string(), "ana@example.com".to_string());
    let mut day = NaiveDate::from_ymd_opt(2024, 7, 1).unwrap();

    for distance in [15.0, 800.0, 11.0, 5000.0] {
        let (next, _) = apply_run(&profile, &run(distance, 120), day);
        assert!(next.total_distance_meters >= profile.total_distance_meters);
        assert!(next.total_runs > profile.total_runs);
        assert!(next.current_streak <= next.longest_streak);
        assert!(next.level_consistent());
        profile = next;
        day = day.succ_opt().unwrap();
    }

    assert_eq!(profile.current_streak, 4);
}

#[test]
fn test_longest_streak_survives_reset() {
    let mut profile = UserProfile::new("ana".to_string(), "ana@example.com".to_string());
    profile.current_streak = 6;
    profile.longest_streak = 6;
    profile.last_run_date = NaiveDate::from_ymd_opt(2024, 6, 20);

    let (next, update) = apply_run(&profile, &run(500.0, 300), NaiveDate::from_ymd_opt(2024, 7, 1).unwrap());

    assert_eq!(next.current_streak, 1);
    assert_eq!(next.longest_streak, 6);
    assert_eq!(update.longest_streak, 6);
}
