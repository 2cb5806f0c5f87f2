//! Unit tests for calendar-day streaks.

use chrono::NaiveDate;
use runconquer::progression::{is_streak_active, next_streak};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn test_first_run_starts_streak() {
    assert_eq!(next_streak(None, date(2024, 1, 1), 0), 1);
}

#[test]
fn test_same_day_unchanged() {
    assert_eq!(next_streak(Some(date(2024, 1, 1)), date(2024, 1, 1), 4), 4);
}

#[test]
fn test_consecutive_day_extends() {
    assert_eq!(next_streak(Some(date(2024, 1, 1)), date(2024, 1, 2), 4), 5);
}

#[test]
fn test_gap_resets() {
    assert_eq!(next_streak(Some(date(2024, 1, 1)), date(2024, 1, 3), 4), 1);
    assert_eq!(next_streak(Some(date(2023, 1, 2)), date(2024, 1, 2), 9), 1);
}

#[test]
fn test_month_and_leap_boundaries() {
    assert_eq!(next_streak(Some(date(2024, 1, 31)), date(2024, 2, 1), 2), 3);
    assert_eq!(next_streak(Some(date(2024, 2, 28)), date(2024, 2, 29), 2), 3);
    assert_eq!(next_streak(Some(date(2024, 2, 29)), date(2024, 3, 1), 3), 4);
    assert_eq!(next_streak(Some(date(2023, 12, 31)), date(2024, 1, 1), 7), 8);
}

#[test]
fn test_clock_going_backwards_resets() {
    assert_eq!(next_streak(Some(date(2024, 1, 5)), date(2024, 1, 4), 3), 1);
}

#[test]
fn test_streak_active() {
    assert!(is_streak_active(Some(date(2024, 1, 1)), date(2024, 1, 1)));
    assert!(is_streak_active(Some(date(2024, 1, 1)), date(2024, 1, 2)));
    assert!(!is_streak_active(Some(date(2024, 1, 1)), date(2024, 1, 3)));
    assert!(!is_streak_active(None, date(2024, 1, 3)));
}
