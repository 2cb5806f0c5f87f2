//! Calendar-day running streaks.

use chrono::NaiveDate;

/// Streak after a qualifying run completed on `today`.
///
/// Runs on the same day as `last_run_date` leave the streak alone, a run
/// the day after extends it, anything else (including no previous run)
/// starts over at 1.
pub fn next_streak(last_run_date: Option<NaiveDate>, today: NaiveDate, current: u32) -> u32 {
    match last_run_date {
        Some(last) if last == today => current,
        Some(last) if last.succ_opt() == Some(today) => current.saturating_add(1),
        _ => 1,
    }
}

/// Whether a streak is still alive on `today`, i.e. the last run was today or yesterday.
pub fn is_streak_active(last_run_date: Option<NaiveDate>, today: NaiveDate) -> bool {
    match last_run_date {
        Some(last) => last == today || last.succ_opt() == Some(today),
        None => false,
    }
}
