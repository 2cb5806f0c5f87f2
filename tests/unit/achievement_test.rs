//! Unit tests for achievement evaluation.

use chrono::{Duration, TimeZone, Utc};
use runconquer::achievements::{
    completion_percentage, default_achievements, evaluate, Achievement, AchievementCategory,
    CumulativeStats,
};

fn stats(runs: u32, distance: f64, streak: u32, territories: usize, speed: f64) -> CumulativeStats {
    CumulativeStats {
        total_runs: runs,
        total_distance_meters: distance,
        current_streak: streak,
        total_territories: territories,
        best_max_speed: speed,
    }
}

fn find<'a>(achievements: &'a [Achievement], id: &str) -> &'a Achievement {
    achievements
        .iter()
        .find(|a| a.id == id)
        .unwrap_or_else(|| panic!("missing achievement {}", id))
}

#[test]
fn test_progress_follows_category_counter() {
    let now = Utc::now();
    let eval = evaluate(&default_achievements(), &stats(3, 4500.0, 2, 7, 3.1), now);

    assert_eq!(find(&eval.achievements, "run_5").current, 3.0);
    assert_eq!(find(&eval.achievements, "dist_10k").current, 4500.0);
    assert_eq!(find(&eval.achievements, "streak_3").current, 2.0);
    assert_eq!(find(&eval.achievements, "territory_10").current, 7.0);
    assert_eq!(find(&eval.achievements, "speed_4").current, 3.1);
}

#[test]
fn test_unlock_at_exact_requirement() {
    let now = Utc::now();
    let eval = evaluate(&default_achievements(), &stats(5, 1000.0, 3, 10, 4.0), now);

    for id in ["run_5", "dist_1k", "streak_3", "territory_10", "speed_4"] {
        assert!(eval.newly_unlocked.iter().any(|u| u == id), "{}", id);
        assert_eq!(find(&eval.achievements, id).unlocked_at, Some(now));
    }
    assert!(!eval.newly_unlocked.iter().any(|u| u == "run_25"));
}

#[test]
fn test_unlocks_never_revert() {
    let first = Utc.with_ymd_and_hms(2024, 1, 7, 8, 0, 0).unwrap();
    let eval = evaluate(&default_achievements(), &stats(7, 9000.0, 7, 3, 5.0), first);
    assert!(find(&eval.achievements, "streak_7").is_unlocked());

    let later = first + Duration::days(10);
    let eval = evaluate(&eval.achievements, &stats(8, 9500.0, 1, 3, 5.0), later);

    let streak_7 = find(&eval.achievements, "streak_7");
    assert_eq!(streak_7.current, 1.0);
    assert_eq!(streak_7.unlocked_at, Some(first));
    assert!(eval.newly_unlocked.is_empty());
}

#[test]
fn test_reevaluation_reports_only_new_unlocks() {
    let now = Utc::now();
    let eval = evaluate(&default_achievements(), &stats(1, 100.0, 1, 1, 2.0), now);
    assert_eq!(eval.newly_unlocked.len(), 2); // first_run, territory_1

    let eval = evaluate(&eval.achievements, &stats(1, 100.0, 1, 1, 2.0), now);
    assert!(eval.newly_unlocked.is_empty());
}

#[test]
fn test_completion_percentage() {
    let all = default_achievements();
    assert_eq!(completion_percentage(&all), 0.0);
    assert_eq!(completion_percentage(&[]), 0.0);

    let eval = evaluate(&all, &stats(100, 100_000.0, 30, 50, 6.0), Utc::now());
    assert_eq!(completion_percentage(&eval.achievements), 100.0);
}

#[test]
fn test_category_names() {
    assert_eq!(AchievementCategory::Territory.to_string(), "territory");
    assert_eq!("speed".parse::<AchievementCategory>(), Ok(AchievementCategory::Speed));
}
