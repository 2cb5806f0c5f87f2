//! Unit tests for stats views and formatters.

use chrono::{DateTime, Duration, TimeZone, Utc};
use runconquer::recording::RunRecord;
use runconquer::stats::{
    format_distance, format_duration, format_pace, today_distance, weekly_chart, weekly_distance,
    weekly_runs, StatsSummary,
};
use runconquer::UserProfile;
use uuid::Uuid;

fn run_at(created_at: DateTime<Utc>, distance: f64) -> RunRecord {
    RunRecord {
        id: Uuid::new_v4(),
        start_time: created_at - Duration::minutes(10),
        end_time: created_at,
        duration_seconds: 600,
        distance_meters: distance,
        avg_pace: distance / 600.0,
        max_speed: 3.0,
        path: Vec::new(),
        xp_earned: 0,
        territory_gained: 0,
        created_at,
    }
}

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 9, 20, 12, 0, 0).unwrap()
}

#[test]
fn test_no_runs() {
    assert!(weekly_runs(&[], now()).is_empty());
    assert_eq!(today_distance(&[], now()), 0.0);
    assert_eq!(weekly_distance(&[], now()), 0.0);
    assert_eq!(weekly_chart(&[], now()), [0.0; 7]);
}

#[test]
fn test_week_boundary_inclusive() {
    let runs = vec![
        run_at(now() - Duration::days(7), 1000.0),
        run_at(now() - Duration::days(7) - Duration::seconds(1), 2000.0),
    ];

    assert_eq!(weekly_runs(&runs, now()).len(), 1);
    assert_eq!(weekly_distance(&runs, now()), 1000.0);
    // Exactly seven days ago falls outside the chart's buckets
    assert_eq!(weekly_chart(&runs, now()).iter().sum::<f64>(), 0.0);
}

#[test]
fn test_chart_buckets_sum() {
    let runs: Vec<_> = (0..7)
        .map(|d| run_at(now() - Duration::days(d) - Duration::hours(1), 100.0 * (d + 1) as f64))
        .collect();

    let chart = weekly_chart(&runs, now());
    assert_eq!(chart, [700.0, 600.0, 500.0, 400.0, 300.0, 200.0, 100.0]);
    assert_eq!(chart.iter().sum::<f64>(), weekly_distance(&runs, now()));
}

#[test]
fn test_summary_matches_profile() {
    let mut profile = UserProfile::new("ana".to_string(), "a@b.c".to_string());
    profile.total_distance_meters = 3000.0;
    profile.total_runs = 2;
    profile.longest_streak = 4;

    let runs = vec![run_at(now(), 1800.0), run_at(now() - Duration::days(3), 1200.0)];
    let summary = StatsSummary::compute(&profile, &runs, 2, now());

    assert_eq!(summary.total_runs, 2);
    assert_eq!(summary.territories, 2);
    assert_eq!(summary.weekly_runs, 2);
    assert_eq!(summary.today_distance_meters, 1800.0);
    assert_eq!(summary.total_duration_seconds, 1200);
    assert_eq!(summary.lifetime_pace, 2.5);
    assert!(!summary.streak_active);
}

#[test]
fn test_summary_streak_goes_stale() {
    let mut profile = UserProfile::new("ana".to_string(), "a@b.c".to_string());
    profile.current_streak = 5;
    profile.longest_streak = 5;

    profile.last_run_date = Some(now().date_naive().pred_opt().unwrap());
    assert!(StatsSummary::compute(&profile, &[], 0, now()).streak_active);

    let two_days_later = now() + Duration::days(2);
    let summary = StatsSummary::compute(&profile, &[], 0, two_days_later);
    assert!(!summary.streak_active);
    assert_eq!(summary.current_streak, 5);
}

#[test]
fn test_formatters() {
    assert_eq!(format_distance(999.4), "999m");
    assert_eq!(format_distance(1000.0), "1.00km");
    assert_eq!(format_pace(2.5), "6:40");
    assert_eq!(format_pace(0.0), "--:--");
    assert_eq!(format_duration(59), "0:59");
    assert_eq!(format_duration(3600), "1:00:00");
}
