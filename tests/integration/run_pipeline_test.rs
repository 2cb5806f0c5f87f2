//! Finished runs flowing through territory, progression and achievements.

use chrono::{DateTime, Duration, TimeZone, Utc};
use runconquer::game::MemoryStore;
use runconquer::progression::xp_for_run;
use runconquer::recording::{RecorderConfig, RunRecord};
use runconquer::territory::{Territory, TerritoryConfig};
use runconquer::tracking::{Coordinate, LocationFix};
use runconquer::{GameService, RunRecorder, UserProfile};
use uuid::Uuid;

fn morning(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 4, day, 7, 30, 0).unwrap()
}

fn run(distance: f64, duration: u32, finished: DateTime<Utc>) -> RunRecord {
    RunRecord {
        id: Uuid::new_v4(),
        start_time: finished - Duration::seconds(i64::from(duration)),
        end_time: finished,
        duration_seconds: duration,
        distance_meters: distance,
        avg_pace: distance / f64::from(duration),
        max_speed: 3.2,
        path: vec![
            Coordinate::new(40.0, -3.7),
            Coordinate::new(40.005, -3.7),
            Coordinate::new(40.01, -3.7),
        ],
        xp_earned: xp_for_run(distance, duration),
        territory_gained: (distance / 100.0).floor() as u32,
        created_at: finished,
    }
}

fn new_game() -> GameService<MemoryStore> {
    let profile = UserProfile::new("runner".to_string(), "runner@example.com".to_string());
    GameService::create(MemoryStore::new(), profile, TerritoryConfig::default()).unwrap()
}

fn unlocked_ids(game: &GameService<MemoryStore>) -> Vec<&str> {
    game.achievements()
        .iter()
        .filter(|a| a.is_unlocked())
        .map(|a| a.id.as_str())
        .collect()
}

#[test]
fn test_first_run_end_to_end() {
    let mut game = new_game();

    let outcome = game.finish_run(run(1200.0, 600, morning(1)), morning(1)).unwrap();

    assert_eq!(outcome.progression.xp_gained, 12_010);
    assert_eq!(outcome.progression.new_level, 11);

    let territory = outcome.territory.expect("run has a path");
    assert_eq!(territory.radius_meters, 120.0);
    assert_eq!(territory.center, Coordinate::new(40.005, -3.7));
    assert_eq!(territory.user_id, game.profile().id);
    assert_eq!(territory.color, game.profile().territory_color);

    let profile = game.profile();
    assert_eq!(profile.xp, 12_010);
    assert_eq!(profile.level, 11);
    assert_eq!(profile.total_runs, 1);
    assert_eq!(profile.current_streak, 1);

    let mut ids: Vec<_> = outcome.newly_unlocked.iter().map(|a| a.id.as_str()).collect();
    ids.sort_unstable();
    assert_eq!(ids, vec!["dist_1k", "first_run", "territory_1"]);
    assert_eq!(unlocked_ids(&game).len(), 3);

    // Store mirrors the adopted snapshot
    let store = game.store();
    assert_eq!(store.runs.len(), 1);
    assert_eq!(store.territories.len(), 1);
    assert_eq!(store.profile.as_ref().map(|p| p.xp), Some(12_010));
}

#[test]
fn test_consecutive_days_build_streak() {
    let mut game = new_game();

    for day in 1..=3 {
        game.finish_run(run(400.0, 180, morning(day)), morning(day)).unwrap();
    }

    assert_eq!(game.profile().current_streak, 3);
    assert_eq!(game.profile().longest_streak, 3);
    assert!(unlocked_ids(&game).contains(&"streak_3"));

    // Newest first
    assert_eq!(game.runs()[0].created_at, morning(3));
    assert_eq!(game.runs()[2].created_at, morning(1));

    // Skipping a day resets the current streak only
    game.finish_run(run(400.0, 180, morning(6)), morning(6)).unwrap();
    assert_eq!(game.profile().current_streak, 1);
    assert_eq!(game.profile().longest_streak, 3);
    assert!(unlocked_ids(&game).contains(&"streak_3"));
}

#[test]
fn test_same_day_runs_keep_streak() {
    let mut game = new_game();

    game.finish_run(run(400.0, 180, morning(1)), morning(1)).unwrap();
    let later = morning(1) + Duration::hours(10);
    game.finish_run(run(400.0, 180, later), later).unwrap();

    assert_eq!(game.profile().current_streak, 1);
    assert_eq!(game.profile().total_runs, 2);
    assert_eq!(game.profile().total_distance_meters, 800.0);
}

#[test]
fn test_pathless_run_claims_nothing() {
    let mut game = new_game();
    let mut record = run(300.0, 120, morning(2));
    record.path.clear();

    let outcome = game.finish_run(record, morning(2)).unwrap();

    assert!(outcome.territory.is_none());
    assert!(game.territories().is_empty());
    assert!(!unlocked_ids(&game).contains(&"territory_1"));
}

#[test]
fn test_recorder_output_feeds_game() {
    let start = morning(4);
    let mut recorder = RunRecorder::new(RecorderConfig::default());
    recorder.start(start).unwrap();

    // 50 m north every 15 s
    for i in 0..24i32 {
        let fix = LocationFix::new(
            41.0 + 0.00045 * f64::from(i),
            2.0,
            start + Duration::seconds(15 * i64::from(i)),
        )
        .with_speed(3.3);
        recorder.record_fix(&fix).unwrap();
        recorder.tick(15).unwrap();
    }
    let end = start + Duration::seconds(360);
    let record = recorder.stop(end).unwrap().expect("run qualifies");

    let mut game = new_game();
    let outcome = game.finish_run(record.clone(), end).unwrap();

    assert_eq!(
        outcome.progression.xp_gained,
        xp_for_run(record.distance_meters, record.duration_seconds)
    );
    assert_eq!(game.profile().total_distance_meters, record.distance_meters);
    assert!(record.distance_meters > 1100.0 && record.distance_meters < 1200.0);
}

#[test]
fn test_tiny_run_never_reaches_game() {
    let start = morning(5);
    let mut recorder = RunRecorder::with_defaults();
    recorder.start(start).unwrap();
    recorder
        .record_fix(&LocationFix::new(41.0, 2.0, start).with_speed(1.0))
        .unwrap();
    recorder
        .record_fix(&LocationFix::new(41.000045, 2.0, start + Duration::seconds(5)).with_speed(1.0))
        .unwrap();
    recorder.tick(5).unwrap();

    assert_eq!(recorder.stop(start + Duration::seconds(5)).unwrap(), None);
}

#[test]
fn test_added_territories_unlock_milestone() {
    let mut game = new_game();
    let user_id = game.profile().id;

    let mut unlocked = Vec::new();
    for i in 0..10 {
        let territory = Territory {
            id: Uuid::new_v4(),
            user_id,
            center: Coordinate::new(40.0 + 0.01 * f64::from(i), -3.7),
            radius_meters: 50.0,
            color: "#FF6B35".to_string(),
            distance_meters: 500.0,
            captured_at: morning(1),
        };
        unlocked.extend(game.add_territory(territory, morning(1)).unwrap());
    }

    let ids: Vec<_> = unlocked.iter().map(|a| a.id.as_str()).collect();
    assert_eq!(ids, vec!["territory_1", "territory_10"]);
    assert_eq!(game.territories().len(), 10);
    assert_eq!(game.profile().total_runs, 0);
}
