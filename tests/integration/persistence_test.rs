//! Game state surviving a restart on an on-disk database.

use chrono::{Duration, TimeZone, Utc};
use runconquer::game::GameError;
use runconquer::progression::xp_for_run;
use runconquer::recording::RunRecord;
use runconquer::territory::TerritoryConfig;
use runconquer::tracking::Coordinate;
use runconquer::{Database, GameService, UserProfile};
use tempfile::TempDir;
use uuid::Uuid;

fn sample_run(day: u32) -> RunRecord {
    let finished = Utc.with_ymd_and_hms(2024, 8, day, 18, 0, 0).unwrap();
    RunRecord {
        id: Uuid::new_v4(),
        start_time: finished - Duration::minutes(30),
        end_time: finished,
        duration_seconds: 1800,
        distance_meters: 5000.0,
        avg_pace: 5000.0 / 1800.0,
        max_speed: 4.5,
        path: vec![
            Coordinate::new(52.52, 13.40),
            Coordinate::new(52.53, 13.41),
            Coordinate::new(52.54, 13.42),
        ],
        xp_earned: xp_for_run(5000.0, 1800),
        territory_gained: 50,
        created_at: finished,
    }
}

#[test]
fn test_state_survives_reopen() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("runconquer.db");

    let profile = UserProfile::new("berlin".to_string(), "berlin@example.com".to_string());
    let profile_id = profile.id;

    {
        let db = Database::open(&db_path).unwrap();
        let mut game = GameService::create(db, profile, TerritoryConfig::default()).unwrap();
        game.finish_run(sample_run(1), sample_run(1).created_at).unwrap();
        game.finish_run(sample_run(2), sample_run(2).created_at).unwrap();
    }

    let db = Database::open(&db_path).unwrap();
    let game = GameService::load(db, TerritoryConfig::default()).unwrap();

    let profile = game.profile();
    assert_eq!(profile.id, profile_id);
    assert_eq!(profile.total_runs, 2);
    assert_eq!(profile.total_distance_meters, 10_000.0);
    assert_eq!(profile.current_streak, 2);
    assert_eq!(profile.xp, 2 * xp_for_run(5000.0, 1800));
    assert!(profile.level_consistent());

    assert_eq!(game.runs().len(), 2);
    assert_eq!(game.runs()[0].created_at, sample_run(2).created_at);
    assert_eq!(game.runs()[1].path.len(), 3);

    assert_eq!(game.territories().len(), 2);
    assert!(game.territories().iter().all(|t| t.radius_meters == 500.0));

    let unlocked: Vec<_> = game
        .achievements()
        .iter()
        .filter(|a| a.is_unlocked())
        .map(|a| a.id.as_str())
        .collect();
    for id in ["first_run", "dist_1k", "dist_10k", "territory_1", "speed_4"] {
        assert!(unlocked.contains(&id), "{} not unlocked", id);
    }
}

#[test]
fn test_load_without_profile_fails() {
    let temp_dir = TempDir::new().unwrap();
    let db = Database::open(&temp_dir.path().join("empty.db")).unwrap();

    assert!(matches!(
        GameService::load(db, TerritoryConfig::default()),
        Err(GameError::NoProfile)
    ));
}

#[test]
fn test_create_replaces_previous_state() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("runconquer.db");

    {
        let profile = UserProfile::new("first".to_string(), "first@example.com".to_string());
        let mut game =
            GameService::create(Database::open(&db_path).unwrap(), profile, TerritoryConfig::default())
                .unwrap();
        game.finish_run(sample_run(3), sample_run(3).created_at).unwrap();
    }

    let profile = UserProfile::new("second".to_string(), "second@example.com".to_string());
    GameService::create(Database::open(&db_path).unwrap(), profile, TerritoryConfig::default())
        .unwrap();

    let game = GameService::load(Database::open(&db_path).unwrap(), TerritoryConfig::default()).unwrap();
    assert_eq!(game.profile().username, "second");
    assert!(game.runs().is_empty());
    assert!(game.territories().is_empty());
    assert!(game.achievements().iter().all(|a| !a.is_unlocked()));
}
