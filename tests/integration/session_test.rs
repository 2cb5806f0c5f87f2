//! Live sessions handing their record to the game service.

use chrono::{Duration as ChronoDuration, Utc};
use runconquer::recording::RecordingStatus;
use runconquer::session::{FeedLocationSource, FixFeed, RunEvent};
use runconquer::territory::TerritoryConfig;
use runconquer::tracking::LocationFix;
use runconquer::{Database, GameService, RunRecorder, RunSession, UserProfile};
use std::time::Duration;

/// A fix `step` increments of 0.0005 degrees north of the equator, about 55.6 m each.
fn fix(step: u32) -> LocationFix {
    LocationFix::new(
        0.0005 * f64::from(step),
        10.0,
        Utc::now() + ChronoDuration::seconds(i64::from(step)),
    )
    .with_speed(3.0)
}

#[tokio::test(start_paused = true)]
async fn test_live_run_lands_in_database() {
    let feed = FixFeed::new();
    let handle =
        RunSession::start(FeedLocationSource::new(feed.clone()), RunRecorder::with_defaults())
            .unwrap();

    tokio::time::sleep(Duration::from_secs(20)).await;
    for step in 0..12 {
        assert!(feed.push(fix(step)));
    }

    let record = handle.stop().await.unwrap().expect("run qualifies");
    assert_eq!(record.path.len(), 12);
    assert!((record.distance_meters - 611.6).abs() < 1.0, "{}", record.distance_meters);

    let profile = UserProfile::new("live".to_string(), "live@example.com".to_string());
    let mut game = GameService::create(
        Database::open_in_memory().unwrap(),
        profile,
        TerritoryConfig::default(),
    )
    .unwrap();

    let finished_at = record.created_at;
    let outcome = game.finish_run(record, finished_at).unwrap();

    assert!(outcome.territory.is_some());
    assert_eq!(game.store().count_runs().unwrap(), 1);
    assert_eq!(game.store().list_territories().unwrap().len(), 1);
    assert_eq!(
        game.store().get_profile().unwrap().map(|p| p.total_runs),
        Some(1)
    );
}

#[tokio::test(start_paused = true)]
async fn test_pause_gap_is_not_credited() {
    let feed = FixFeed::new();
    let handle =
        RunSession::start(FeedLocationSource::new(feed.clone()), RunRecorder::with_defaults())
            .unwrap();
    let events = handle.events().clone();

    tokio::time::sleep(Duration::from_secs(12)).await;
    for step in 0..3 {
        feed.push(fix(step));
    }

    handle.pause().await.unwrap();
    assert_eq!(handle.summary().status, RecordingStatus::Paused);
    assert!(!feed.push(fix(10)));

    tokio::time::sleep(Duration::from_secs(60)).await;
    handle.resume().await.unwrap();

    // Resumes 18 steps north; the first fix after resuming only seeds
    for step in 20..23 {
        assert!(feed.push(fix(step)));
    }
    tokio::time::sleep(Duration::from_secs(5)).await;

    let record = handle.stop().await.unwrap().expect("run qualifies");

    assert_eq!(record.path.len(), 6);
    assert!((record.distance_meters - 222.4).abs() < 1.0, "{}", record.distance_meters);
    assert!(record.duration_seconds < 20, "{}", record.duration_seconds);

    let received: Vec<_> = events.try_iter().collect();
    assert!(received.contains(&RunEvent::Paused));
    assert!(received.contains(&RunEvent::Resumed));
    assert!(matches!(received.last(), Some(RunEvent::Stopped(Some(_)))));
}
