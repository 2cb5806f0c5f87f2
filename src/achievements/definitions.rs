//! Achievement definitions.

use super::{Achievement, AchievementCategory};

/// The catalogue seeded for a new user.
pub fn default_achievements() -> Vec<Achievement> {
    let mut achievements = Vec::new();

    achievements.extend(run_achievements());
    achievements.extend(distance_achievements());
    achievements.extend(streak_achievements());
    achievements.extend(territory_achievements());
    achievements.extend(speed_achievements());

    achievements
}

fn run_achievements() -> Vec<Achievement> {
    vec![
        Achievement::new(
            "first_run",
            "First Steps",
            "Complete your first run",
            "walk",
            AchievementCategory::Runs,
            1.0,
        ),
        Achievement::new(
            "run_5",
            "Getting Started",
            "Complete 5 runs",
            "trending-up",
            AchievementCategory::Runs,
            5.0,
        ),
        Achievement::new(
            "run_25",
            "Dedicated Runner",
            "Complete 25 runs",
            "fitness",
            AchievementCategory::Runs,
            25.0,
        ),
        Achievement::new(
            "run_100",
            "Marathon Spirit",
            "Complete 100 runs",
            "medal",
            AchievementCategory::Runs,
            100.0,
        ),
    ]
}

fn distance_achievements() -> Vec<Achievement> {
    vec![
        Achievement::new(
            "dist_1k",
            "First Kilometer",
            "Run a total of 1 km",
            "flag",
            AchievementCategory::Distance,
            1_000.0, // meters
        ),
        Achievement::new(
            "dist_10k",
            "Distance Demon",
            "Run a total of 10 km",
            "flame",
            AchievementCategory::Distance,
            10_000.0,
        ),
        Achievement::new(
            "dist_50k",
            "Ultra Runner",
            "Run a total of 50 km",
            "flash",
            AchievementCategory::Distance,
            50_000.0,
        ),
        Achievement::new(
            "dist_100k",
            "Centurion",
            "Run a total of 100 km",
            "shield-checkmark",
            AchievementCategory::Distance,
            100_000.0,
        ),
    ]
}

fn streak_achievements() -> Vec<Achievement> {
    vec![
        Achievement::new(
            "streak_3",
            "Hat Trick",
            "3-day running streak",
            "bonfire",
            AchievementCategory::Streak,
            3.0,
        ),
        Achievement::new(
            "streak_7",
            "Weekly Warrior",
            "7-day running streak",
            "star",
            AchievementCategory::Streak,
            7.0,
        ),
        Achievement::new(
            "streak_30",
            "Iron Will",
            "30-day running streak",
            "trophy",
            AchievementCategory::Streak,
            30.0,
        ),
    ]
}

fn territory_achievements() -> Vec<Achievement> {
    vec![
        Achievement::new(
            "territory_1",
            "Land Claim",
            "Capture your first territory",
            "map",
            AchievementCategory::Territory,
            1.0,
        ),
        Achievement::new(
            "territory_10",
            "Territory Baron",
            "Capture 10 territories",
            "globe",
            AchievementCategory::Territory,
            10.0,
        ),
        Achievement::new(
            "territory_50",
            "Conqueror",
            "Capture 50 territories",
            "earth",
            AchievementCategory::Territory,
            50.0,
        ),
    ]
}

fn speed_achievements() -> Vec<Achievement> {
    vec![
        Achievement::new(
            "speed_4",
            "Quick Feet",
            "Hit 4 m/s (14.4 km/h) during a run",
            "speedometer",
            AchievementCategory::Speed,
            4.0, // m/s
        ),
        Achievement::new(
            "speed_6",
            "Sprinter",
            "Hit 6 m/s (21.6 km/h) during a run",
            "rocket",
            AchievementCategory::Speed,
            6.0,
        ),
    ]
}
