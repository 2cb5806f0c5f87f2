//! RunConquer - Run tracking and territory game
//!
//! Main entry point for the command-line tool.

use anyhow::{bail, Context, Result};
use chrono::Utc;
use clap::Parser;
use runconquer::achievements::{completion_percentage, unlocked_count};
use runconquer::game::{GameService, RunOutcome};
use runconquer::import::import_run;
use runconquer::recording::RunRecorder;
use runconquer::stats::{format_distance, format_duration, format_pace, StatsSummary};
use runconquer::storage::{
    get_config_path, load_config_from, save_config_to, AppConfig, Database, RunnerGoal,
    UserProfile,
};
use std::path::Path;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod cli;

use cli::{Cli, Commands};

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting RunConquer v{}", env!("CARGO_PKG_VERSION"));

    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(get_config_path);
    let config = load_config_from(&config_path)
        .with_context(|| format!("Failed to load configuration from {}", config_path.display()))?;

    if let Commands::WriteConfig = cli.command {
        save_config_to(&config, &config_path)
            .with_context(|| format!("Failed to write {}", config_path.display()))?;
        println!("Wrote {}", config_path.display());
        return Ok(());
    }

    let db_path = cli.database.clone().unwrap_or_else(|| config.database_path());
    let db = Database::open(&db_path)
        .with_context(|| format!("Failed to open database at {}", db_path.display()))?;

    match cli.command {
        Commands::Init {
            username,
            email,
            goal,
            color,
        } => init(db, &config, username, email, goal, color),
        Commands::Import { file } => import(db, &config, &file),
        Commands::Stats { json } => stats(load_game(db, &config)?, json),
        Commands::Achievements => achievements(load_game(db, &config)?),
        Commands::Profile => profile(load_game(db, &config)?),
        Commands::WriteConfig => Ok(()),
    }
}

fn load_game(db: Database, config: &AppConfig) -> Result<GameService<Database>> {
    GameService::load(db, config.territory)
        .context("Failed to load game state (run `runconquer init` first)")
}

fn init(
    db: Database,
    config: &AppConfig,
    username: String,
    email: String,
    goal: RunnerGoal,
    color: Option<String>,
) -> Result<()> {
    let mut profile = UserProfile::new(username, email);
    profile.goal = goal;
    if let Some(color) = color {
        if let Err(e) = profile.set_territory_color(&color) {
            bail!("{}", e);
        }
    }

    let game = GameService::create(db, profile, config.territory)
        .context("Failed to create profile")?;

    println!(
        "Welcome, {} ({}). Territory colour {}.",
        game.profile().username,
        game.profile().goal,
        game.profile().territory_color
    );
    Ok(())
}

fn import(db: Database, config: &AppConfig, file: &Path) -> Result<()> {
    let mut game = load_game(db, config)?;
    let mut recorder = RunRecorder::new(config.recorder_config());

    let run = import_run(file, &mut recorder)
        .with_context(|| format!("Failed to import {}", file.display()))?;

    let Some(run) = run else {
        println!(
            "Run too short to count (needs more than {} and {}s).",
            format_distance(config.recording.min_distance_meters),
            config.recording.min_duration_seconds
        );
        return Ok(());
    };

    let finished_at = run.created_at;
    let outcome = game
        .finish_run(run, finished_at)
        .context("Failed to save run")?;

    print_outcome(&outcome);
    Ok(())
}

fn print_outcome(outcome: &RunOutcome) {
    let run = &outcome.run;
    println!(
        "Run saved: {} in {} (pace {} /km)",
        format_distance(run.distance_meters),
        format_duration(run.duration_seconds),
        format_pace(run.avg_pace)
    );
    println!("+{} XP", outcome.progression.xp_gained);

    if outcome.progression.leveled_up() {
        println!("Level up! Now level {}", outcome.progression.new_level);
    }
    if let Some(territory) = &outcome.territory {
        println!(
            "Claimed territory: {:.0} m radius at ({:.5}, {:.5})",
            territory.radius_meters, territory.center.latitude, territory.center.longitude
        );
    }
    println!("Streak: {} days", outcome.progression.current_streak);
    for achievement in &outcome.newly_unlocked {
        println!("Achievement unlocked: {} - {}", achievement.title, achievement.description);
    }
}

fn stats(game: GameService<Database>, json: bool) -> Result<()> {
    let summary = StatsSummary::compute(
        game.profile(),
        game.runs(),
        game.territories().len(),
        Utc::now(),
    );

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("Total distance: {}", format_distance(summary.total_distance_meters));
    println!("Total runs:     {}", summary.total_runs);
    println!("Territories:    {}", summary.territories);
    let streak_note = if summary.streak_active { "" } else { ", run today to restart" };
    println!(
        "Streak:         {} days (best {}{})",
        summary.current_streak, summary.longest_streak, streak_note
    );
    println!(
        "Level {}:       {} / {} XP ({:.0}%)",
        summary.level,
        summary.xp,
        summary.xp_for_next_level,
        summary.level_progress * 100.0
    );
    println!("Lifetime pace:  {} /km", format_pace(summary.lifetime_pace));
    let time_running = u32::try_from(summary.total_duration_seconds).unwrap_or(u32::MAX);
    println!("Time running:   {}", format_duration(time_running));
    println!();
    println!(
        "This week: {} in {} runs, {} today",
        format_distance(summary.weekly_distance_meters),
        summary.weekly_runs,
        format_distance(summary.today_distance_meters)
    );
    for (i, meters) in summary.weekly_chart.iter().enumerate() {
        let days_ago = summary.weekly_chart.len() - 1 - i;
        println!("  {} days ago: {}", days_ago, format_distance(*meters));
    }

    Ok(())
}

fn achievements(game: GameService<Database>) -> Result<()> {
    let all = game.achievements();
    println!(
        "{} of {} unlocked ({:.0}%)",
        unlocked_count(all),
        all.len(),
        completion_percentage(all)
    );

    for achievement in all {
        let mark = if achievement.is_unlocked() { "x" } else { " " };
        println!(
            "[{}] {:<18} {:>5.1}%  {} ({})",
            mark,
            achievement.title,
            achievement.percentage(),
            achievement.description,
            achievement.category
        );
    }

    Ok(())
}

fn profile(game: GameService<Database>) -> Result<()> {
    let profile = game.profile();
    println!("{} <{}>", profile.username, profile.email);
    println!("Goal:   {}", profile.goal);
    println!("Colour: {}", profile.territory_color);
    println!("Level:  {} ({} XP)", profile.level, profile.xp);
    match profile.last_run_date {
        Some(date) => println!("Last run: {}", date),
        None => println!("No runs yet"),
    }
    Ok(())
}
