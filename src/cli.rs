//! Command-line argument parsing.

use clap::{Parser, Subcommand};
use runconquer::storage::RunnerGoal;
use std::path::PathBuf;

/// RunConquer CLI
#[derive(Parser)]
#[command(name = "runconquer")]
#[command(about = "Turn GPS runs into territory, XP and achievements", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database file (overrides the configured location)
    #[arg(long, global = true)]
    pub database: Option<PathBuf>,

    /// Configuration file (defaults to config.toml in the data directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Create a new local profile, replacing any existing game data
    Init {
        username: String,
        email: String,
        /// casual, competitor, explorer or warrior
        #[arg(long, default_value = "casual", value_parser = parse_goal)]
        goal: RunnerGoal,
        /// Territory colour as #RRGGBB
        #[arg(long)]
        color: Option<String>,
    },

    /// Replay a GPX or TCX track as a finished run
    Import { file: PathBuf },

    /// Show lifetime and weekly stats
    Stats {
        /// Output JSON only
        #[arg(long)]
        json: bool,
    },

    /// List achievements and progress
    Achievements,

    /// Show the local profile
    Profile,

    /// Write the effective configuration to the config file
    WriteConfig,
}

fn parse_goal(value: &str) -> Result<RunnerGoal, String> {
    value.parse()
}
