//! User profile and application configuration.

use crate::progression::level_for_xp;
use crate::recording::types::RecorderConfig;
use crate::territory::TerritoryConfig;
use crate::tracking::FilterConfig;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Default territory colour for new profiles.
pub const DEFAULT_TERRITORY_COLOR: &str = "#E8952E";

/// Palette offered for territory colours.
pub const TERRITORY_COLORS: [&str; 10] = [
    "#E8952E", "#FF6B35", "#34C759", "#5AC8FA", "#AF52DE", "#FF453A", "#FFD60A", "#4A90D9",
    "#FF2D55", "#00C7BE",
];

/// What the runner is playing for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunnerGoal {
    /// Run for fun and health
    #[default]
    Casual,
    /// Climb the leaderboards
    Competitor,
    /// Discover new territories
    Explorer,
    /// Conquer and defend
    Warrior,
}

impl RunnerGoal {
    /// Storage key for this goal.
    pub fn as_str(&self) -> &'static str {
        match self {
            RunnerGoal::Casual => "casual",
            RunnerGoal::Competitor => "competitor",
            RunnerGoal::Explorer => "explorer",
            RunnerGoal::Warrior => "warrior",
        }
    }
}

impl std::str::FromStr for RunnerGoal {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "casual" => Ok(RunnerGoal::Casual),
            "competitor" => Ok(RunnerGoal::Competitor),
            "explorer" => Ok(RunnerGoal::Explorer),
            "warrior" => Ok(RunnerGoal::Warrior),
            other => Err(format!("unknown goal: {}", other)),
        }
    }
}

impl std::fmt::Display for RunnerGoal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunnerGoal::Casual => write!(f, "Casual Runner"),
            RunnerGoal::Competitor => write!(f, "Competitor"),
            RunnerGoal::Explorer => write!(f, "Explorer"),
            RunnerGoal::Warrior => write!(f, "Territory Warrior"),
        }
    }
}

/// User profile with identity fields and cumulative progression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Unique identifier
    pub id: Uuid,
    /// Display name
    pub username: String,
    /// Contact email
    pub email: String,
    /// Avatar key
    pub avatar: String,
    /// Free-form bio
    pub bio: String,
    /// Chosen goal
    pub goal: RunnerGoal,
    /// Country name
    pub country: String,
    /// State or region
    pub state: String,
    /// Colour used for claimed territories
    pub territory_color: String,
    /// Total experience
    pub xp: u64,
    /// Level derived from `xp`
    pub level: u32,
    /// Lifetime distance in meters
    pub total_distance_meters: f64,
    /// Lifetime qualifying runs
    pub total_runs: u32,
    /// Consecutive days with a run
    pub current_streak: u32,
    /// Best streak ever
    pub longest_streak: u32,
    /// Calendar date of the latest run
    pub last_run_date: Option<NaiveDate>,
    /// Profile creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp
    pub updated_at: DateTime<Utc>,
}

impl UserProfile {
    /// Create a fresh level-1 profile.
    pub fn new(username: String, email: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            username,
            email,
            avatar: "avatar_1".to_string(),
            bio: String::new(),
            goal: RunnerGoal::default(),
            country: String::new(),
            state: String::new(),
            territory_color: DEFAULT_TERRITORY_COLOR.to_string(),
            xp: 0,
            level: level_for_xp(0),
            total_distance_meters: 0.0,
            total_runs: 0,
            current_streak: 0,
            longest_streak: 0,
            last_run_date: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Change the territory colour. Must be a `#RRGGBB` hex string.
    pub fn set_territory_color(&mut self, color: &str) -> Result<(), &'static str> {
        if !Self::validate_color(color) {
            return Err("Territory colour must look like #RRGGBB");
        }
        self.territory_color = color.to_string();
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Validate a `#RRGGBB` colour.
    pub fn validate_color(color: &str) -> bool {
        color.len() == 7
            && color.starts_with('#')
            && color[1..].chars().all(|c| c.is_ascii_hexdigit())
    }

    /// Whether the stored level agrees with the stored XP.
    pub fn level_consistent(&self) -> bool {
        self.level == level_for_xp(self.xp)
    }
}

/// Storage-related settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// Database file name inside the data directory
    pub database_file: String,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            database_file: "runconquer.db".to_string(),
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Application version
    pub version: String,
    /// Data directory path
    #[serde(skip)]
    pub data_dir: PathBuf,
    /// Location filter thresholds
    pub tracking: FilterConfig,
    /// Run recording settings
    pub recording: RecorderConfig,
    /// Territory sizing
    pub territory: TerritoryConfig,
    /// Storage settings
    pub storage: StorageSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            data_dir: PathBuf::new(),
            tracking: FilterConfig::default(),
            recording: RecorderConfig::default(),
            territory: TerritoryConfig::default(),
            storage: StorageSettings::default(),
        }
    }
}

impl AppConfig {
    /// Recorder settings with the configured filter thresholds applied.
    pub fn recorder_config(&self) -> RecorderConfig {
        self.recording.with_filter(self.tracking)
    }

    /// Full path of the database file.
    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join(&self.storage.database_file)
    }
}

/// Get the application data directory.
pub fn get_data_dir() -> PathBuf {
    directories::ProjectDirs::from("com", "runconquer", "RunConquer")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Get the configuration file path.
pub fn get_config_path() -> PathBuf {
    get_data_dir().join("config.toml")
}

/// Load application configuration from the default location.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    let mut config = load_config_from(&get_config_path())?;
    config.data_dir = get_data_dir();
    Ok(config)
}

/// Load configuration from `path`, falling back to defaults if it does not exist.
///
/// The data directory is set to the file's parent directory.
pub fn load_config_from(path: &Path) -> Result<AppConfig, ConfigError> {
    let data_dir = path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));

    if !path.exists() {
        tracing::debug!("No config at {}, using defaults", path.display());
        return Ok(AppConfig {
            data_dir,
            ..Default::default()
        });
    }

    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;

    let mut config: AppConfig =
        toml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))?;

    config.data_dir = data_dir;

    Ok(config)
}

/// Save application configuration to the default location.
pub fn save_config(config: &AppConfig) -> Result<(), ConfigError> {
    save_config_to(config, &get_config_path())
}

/// Save application configuration to `path`.
pub fn save_config_to(config: &AppConfig, path: &Path) -> Result<(), ConfigError> {
    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| ConfigError::IoError(e.to_string()))?;
    }

    let content =
        toml::to_string_pretty(config).map_err(|e| ConfigError::SerializeError(e.to_string()))?;

    std::fs::write(path, content).map_err(|e| ConfigError::IoError(e.to_string()))?;

    Ok(())
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Serialize error: {0}")]
    SerializeError(String),
}
