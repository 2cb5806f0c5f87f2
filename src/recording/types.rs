//! Recording types for run capture.

use crate::tracking::{Coordinate, FilterConfig};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Status of the run recorder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordingStatus {
    /// Not started yet
    #[default]
    Idle,
    /// Actively recording; time accrues and fixes are filtered
    Running,
    /// Recording paused; time and fixes are ignored
    Paused,
    /// Run finished; this recorder cannot be restarted
    Stopped,
}

impl std::fmt::Display for RecordingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordingStatus::Idle => write!(f, "READY"),
            RecordingStatus::Running => write!(f, "LIVE"),
            RecordingStatus::Paused => write!(f, "PAUSED"),
            RecordingStatus::Stopped => write!(f, "STOPPED"),
        }
    }
}

/// A finished, qualifying run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunRecord {
    /// Unique identifier
    pub id: Uuid,
    /// When the run was started
    pub start_time: DateTime<Utc>,
    /// When the run was stopped
    pub end_time: DateTime<Utc>,
    /// Active (unpaused) time in seconds
    pub duration_seconds: u32,
    /// Credited distance in meters
    pub distance_meters: f64,
    /// Average speed in m/s
    pub avg_pace: f64,
    /// Highest accepted speed in m/s
    pub max_speed: f64,
    /// Accepted path in order
    pub path: Vec<Coordinate>,
    /// XP awarded, frozen at finalization
    pub xp_earned: u64,
    /// Territory units gained (one per 100 m)
    pub territory_gained: u32,
    /// Record creation timestamp
    pub created_at: DateTime<Utc>,
}

impl RunRecord {
    /// Calendar date (UTC) the run was completed on.
    pub fn completed_on(&self) -> NaiveDate {
        self.created_at.date_naive()
    }
}

/// Configuration for the run recorder.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecorderConfig {
    /// Runs must cover strictly more than this to be kept (meters)
    pub min_distance_meters: f64,
    /// Runs must last strictly longer than this to be kept (seconds)
    pub min_duration_seconds: u32,
    /// Meters of distance per territory unit
    pub meters_per_territory_unit: f64,
    /// Location filter thresholds
    #[serde(skip)]
    pub filter: FilterConfig,
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self {
            min_distance_meters: 10.0,
            min_duration_seconds: 10,
            meters_per_territory_unit: 100.0,
            filter: FilterConfig::default(),
        }
    }
}

impl RecorderConfig {
    /// Use the given filter thresholds.
    pub fn with_filter(mut self, filter: FilterConfig) -> Self {
        self.filter = filter;
        self
    }

    /// Whether a run of this size clears the minimum-effort threshold.
    pub fn qualifies(&self, distance_meters: f64, duration_seconds: u32) -> bool {
        distance_meters > self.min_distance_meters && duration_seconds > self.min_duration_seconds
    }
}

/// Live statistics for an in-progress run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LiveRunSummary {
    /// Recorder status
    pub status: RecordingStatus,
    /// Active seconds so far
    pub elapsed_seconds: u32,
    /// Credited distance in meters
    pub distance_meters: f64,
    /// Latest speed in m/s
    pub current_speed: f64,
    /// Highest accepted speed in m/s
    pub max_speed: f64,
    /// Number of accepted path points
    pub path_len: usize,
}

/// Errors from the run recorder.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecorderError {
    /// Start called on a recorder that already started
    #[error("Run already started")]
    AlreadyStarted,

    /// Operation requires a running recorder
    #[error("Run is not running")]
    NotRunning,

    /// Resume called on a recorder that is not paused
    #[error("Run is not paused")]
    NotPaused,

    /// Recorder has already been stopped
    #[error("Run already finished")]
    Finished,
}
