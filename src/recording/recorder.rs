//! Run recorder owning the lifecycle of one active run.
//!
//! `Idle -> Running <-> Paused -> Stopped`. Elapsed time only accrues
//! through [`RunRecorder::tick`] while running, and fixes are only filtered
//! while running. Stopping is terminal; start a fresh recorder for the next run.

use crate::progression::xp_for_run;
use crate::recording::types::{
    LiveRunSummary, RecorderConfig, RecorderError, RecordingStatus, RunRecord,
};
use crate::tracking::{FixOutcome, GpsFilter, LocationFix};
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Records one run from location fixes and duration ticks.
#[derive(Debug, Clone)]
pub struct RunRecorder {
    /// Configuration
    config: RecorderConfig,
    /// Current recording status
    status: RecordingStatus,
    /// Location filter holding path and distance
    filter: GpsFilter,
    /// When start() was called
    started_at: Option<DateTime<Utc>>,
    /// Accrued active time
    elapsed_seconds: u32,
}

impl RunRecorder {
    /// Create a new run recorder.
    pub fn new(config: RecorderConfig) -> Self {
        Self {
            filter: GpsFilter::new(config.filter),
            config,
            status: RecordingStatus::Idle,
            started_at: None,
            elapsed_seconds: 0,
        }
    }

    /// Create a new run recorder with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(RecorderConfig::default())
    }

    /// Start recording.
    pub fn start(&mut self, now: DateTime<Utc>) -> Result<(), RecorderError> {
        match self.status {
            RecordingStatus::Idle => {}
            RecordingStatus::Stopped => return Err(RecorderError::Finished),
            _ => return Err(RecorderError::AlreadyStarted),
        }

        self.started_at = Some(now);
        self.status = RecordingStatus::Running;

        tracing::info!("Started recording run");
        Ok(())
    }

    /// Filter a location fix into the run.
    pub fn record_fix(&mut self, fix: &LocationFix) -> Result<FixOutcome, RecorderError> {
        if self.status != RecordingStatus::Running {
            return Err(RecorderError::NotRunning);
        }

        Ok(self.filter.apply(fix))
    }

    /// Accrue active time. Returns the new elapsed total.
    pub fn tick(&mut self, seconds: u32) -> Result<u32, RecorderError> {
        if self.status != RecordingStatus::Running {
            return Err(RecorderError::NotRunning);
        }

        self.elapsed_seconds = self.elapsed_seconds.saturating_add(seconds);
        Ok(self.elapsed_seconds)
    }

    /// Pause recording.
    pub fn pause(&mut self) -> Result<(), RecorderError> {
        if self.status != RecordingStatus::Running {
            return Err(RecorderError::NotRunning);
        }

        self.status = RecordingStatus::Paused;
        tracing::info!(elapsed = self.elapsed_seconds, "Paused run");
        Ok(())
    }

    /// Resume recording. The next fix seeds a new path segment.
    pub fn resume(&mut self) -> Result<(), RecorderError> {
        if self.status != RecordingStatus::Paused {
            return Err(RecorderError::NotPaused);
        }

        self.filter.break_segment();
        self.status = RecordingStatus::Running;
        tracing::info!("Resumed run");
        Ok(())
    }

    /// Stop the run.
    ///
    /// Returns `Ok(None)` when the run is below the minimum-effort threshold;
    /// such runs leave no trace.
    pub fn stop(&mut self, now: DateTime<Utc>) -> Result<Option<RunRecord>, RecorderError> {
        let started_at = match (self.status, self.started_at) {
            (RecordingStatus::Running | RecordingStatus::Paused, Some(started_at)) => started_at,
            (RecordingStatus::Stopped, _) => return Err(RecorderError::Finished),
            _ => return Err(RecorderError::NotRunning),
        };

        self.status = RecordingStatus::Stopped;

        let filter = std::mem::take(&mut self.filter);
        let (path, distance_meters, max_speed) = filter.into_parts();
        let duration_seconds = self.elapsed_seconds;

        if !self.config.qualifies(distance_meters, duration_seconds) {
            tracing::debug!(
                distance_meters,
                duration_seconds,
                "Discarding run below minimum effort"
            );
            return Ok(None);
        }

        let avg_pace = if duration_seconds > 0 {
            distance_meters / f64::from(duration_seconds)
        } else {
            0.0
        };

        let territory_gained = if self.config.meters_per_territory_unit > 0.0 {
            (distance_meters / self.config.meters_per_territory_unit).floor() as u32
        } else {
            0
        };

        let run = RunRecord {
            id: Uuid::new_v4(),
            start_time: started_at,
            end_time: now,
            duration_seconds,
            distance_meters,
            avg_pace,
            max_speed,
            path,
            xp_earned: xp_for_run(distance_meters, duration_seconds),
            territory_gained,
            created_at: now,
        };

        tracing::info!(
            "Finished run {}: {:.0} m in {} s, {} XP",
            run.id,
            run.distance_meters,
            run.duration_seconds,
            run.xp_earned
        );
        Ok(Some(run))
    }

    /// Current recording status.
    pub fn status(&self) -> RecordingStatus {
        self.status
    }

    /// Accrued active seconds.
    pub fn elapsed_seconds(&self) -> u32 {
        self.elapsed_seconds
    }

    /// Credited distance so far.
    pub fn distance_meters(&self) -> f64 {
        self.filter.distance_meters()
    }

    /// Snapshot of live statistics.
    pub fn live_summary(&self) -> LiveRunSummary {
        LiveRunSummary {
            status: self.status,
            elapsed_seconds: self.elapsed_seconds,
            distance_meters: self.filter.distance_meters(),
            current_speed: self.filter.current_speed(),
            max_speed: self.filter.max_speed(),
            path_len: self.filter.path().len(),
        }
    }
}
