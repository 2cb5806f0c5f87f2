//! Track import: load a recorded GPX or TCX file and replay it as a run.
//!
//! Replay drives a [`RunRecorder`] the same way a live session does, so
//! imported runs go through the same filter and minimum-effort rules. Speed
//! is derived from consecutive timestamps because files rarely carry it.
//! A new segment (GPX `<trkseg>`, TCX lap) is replayed as pause and resume.

pub mod gpx;
pub mod tcx;

use crate::recording::types::{RecorderError, RunRecord};
use crate::recording::RunRecorder;
use crate::tracking::{Coordinate, LocationFix};
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Supported track file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackFormat {
    Gpx,
    Tcx,
}

/// A point read from a track file.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackPoint {
    pub latitude: f64,
    pub longitude: f64,
    pub elevation: Option<f64>,
    pub timestamp: Option<DateTime<Utc>>,
    /// Segment number; a change marks a pause in recording
    pub segment: usize,
}

impl TrackPoint {
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }
}

/// Errors that can occur during track import
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Track contains no points")]
    EmptyTrack,

    #[error("Track point {index} has no timestamp")]
    MissingTimestamp { index: usize },

    #[error("Recorder error: {0}")]
    Recorder(#[from] RecorderError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Detect file format from extension
pub fn detect_format(path: &Path) -> Result<TrackFormat, ImportError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .ok_or_else(|| ImportError::InvalidFormat("No file extension".to_string()))?;

    match ext.as_str() {
        "gpx" => Ok(TrackFormat::Gpx),
        "tcx" => Ok(TrackFormat::Tcx),
        _ => Err(ImportError::InvalidFormat(format!(
            "Unsupported format: {}",
            ext
        ))),
    }
}

/// Read and parse a track file.
pub fn load_track(path: &Path) -> Result<Vec<TrackPoint>, ImportError> {
    if !path.exists() {
        return Err(ImportError::FileNotFound(path.to_path_buf()));
    }

    let format = detect_format(path)?;
    let content = std::fs::read(path)?;

    let points = match format {
        TrackFormat::Gpx => gpx::parse_gpx(&content)?,
        TrackFormat::Tcx => tcx::parse_tcx(&content)?,
    };

    tracing::info!("Loaded {} track points from {}", points.len(), path.display());
    Ok(points)
}

/// Replay `points` through a fresh `recorder` and stop it at the last point.
///
/// Returns `Ok(None)` when the replayed run is below the minimum effort.
pub fn replay_track(
    points: &[TrackPoint],
    recorder: &mut RunRecorder,
) -> Result<Option<RunRecord>, ImportError> {
    let timed = points
        .iter()
        .enumerate()
        .map(|(index, point)| {
            point
                .timestamp
                .map(|ts| (point, ts))
                .ok_or(ImportError::MissingTimestamp { index })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let (first, started_at) = *timed.first().ok_or(ImportError::EmptyTrack)?;
    recorder.start(started_at)?;

    let mut active_ms: i64 = 0;
    let mut ticked: i64 = 0;
    let mut previous: Option<(&TrackPoint, DateTime<Utc>)> = None;
    let mut segment = first.segment;

    for (index, &(point, timestamp)) in timed.iter().enumerate() {
        let mut fix = LocationFix::new(point.latitude, point.longitude, timestamp);

        if point.segment != segment {
            recorder.pause()?;
            recorder.resume()?;
            segment = point.segment;
            previous = None;
        }

        if let Some((last, last_time)) = previous {
            let elapsed_ms = (timestamp - last_time).num_milliseconds();
            let meters = last.coordinate().distance_to(&point.coordinate());
            if elapsed_ms > 0 {
                active_ms += elapsed_ms;
                fix = fix.with_speed(meters / (elapsed_ms as f64 / 1000.0));
            } else if meters > 0.0 {
                // Movement with no elapsed time has no finite speed
                tracing::debug!(index, meters, elapsed_ms, "Skipping untimed jump");
                continue;
            }
        }

        let due = active_ms / 1000 - ticked;
        if due > 0 {
            recorder.tick(u32::try_from(due).unwrap_or(u32::MAX))?;
            ticked += due;
        }

        recorder.record_fix(&fix)?;
        previous = Some((point, timestamp));
    }

    let ended_at = timed
        .last()
        .map(|&(_, ts)| ts)
        .unwrap_or(started_at);

    Ok(recorder.stop(ended_at)?)
}

/// Load a track file and replay it.
pub fn import_run(path: &Path, recorder: &mut RunRecorder) -> Result<Option<RunRecord>, ImportError> {
    let points = load_track(path)?;
    replay_track(&points, recorder)
}
