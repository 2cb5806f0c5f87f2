//! Location filter that turns a noisy fix stream into a trusted path.
//!
//! Each fix passes two gates: a speed gate that rejects vehicle-speed or
//! glitched readings, and a distance gate that drops sub-noise jitter and
//! signal-reacquisition jumps. Only fixes that clear both gates move the
//! last-accepted pointer and credit distance.

use super::types::{Coordinate, LocationFix};
use serde::{Deserialize, Serialize};

/// Mean Earth radius used by the haversine formula (meters).
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Great-circle distance between two coordinates in meters.
pub fn haversine_distance(from: &Coordinate, to: &Coordinate) -> f64 {
    let d_lat = (to.latitude - from.latitude).to_radians();
    let d_lon = (to.longitude - from.longitude).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + from.latitude.to_radians().cos()
            * to.latitude.to_radians().cos()
            * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().asin();

    EARTH_RADIUS_METERS * c
}

/// Filter thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Fixes reporting a speed above this (m/s) are rejected outright
    pub max_speed_mps: f64,
    /// Steps must be strictly longer than this to be credited (meters)
    pub min_step_meters: f64,
    /// Steps must be strictly shorter than this to be credited (meters)
    pub max_step_meters: f64,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            max_speed_mps: 12.0,
            min_step_meters: 2.0,
            max_step_meters: 200.0,
        }
    }
}

/// What the filter did with a fix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FixOutcome {
    /// Speed above the ceiling; nothing changed
    SpeedRejected { speed: f64 },
    /// No previous fix; the coordinate starts the path without distance credit
    Seeded,
    /// Step cleared the distance gate and was credited
    Accepted { meters: f64 },
    /// Step too short (jitter) or too long (jump); nothing changed
    DistanceRejected { meters: f64 },
}

impl FixOutcome {
    /// Whether the fix was appended to the path.
    pub fn is_accepted(&self) -> bool {
        matches!(self, FixOutcome::Seeded | FixOutcome::Accepted { .. })
    }

    /// Distance credited by this fix.
    pub fn credited_meters(&self) -> f64 {
        match self {
            FixOutcome::Accepted { meters } => *meters,
            _ => 0.0,
        }
    }
}

/// Decide the fate of `fix` given the last accepted coordinate.
pub fn evaluate_fix(
    last_accepted: Option<&Coordinate>,
    fix: &LocationFix,
    config: &FilterConfig,
) -> FixOutcome {
    let speed = fix.reported_speed();
    if speed > config.max_speed_mps {
        return FixOutcome::SpeedRejected { speed };
    }

    let Some(last) = last_accepted else {
        return FixOutcome::Seeded;
    };

    let meters = haversine_distance(last, &fix.coordinate());
    if meters > config.min_step_meters && meters < config.max_step_meters {
        FixOutcome::Accepted { meters }
    } else {
        FixOutcome::DistanceRejected { meters }
    }
}

/// Stateful filter accumulating the accepted path of one run.
#[derive(Debug, Clone)]
pub struct GpsFilter {
    config: FilterConfig,
    last_accepted: Option<Coordinate>,
    path: Vec<Coordinate>,
    distance_meters: f64,
    current_speed: f64,
    max_speed: f64,
}

impl GpsFilter {
    /// Create an empty filter.
    pub fn new(config: FilterConfig) -> Self {
        Self {
            config,
            last_accepted: None,
            path: Vec::new(),
            distance_meters: 0.0,
            current_speed: 0.0,
            max_speed: 0.0,
        }
    }

    /// Create an empty filter with default thresholds.
    pub fn with_defaults() -> Self {
        Self::new(FilterConfig::default())
    }

    /// Feed one fix through both gates and update state accordingly.
    pub fn apply(&mut self, fix: &LocationFix) -> FixOutcome {
        let outcome = evaluate_fix(self.last_accepted.as_ref(), fix, &self.config);

        match outcome {
            FixOutcome::SpeedRejected { speed } => {
                tracing::trace!(speed, "Fix rejected by speed gate");
            }
            FixOutcome::DistanceRejected { meters } => {
                self.current_speed = fix.reported_speed();
                tracing::trace!(meters, "Fix rejected by distance gate");
            }
            FixOutcome::Seeded | FixOutcome::Accepted { .. } => {
                let coordinate = fix.coordinate();
                let speed = fix.reported_speed();
                self.current_speed = speed;
                self.max_speed = self.max_speed.max(speed);
                self.distance_meters += outcome.credited_meters();
                self.path.push(coordinate);
                self.last_accepted = Some(coordinate);
            }
        }

        outcome
    }

    /// Forget the last accepted fix so the next one seeds a new segment.
    pub fn break_segment(&mut self) {
        self.last_accepted = None;
        self.current_speed = 0.0;
    }

    /// Accepted path so far.
    pub fn path(&self) -> &[Coordinate] {
        &self.path
    }

    /// Credited distance in meters.
    pub fn distance_meters(&self) -> f64 {
        self.distance_meters
    }

    /// Speed of the latest fix that passed the speed gate.
    pub fn current_speed(&self) -> f64 {
        self.current_speed
    }

    /// Highest speed reported by an accepted fix.
    pub fn max_speed(&self) -> f64 {
        self.max_speed
    }

    /// Last accepted coordinate, if any.
    pub fn last_accepted(&self) -> Option<&Coordinate> {
        self.last_accepted.as_ref()
    }

    /// Consume the filter, returning path, distance and max speed.
    pub fn into_parts(self) -> (Vec<Coordinate>, f64, f64) {
        (self.path, self.distance_meters, self.max_speed)
    }
}

impl Default for GpsFilter {
    fn default() -> Self {
        Self::with_defaults()
    }
}
