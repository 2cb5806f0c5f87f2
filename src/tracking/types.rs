//! Location types shared by the filter, the recorder and territories.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A geographic position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    /// Latitude in degrees (-90..90)
    pub latitude: f64,
    /// Longitude in degrees (-180..180)
    pub longitude: f64,
}

impl Coordinate {
    /// Create a coordinate.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Great-circle distance to another coordinate in meters.
    pub fn distance_to(&self, other: &Coordinate) -> f64 {
        super::filter::haversine_distance(self, other)
    }
}

/// A single GPS sample delivered by the location source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocationFix {
    /// Latitude in degrees
    pub latitude: f64,
    /// Longitude in degrees
    pub longitude: f64,
    /// Reported ground speed in m/s, if the device provided one
    pub speed: Option<f64>,
    /// When the sample was taken
    pub timestamp: DateTime<Utc>,
}

impl LocationFix {
    /// Create a fix without a reported speed.
    pub fn new(latitude: f64, longitude: f64, timestamp: DateTime<Utc>) -> Self {
        Self {
            latitude,
            longitude,
            speed: None,
            timestamp,
        }
    }

    /// Attach a reported speed in m/s.
    pub fn with_speed(mut self, speed: f64) -> Self {
        self.speed = Some(speed);
        self
    }

    /// Position of this fix.
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }

    /// Speed used by the filter. Missing, negative or NaN readings count as 0.
    ///
    /// Infinite readings are kept so the speed gate rejects them.
    pub fn reported_speed(&self) -> f64 {
        self.speed.filter(|s| *s > 0.0).unwrap_or(0.0)
    }
}
