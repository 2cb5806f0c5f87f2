//! Territory claims derived from finished runs.
//!
//! A qualifying run claims one circular zone centred on the midpoint of its
//! path. Zones may overlap freely; nothing is merged or contested.

use crate::recording::types::RunRecord;
use crate::tracking::Coordinate;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A claimed circular zone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Territory {
    /// Unique identifier
    pub id: Uuid,
    /// Owner of the claim
    pub user_id: Uuid,
    /// Centre of the zone
    pub center: Coordinate,
    /// Radius in meters
    pub radius_meters: f64,
    /// Display colour (hex)
    pub color: String,
    /// Distance of the run that claimed it (meters)
    pub distance_meters: f64,
    /// When the zone was claimed
    pub captured_at: DateTime<Utc>,
}

/// Sizing rules for claims.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerritoryConfig {
    /// Run distance is divided by this to get the radius
    pub radius_divisor: f64,
    /// Upper bound on the radius in meters
    pub max_radius_meters: f64,
}

impl Default for TerritoryConfig {
    fn default() -> Self {
        Self {
            radius_divisor: 10.0,
            max_radius_meters: 500.0,
        }
    }
}

/// Radius claimed by a run of `distance_meters`.
pub fn claim_radius(distance_meters: f64, config: &TerritoryConfig) -> f64 {
    (distance_meters / config.radius_divisor).min(config.max_radius_meters)
}

/// Claim a territory for `run`, or `None` when the run has no path.
pub fn claim_territory(
    run: &RunRecord,
    user_id: Uuid,
    color: &str,
    config: &TerritoryConfig,
) -> Option<Territory> {
    let center = *run.path.get(run.path.len() / 2)?;

    Some(Territory {
        id: Uuid::new_v4(),
        user_id,
        center,
        radius_meters: claim_radius(run.distance_meters, config),
        color: color.to_string(),
        distance_meters: run.distance_meters,
        captured_at: run.created_at,
    })
}
