//! GPS tracking: location types and the jitter/teleport filter.

pub mod filter;
pub mod types;

pub use filter::{evaluate_fix, haversine_distance, FilterConfig, FixOutcome, GpsFilter};
pub use types::{Coordinate, LocationFix};
