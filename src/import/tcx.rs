//! TCX activity parser.

use super::{ImportError, TrackPoint};
use chrono::{DateTime, Utc};
use quick_xml::de::from_str;
use serde::Deserialize;

/// Parse TCX content into track points. Each lap is its own segment.
pub fn parse_tcx(content: &[u8]) -> Result<Vec<TrackPoint>, ImportError> {
    let content_str = std::str::from_utf8(content)
        .map_err(|e| ImportError::ParseError(format!("Invalid UTF-8: {}", e)))?;

    let tcx: TrainingCenterDatabase = from_str(content_str)
        .map_err(|e| ImportError::ParseError(format!("TCX parse error: {}", e)))?;

    let mut points = Vec::new();
    let mut segment = 0;

    let laps = tcx
        .activities
        .into_iter()
        .flat_map(|a| a.activity)
        .flat_map(|a| a.lap);

    for lap in laps {
        let before = points.len();
        for trackpoint in lap.track.into_iter().flat_map(|t| t.trackpoint) {
            let Some(position) = trackpoint.position else {
                continue;
            };
            points.push(TrackPoint {
                latitude: position.latitude_degrees,
                longitude: position.longitude_degrees,
                elevation: trackpoint.altitude_meters,
                timestamp: trackpoint.time.as_deref().and_then(parse_time),
                segment,
            });
        }
        if points.len() > before {
            segment += 1;
        }
    }

    if points.is_empty() {
        return Err(ImportError::EmptyTrack);
    }

    Ok(points)
}

fn parse_time(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

// TCX XML structures

#[derive(Debug, Deserialize)]
#[serde(rename = "TrainingCenterDatabase")]
struct TrainingCenterDatabase {
    #[serde(rename = "Activities")]
    activities: Option<Activities>,
}

#[derive(Debug, Deserialize)]
struct Activities {
    #[serde(rename = "Activity", default)]
    activity: Vec<Activity>,
}

#[derive(Debug, Deserialize)]
struct Activity {
    #[serde(rename = "Lap", default)]
    lap: Vec<Lap>,
}

#[derive(Debug, Deserialize)]
struct Lap {
    #[serde(rename = "Track")]
    track: Option<Track>,
}

#[derive(Debug, Deserialize)]
struct Track {
    #[serde(rename = "Trackpoint", default)]
    trackpoint: Vec<Trackpoint>,
}

#[derive(Debug, Deserialize)]
struct Trackpoint {
    #[serde(rename = "Time")]
    time: Option<String>,
    #[serde(rename = "Position")]
    position: Option<Position>,
    #[serde(rename = "AltitudeMeters")]
    altitude_meters: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct Position {
    #[serde(rename = "LatitudeDegrees")]
    latitude_degrees: f64,
    #[serde(rename = "LongitudeDegrees")]
    longitude_degrees: f64,
}
