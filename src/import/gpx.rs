//! GPX track parser.

use super::{ImportError, TrackPoint};
use chrono::{DateTime, Utc};

/// Convert gpx Time to chrono DateTime
fn gpx_time_to_chrono(time: gpx::Time) -> Option<DateTime<Utc>> {
    // gpx::Time wraps time::OffsetDateTime, convert via string format
    let formatted = time.format().ok()?;
    DateTime::parse_from_rfc3339(&formatted)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Parse GPX content into track points.
///
/// Every `<trkseg>` becomes its own segment, numbered across all tracks in
/// file order.
pub fn parse_gpx(content: &[u8]) -> Result<Vec<TrackPoint>, ImportError> {
    let content_str = std::str::from_utf8(content)
        .map_err(|e| ImportError::ParseError(format!("Invalid UTF-8: {}", e)))?;

    let gpx_data: gpx::Gpx = gpx::read(content_str.as_bytes())
        .map_err(|e| ImportError::ParseError(format!("GPX parse error: {}", e)))?;

    let mut points = Vec::new();
    let mut segment_index = 0;

    for track in gpx_data.tracks {
        for segment in track.segments {
            if segment.points.is_empty() {
                continue;
            }
            for point in segment.points {
                points.push(TrackPoint {
                    latitude: point.point().y(),
                    longitude: point.point().x(),
                    elevation: point.elevation,
                    timestamp: point.time.and_then(gpx_time_to_chrono),
                    segment: segment_index,
                });
            }
            segment_index += 1;
        }
    }

    if points.is_empty() {
        return Err(ImportError::EmptyTrack);
    }

    Ok(points)
}
