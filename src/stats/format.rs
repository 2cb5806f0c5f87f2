//! Display formatting for distances, paces and durations.

/// Format meters as `"850m"` below one kilometer and `"1.25km"` above.
pub fn format_distance(meters: f64) -> String {
    if meters < 1000.0 {
        format!("{}m", meters.round())
    } else {
        format!("{:.2}km", meters / 1000.0)
    }
}

/// Format a speed in m/s as a `m:ss` pace per kilometer.
pub fn format_pace(meters_per_second: f64) -> String {
    if !meters_per_second.is_finite() || meters_per_second <= 0.0 {
        return "--:--".to_string();
    }

    let seconds_per_km = (1000.0 / meters_per_second).round();
    if seconds_per_km > f64::from(u32::MAX) {
        return "--:--".to_string();
    }

    let total = seconds_per_km as u32;
    format!("{}:{:02}", total / 60, total % 60)
}

/// Format a duration in seconds to H:MM:SS, or M:SS under an hour.
pub fn format_duration(seconds: u32) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{}:{:02}", minutes, secs)
    }
}
