use serde::{Deserialize, Serialize};

use crate::route::ManeuverKind;

const MILES_PER_METER: f64 = 0.000_621_371;
const FEET_PER_METER: f64 = 3.280_84;

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceUnit {
    #[default]
    Metric,
    Imperial,
}

/// Formats a distance for display.
///
/// Metric: whole meters under a kilometer, otherwise kilometers to one
/// decimal. Imperial: whole feet under a tenth of a mile, otherwise miles to
/// one decimal.
pub fn format_distance(meters: f64, unit: DistanceUnit) -> String {
    match unit {
        DistanceUnit::Metric => {
            if meters < 1000.0 {
                format!("{} m", meters.round() as i64)
            } else {
                format!("{:.1} km", meters / 1000.0)
            }
        }
        DistanceUnit::Imperial => {
            let miles = meters * MILES_PER_METER;
            if miles < 0.1 {
                format!("{} ft", (meters * FEET_PER_METER).round() as i64)
            } else {
                format!("{miles:.1} mi")
            }
        }
    }
}

/// Formats a duration as hours and minutes. Seconds are truncated, not
/// rounded.
pub fn format_duration(seconds: f64) -> String {
    let total_minutes = (seconds / 60.0).floor() as u64;
    let hours = total_minutes / 60;
    let minutes = total_minutes % 60;

    if hours > 0 {
        format!("{hours} hr {minutes} min")
    } else {
        format!("{minutes} min")
    }
}

/// Icon identifier for a maneuver. Unrecognized maneuvers get no icon
/// rather than an error.
pub fn maneuver_icon(kind: ManeuverKind) -> Option<&'static str> {
    match kind {
        ManeuverKind::TurnLeft => Some("turn-left"),
        ManeuverKind::TurnRight => Some("turn-right"),
        ManeuverKind::Straight => Some("straight"),
        ManeuverKind::Arrive => Some("arrive"),
        ManeuverKind::Other => None,
    }
}
