use serde::{Deserialize, Serialize};

use crate::geopoint::GeoPoint;

/// Normalized route produced by a provider adapter. Created whole per
/// successful computation; never partially populated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteResult {
    pub distance_meters: f64,
    pub duration_seconds: f64,
    pub geometry: Vec<GeoPoint>,
    pub steps: Vec<Step>,
}

/// One atomic instruction within a leg. Steps are ordered within a leg and
/// legs are ordered within the route; the flattened sequence keeps both
/// indices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    pub instruction: String,
    pub distance_meters: f64,
    pub duration_seconds: f64,
    pub maneuver: ManeuverKind,
    pub leg_index: usize,
    pub step_index: usize,
    pub start_location: GeoPoint,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ManeuverKind {
    TurnLeft,
    TurnRight,
    Straight,
    Arrive,
    Other,
}
