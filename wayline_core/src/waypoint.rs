use serde::{Deserialize, Serialize};

use crate::geopoint::GeoPoint;

/// A route needs at least an origin and a destination.
pub const MIN_ROUTE_WAYPOINTS: usize = 2;

/// A single geographic stop. Order within a waypoint list is significant:
/// it represents the visiting sequence, not an unordered set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub position: GeoPoint,
    pub label: String,

    #[serde(default)]
    pub address: String,

    #[serde(default)]
    pub permalink: Option<String>,

    /// At most one waypoint in a set carries this flag.
    #[serde(default)]
    pub is_start: bool,

    /// Set on the synthetic waypoint prepended from a device-location lookup.
    #[serde(default)]
    pub is_user_location: bool,
}

impl Waypoint {
    pub fn new(lat: f64, lng: f64, label: impl Into<String>) -> Self {
        Self {
            position: GeoPoint::new(lat, lng),
            label: label.into(),
            address: String::new(),
            permalink: None,
            is_start: false,
            is_user_location: false,
        }
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = address.into();
        self
    }

    pub fn with_permalink(mut self, permalink: impl Into<String>) -> Self {
        self.permalink = Some(permalink.into());
        self
    }

    pub fn as_start(mut self) -> Self {
        self.is_start = true;
        self
    }
}

impl From<&Waypoint> for geo_types::Point {
    fn from(waypoint: &Waypoint) -> Self {
        (&waypoint.position).into()
    }
}

pub fn is_routable(waypoints: &[Waypoint]) -> bool {
    waypoints.len() >= MIN_ROUTE_WAYPOINTS
}
