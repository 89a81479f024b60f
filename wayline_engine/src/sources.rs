use thiserror::Error;

use wayline_core::geopoint::GeoPoint;
use wayline_core::waypoint::Waypoint;

/// Why a device-location lookup produced no position. Never surfaced to the
/// user; start-point resolution falls back to first-stop semantics instead.
#[derive(Debug, Error)]
pub enum GeolocationError {
    #[error("location permission denied")]
    Denied,

    #[error("location unavailable")]
    Unavailable,
}

/// Device-location capability of the host. The lookup itself may suspend;
/// the engine bounds it with a timeout.
pub trait LocationSource {
    fn current_position(
        &self,
    ) -> impl Future<Output = Result<GeoPoint, GeolocationError>> + Send;
}

/// For hosts without any location capability.
pub struct NoLocation;

impl LocationSource for NoLocation {
    async fn current_position(&self) -> Result<GeoPoint, GeolocationError> {
        Err(GeolocationError::Unavailable)
    }
}

/// Collaborator that fetches the ordered stop list attached to a piece of
/// content from a named data source.
pub trait WaypointSource {
    fn fetch_waypoints(
        &self,
        content_id: &str,
        source_name: &str,
    ) -> impl Future<Output = anyhow::Result<Vec<Waypoint>>> + Send;
}
