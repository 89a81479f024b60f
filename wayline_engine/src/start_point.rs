use std::time::Duration;

use tokio::time::timeout;
use tracing::debug;

use wayline_core::geopoint::GeoPoint;
use wayline_core::waypoint::Waypoint;

use crate::options::StartPointMode;
use crate::sources::LocationSource;

/// Upper bound on how long start-point resolution may suspend on a
/// device-location lookup.
pub const GEOLOCATION_TIMEOUT: Duration = Duration::from_secs(10);

/// Resolves the route's start. Always completes within
/// [`GEOLOCATION_TIMEOUT`] and yields a set with a designated start, or the
/// set unchanged when it is empty.
///
/// Geolocation denial, timeout, or absence is not an error: it silently
/// degrades to first-stop behavior.
pub async fn resolve_start_point<L: LocationSource>(
    mode: StartPointMode,
    waypoints: Vec<Waypoint>,
    custom_start: Option<GeoPoint>,
    location: &L,
) -> Vec<Waypoint> {
    match mode {
        StartPointMode::FirstStop => mark_first_as_start(waypoints),
        StartPointMode::Custom => match custom_start {
            Some(position) => {
                let start = Waypoint::new(position.lat, position.lng, "Start").as_start();
                prepend_start(waypoints, start)
            }
            None => mark_first_as_start(waypoints),
        },
        StartPointMode::UserLocation => {
            match timeout(GEOLOCATION_TIMEOUT, location.current_position()).await {
                Ok(Ok(position)) => {
                    let mut start =
                        Waypoint::new(position.lat, position.lng, "Your location").as_start();
                    start.is_user_location = true;
                    prepend_start(waypoints, start)
                }
                Ok(Err(err)) => {
                    debug!(%err, "geolocation unavailable, falling back to first stop");
                    mark_first_as_start(waypoints)
                }
                Err(_) => {
                    debug!("geolocation timed out, falling back to first stop");
                    mark_first_as_start(waypoints)
                }
            }
        }
    }
}

fn mark_first_as_start(mut waypoints: Vec<Waypoint>) -> Vec<Waypoint> {
    for waypoint in waypoints.iter_mut() {
        waypoint.is_start = false;
    }
    if let Some(first) = waypoints.first_mut() {
        first.is_start = true;
    }
    waypoints
}

fn prepend_start(mut waypoints: Vec<Waypoint>, start: Waypoint) -> Vec<Waypoint> {
    for waypoint in waypoints.iter_mut() {
        waypoint.is_start = false;
    }
    waypoints.insert(0, start);
    waypoints
}
