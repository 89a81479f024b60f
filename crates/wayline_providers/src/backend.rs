use serde::{Deserialize, Serialize};

use wayline_core::error::RoutingError;
use wayline_core::route::{ManeuverKind, RouteResult};
use wayline_core::travel_mode::TravelMode;
use wayline_core::waypoint::Waypoint;

use crate::google_api::{GoogleDirectionsClient, GoogleDirectionsClientParams};
use crate::mapbox_api::{MapboxDirectionsClient, MapboxDirectionsClientParams};
use crate::osrm_api::{OsrmRouteClient, OsrmRouteClientParams};

/// Which backend a session routes through. Fixed for the session's lifetime.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    Google,
    Mapbox,
    Osrm,
}

/// Capability every routing backend exposes: translate an already-decided
/// waypoint order into a normalized [`RouteResult`].
///
/// Implementations fail with a [`RoutingError`] on any non-success outcome
/// and never return a partially filled result. No retries happen here;
/// recovery is caller-initiated.
pub trait RouteBackend {
    fn compute_route(
        &self,
        waypoints: &[Waypoint],
        mode: TravelMode,
    ) -> impl Future<Output = Result<RouteResult, RoutingError>> + Send;
}

/// One adapter selected at construction. The variant never changes
/// afterwards, so call sites dispatch on capability rather than branching
/// on a provider name per request.
pub enum RouteClient {
    Google(GoogleDirectionsClient),
    Mapbox(MapboxDirectionsClient),
    Osrm(OsrmRouteClient),
}

impl RouteClient {
    pub fn google(params: GoogleDirectionsClientParams) -> Self {
        Self::Google(GoogleDirectionsClient::new(params))
    }

    pub fn mapbox(params: MapboxDirectionsClientParams) -> Self {
        Self::Mapbox(MapboxDirectionsClient::new(params))
    }

    pub fn osrm(params: OsrmRouteClientParams) -> Self {
        Self::Osrm(OsrmRouteClient::new(params))
    }

    pub fn kind(&self) -> ProviderKind {
        match self {
            RouteClient::Google(_) => ProviderKind::Google,
            RouteClient::Mapbox(_) => ProviderKind::Mapbox,
            RouteClient::Osrm(_) => ProviderKind::Osrm,
        }
    }
}

impl RouteBackend for RouteClient {
    async fn compute_route(
        &self,
        waypoints: &[Waypoint],
        mode: TravelMode,
    ) -> Result<RouteResult, RoutingError> {
        match self {
            RouteClient::Google(client) => client.compute_route(waypoints, mode).await,
            RouteClient::Mapbox(client) => client.compute_route(waypoints, mode).await,
            RouteClient::Osrm(client) => client.compute_route(waypoints, mode).await,
        }
    }
}

/// Serializes waypoints as `lng,lat` pairs joined by `;`, the path format
/// shared by the Mapbox- and OSRM-style APIs.
pub(crate) fn coordinate_path(waypoints: &[Waypoint]) -> String {
    let pairs: Vec<String> = waypoints
        .iter()
        .map(|waypoint| {
            let point: geo_types::Point = waypoint.into();
            format!("{},{}", point.x(), point.y())
        })
        .collect();

    pairs.join(";")
}

/// Maps an OSRM-style maneuver (shared by Mapbox) onto the internal kind.
pub(crate) fn osrm_maneuver(kind: &str, modifier: Option<&str>) -> ManeuverKind {
    match kind {
        "arrive" => ManeuverKind::Arrive,
        "continue" => ManeuverKind::Straight,
        _ => match modifier {
            Some("left") | Some("sharp left") | Some("slight left") => ManeuverKind::TurnLeft,
            Some("right") | Some("sharp right") | Some("slight right") => ManeuverKind::TurnRight,
            Some("straight") => ManeuverKind::Straight,
            _ => ManeuverKind::Other,
        },
    }
}

pub(crate) fn http_error(err: reqwest::Error) -> RoutingError {
    RoutingError::ServiceUnavailable(err.to_string())
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    #[tokio::test]
    async fn route_client_dispatches_to_the_selected_adapter() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "code": "Ok",
                "routes": [{
                    "geometry": { "type": "LineString", "coordinates": [[2.35, 48.85], [2.1, 48.8]] },
                    "legs": [{ "distance": 1500.0, "duration": 400.0, "steps": [] }]
                }]
            })))
            .mount(&server)
            .await;

        let client = RouteClient::osrm(OsrmRouteClientParams {
            osrm_url: server.uri(),
        });
        assert_eq!(client.kind(), ProviderKind::Osrm);

        let waypoints = vec![
            Waypoint::new(48.85, 2.35, "A"),
            Waypoint::new(48.8, 2.1, "B"),
        ];
        let route = client
            .compute_route(&waypoints, TravelMode::Driving)
            .await
            .unwrap();

        assert_eq!(route.distance_meters, 1500.0);
        assert_eq!(route.duration_seconds, 400.0);
    }

    #[test]
    fn coordinate_path_is_lng_lat_semicolon_joined() {
        let waypoints = vec![
            Waypoint::new(48.85, 2.35, "A"),
            Waypoint::new(48.8, 2.1, "B"),
        ];

        assert_eq!(coordinate_path(&waypoints), "2.35,48.85;2.1,48.8");
    }

    #[test]
    fn maneuver_mapping_covers_turns_and_arrival() {
        assert_eq!(osrm_maneuver("turn", Some("left")), ManeuverKind::TurnLeft);
        assert_eq!(
            osrm_maneuver("turn", Some("sharp right")),
            ManeuverKind::TurnRight
        );
        assert_eq!(osrm_maneuver("arrive", None), ManeuverKind::Arrive);
        assert_eq!(osrm_maneuver("continue", None), ManeuverKind::Straight);
        assert_eq!(osrm_maneuver("roundabout", None), ManeuverKind::Other);
    }
}
