use serde::Deserialize;
use tracing::debug;

use wayline_core::error::RoutingError;
use wayline_core::geopoint::GeoPoint;
use wayline_core::route::{RouteResult, Step};
use wayline_core::travel_mode::TravelMode;
use wayline_core::waypoint::{MIN_ROUTE_WAYPOINTS, Waypoint};

use crate::backend::{RouteBackend, coordinate_path, http_error, osrm_maneuver};

pub const MAPBOX_DIRECTIONS_API_URL: &str = "https://api.mapbox.com/directions/v5/mapbox";

pub struct MapboxDirectionsClientParams {
    pub access_token: String,
    pub api_url: String,
}

impl MapboxDirectionsClientParams {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            api_url: MAPBOX_DIRECTIONS_API_URL.to_string(),
        }
    }
}

pub struct MapboxDirectionsClient {
    params: MapboxDirectionsClientParams,
    client: reqwest::Client,
}

#[derive(Deserialize)]
struct MapboxResponse {
    code: String,

    #[serde(default)]
    message: Option<String>,

    #[serde(default)]
    routes: Vec<MapboxRoute>,
}

#[derive(Deserialize)]
struct MapboxRoute {
    geometry: GeoJsonLine,
    legs: Vec<MapboxLeg>,
}

#[derive(Deserialize)]
struct GeoJsonLine {
    coordinates: Vec<[f64; 2]>,
}

#[derive(Deserialize)]
struct MapboxLeg {
    distance: f64,
    duration: f64,
    steps: Vec<MapboxStep>,
}

#[derive(Deserialize)]
struct MapboxStep {
    distance: f64,
    duration: f64,
    maneuver: MapboxManeuver,
}

#[derive(Deserialize)]
struct MapboxManeuver {
    #[serde(default)]
    instruction: String,

    #[serde(rename = "type")]
    kind: String,

    #[serde(default)]
    modifier: Option<String>,

    /// `[lng, lat]`
    location: [f64; 2],
}

impl MapboxDirectionsClient {
    pub fn new(params: MapboxDirectionsClientParams) -> Self {
        Self {
            params,
            client: reqwest::Client::new(),
        }
    }
}

impl RouteBackend for MapboxDirectionsClient {
    async fn compute_route(
        &self,
        waypoints: &[Waypoint],
        mode: TravelMode,
    ) -> Result<RouteResult, RoutingError> {
        if waypoints.len() < MIN_ROUTE_WAYPOINTS {
            return Err(RoutingError::InvalidRequest(
                "at least two waypoints are required".to_string(),
            ));
        }

        let profile = mode.mapbox_profile();
        let url = format!(
            "{}/{}/{}",
            self.params.api_url,
            profile,
            coordinate_path(waypoints)
        );

        debug!(
            waypoints = waypoints.len(),
            profile, "MapboxDirections: requesting route"
        );

        let response = self
            .client
            .get(url)
            .query(&[
                ("access_token", self.params.access_token.as_str()),
                ("alternatives", "false"),
                ("geometries", "geojson"),
                ("overview", "full"),
                ("steps", "true"),
            ])
            .send()
            .await
            .map_err(http_error)?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(error_from_body(status.as_u16(), &message));
        }

        let body: MapboxResponse = response.json().await.map_err(http_error)?;
        normalize(body)
    }
}

/// Non-2xx responses still carry a `{code, message}` body; map the code when
/// it parses, otherwise fall back to the HTTP status.
fn error_from_body(status: u16, body: &str) -> RoutingError {
    if let Ok(parsed) = serde_json::from_str::<MapboxResponse>(body) {
        return code_error(&parsed.code, parsed.message);
    }

    RoutingError::ServiceUnavailable(format!("HTTP {status}: {body}"))
}

fn code_error(code: &str, message: Option<String>) -> RoutingError {
    match code {
        "NoRoute" | "NoSegment" => RoutingError::NoRouteFound,
        "InvalidInput" | "ProfileNotFound" => {
            RoutingError::InvalidRequest(message.unwrap_or_else(|| code.to_string()))
        }
        _ => RoutingError::ServiceUnavailable(message.unwrap_or_else(|| code.to_string())),
    }
}

fn normalize(response: MapboxResponse) -> Result<RouteResult, RoutingError> {
    if response.code != "Ok" {
        return Err(code_error(&response.code, response.message));
    }

    let Some(route) = response.routes.into_iter().next() else {
        return Err(RoutingError::NoRouteFound);
    };

    let mut distance_meters = 0.0;
    let mut duration_seconds = 0.0;
    let mut steps = Vec::new();

    for (leg_index, leg) in route.legs.into_iter().enumerate() {
        distance_meters += leg.distance;
        duration_seconds += leg.duration;

        for (step_index, step) in leg.steps.into_iter().enumerate() {
            let maneuver = step.maneuver;
            steps.push(Step {
                instruction: maneuver.instruction,
                distance_meters: step.distance,
                duration_seconds: step.duration,
                maneuver: osrm_maneuver(&maneuver.kind, maneuver.modifier.as_deref()),
                leg_index,
                step_index,
                start_location: GeoPoint::new(maneuver.location[1], maneuver.location[0]),
            });
        }
    }

    let geometry = route
        .geometry
        .coordinates
        .into_iter()
        .map(|pair| GeoPoint::new(pair[1], pair[0]))
        .collect();

    Ok(RouteResult {
        distance_meters,
        duration_seconds,
        geometry,
        steps,
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wayline_core::route::ManeuverKind;
    use wiremock::matchers::{method, path_regex};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn client_for(server: &MockServer) -> MapboxDirectionsClient {
        MapboxDirectionsClient::new(MapboxDirectionsClientParams {
            access_token: "test-token".to_string(),
            api_url: server.uri(),
        })
    }

    fn stops() -> Vec<Waypoint> {
        vec![
            Waypoint::new(48.85, 2.35, "A"),
            Waypoint::new(48.8, 2.1, "B"),
        ]
    }

    fn ok_response() -> serde_json::Value {
        json!({
            "code": "Ok",
            "routes": [{
                "distance": 2000.0,
                "duration": 540.0,
                "geometry": { "type": "LineString", "coordinates": [[2.35, 48.85], [2.1, 48.8]] },
                "legs": [{
                    "distance": 2000.0,
                    "duration": 540.0,
                    "steps": [
                        {
                            "distance": 1500.0,
                            "duration": 400.0,
                            "maneuver": {
                                "instruction": "Turn left onto Rue A",
                                "type": "turn",
                                "modifier": "left",
                                "location": [2.35, 48.85]
                            }
                        },
                        {
                            "distance": 500.0,
                            "duration": 140.0,
                            "maneuver": {
                                "instruction": "You have arrived",
                                "type": "arrive",
                                "location": [2.1, 48.8]
                            }
                        }
                    ]
                }]
            }]
        })
    }

    #[tokio::test]
    async fn normalizes_geometry_and_steps() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(ok_response()))
            .mount(&server)
            .await;

        let route = client_for(&server)
            .compute_route(&stops(), TravelMode::Driving)
            .await
            .unwrap();

        assert_eq!(route.distance_meters, 2000.0);
        assert_eq!(route.duration_seconds, 540.0);

        // geojson pairs are [lng, lat]
        assert_eq!(route.geometry[0].lat, 48.85);
        assert_eq!(route.geometry[0].lng, 2.35);

        assert_eq!(route.steps[0].maneuver, ManeuverKind::TurnLeft);
        assert_eq!(route.steps[1].maneuver, ManeuverKind::Arrive);
        assert_eq!(route.steps[1].start_location.lat, 48.8);
    }

    #[tokio::test]
    async fn transit_requests_use_the_driving_profile() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path_regex(r"^/driving/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(ok_response()))
            .mount(&server)
            .await;

        let result = client_for(&server)
            .compute_route(&stops(), TravelMode::Transit)
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn coordinates_are_lng_lat_in_the_path() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path_regex(r"^/driving/2\.35,48\.85;2\.1,48\.8$"))
            .respond_with(ResponseTemplate::new(200).set_body_json(ok_response()))
            .mount(&server)
            .await;

        let result = client_for(&server)
            .compute_route(&stops(), TravelMode::Driving)
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn no_route_code_maps_to_no_route_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "code": "NoRoute", "routes": [] })),
            )
            .mount(&server)
            .await;

        let result = client_for(&server)
            .compute_route(&stops(), TravelMode::Cycling)
            .await;

        assert_eq!(result.unwrap_err(), RoutingError::NoRouteFound);
    }

    #[tokio::test]
    async fn invalid_input_maps_to_invalid_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(422).set_body_json(
                json!({ "code": "InvalidInput", "message": "coordinates out of range" }),
            ))
            .mount(&server)
            .await;

        let result = client_for(&server)
            .compute_route(&stops(), TravelMode::Driving)
            .await;

        assert_eq!(
            result.unwrap_err(),
            RoutingError::InvalidRequest("coordinates out of range".to_string())
        );
    }
}
