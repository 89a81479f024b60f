use serde::Deserialize;
use tracing::debug;

use wayline_core::error::RoutingError;
use wayline_core::geopoint::GeoPoint;
use wayline_core::route::{ManeuverKind, RouteResult, Step};
use wayline_core::travel_mode::TravelMode;
use wayline_core::waypoint::{MIN_ROUTE_WAYPOINTS, Waypoint};

use crate::backend::{RouteBackend, http_error};

pub const GOOGLE_DIRECTIONS_API_URL: &str = "https://maps.googleapis.com/maps/api/directions/json";

pub struct GoogleDirectionsClientParams {
    pub api_key: String,
    pub api_url: String,
}

impl GoogleDirectionsClientParams {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_url: GOOGLE_DIRECTIONS_API_URL.to_string(),
        }
    }
}

pub struct GoogleDirectionsClient {
    params: GoogleDirectionsClientParams,
    client: reqwest::Client,
}

#[derive(Deserialize)]
struct DirectionsResponse {
    status: String,

    #[serde(default)]
    error_message: Option<String>,

    #[serde(default)]
    routes: Vec<GoogleRoute>,
}

#[derive(Deserialize)]
struct GoogleRoute {
    overview_polyline: GooglePolyline,
    legs: Vec<GoogleLeg>,
}

#[derive(Deserialize)]
struct GooglePolyline {
    points: String,
}

#[derive(Deserialize)]
struct GoogleLeg {
    distance: GoogleValue,
    duration: GoogleValue,
    steps: Vec<GoogleStep>,
}

/// Value in meters or seconds; the accompanying display text is ignored
/// because formatting is done locally.
#[derive(Deserialize)]
struct GoogleValue {
    value: f64,
}

#[derive(Deserialize)]
struct GoogleStep {
    html_instructions: String,
    distance: GoogleValue,
    duration: GoogleValue,

    #[serde(default)]
    maneuver: Option<String>,

    start_location: GoogleLatLng,
}

#[derive(Deserialize)]
struct GoogleLatLng {
    lat: f64,
    lng: f64,
}

impl GoogleDirectionsClient {
    pub fn new(params: GoogleDirectionsClientParams) -> Self {
        Self {
            params,
            client: reqwest::Client::new(),
        }
    }
}

impl RouteBackend for GoogleDirectionsClient {
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

        let origin = coord_pair(&waypoints[0]);
        let destination = coord_pair(&waypoints[waypoints.len() - 1]);

        let mut query = vec![
            ("origin", origin),
            ("destination", destination),
            ("mode", mode.google_mode().to_string()),
            ("alternatives", "false".to_string()),
            ("key", self.params.api_key.clone()),
        ];

        // Intermediates are ordered, non-reorderable stopovers. The order
        // was already decided upstream, so the backend's own reoptimization
        // (the `optimize:true` prefix) must stay disabled.
        let intermediates = &waypoints[1..waypoints.len() - 1];
        if !intermediates.is_empty() {
            let stopovers: Vec<String> = intermediates.iter().map(coord_pair).collect();
            query.push(("waypoints", stopovers.join("|")));
        }

        debug!(
            waypoints = waypoints.len(),
            mode = mode.google_mode(),
            "GoogleDirections: requesting route"
        );

        let response = self
            .client
            .get(&self.params.api_url)
            .query(&query)
            .send()
            .await
            .map_err(http_error)?;

        if !response.status().is_success() {
            let status = response.status();
            let message = response.text().await.unwrap_or_default();
            return Err(RoutingError::ServiceUnavailable(format!(
                "HTTP {status}: {message}"
            )));
        }

        let body: DirectionsResponse = response.json().await.map_err(http_error)?;
        normalize(body)
    }
}

fn coord_pair(waypoint: &Waypoint) -> String {
    format!("{},{}", waypoint.position.lat, waypoint.position.lng)
}

fn normalize(response: DirectionsResponse) -> Result<RouteResult, RoutingError> {
    match response.status.as_str() {
        "OK" => {}
        "ZERO_RESULTS" | "NOT_FOUND" => return Err(RoutingError::NoRouteFound),
        "INVALID_REQUEST" | "MAX_WAYPOINTS_EXCEEDED" => {
            return Err(RoutingError::InvalidRequest(
                response
                    .error_message
                    .unwrap_or_else(|| response.status.clone()),
            ));
        }
        _ => {
            return Err(RoutingError::ServiceUnavailable(
                response
                    .error_message
                    .unwrap_or_else(|| response.status.clone()),
            ));
        }
    }

    let Some(route) = response.routes.into_iter().next() else {
        return Err(RoutingError::NoRouteFound);
    };

    let mut distance_meters = 0.0;
    let mut duration_seconds = 0.0;
    let mut steps = Vec::new();

    for (leg_index, leg) in route.legs.into_iter().enumerate() {
        distance_meters += leg.distance.value;
        duration_seconds += leg.duration.value;

        for (step_index, step) in leg.steps.into_iter().enumerate() {
            steps.push(Step {
                instruction: step.html_instructions,
                distance_meters: step.distance.value,
                duration_seconds: step.duration.value,
                maneuver: google_maneuver(step.maneuver.as_deref()),
                leg_index,
                step_index,
                start_location: GeoPoint::new(step.start_location.lat, step.start_location.lng),
            });
        }
    }

    let geometry = decode_polyline(&route.overview_polyline.points);
    debug!(
        legs = ?steps.last().map(|s| s.leg_index + 1),
        steps = steps.len(),
        "GoogleDirections: normalized route"
    );

    Ok(RouteResult {
        distance_meters,
        duration_seconds,
        geometry,
        steps,
    })
}

fn google_maneuver(maneuver: Option<&str>) -> ManeuverKind {
    match maneuver {
        Some("turn-left") | Some("turn-sharp-left") | Some("turn-slight-left") => {
            ManeuverKind::TurnLeft
        }
        Some("turn-right") | Some("turn-sharp-right") | Some("turn-slight-right") => {
            ManeuverKind::TurnRight
        }
        Some("straight") => ManeuverKind::Straight,
        _ => ManeuverKind::Other,
    }
}

/// Decodes the standard 1e-5 encoded polyline format used for the overview
/// geometry. Stops cleanly at the first malformed byte.
fn decode_polyline(encoded: &str) -> Vec<GeoPoint> {
    let bytes = encoded.as_bytes();
    let mut points = Vec::new();
    let mut index = 0;
    let mut lat: i64 = 0;
    let mut lng: i64 = 0;

    while index < bytes.len() {
        let Some((dlat, next)) = decode_value(bytes, index) else {
            break;
        };
        let Some((dlng, next)) = decode_value(bytes, next) else {
            break;
        };

        lat += dlat;
        lng += dlng;
        index = next;

        points.push(GeoPoint::new(lat as f64 * 1e-5, lng as f64 * 1e-5));
    }

    points
}

fn decode_value(bytes: &[u8], mut index: usize) -> Option<(i64, usize)> {
    let mut result: i64 = 0;
    let mut shift = 0;

    loop {
        let chunk = i64::from(*bytes.get(index)?) - 63;
        if chunk < 0 {
            return None;
        }

        result |= (chunk & 0x1f) << shift;
        shift += 5;
        index += 1;

        if chunk < 0x20 {
            break;
        }
    }

    let value = if result & 1 == 1 {
        !(result >> 1)
    } else {
        result >> 1
    };

    Some((value, index))
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{method, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn client_for(server: &MockServer) -> GoogleDirectionsClient {
        GoogleDirectionsClient::new(GoogleDirectionsClientParams {
            api_key: "test-key".to_string(),
            api_url: server.uri(),
        })
    }

    fn stops() -> Vec<Waypoint> {
        vec![
            Waypoint::new(48.85, 2.35, "A"),
            Waypoint::new(48.8, 2.1, "B"),
            Waypoint::new(48.6, 2.45, "C"),
        ]
    }

    fn two_leg_response() -> serde_json::Value {
        json!({
            "status": "OK",
            "routes": [{
                "overview_polyline": { "points": "_p~iF~ps|U_ulLnnqC" },
                "legs": [
                    {
                        "distance": { "value": 1200.0, "text": "1.2 km" },
                        "duration": { "value": 300.0, "text": "5 mins" },
                        "steps": [
                            {
                                "html_instructions": "Head north",
                                "distance": { "value": 700.0 },
                                "duration": { "value": 180.0 },
                                "start_location": { "lat": 48.85, "lng": 2.35 }
                            },
                            {
                                "html_instructions": "Turn left onto Rue A",
                                "distance": { "value": 500.0 },
                                "duration": { "value": 120.0 },
                                "maneuver": "turn-left",
                                "start_location": { "lat": 48.84, "lng": 2.3 }
                            }
                        ]
                    },
                    {
                        "distance": { "value": 800.0, "text": "0.8 km" },
                        "duration": { "value": 240.0, "text": "4 mins" },
                        "steps": [
                            {
                                "html_instructions": "Turn right onto Rue B",
                                "distance": { "value": 800.0 },
                                "duration": { "value": 240.0 },
                                "maneuver": "turn-right",
                                "start_location": { "lat": 48.8, "lng": 2.1 }
                            }
                        ]
                    }
                ]
            }]
        })
    }

    #[tokio::test]
    async fn sums_legs_and_flattens_steps() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(two_leg_response()))
            .mount(&server)
            .await;

        let route = client_for(&server)
            .compute_route(&stops(), TravelMode::Driving)
            .await
            .unwrap();

        assert_eq!(route.distance_meters, 2000.0);
        assert_eq!(route.duration_seconds, 540.0);
        assert_eq!(route.steps.len(), 3);

        assert_eq!(route.steps[0].leg_index, 0);
        assert_eq!(route.steps[0].step_index, 0);
        assert_eq!(route.steps[1].maneuver, ManeuverKind::TurnLeft);
        assert_eq!(route.steps[2].leg_index, 1);
        assert_eq!(route.steps[2].step_index, 0);
        assert_eq!(route.steps[2].maneuver, ManeuverKind::TurnRight);

        assert!(!route.geometry.is_empty());
    }

    #[tokio::test]
    async fn transit_mode_is_sent_unmodified() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("mode", "TRANSIT"))
            .respond_with(ResponseTemplate::new(200).set_body_json(two_leg_response()))
            .mount(&server)
            .await;

        let result = client_for(&server)
            .compute_route(&stops(), TravelMode::Transit)
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn intermediates_are_sent_as_ordered_stopovers() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("origin", "48.85,2.35"))
            .and(query_param("destination", "48.6,2.45"))
            .and(query_param("waypoints", "48.8,2.1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(two_leg_response()))
            .mount(&server)
            .await;

        let result = client_for(&server)
            .compute_route(&stops(), TravelMode::Driving)
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn zero_results_maps_to_no_route_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "status": "ZERO_RESULTS", "routes": [] })),
            )
            .mount(&server)
            .await;

        let result = client_for(&server)
            .compute_route(&stops(), TravelMode::Driving)
            .await;

        assert_eq!(result.unwrap_err(), RoutingError::NoRouteFound);
    }

    #[tokio::test]
    async fn server_error_maps_to_service_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let result = client_for(&server)
            .compute_route(&stops(), TravelMode::Driving)
            .await;

        assert!(matches!(
            result.unwrap_err(),
            RoutingError::ServiceUnavailable(_)
        ));
    }

    #[test]
    fn ok_status_with_empty_route_list_is_no_route_found() {
        let response = DirectionsResponse {
            status: "OK".to_string(),
            error_message: None,
            routes: vec![],
        };
        assert_eq!(normalize(response).unwrap_err(), RoutingError::NoRouteFound);
    }

    #[test]
    fn decodes_reference_polyline() {
        let points = decode_polyline("_p~iF~ps|U_ulLnnqC_mqNvxq`@");

        assert_eq!(points.len(), 3);
        assert!((points[0].lat - 38.5).abs() < 1e-9);
        assert!((points[0].lng - -120.2).abs() < 1e-9);
        assert!((points[1].lat - 40.7).abs() < 1e-9);
        assert!((points[2].lng - -126.453).abs() < 1e-9);
    }
}
