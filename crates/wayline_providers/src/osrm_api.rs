use serde::Deserialize;
use tracing::debug;

use wayline_core::error::RoutingError;
use wayline_core::geopoint::GeoPoint;
use wayline_core::route::{RouteResult, Step};
use wayline_core::travel_mode::TravelMode;
use wayline_core::waypoint::{MIN_ROUTE_WAYPOINTS, Waypoint};

use crate::backend::{RouteBackend, coordinate_path, http_error, osrm_maneuver};

pub const OSRM_ROUTE_API_PATH: &str = "/route/v1";

pub struct OsrmRouteClientParams {
    pub osrm_url: String,
}

pub struct OsrmRouteClient {
    params: OsrmRouteClientParams,
    client: reqwest::Client,
}

#[derive(Deserialize)]
struct OsrmResponse {
    code: String,

    #[serde(default)]
    message: Option<String>,

    #[serde(default)]
    routes: Vec<OsrmRoute>,
}

#[derive(Deserialize)]
struct OsrmRoute {
    geometry: GeoJsonLine,
    legs: Vec<OsrmLeg>,
}

#[derive(Deserialize)]
struct GeoJsonLine {
    coordinates: Vec<[f64; 2]>,
}

#[derive(Deserialize)]
struct OsrmLeg {
    distance: f64,
    duration: f64,
    steps: Vec<OsrmStep>,
}

#[derive(Deserialize)]
struct OsrmStep {
    distance: f64,
    duration: f64,

    /// Road name, often empty.
    #[serde(default)]
    name: String,

    maneuver: OsrmManeuver,
}

#[derive(Deserialize)]
struct OsrmManeuver {
    #[serde(rename = "type")]
    kind: String,

    #[serde(default)]
    modifier: Option<String>,

    /// `[lng, lat]`
    location: [f64; 2],
}

impl OsrmRouteClient {
    pub fn new(params: OsrmRouteClientParams) -> Self {
        Self {
            params,
            client: reqwest::Client::new(),
        }
    }
}

impl RouteBackend for OsrmRouteClient {
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

        let profile = mode.osrm_profile();
        let mut url = self.params.osrm_url.clone();
        url.push_str(OSRM_ROUTE_API_PATH);
        url.push('/');
        url.push_str(profile);
        url.push('/');
        url.push_str(&coordinate_path(waypoints));

        debug!(
            waypoints = waypoints.len(),
            profile, "OsrmRoute: requesting route"
        );

        let response = self
            .client
            .get(url)
            .query(&[
                ("overview", "full"),
                ("geometries", "geojson"),
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

        let body: OsrmResponse = response.json().await.map_err(http_error)?;
        normalize(body)
    }
}

/// OSRM reports request errors as non-2xx with a `{code, message}` body.
fn error_from_body(status: u16, body: &str) -> RoutingError {
    if let Ok(parsed) = serde_json::from_str::<OsrmResponse>(body) {
        return code_error(&parsed.code, parsed.message);
    }

    RoutingError::ServiceUnavailable(format!("HTTP {status}: {body}"))
}

fn code_error(code: &str, message: Option<String>) -> RoutingError {
    match code {
        "NoRoute" | "NoSegment" => RoutingError::NoRouteFound,
        "InvalidUrl" | "InvalidService" | "InvalidOptions" | "InvalidQuery" | "InvalidValue" => {
            RoutingError::InvalidRequest(message.unwrap_or_else(|| code.to_string()))
        }
        _ => RoutingError::ServiceUnavailable(message.unwrap_or_else(|| code.to_string())),
    }
}

fn normalize(response: OsrmResponse) -> Result<RouteResult, RoutingError> {
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
                instruction: instruction_text(&maneuver.kind, maneuver.modifier.as_deref(), &step.name),
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

/// OSRM steps carry no instruction text, only a maneuver type/modifier and a
/// road name, so a readable instruction is assembled here.
fn instruction_text(kind: &str, modifier: Option<&str>, name: &str) -> String {
    let action = match (kind, modifier) {
        ("depart", _) => "Head out".to_string(),
        ("arrive", _) => "Arrive at destination".to_string(),
        ("continue", _) => "Continue".to_string(),
        (_, Some(modifier)) => format!("Turn {modifier}"),
        (kind, None) => {
            let mut chars = kind.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        }
    };

    if name.is_empty() || kind == "arrive" {
        action
    } else {
        format!("{action} onto {name}")
    }
}
