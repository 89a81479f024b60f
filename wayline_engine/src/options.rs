use serde::Deserialize;

use wayline_core::directions::DistanceUnit;
use wayline_core::geopoint::GeoPoint;
use wayline_core::travel_mode::TravelMode;

use crate::surface::RouteStyle;

/// Structured options handed to a session by the hosting widget. Every key
/// has a default, so a partial options object is fine.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RouteOptions {
    pub travel_mode: TravelMode,
    pub distance_unit: DistanceUnit,
    pub optimize_route: bool,
    pub start_point_mode: StartPointMode,
    pub custom_start: Option<GeoPoint>,
    pub marker_style: MarkerStyle,
    pub route_line_color: String,
    pub route_line_weight: u32,
    pub route_line_opacity: f64,
}

impl Default for RouteOptions {
    fn default() -> Self {
        Self {
            travel_mode: TravelMode::default(),
            distance_unit: DistanceUnit::default(),
            optimize_route: false,
            start_point_mode: StartPointMode::default(),
            custom_start: None,
            marker_style: MarkerStyle::default(),
            route_line_color: "#3388ff".to_string(),
            route_line_weight: 5,
            route_line_opacity: 0.8,
        }
    }
}

impl RouteOptions {
    pub fn route_style(&self) -> RouteStyle {
        RouteStyle {
            color: self.route_line_color.clone(),
            weight: self.route_line_weight,
            opacity: self.route_line_opacity,
        }
    }
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StartPointMode {
    UserLocation,
    Custom,
    #[default]
    FirstStop,
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerStyle {
    #[default]
    Numbered,
    Lettered,
}
