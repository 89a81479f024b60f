use serde::{Deserialize, Serialize};

const EARTH_RADIUS: f64 = 6_371_000.0;

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Great-circle distance in meters.
    ///
    /// Used for relative ranking between candidate waypoints only; reported
    /// trip distances always come from the routing backend.
    pub fn haversine_distance(&self, other: &GeoPoint) -> f64 {
        let lat1 = self.lat.to_radians();
        let lng1 = self.lng.to_radians();
        let lat2 = other.lat.to_radians();
        let lng2 = other.lng.to_radians();

        let dlat = lat2 - lat1;
        let dlng = lng2 - lng1;

        let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlng / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

        EARTH_RADIUS * c
    }
}

impl From<&GeoPoint> for geo_types::Point {
    fn from(point: &GeoPoint) -> Self {
        geo_types::Point::new(point.lng, point.lat)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn haversine_distance_between_known_cities() {
        let paris = GeoPoint::new(48.8566, 2.3522);
        let london = GeoPoint::new(51.5074, -0.1278);

        let distance = paris.haversine_distance(&london);

        // ~344 km as the crow flies
        assert!((distance - 344_000.0).abs() < 2_000.0);
    }

    #[test]
    fn haversine_distance_is_zero_for_same_point() {
        let point = GeoPoint::new(40.0, -3.7);
        assert_eq!(point.haversine_distance(&point), 0.0);
    }

    #[test]
    fn converts_to_geo_point_with_lng_as_x() {
        let point = GeoPoint::new(48.85, 2.35);
        let converted: geo_types::Point = (&point).into();

        assert_eq!(converted.x(), 2.35);
        assert_eq!(converted.y(), 48.85);
    }
}
