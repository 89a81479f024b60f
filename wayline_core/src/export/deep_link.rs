use crate::travel_mode::TravelMode;
use crate::waypoint::{MIN_ROUTE_WAYPOINTS, Waypoint};

fn coord_pair(waypoint: &Waypoint) -> String {
    format!("{},{}", waypoint.position.lat, waypoint.position.lng)
}

/// Builds a Google Maps directions deep link for the given waypoints, first
/// to last, with intermediates as pipe-separated stopovers. Returns `None`
/// below two waypoints (export precondition).
pub fn google_maps_url(waypoints: &[Waypoint], mode: TravelMode) -> Option<String> {
    if waypoints.len() < MIN_ROUTE_WAYPOINTS {
        return None;
    }

    let origin = &waypoints[0];
    let destination = &waypoints[waypoints.len() - 1];

    let mut url = String::from("https://www.google.com/maps/dir/?api=1");
    url.push_str(&format!("&origin={}", coord_pair(origin)));
    url.push_str(&format!("&destination={}", coord_pair(destination)));
    url.push_str(&format!("&travelmode={}", mode.google_link_mode()));

    let intermediates = &waypoints[1..waypoints.len() - 1];
    if !intermediates.is_empty() {
        let joined: Vec<String> = intermediates.iter().map(coord_pair).collect();
        // The pipe separator is not a valid query character and must be
        // percent-encoded.
        url.push_str(&format!("&waypoints={}", joined.join("%7C")));
    }

    Some(url)
}

/// Builds an Apple Maps deep link from the first to the last waypoint.
/// Apple Maps takes a single source/destination pair, so intermediates are
/// dropped. Returns `None` below two waypoints.
pub fn apple_maps_url(waypoints: &[Waypoint], mode: TravelMode) -> Option<String> {
    if waypoints.len() < MIN_ROUTE_WAYPOINTS {
        return None;
    }

    let start = &waypoints[0];
    let end = &waypoints[waypoints.len() - 1];

    Some(format!(
        "https://maps.apple.com/?saddr={}&daddr={}&dirflg={}",
        coord_pair(start),
        coord_pair(end),
        mode.apple_flag(),
    ))
}
