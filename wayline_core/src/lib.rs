pub mod directions;
pub mod error;
pub mod export;
pub mod geopoint;
pub mod optimizer;
pub mod route;
pub mod travel_mode;
pub mod waypoint;
