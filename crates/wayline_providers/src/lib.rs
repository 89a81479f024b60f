pub mod backend;
pub mod google_api;
pub mod mapbox_api;
pub mod osrm_api;
