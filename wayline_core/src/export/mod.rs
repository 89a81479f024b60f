mod deep_link;
mod gpx;

pub use deep_link::{apple_maps_url, google_maps_url};
pub use gpx::write_gpx;
