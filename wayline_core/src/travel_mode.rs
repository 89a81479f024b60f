use serde::{Deserialize, Serialize};

/// Internal travel-mode vocabulary. Each backend speaks its own dialect;
/// the translation tables below are fixed and must not drift.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TravelMode {
    #[default]
    Driving,
    Walking,
    Cycling,
    Transit,
}

impl TravelMode {
    /// Google-style directions mode.
    pub fn google_mode(self) -> &'static str {
        match self {
            TravelMode::Driving => "DRIVING",
            TravelMode::Walking => "WALKING",
            TravelMode::Cycling => "BICYCLING",
            TravelMode::Transit => "TRANSIT",
        }
    }

    /// Mapbox-style profile. Transit has no profile and falls back to driving.
    pub fn mapbox_profile(self) -> &'static str {
        match self {
            TravelMode::Driving | TravelMode::Transit => "driving",
            TravelMode::Walking => "walking",
            TravelMode::Cycling => "cycling",
        }
    }

    /// OSRM-style profile. Transit has no profile and falls back to car.
    pub fn osrm_profile(self) -> &'static str {
        match self {
            TravelMode::Driving | TravelMode::Transit => "car",
            TravelMode::Walking => "foot",
            TravelMode::Cycling => "bike",
        }
    }

    /// `travelmode` value for Google Maps deep links.
    pub fn google_link_mode(self) -> &'static str {
        match self {
            TravelMode::Driving => "driving",
            TravelMode::Walking => "walking",
            TravelMode::Cycling => "bicycling",
            TravelMode::Transit => "transit",
        }
    }

    /// `dirflg` value for Apple Maps deep links. Cycling has no native flag
    /// and falls back to the walking flag.
    pub fn apple_flag(self) -> &'static str {
        match self {
            TravelMode::Driving => "d",
            TravelMode::Walking | TravelMode::Cycling => "w",
            TravelMode::Transit => "r",
        }
    }
}
