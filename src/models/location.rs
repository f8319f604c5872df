//! Location model for geocoded places

use serde::{Deserialize, Serialize};

/// Geocoded place
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Location {
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
    /// Place name as reported by the geocoder
    pub name: String,
    /// Country code (ISO 3166-1 alpha-2)
    pub country: Option<String>,
    /// State or region, when the geocoder knows one
    pub state: Option<String>,
}

impl Location {
    /// Format location as coordinates string
    #[must_use]
    pub fn format_coordinates(&self) -> String {
        format!("{:.4}, {:.4}", self.latitude, self.longitude)
    }
}
