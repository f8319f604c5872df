//! Current conditions at a location

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::units::{CompassPoint, HumidityLevel};

/// Observed weather right now
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    /// Temperature in Celsius
    pub temperature: f64,
    /// Perceived temperature in Celsius
    pub feels_like: f64,
    /// Relative humidity in percent
    pub humidity: u8,
    pub humidity_level: HumidityLevel,
    /// Wind speed as reported by the provider for the requested units
    pub wind_speed: f64,
    /// Wind heading in degrees
    pub wind_degrees: f64,
    pub wind_direction: CompassPoint,
    pub description: String,
    pub icon: String,
    /// Observation time
    pub observed_at: DateTime<Utc>,
}
