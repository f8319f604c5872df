//! Unit, direction and date conversions used when presenting weather data

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::WeatherlyError;

/// Temperature unit requested by a client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TemperatureUnit {
    #[default]
    #[serde(rename = "C")]
    Celsius,
    #[serde(rename = "F")]
    Fahrenheit,
}

impl TemperatureUnit {
    #[must_use]
    pub fn symbol(self) -> &'static str {
        match self {
            TemperatureUnit::Celsius => "C",
            TemperatureUnit::Fahrenheit => "F",
        }
    }
}

impl fmt::Display for TemperatureUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "°{}", self.symbol())
    }
}

impl FromStr for TemperatureUnit {
    type Err = WeatherlyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "C" | "c" => Ok(TemperatureUnit::Celsius),
            "F" | "f" => Ok(TemperatureUnit::Fahrenheit),
            other => Err(WeatherlyError::validation(format!(
                "Unknown temperature unit '{other}'. Use 'C' or 'F'."
            ))),
        }
    }
}

/// Convert a Celsius reading to the requested unit, rounded to a whole degree.
///
/// Rounding is half away from zero: `2.5 -> 3`, `-2.5 -> -3`.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn convert_temperature(celsius: f64, unit: TemperatureUnit) -> i32 {
    let value = match unit {
        TemperatureUnit::Fahrenheit => celsius * 9.0 / 5.0 + 32.0,
        TemperatureUnit::Celsius => celsius,
    };
    value.round() as i32
}

/// Eight-point compass rose
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompassPoint {
    N,
    NE,
    E,
    SE,
    S,
    SW,
    W,
    NW,
}

impl CompassPoint {
    const ROSE: [CompassPoint; 8] = [
        CompassPoint::N,
        CompassPoint::NE,
        CompassPoint::E,
        CompassPoint::SE,
        CompassPoint::S,
        CompassPoint::SW,
        CompassPoint::W,
        CompassPoint::NW,
    ];

    /// Map a heading in degrees (any real number) to its nearest compass point.
    ///
    /// Headings are wrapped into `[0, 360)` first, so `-10` reads like `350`.
    /// Sector boundaries round half up: `22.5` is `NE`, `337.5` is `N`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn from_degrees(degrees: f64) -> Self {
        if !degrees.is_finite() {
            return CompassPoint::N;
        }
        let sector = (degrees.rem_euclid(360.0) / 45.0).round() as usize % 8;
        Self::ROSE[sector]
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            CompassPoint::N => "N",
            CompassPoint::NE => "NE",
            CompassPoint::E => "E",
            CompassPoint::SE => "SE",
            CompassPoint::S => "S",
            CompassPoint::SW => "SW",
            CompassPoint::W => "W",
            CompassPoint::NW => "NW",
        }
    }
}

impl fmt::Display for CompassPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Format an observation time like `January 5, 2024 3:07 PM` in `tz`
#[must_use]
pub fn format_observation_time(time: DateTime<Utc>, tz: Tz) -> String {
    time.with_timezone(&tz)
        .format("%B %-d, %Y %-I:%M %p")
        .to_string()
}

/// Full weekday name of a calendar date, e.g. `Monday`
#[must_use]
pub fn format_day_name(date: NaiveDate) -> String {
    date.format("%A").to_string()
}

/// Coarse relative humidity band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HumidityLevel {
    Low,
    Normal,
    High,
}

impl HumidityLevel {
    #[must_use]
    pub fn from_percent(humidity: u8) -> Self {
        match humidity {
            0..30 => HumidityLevel::Low,
            30..60 => HumidityLevel::Normal,
            _ => HumidityLevel::High,
        }
    }
}
