//! Forecast models: raw provider samples and normalized forecast days

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::WeatherCondition;
use crate::WeatherlyError;

/// One three-hourly forecast entry as delivered by the provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawForecastSample {
    /// Forecast time, Unix seconds
    pub timestamp: i64,
    /// Minimum temperature in Celsius
    pub temp_min: f64,
    /// Maximum temperature in Celsius
    pub temp_max: f64,
    /// Provider icon code, e.g. `10d`
    pub icon: String,
    /// Human-readable description, e.g. `light rain`
    pub description: String,
}

/// Weather summary for one calendar day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastDay {
    /// Calendar date (UTC)
    pub date: NaiveDate,
    /// Weekday name, e.g. `Monday`
    pub day: String,
    /// Lowest temperature of the day
    pub min_temp: f64,
    /// Highest temperature of the day
    pub max_temp: f64,
    /// Icon code of the first sample of the day
    pub icon: String,
    /// Description of the first sample of the day
    pub description: String,
    pub condition: WeatherCondition,
    /// Padded day copied from the last real day rather than forecast data
    #[serde(default)]
    pub synthetic: bool,
}

/// Exactly three forecast days in ascending date order, or none at all
/// when the provider returned no samples.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<ForecastDay>", into = "Vec<ForecastDay>")]
pub struct NormalizedForecast {
    days: Vec<ForecastDay>,
}

impl NormalizedForecast {
    /// Number of days every non-empty forecast carries
    pub const DAYS: usize = 3;

    pub(crate) fn from_days(days: Vec<ForecastDay>) -> Self {
        debug_assert!(days.is_empty() || days.len() == Self::DAYS);
        Self { days }
    }

    #[must_use]
    pub fn days(&self) -> &[ForecastDay] {
        &self.days
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.days.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub(crate) fn days_mut(&mut self) -> &mut [ForecastDay] {
        &mut self.days
    }
}

impl TryFrom<Vec<ForecastDay>> for NormalizedForecast {
    type Error = WeatherlyError;

    fn try_from(days: Vec<ForecastDay>) -> Result<Self, Self::Error> {
        if !days.is_empty() && days.len() != Self::DAYS {
            return Err(WeatherlyError::validation(format!(
                "A forecast has {} days, got {}",
                Self::DAYS,
                days.len()
            )));
        }
        if days.windows(2).any(|pair| pair[0].date >= pair[1].date) {
            return Err(WeatherlyError::validation(
                "Forecast days must be in ascending date order",
            ));
        }
        Ok(Self { days })
    }
}

impl From<NormalizedForecast> for Vec<ForecastDay> {
    fn from(forecast: NormalizedForecast) -> Self {
        forecast.days
    }
}
