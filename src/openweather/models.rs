//! OpenWeatherMap API response structures and conversion to internal models
//!
//! Responses are kept as the JSON the provider sent, so the proxy routes
//! return them unchanged, alongside a typed view of the fields this crate
//! reads.

use std::result::Result as StdResult;

use chrono::DateTime;
use serde::de::{self, DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

use crate::models::{CurrentConditions, Location, RawForecastSample};
use crate::units::{CompassPoint, HumidityLevel};
use crate::{Result, WeatherlyError};

/// Upstream JSON document together with its typed view `T`.
///
/// Serializes back to exactly the JSON that was received.
#[derive(Debug, Clone, PartialEq)]
pub struct UpstreamJson<T> {
    raw: Value,
    data: T,
}

impl<T> UpstreamJson<T> {
    /// Typed view of the response
    pub fn data(&self) -> &T {
        &self.data
    }

    /// The response exactly as received
    pub fn raw(&self) -> &Value {
        &self.raw
    }
}

impl<T: DeserializeOwned> TryFrom<Value> for UpstreamJson<T> {
    type Error = serde_json::Error;

    fn try_from(raw: Value) -> StdResult<Self, Self::Error> {
        let data = T::deserialize(&raw)?;
        Ok(Self { raw, data })
    }
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for UpstreamJson<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> StdResult<Self, D::Error> {
        let raw = Value::deserialize(deserializer)?;
        Self::try_from(raw).map_err(de::Error::custom)
    }
}

impl<T> Serialize for UpstreamJson<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> StdResult<S::Ok, S::Error> {
        self.raw.serialize(serializer)
    }
}

/// Direct geocoding response (`/geo/1.0/direct`)
pub type GeocodingResponse = UpstreamJson<Vec<GeocodingResult>>;
/// Current weather response (`/data/2.5/weather`)
pub type CurrentWeatherResponse = UpstreamJson<CurrentWeather>;
/// 5 day / 3 hour forecast response (`/data/2.5/forecast`)
pub type ForecastResponse = UpstreamJson<Forecast>;

/// Entry of the direct geocoding response
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GeocodingResult {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
}

/// Weather condition entry (`weather[]`)
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Condition {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
}

/// Temperature and humidity block (`main`)
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MainReadings {
    #[serde(default)]
    pub temp: Option<f64>,
    #[serde(default)]
    pub feels_like: Option<f64>,
    #[serde(default)]
    pub temp_min: Option<f64>,
    #[serde(default)]
    pub temp_max: Option<f64>,
    #[serde(default)]
    pub humidity: Option<u8>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Wind {
    #[serde(default)]
    pub speed: Option<f64>,
    #[serde(default)]
    pub deg: Option<f64>,
}

/// Fields of the current weather response used for reports
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CurrentWeather {
    #[serde(default)]
    pub weather: Vec<Condition>,
    #[serde(default)]
    pub main: Option<MainReadings>,
    #[serde(default)]
    pub wind: Option<Wind>,
    pub dt: i64,
    #[serde(default)]
    pub name: Option<String>,
}

/// One entry of the forecast `list`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ForecastItem {
    pub dt: i64,
    #[serde(default)]
    pub main: Option<MainReadings>,
    #[serde(default)]
    pub weather: Vec<Condition>,
}

/// Fields of the forecast response used for reports
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Forecast {
    #[serde(default)]
    pub list: Vec<ForecastItem>,
}

impl Forecast {
    /// Convert every entry into a raw sample, failing on the first malformed one
    pub fn samples(&self) -> Result<Vec<RawForecastSample>> {
        self.list.iter().map(RawForecastSample::try_from).collect()
    }
}

fn first_condition<'a>(weather: &'a [Condition], context: &str) -> Result<(&'a str, &'a str)> {
    let condition = weather
        .first()
        .ok_or_else(|| WeatherlyError::missing_field(format!("{context}.weather[0]")))?;
    let description = condition.description.as_deref().ok_or_else(|| {
        WeatherlyError::missing_field(format!("{context}.weather[0].description"))
    })?;
    let icon = condition
        .icon
        .as_deref()
        .ok_or_else(|| WeatherlyError::missing_field(format!("{context}.weather[0].icon")))?;
    Ok((description, icon))
}

fn require<T: Copy>(value: Option<T>, field: &str) -> Result<T> {
    value.ok_or_else(|| WeatherlyError::missing_field(field))
}

// Convert OpenWeatherMap API responses to internal models
impl TryFrom<&ForecastItem> for RawForecastSample {
    type Error = WeatherlyError;

    fn try_from(item: &ForecastItem) -> Result<Self> {
        let main = item
            .main
            .as_ref()
            .ok_or_else(|| WeatherlyError::missing_field("list[].main"))?;
        let (description, icon) = first_condition(&item.weather, "list[]")?;

        Ok(Self {
            timestamp: item.dt,
            temp_min: require(main.temp_min, "list[].main.temp_min")?,
            temp_max: require(main.temp_max, "list[].main.temp_max")?,
            icon: icon.to_string(),
            description: description.to_string(),
        })
    }
}

impl TryFrom<&CurrentWeather> for CurrentConditions {
    type Error = WeatherlyError;

    fn try_from(response: &CurrentWeather) -> Result<Self> {
        let main = response
            .main
            .as_ref()
            .ok_or_else(|| WeatherlyError::missing_field("main"))?;
        let wind = response
            .wind
            .as_ref()
            .ok_or_else(|| WeatherlyError::missing_field("wind"))?;
        let (description, icon) = first_condition(&response.weather, "current")?;

        let humidity = require(main.humidity, "main.humidity")?;
        let wind_degrees = require(wind.deg, "wind.deg")?;

        Ok(Self {
            temperature: require(main.temp, "main.temp")?,
            feels_like: require(main.feels_like, "main.feels_like")?,
            humidity,
            humidity_level: HumidityLevel::from_percent(humidity),
            wind_speed: require(wind.speed, "wind.speed")?,
            wind_degrees,
            wind_direction: CompassPoint::from_degrees(wind_degrees),
            description: description.to_string(),
            icon: icon.to_string(),
            observed_at: DateTime::from_timestamp(response.dt, 0).ok_or(
                WeatherlyError::InvalidTimestamp {
                    timestamp: response.dt,
                },
            )?,
        })
    }
}

impl From<&GeocodingResult> for Location {
    fn from(result: &GeocodingResult) -> Self {
        Self {
            latitude: result.lat,
            longitude: result.lon,
            name: result.name.clone(),
            country: result.country.clone(),
            state: result.state.clone(),
        }
    }
}
