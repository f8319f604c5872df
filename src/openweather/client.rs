//! OpenWeatherMap HTTP client
//!
//! The API key and base URLs come from [`ProviderConfig`]; nothing is read
//! from the process environment here.

use std::fmt;
use std::str::FromStr;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use super::models::{CurrentWeatherResponse, ForecastResponse, GeocodingResponse};
use crate::config::ProviderConfig;
use crate::{Result, WeatherlyError};

/// Measurement system understood by the OpenWeatherMap `units` parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    /// Celsius, m/s
    #[default]
    Metric,
    /// Fahrenheit, mph
    Imperial,
    /// Kelvin, m/s
    Standard,
}

impl UnitSystem {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            UnitSystem::Metric => "metric",
            UnitSystem::Imperial => "imperial",
            UnitSystem::Standard => "standard",
        }
    }
}

impl fmt::Display for UnitSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UnitSystem {
    type Err = WeatherlyError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "metric" => Ok(UnitSystem::Metric),
            "imperial" => Ok(UnitSystem::Imperial),
            "standard" => Ok(UnitSystem::Standard),
            other => Err(WeatherlyError::validation(format!(
                "Unknown units '{other}'. Use metric, imperial or standard."
            ))),
        }
    }
}

/// Source of geocoding, current weather and forecast data
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    /// Look up places matching a city name, best match first
    async fn geocode(&self, city: &str, limit: u8) -> Result<GeocodingResponse>;

    /// Current weather at a coordinate
    async fn current_weather(
        &self,
        latitude: f64,
        longitude: f64,
        units: UnitSystem,
    ) -> Result<CurrentWeatherResponse>;

    /// Three-hourly forecast at a coordinate
    async fn forecast(
        &self,
        latitude: f64,
        longitude: f64,
        units: UnitSystem,
    ) -> Result<ForecastResponse>;
}

/// OpenWeatherMap client with transient-failure retries
pub struct OpenWeatherClient {
    client: ClientWithMiddleware,
    config: ProviderConfig,
    api_key: String,
}

impl fmt::Debug for OpenWeatherClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenWeatherClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl OpenWeatherClient {
    /// Create a new client from provider configuration
    pub fn new(config: ProviderConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| WeatherlyError::config("OpenWeatherMap API key is required"))?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds.into()))
            .user_agent(concat!("Weatherly/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| WeatherlyError::config(format!("Failed to create HTTP client: {e}")))?;

        let retry_policy = ExponentialBackoff::builder().build_with_max_retries(config.max_retries);
        let client = ClientBuilder::new(http)
            .with(RetryTransientMiddleware::new_with_policy(retry_policy))
            .build();

        Ok(Self {
            client,
            config,
            api_key,
        })
    }

    fn geocode_url(&self, city: &str, limit: u8) -> String {
        format!(
            "{}/direct?q={}&limit={}&appid={}",
            self.config.geo_base_url.trim_end_matches('/'),
            urlencoding::encode(city),
            limit,
            urlencoding::encode(&self.api_key)
        )
    }

    fn data_url(&self, endpoint: &str, latitude: f64, longitude: f64, units: UnitSystem) -> String {
        format!(
            "{}/{}?lat={}&lon={}&units={}&appid={}",
            self.config.data_base_url.trim_end_matches('/'),
            endpoint,
            latitude,
            longitude,
            units,
            urlencoding::encode(&self.api_key)
        )
    }

    fn validate_coordinates(latitude: f64, longitude: f64) -> Result<()> {
        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return Err(WeatherlyError::validation(
                "Invalid coordinates: latitude must be -90 to 90, longitude must be -180 to 180",
            ));
        }
        Ok(())
    }

    /// Send a GET request and decode the JSON body.
    ///
    /// Only `endpoint` and redacted error text are logged. Transport errors
    /// embed the request URL, which carries the API key.
    async fn get_json<T: DeserializeOwned>(&self, url: &str, endpoint: &str) -> Result<T> {
        let start_time = Instant::now();

        let response = self.client.get(url).send().await.map_err(|e| {
            warn!(endpoint, error = %redact_api_key(&e.to_string()), "Weather API request failed");
            WeatherlyError::api(format!("Request to {endpoint} failed"))
        })?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(WeatherlyError::RateLimited);
        }
        if status == StatusCode::UNAUTHORIZED {
            return Err(WeatherlyError::config(
                "OpenWeatherMap rejected the API key",
            ));
        }
        if !status.is_success() {
            return Err(WeatherlyError::api(format!(
                "{endpoint} returned HTTP {status}"
            )));
        }

        let body = response.json::<T>().await.map_err(|e| {
            warn!(
                endpoint,
                error = %redact_api_key(&e.to_string()),
                "Failed to parse weather API response"
            );
            WeatherlyError::api(format!("Invalid response from {endpoint}"))
        })?;

        let elapsed = start_time.elapsed();
        debug!(endpoint, elapsed_ms = elapsed.as_millis() as u64, "Weather API call finished");
        if elapsed.as_secs() > 5 {
            warn!(endpoint, "Slow API response detected: {:.3}s", elapsed.as_secs_f64());
        }

        Ok(body)
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherClient {
    #[instrument(skip(self))]
    async fn geocode(&self, city: &str, limit: u8) -> Result<GeocodingResponse> {
        let url = self.geocode_url(city, limit);
        self.get_json(&url, "geo/direct").await
    }

    #[instrument(skip(self))]
    async fn current_weather(
        &self,
        latitude: f64,
        longitude: f64,
        units: UnitSystem,
    ) -> Result<CurrentWeatherResponse> {
        Self::validate_coordinates(latitude, longitude)?;
        let url = self.data_url("weather", latitude, longitude, units);
        self.get_json(&url, "weather").await
    }

    #[instrument(skip(self))]
    async fn forecast(
        &self,
        latitude: f64,
        longitude: f64,
        units: UnitSystem,
    ) -> Result<ForecastResponse> {
        Self::validate_coordinates(latitude, longitude)?;
        let url = format!(
            "{}&cnt={}",
            self.data_url("forecast", latitude, longitude, units),
            self.config.forecast_samples
        );
        self.get_json(&url, "forecast").await
    }
}

/// Mask every `appid=` query value in `message`
fn redact_api_key(message: &str) -> String {
    const PARAM: &str = "appid=";

    let mut redacted = String::with_capacity(message.len());
    let mut rest = message;
    while let Some(index) = rest.find(PARAM) {
        let (head, tail) = rest.split_at(index + PARAM.len());
        redacted.push_str(head);
        redacted.push_str("***");
        let end = tail
            .find(|c: char| c == '&' || c == ')' || c == '"' || c.is_whitespace())
            .unwrap_or(tail.len());
        rest = &tail[end..];
    }
    redacted.push_str(rest);
    redacted
}
