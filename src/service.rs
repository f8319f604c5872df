//! City weather lookup
//!
//! Resolves a city name, fetches current conditions and the forecast, and
//! assembles the normalized [`WeatherReport`].

use std::sync::Arc;

use chrono_tz::Tz;
use tracing::{debug, info, instrument};

use crate::models::{CurrentConditions, Location, WeatherReport};
use crate::normalizer::normalize_forecast;
use crate::openweather::{
    CurrentWeatherResponse, ForecastResponse, GeocodingResponse, UnitSystem, WeatherProvider,
};
use crate::units::format_observation_time;
use crate::{Result, WeatherlyError};

/// Weather lookups on top of a [`WeatherProvider`]
#[derive(Clone)]
pub struct WeatherService {
    provider: Arc<dyn WeatherProvider>,
    timezone: Tz,
}

impl std::fmt::Debug for WeatherService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeatherService")
            .field("provider", &"<WeatherProvider>")
            .field("timezone", &self.timezone)
            .finish()
    }
}

impl WeatherService {
    /// Create a service formatting observation times in `timezone`
    #[must_use]
    pub fn new(provider: Arc<dyn WeatherProvider>, timezone: Tz) -> Self {
        Self { provider, timezone }
    }

    /// Geocode a city, best match only
    pub async fn geocode(&self, city: &str) -> Result<GeocodingResponse> {
        let city = require_city(city)?;
        self.provider.geocode(city, 1).await
    }

    /// Raw current weather and forecast for a coordinate
    pub async fn weather_at(
        &self,
        latitude: f64,
        longitude: f64,
        units: UnitSystem,
    ) -> Result<(CurrentWeatherResponse, ForecastResponse)> {
        tokio::try_join!(
            self.provider.current_weather(latitude, longitude, units),
            self.provider.forecast(latitude, longitude, units),
        )
    }

    /// Look up a city and build its report with Celsius temperatures
    #[instrument(skip(self))]
    pub async fn fetch_weather_by_city(&self, city: &str) -> Result<WeatherReport> {
        let city = require_city(city)?;

        let location = self
            .provider
            .geocode(city, 1)
            .await?
            .data()
            .first()
            .map(Location::from)
            .ok_or_else(|| WeatherlyError::not_found(format!("Location not found: {city}")))?;

        debug!(
            "Found location: {} ({})",
            location.name,
            location.format_coordinates()
        );

        // normalization assumes Celsius
        let (current, forecast) = self
            .weather_at(location.latitude, location.longitude, UnitSystem::Metric)
            .await?;

        let conditions = CurrentConditions::try_from(current.data())?;
        let forecast = normalize_forecast(&forecast.data().samples()?)?;

        info!(
            city = %location.name,
            days = forecast.len(),
            "Processed forecast: {}",
            forecast
                .days()
                .iter()
                .map(|d| format!("{} {}°C - {}°C", d.day, d.min_temp, d.max_temp))
                .collect::<Vec<_>>()
                .join(", ")
        );

        let date = format_observation_time(conditions.observed_at, self.timezone);
        Ok(WeatherReport::new(&location, date, conditions, forecast))
    }
}

fn require_city(city: &str) -> Result<&str> {
    let city = city.trim();
    if city.is_empty() {
        return Err(WeatherlyError::validation("City parameter is required"));
    }
    Ok(city)
}
