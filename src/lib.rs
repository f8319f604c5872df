//! Weatherly - city weather reports over the OpenWeatherMap API
//!
//! This library provides the OpenWeatherMap client, forecast normalization,
//! unit conversions and the HTTP API served by the `weatherly` binary.

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod normalizer;
pub mod openweather;
pub mod service;
pub mod telemetry;
pub mod units;
pub mod web;

// Re-export core types for public API
pub use config::WeatherlyConfig;
pub use error::WeatherlyError;
pub use models::{
    CurrentConditions, ForecastDay, Location, NormalizedForecast, RawForecastSample,
    WeatherCondition, WeatherReport,
};
pub use normalizer::normalize_forecast;
pub use openweather::{OpenWeatherClient, UnitSystem, WeatherProvider};
pub use service::WeatherService;
pub use units::{CompassPoint, TemperatureUnit, convert_temperature};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, WeatherlyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
