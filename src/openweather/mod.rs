//! OpenWeatherMap integration
//!
//! Client and response models for the OpenWeatherMap geocoding, current
//! weather and 5 day / 3 hour forecast APIs.

pub mod client;
pub mod models;

pub use client::{OpenWeatherClient, UnitSystem, WeatherProvider};
pub use models::{
    CurrentWeather, CurrentWeatherResponse, Forecast, ForecastItem, ForecastResponse,
    GeocodingResponse, GeocodingResult, UpstreamJson,
};
