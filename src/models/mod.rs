//! Data models for the Weatherly backend
//!
//! This module contains the domain models organized by concern:
//! - Location: geocoded place and coordinates
//! - Forecast: raw three-hourly samples and normalized forecast days
//! - Current: current conditions at a location
//! - Condition: coarse weather condition derived from provider icon codes
//! - Report: the combined structure handed to the presentation layer

pub mod condition;
pub mod current;
pub mod forecast;
pub mod location;
pub mod report;

// Re-export all public types for convenient access
pub use condition::WeatherCondition;
pub use current::CurrentConditions;
pub use forecast::{ForecastDay, NormalizedForecast, RawForecastSample};
pub use location::Location;
pub use report::WeatherReport;
