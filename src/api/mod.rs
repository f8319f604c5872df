//! HTTP API routes
//!
//! `/test`, `/geocode` and `/weather` proxy the provider the way the
//! frontend expects; `/report` returns the normalized city report.

pub mod error;

use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::instrument;

use crate::models::WeatherReport;
use crate::openweather::{CurrentWeatherResponse, ForecastResponse, GeocodingResponse, UnitSystem};
use crate::service::WeatherService;
use crate::units::TemperatureUnit;
use crate::{Result, WeatherlyError};

#[derive(Debug, Deserialize)]
pub struct CityParams {
    pub city: Option<String>,
    /// `C` or `F`; only used by `/report`
    pub unit: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct WeatherParams {
    pub lat: Option<String>,
    pub lon: Option<String>,
    pub units: Option<String>,
}

/// Body of `/weather`
#[derive(Debug, Serialize)]
pub struct WeatherResponse {
    pub current: CurrentWeatherResponse,
    pub forecast: ForecastResponse,
}

pub fn router(service: WeatherService) -> Router {
    Router::new()
        .route("/test", get(test_connection))
        .route("/geocode", get(geocode))
        .route("/weather", get(weather))
        .route("/report", get(report))
        .with_state(service)
}

async fn test_connection() -> Json<Value> {
    Json(json!({ "message": "API Connected!" }))
}

#[instrument(skip(service))]
async fn geocode(
    State(service): State<WeatherService>,
    Query(params): Query<CityParams>,
) -> Result<Json<GeocodingResponse>> {
    let city = params.city.unwrap_or_default();
    Ok(Json(service.geocode(&city).await?))
}

#[instrument(skip(service))]
async fn weather(
    State(service): State<WeatherService>,
    Query(params): Query<WeatherParams>,
) -> Result<Json<WeatherResponse>> {
    let latitude = parse_coordinate(params.lat.as_deref(), "lat")?;
    let longitude = parse_coordinate(params.lon.as_deref(), "lon")?;
    let units = match params.units.as_deref() {
        Some(units) => units.parse::<UnitSystem>()?,
        None => UnitSystem::Metric,
    };

    let (current, forecast) = service.weather_at(latitude, longitude, units).await?;
    Ok(Json(WeatherResponse { current, forecast }))
}

#[instrument(skip(service))]
async fn report(
    State(service): State<WeatherService>,
    Query(params): Query<CityParams>,
) -> Result<Json<WeatherReport>> {
    let unit = match params.unit.as_deref() {
        Some(unit) => unit.parse::<TemperatureUnit>()?,
        None => TemperatureUnit::Celsius,
    };
    let city = params.city.unwrap_or_default();

    let report = service.fetch_weather_by_city(&city).await?;
    Ok(Json(report.in_unit(unit)))
}

fn parse_coordinate(value: Option<&str>, name: &str) -> Result<f64> {
    let value = value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| WeatherlyError::validation(format!("{name} parameter is required")))?;
    value
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| WeatherlyError::validation(format!("{name} must be a number")))
}
