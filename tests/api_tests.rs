//! Integration tests for the HTTP API with a mocked weather provider

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;
use weatherly::config::ServerConfig;
use weatherly::openweather::{CurrentWeatherResponse, ForecastResponse, GeocodingResponse};
use weatherly::{UnitSystem, WeatherProvider, WeatherService, WeatherlyError, web};

const DAY_15: i64 = 1_705_276_800; // 2024-01-15T00:00:00Z
const HOUR: i64 = 3_600;

/// Mock provider serving canned responses
struct MockProvider {
    places: GeocodingResponse,
    current: CurrentWeatherResponse,
    forecast: ForecastResponse,
    fail_with_rate_limit: bool,
    calls: AtomicUsize,
}

impl MockProvider {
    fn nairobi() -> Self {
        Self {
            places: serde_json::from_value(json!([
                { "name": "Nairobi", "lat": -1.2921, "lon": 36.8219, "country": "KE" }
            ]))
            .unwrap(),
            current: serde_json::from_value(current_json()).unwrap(),
            forecast: serde_json::from_value(forecast_json()).unwrap(),
            fail_with_rate_limit: false,
            calls: AtomicUsize::new(0),
        }
    }

    fn nowhere() -> Self {
        Self {
            places: serde_json::from_value(json!([])).unwrap(),
            ..Self::nairobi()
        }
    }

    fn rate_limited() -> Self {
        Self {
            fail_with_rate_limit: true,
            ..Self::nairobi()
        }
    }
}

#[async_trait]
impl WeatherProvider for MockProvider {
    async fn geocode(&self, _city: &str, _limit: u8) -> weatherly::Result<GeocodingResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_with_rate_limit {
            return Err(WeatherlyError::RateLimited);
        }
        Ok(self.places.clone())
    }

    async fn current_weather(
        &self,
        _latitude: f64,
        _longitude: f64,
        _units: UnitSystem,
    ) -> weatherly::Result<CurrentWeatherResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.current.clone())
    }

    async fn forecast(
        &self,
        _latitude: f64,
        _longitude: f64,
        _units: UnitSystem,
    ) -> weatherly::Result<ForecastResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.forecast.clone())
    }
}

fn current_json() -> Value {
    json!({
        "coord": { "lon": 36.8219, "lat": -1.2921 },
        "weather": [{ "id": 803, "main": "Clouds", "description": "broken clouds", "icon": "04d" }],
        "main": { "temp": 21.4, "feels_like": 20.5, "humidity": 64 },
        "wind": { "speed": 4.1, "deg": 50 },
        "dt": DAY_15 + 15 * HOUR,
        "visibility": 10000,
        "name": "Nairobi"
    })
}

fn forecast_entry(timestamp: i64, temp_min: f64, temp_max: f64, icon: &str) -> Value {
    json!({
        "dt": timestamp,
        "main": { "temp_min": temp_min, "temp_max": temp_max },
        "weather": [{ "description": format!("sky {icon}"), "icon": icon }]
    })
}

/// Five samples on Jan 15 and four on Jan 16
fn forecast_json() -> Value {
    let day_16 = DAY_15 + 24 * HOUR;
    json!({
        "cod": "200",
        "list": [
            forecast_entry(DAY_15 + 9 * HOUR, 10.0, 12.0, "01d"),
            forecast_entry(DAY_15 + 12 * HOUR, 13.0, 18.0, "02d"),
            forecast_entry(DAY_15 + 15 * HOUR, 14.0, 17.0, "03d"),
            forecast_entry(DAY_15 + 18 * HOUR, 12.0, 15.0, "04n"),
            forecast_entry(DAY_15 + 21 * HOUR, 11.0, 13.0, "04n"),
            forecast_entry(day_16, 12.0, 14.0, "10n"),
            forecast_entry(day_16 + 3 * HOUR, 13.0, 16.0, "10n"),
            forecast_entry(day_16 + 6 * HOUR, 15.0, 20.0, "10d"),
            forecast_entry(day_16 + 9 * HOUR, 14.0, 19.0, "09d"),
        ]
    })
}

fn app_with(provider: Arc<MockProvider>) -> axum::Router {
    let service = WeatherService::new(provider, chrono_tz::UTC);
    web::build_app(&ServerConfig::default(), service)
}

async fn get(app: axum::Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_connection_endpoint() {
    let (status, body) = get(app_with(Arc::new(MockProvider::nairobi())), "/api/test").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "message": "API Connected!" }));
}

#[tokio::test]
async fn test_geocode_returns_best_match() {
    let (status, body) = get(
        app_with(Arc::new(MockProvider::nairobi())),
        "/api/geocode?city=Nairobi",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["name"], "Nairobi");
    assert_eq!(body[0]["country"], "KE");
}

#[tokio::test]
async fn test_geocode_without_city_is_bad_request() {
    let provider = Arc::new(MockProvider::nairobi());
    let (status, body) = get(app_with(provider.clone()), "/api/geocode").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "City parameter is required");
    assert_eq!(body["code"], "bad_request");
    assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_weather_proxies_current_and_forecast() {
    let (status, body) = get(
        app_with(Arc::new(MockProvider::nairobi())),
        "/api/weather?lat=-1.2921&lon=36.8219",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["current"]["name"], "Nairobi");
    assert_eq!(body["current"]["visibility"], 10000);
    assert_eq!(body["forecast"]["cod"], "200");
    assert_eq!(body["forecast"]["list"].as_array().unwrap().len(), 9);
}

#[tokio::test]
async fn test_weather_returns_upstream_forecast_unchanged() {
    let entry = json!({
        "dt": DAY_15 + 12 * HOUR,
        "main": {
            "temp": 12.3,
            "feels_like": 11.2,
            "temp_min": 10,
            "temp_max": 12.3,
            "pressure": 1016,
            "sea_level": 1016,
            "grnd_level": 900,
            "humidity": 70,
            "temp_kf": 0
        },
        "weather": [{ "id": 800, "main": "Clear", "description": "clear sky", "icon": "01d" }],
        "clouds": { "all": 0 },
        "wind": { "speed": 3, "deg": 90, "gust": 4.2 },
        "visibility": 10000,
        "pop": 0,
        "sys": { "pod": "d" },
        "dt_txt": "2024-01-15 12:00:00"
    });
    let upstream = json!({ "cod": "200", "message": 0, "cnt": 1, "list": [entry] });
    let provider = MockProvider {
        forecast: serde_json::from_value(upstream.clone()).unwrap(),
        ..MockProvider::nairobi()
    };

    let (status, body) = get(app_with(Arc::new(provider)), "/api/weather?lat=-1.2921&lon=36.8219").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["forecast"], upstream);
    assert_eq!(body["current"], current_json());
}

#[tokio::test]
async fn test_weather_rejects_bad_parameters() {
    let app = app_with(Arc::new(MockProvider::nairobi()));

    let (status, body) = get(app.clone(), "/api/weather?lon=36.8").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "lat parameter is required");

    let (status, _) = get(app.clone(), "/api/weather?lat=abc&lon=36.8").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = get(app, "/api/weather?lat=1&lon=2&units=kelvin").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_report_normalizes_forecast_to_three_days() {
    let (status, body) = get(
        app_with(Arc::new(MockProvider::nairobi())),
        "/api/report?city=Nairobi",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["city"], "Nairobi");
    assert_eq!(body["unit"], "C");
    assert_eq!(body["date"], "January 15, 2024 3:00 PM");
    assert_eq!(body["current"]["wind_direction"], "NE");
    assert_eq!(body["current"]["humidity_level"], "High");
    assert_eq!(body["current"]["temperature"], 21.0);

    let days = body["forecast"].as_array().unwrap();
    assert_eq!(days.len(), 3);
    assert_eq!(days[0]["date"], "2024-01-15");
    assert_eq!(days[0]["min_temp"], 10.0);
    assert_eq!(days[0]["max_temp"], 18.0);
    assert_eq!(days[0]["icon"], "01d");
    assert_eq!(days[1]["date"], "2024-01-16");
    assert_eq!(days[1]["min_temp"], 12.0);
    assert_eq!(days[1]["max_temp"], 20.0);
    assert_eq!(days[2]["date"], "2024-01-17");
    assert_eq!(days[2]["day"], "Wednesday");
    assert_eq!(days[2]["description"], days[1]["description"]);
    assert_eq!(days[2]["synthetic"], true);
}

#[tokio::test]
async fn test_report_in_fahrenheit() {
    let (status, body) = get(
        app_with(Arc::new(MockProvider::nairobi())),
        "/api/report?city=Nairobi&unit=F",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["unit"], "F");
    assert_eq!(body["current"]["temperature"], 71.0);
    assert_eq!(body["current"]["feels_like"], 69.0);

    let days = body["forecast"].as_array().unwrap();
    assert_eq!(days[0]["min_temp"], 50.0);
    assert_eq!(days[0]["max_temp"], 64.0);
    assert_eq!(days[1]["min_temp"], 54.0);
    assert_eq!(days[1]["max_temp"], 68.0);
}

#[tokio::test]
async fn test_report_unknown_city_is_not_found() {
    let (status, body) = get(
        app_with(Arc::new(MockProvider::nowhere())),
        "/api/report?city=Atlantis",
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Location not found: Atlantis");
}

#[tokio::test]
async fn test_upstream_rate_limit_is_429() {
    let (status, body) = get(
        app_with(Arc::new(MockProvider::rate_limited())),
        "/api/report?city=Nairobi",
    )
    .await;

    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body["code"], "rate_limited");
}

#[tokio::test]
async fn test_cors_allows_any_origin_by_default() {
    let app = app_with(Arc::new(MockProvider::nairobi()));
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/test")
                .header(header::ORIGIN, "https://weather-abc.vercel.app")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(
        response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "*"
    );
}

#[tokio::test]
async fn test_cors_pattern_origin_is_echoed() {
    let config = ServerConfig {
        allowed_origins: vec!["http://localhost:3000".to_string()],
        ..ServerConfig::default()
    };
    let service = WeatherService::new(Arc::new(MockProvider::nairobi()), chrono_tz::UTC);
    let app = web::build_app(&config, service);

    let allowed = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/test")
                .header(header::ORIGIN, "https://weather-app-pr7.vercel.app")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(
        allowed.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "https://weather-app-pr7.vercel.app"
    );

    let rejected = app
        .oneshot(
            Request::builder()
                .uri("/api/test")
                .header(header::ORIGIN, "https://evil.example.com")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert!(rejected.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
}
