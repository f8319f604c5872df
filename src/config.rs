//! Configuration management for the Weatherly backend
//!
//! Handles loading configuration from files and environment variables
//! and validates every setting before the server starts.

use crate::WeatherlyError;
use anyhow::{Context, Result};
use chrono_tz::Tz;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Root configuration structure for the Weatherly backend
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WeatherlyConfig {
    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Upstream weather provider configuration
    #[serde(default)]
    pub provider: ProviderConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address
    #[serde(default = "default_host")]
    pub host: String,
    /// Bind port
    #[serde(default = "default_port")]
    pub port: u16,
    /// Exact origins allowed by CORS; `*` allows any origin
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,
    /// Origin patterns with `*` wildcards, e.g. `https://weather-*.vercel.app`
    #[serde(default = "default_allowed_origin_patterns")]
    pub allowed_origin_patterns: Vec<String>,
    /// Directory with a prebuilt frontend served for non-API paths
    #[serde(default)]
    pub static_dir: Option<String>,
    /// TLS certificate and key; plain HTTP when absent
    #[serde(default)]
    pub tls: Option<TlsConfig>,
    /// IANA timezone used when formatting observation times
    #[serde(default = "default_display_timezone")]
    pub display_timezone: String,
}

/// PEM files for serving over HTTPS
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TlsConfig {
    pub cert_path: PathBuf,
    pub key_path: PathBuf,
}

/// OpenWeatherMap access settings
#[derive(Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// OpenWeatherMap API key (`appid`)
    #[serde(default)]
    pub api_key: Option<String>,
    /// Base URL of the geocoding API
    #[serde(default = "default_geo_base_url")]
    pub geo_base_url: String,
    /// Base URL of the current weather and forecast API
    #[serde(default = "default_data_base_url")]
    pub data_base_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u32,
    /// Maximum number of retries for transient failures
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Number of three-hourly forecast entries requested (`cnt`)
    #[serde(default = "default_forecast_samples")]
    pub forecast_samples: u32,
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("geo_base_url", &self.geo_base_url)
            .field("data_base_url", &self.data_base_url)
            .field("timeout_seconds", &self.timeout_seconds)
            .field("max_retries", &self.max_retries)
            .field("forecast_samples", &self.forecast_samples)
            .finish()
    }
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
    /// OTLP/HTTP collector endpoint; span export is off when unset
    #[serde(default)]
    pub otlp_endpoint: Option<String>,
}

// Default value functions
fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_allowed_origins() -> Vec<String> {
    vec!["*".to_string()]
}

fn default_allowed_origin_patterns() -> Vec<String> {
    vec![
        "https://weather-*.vercel.app".to_string(),
        "https://weather-app-*.vercel.app".to_string(),
    ]
}

fn default_display_timezone() -> String {
    "UTC".to_string()
}

fn default_geo_base_url() -> String {
    "http://api.openweathermap.org/geo/1.0".to_string()
}

fn default_data_base_url() -> String {
    "https://api.openweathermap.org/data/2.5".to_string()
}

fn default_timeout() -> u32 {
    30
}

fn default_max_retries() -> u32 {
    3
}

fn default_forecast_samples() -> u32 {
    40
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            allowed_origins: default_allowed_origins(),
            allowed_origin_patterns: default_allowed_origin_patterns(),
            static_dir: None,
            tls: None,
            display_timezone: default_display_timezone(),
        }
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            geo_base_url: default_geo_base_url(),
            data_base_url: default_data_base_url(),
            timeout_seconds: default_timeout(),
            max_retries: default_max_retries(),
            forecast_samples: default_forecast_samples(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            otlp_endpoint: None,
        }
    }
}

impl ServerConfig {
    /// Parse the configured display timezone
    pub fn timezone(&self) -> crate::Result<Tz> {
        self.display_timezone.parse::<Tz>().map_err(|_| {
            WeatherlyError::config(format!(
                "Unknown display timezone '{}'",
                self.display_timezone
            ))
        })
    }
}

impl WeatherlyConfig {
    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path()
                .filter(|path| path.exists())
                .unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // WEATHERLY_PROVIDER__API_KEY overrides provider.api_key
        builder = builder.add_source(
            Environment::with_prefix("WEATHERLY")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: WeatherlyConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("weatherly").join("config.toml"))
    }

    /// Apply default values to missing configuration fields
    pub fn apply_defaults(&mut self) {
        if self.server.host.is_empty() {
            self.server.host = default_host();
        }
        if self.server.port == 0 {
            self.server.port = default_port();
        }
        if self.server.display_timezone.is_empty() {
            self.server.display_timezone = default_display_timezone();
        }
        if self.provider.geo_base_url.is_empty() {
            self.provider.geo_base_url = default_geo_base_url();
        }
        if self.provider.data_base_url.is_empty() {
            self.provider.data_base_url = default_data_base_url();
        }
        if self.provider.timeout_seconds == 0 {
            self.provider.timeout_seconds = default_timeout();
        }
        if self.provider.forecast_samples == 0 {
            self.provider.forecast_samples = default_forecast_samples();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_api_key()?;
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    /// Validate the OpenWeatherMap API key
    pub fn validate_api_key(&self) -> Result<()> {
        let Some(api_key) = &self.provider.api_key else {
            return Err(WeatherlyError::config(
                "OpenWeatherMap API key is required. Set provider.api_key or WEATHERLY_PROVIDER__API_KEY.",
            )
            .into());
        };

        if api_key.trim().is_empty() {
            return Err(WeatherlyError::config("OpenWeatherMap API key cannot be empty").into());
        }

        if api_key.len() < 8 {
            return Err(WeatherlyError::config(
                "OpenWeatherMap API key appears to be invalid (too short). Please check your API key.",
            )
            .into());
        }

        if api_key.len() > 100 {
            return Err(WeatherlyError::config(
                "OpenWeatherMap API key appears to be invalid (too long). Please check your API key.",
            )
            .into());
        }

        Ok(())
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.provider.timeout_seconds > 300 {
            return Err(
                WeatherlyError::config("Provider timeout cannot exceed 300 seconds").into(),
            );
        }

        if self.provider.max_retries > 10 {
            return Err(WeatherlyError::config("Provider max retries cannot exceed 10").into());
        }

        // the free forecast endpoint serves at most 5 days of 3-hour steps
        if self.provider.forecast_samples > 40 {
            return Err(
                WeatherlyError::config("Forecast samples cannot exceed 40 (5 days)").into(),
            );
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(WeatherlyError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(WeatherlyError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        for (name, url) in [
            ("geo", &self.provider.geo_base_url),
            ("data", &self.provider.data_base_url),
        ] {
            if !is_http_url(url) {
                return Err(WeatherlyError::config(format!(
                    "Provider {name} base URL must be a valid HTTP or HTTPS URL"
                ))
                .into());
            }
        }

        if let Some(endpoint) = &self.logging.otlp_endpoint {
            if !is_http_url(endpoint) {
                return Err(WeatherlyError::config(
                    "OTLP endpoint must be a valid HTTP or HTTPS URL",
                )
                .into());
            }
        }

        self.server.timezone()?;

        Ok(())
    }
}

fn is_http_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}
