//! Error types and handling for the Weatherly backend

use thiserror::Error;

/// Main error type for the Weatherly backend
#[derive(Error, Debug)]
pub enum WeatherlyError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Upstream weather API communication errors
    #[error("API error: {message}")]
    Api { message: String },

    /// Upstream weather API refused the request with a rate limit
    #[error("Upstream rate limit exceeded")]
    RateLimited,

    /// Input validation errors
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// Lookup produced no result
    #[error("Not found: {message}")]
    NotFound { message: String },

    /// An upstream record lacks an attribute the weather model requires
    #[error("Missing field in upstream data: {field}")]
    MissingField { field: String },

    /// A forecast timestamp cannot be represented as a calendar date
    #[error("Invalid timestamp in upstream data: {timestamp}")]
    InvalidTimestamp { timestamp: i64 },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// General application errors
    #[error("Application error: {message}")]
    General { message: String },
}

impl WeatherlyError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new API error
    pub fn api<S: Into<String>>(message: S) -> Self {
        Self::Api {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new not-found error
    pub fn not_found<S: Into<String>>(message: S) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Create a new missing-field error
    pub fn missing_field<S: Into<String>>(field: S) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }

    /// Create a new general error
    pub fn general<S: Into<String>>(message: S) -> Self {
        Self::General {
            message: message.into(),
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            WeatherlyError::Config { .. } => {
                "Configuration error. Please check your config file and API keys.".to_string()
            }
            WeatherlyError::Api { .. } => {
                "Unable to reach the weather service. Please try again later.".to_string()
            }
            WeatherlyError::RateLimited => {
                "The weather service is busy. Please try again in a minute.".to_string()
            }
            WeatherlyError::Validation { message } => message.clone(),
            WeatherlyError::NotFound { message } => message.clone(),
            WeatherlyError::MissingField { .. } | WeatherlyError::InvalidTimestamp { .. } => {
                "The weather service returned incomplete data.".to_string()
            }
            WeatherlyError::Io { .. } => {
                "File operation failed. Please check file permissions.".to_string()
            }
            WeatherlyError::General { message } => message.clone(),
        }
    }
}
