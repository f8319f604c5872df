//! HTTP mapping for [`WeatherlyError`]

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::{error, warn};

use crate::WeatherlyError;

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
    /// Error code
    pub code: &'static str,
}

impl WeatherlyError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            WeatherlyError::Validation { .. } => (StatusCode::BAD_REQUEST, "bad_request"),
            WeatherlyError::NotFound { .. } => (StatusCode::NOT_FOUND, "not_found"),
            WeatherlyError::RateLimited => (StatusCode::TOO_MANY_REQUESTS, "rate_limited"),
            WeatherlyError::Api { .. } => (StatusCode::BAD_GATEWAY, "upstream_error"),
            WeatherlyError::MissingField { .. } | WeatherlyError::InvalidTimestamp { .. } => {
                (StatusCode::BAD_GATEWAY, "invalid_upstream_data")
            }
            WeatherlyError::Config { .. }
            | WeatherlyError::Io { .. }
            | WeatherlyError::General { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error")
            }
        }
    }
}

impl IntoResponse for WeatherlyError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        if status.is_server_error() {
            error!(code, error = %self, "Request failed");
        } else {
            warn!(code, error = %self, "Request rejected");
        }

        let body = ErrorResponse {
            error: self.user_message(),
            code,
        };
        (status, Json(body)).into_response()
    }
}
