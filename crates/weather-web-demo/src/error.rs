//! Error types for the weather web demo

use std::fmt;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use weather_sdk::{FetchError, WeatherError};

/// Startup and runtime failures of the demo process
#[derive(Debug)]
pub enum DemoError {
    Config(String),
    Io(Box<std::io::Error>),
}

impl fmt::Display for DemoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DemoError::Config(msg) => write!(f, "Configuration error: {}", msg),
            DemoError::Io(err) => write!(f, "IO error: {}", err),
        }
    }
}

impl std::error::Error for DemoError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DemoError::Io(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

impl From<std::io::Error> for DemoError {
    fn from(err: std::io::Error) -> Self {
        DemoError::Io(Box::new(err))
    }
}

impl From<tracing_subscriber::filter::ParseError> for DemoError {
    fn from(err: tracing_subscriber::filter::ParseError) -> Self {
        DemoError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, DemoError>;

/// Request error that converts to an HTTP response
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    Unauthorized(String),
    TooManyRequests(String),
    Internal(String),
}

impl From<WeatherError> for ApiError {
    fn from(err: WeatherError) -> Self {
        let message = err.to_string();
        match err {
            WeatherError::InvalidArgument(_) => ApiError::BadRequest(message),
            WeatherError::Fetch(FetchError::NotFound(_)) => ApiError::NotFound(message),
            WeatherError::Fetch(FetchError::Unauthorized) => ApiError::Unauthorized(message),
            WeatherError::Fetch(FetchError::RateLimited) => ApiError::TooManyRequests(message),
            WeatherError::Fetch(_) | WeatherError::Config(_) => ApiError::Internal(message),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => {
                tracing::warn!(error = %msg, "Weather lookup failed");
                (StatusCode::NOT_FOUND, msg)
            }
            ApiError::Unauthorized(msg) => {
                tracing::error!(error = %msg, "Upstream rejected API key");
                (StatusCode::UNAUTHORIZED, msg)
            }
            ApiError::TooManyRequests(msg) => {
                tracing::error!(error = %msg, "Upstream call limit exceeded");
                (StatusCode::TOO_MANY_REQUESTS, msg)
            }
            ApiError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };

        (status, axum::Json(json!({ "error": message }))).into_response()
    }
}
