//! Error types for the OpenWeatherMap client

use std::fmt;

/// Errors that can occur when fetching current weather
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The API does not know the requested city (HTTP 404)
    NotFound(String),
    /// The API key was rejected (HTTP 401)
    Unauthorized,
    /// The account's call limit was exceeded (HTTP 429)
    RateLimited,
    /// The API rejected the request for this city (HTTP 400)
    BadRequest(String),
    /// 5xx or unexpected status, or a body that could not be decoded
    Upstream(String),
    /// Connection, timeout, or other network failure
    Transport(String),
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound(city) => write!(f, "City not found: {}", city),
            Self::Unauthorized => write!(f, "Invalid API key"),
            Self::RateLimited => write!(f, "API call limit exceeded"),
            Self::BadRequest(city) => write!(f, "Bad request for city: {}", city),
            Self::Upstream(msg) => write!(f, "OpenWeatherMap API error: {}", msg),
            Self::Transport(msg) => write!(f, "Transport error: {}", msg),
        }
    }
}

impl std::error::Error for FetchError {}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            Self::Upstream(format!("malformed response: {}", e))
        } else {
            Self::Transport(e.to_string())
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(e: serde_json::Error) -> Self {
        Self::Upstream(format!("malformed response: {}", e))
    }
}

/// Result type for OpenWeatherMap operations
pub type Result<T> = std::result::Result<T, FetchError>;
