//! Error types for the weather SDK

use std::fmt;

use lru_ttl_cache::CacheError;
use openweather_client::FetchError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WeatherError {
    /// Empty city or API key, rejected before any I/O
    InvalidArgument(String),
    /// Failure reported by the fetcher, passed through unchanged
    Fetch(FetchError),
    Config(String),
}

impl WeatherError {
    /// The underlying fetch failure, if this error came from the upstream API
    pub fn as_fetch(&self) -> Option<&FetchError> {
        match self {
            WeatherError::Fetch(err) => Some(err),
            _ => None,
        }
    }
}

impl fmt::Display for WeatherError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WeatherError::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
            WeatherError::Fetch(err) => write!(f, "{}", err),
            WeatherError::Config(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for WeatherError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            WeatherError::Fetch(err) => Some(err),
            _ => None,
        }
    }
}

impl From<FetchError> for WeatherError {
    fn from(err: FetchError) -> Self {
        WeatherError::Fetch(err)
    }
}

impl From<CacheError> for WeatherError {
    fn from(err: CacheError) -> Self {
        WeatherError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, WeatherError>;
