//! Response bodies for the weather web demo

use serde::Serialize;
use weather_sdk::{OperatingMode, WeatherResponse};

/// Weather for one city plus the serving provider's cache size
#[derive(Debug, Serialize)]
pub struct WeatherBody {
    #[serde(flatten)]
    pub weather: WeatherResponse,
    #[serde(rename = "cacheSize")]
    pub cache_size: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheInfoBody {
    pub cache_size: usize,
    pub operating_mode: OperatingMode,
    /// Always masked
    pub api_key: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub uptime_secs: u64,
    pub active_providers: usize,
}
