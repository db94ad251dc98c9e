use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use openweather_client::DEFAULT_BASE_URL;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::WeatherError;

const DEFAULT_API_KEY: &str = "demo_key";
const DEFAULT_CACHE_CAPACITY: usize = 10;
const DEFAULT_TTL_MINUTES: u64 = 10;
const DEFAULT_POLLING_MINUTES: u64 = 10;

/// How a provider keeps its cache populated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OperatingMode {
    /// Fetch only when a request misses the cache
    #[default]
    OnDemand,
    /// Additionally re-fetch every cached city on a fixed interval
    Polling,
}

impl OperatingMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperatingMode::OnDemand => "ON_DEMAND",
            OperatingMode::Polling => "POLLING",
        }
    }
}

impl fmt::Display for OperatingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OperatingMode {
    type Err = WeatherError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().replace('-', "_").as_str() {
            "ON_DEMAND" | "ONDEMAND" => Ok(OperatingMode::OnDemand),
            "POLLING" => Ok(OperatingMode::Polling),
            _ => Err(WeatherError::Config(format!("Unknown operating mode: {}", s))),
        }
    }
}

/// Per-provider cache and polling parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderSettings {
    pub cache_capacity: usize,
    pub cache_ttl: Duration,
    pub polling_interval: Duration,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            cache_ttl: Duration::from_secs(DEFAULT_TTL_MINUTES * 60),
            polling_interval: Duration::from_secs(DEFAULT_POLLING_MINUTES * 60),
        }
    }
}

/// SDK configuration parsed from environment variables
#[derive(Debug, Clone)]
pub struct SdkConfig {
    pub api_key: String,
    pub api_url: String,
    pub mode: OperatingMode,
    pub provider: ProviderSettings,
}

impl Default for SdkConfig {
    fn default() -> Self {
        Self {
            api_key: DEFAULT_API_KEY.to_string(),
            api_url: DEFAULT_BASE_URL.to_string(),
            mode: OperatingMode::default(),
            provider: ProviderSettings::default(),
        }
    }
}

impl SdkConfig {
    /// Parse configuration from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let api_key = lookup("OPENWEATHER_API_KEY")
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .unwrap_or(defaults.api_key);

        let api_url = lookup("OPENWEATHER_API_URL")
            .filter(|u| !u.trim().is_empty())
            .unwrap_or(defaults.api_url);

        let mode = match lookup("SDK_OPERATING_MODE") {
            Some(raw) => raw.parse().unwrap_or_else(|e| {
                warn!(error = %e, "Falling back to default operating mode");
                defaults.mode
            }),
            None => defaults.mode,
        };

        let cache_capacity = lookup("SDK_CACHE_CAPACITY")
            .and_then(|s| s.trim().parse::<usize>().ok())
            .filter(|c| *c > 0)
            .unwrap_or(defaults.provider.cache_capacity);

        let cache_ttl = positive_minutes(lookup("SDK_CACHE_TTL_MINUTES"))
            .unwrap_or(defaults.provider.cache_ttl);

        let polling_interval = positive_minutes(lookup("SDK_POLLING_INTERVAL_MINUTES"))
            .unwrap_or(defaults.provider.polling_interval);

        Self {
            api_key,
            api_url,
            mode,
            provider: ProviderSettings {
                cache_capacity,
                cache_ttl,
                polling_interval,
            },
        }
    }
}

fn positive_minutes(raw: Option<String>) -> Option<Duration> {
    raw.and_then(|s| s.trim().parse::<u64>().ok())
        .filter(|m| *m > 0)
        .map(|m| Duration::from_secs(m * 60))
}
