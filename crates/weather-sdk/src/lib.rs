//! Weather SDK
//!
//! Serves current weather per city from a bounded, expiring in-memory cache and
//! falls back to the OpenWeatherMap API on a miss. Providers run either
//! on demand or in polling mode, where a background task periodically
//! re-fetches every cached city.
//!
//! Providers are handed out by a [`ProviderRegistry`], which keeps exactly one
//! provider per (API key, mode) pair.
//!
//! # Example
//!
//! ```no_run
//! use weather_sdk::{OperatingMode, ProviderRegistry, SdkConfig};
//!
//! # async fn example() -> Result<(), weather_sdk::WeatherError> {
//! let registry = ProviderRegistry::from_config(&SdkConfig::from_env());
//! let provider = registry.get("my-api-key", OperatingMode::OnDemand).await?;
//!
//! let weather = provider.get_weather("London").await?;
//! println!("{:?}", weather.temperature.temp);
//!
//! registry.shutdown_all().await;
//! # Ok(())
//! # }
//! ```

mod config;
mod error;
mod fetcher;
mod polling;
mod provider;
mod registry;
mod response;

#[cfg(test)]
mod test_support;

pub use config::{OperatingMode, ProviderSettings, SdkConfig};
pub use error::{Result, WeatherError};
pub use fetcher::Fetcher;
pub use polling::{PollingService, RefreshJob, STOP_GRACE};
pub use provider::{RefreshReport, WeatherProvider};
pub use registry::{FetcherFactory, ProviderRegistry};
pub use response::{SysInfo, TemperatureInfo, WeatherInfo, WeatherResponse, WindInfo};

pub use lru_ttl_cache::CacheStats;
pub use openweather_client::{mask_api_key, FetchError, Main, OpenWeatherClient, WeatherData};
