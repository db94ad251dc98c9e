use std::sync::Arc;

use futures::FutureExt;
use lru_ttl_cache::{CacheStats, LruTtlCache};
use openweather_client::{mask_api_key, WeatherData};
use tracing::{debug, error, info, warn};

use crate::config::{OperatingMode, ProviderSettings};
use crate::error::{Result, WeatherError};
use crate::fetcher::Fetcher;
use crate::polling::{PollingService, RefreshJob};
use crate::response::WeatherResponse;

/// Outcome of one pass over every cached city
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RefreshReport {
    pub succeeded: usize,
    pub failed: usize,
}

/// Cache and fetcher, shared between request handlers and the polling task
struct ProviderCore<F> {
    fetcher: F,
    cache: LruTtlCache<String, Arc<WeatherData>>,
}

impl<F: Fetcher> ProviderCore<F> {
    /// Fetch without holding the cache lock, then store the result
    async fn fetch_and_cache(&self, city: &str) -> Result<Arc<WeatherData>> {
        let data = match self.fetcher.fetch(city).await {
            Ok(data) => Arc::new(data),
            Err(e) => {
                error!(city, error = %e, "Failed to fetch weather data");
                return Err(e.into());
            }
        };

        self.cache.put(city.to_string(), data.clone()).await;
        info!(city, "Fetched and cached weather data");
        Ok(data)
    }

    async fn refresh_all(&self) -> RefreshReport {
        // Snapshot, so concurrent inserts and evictions don't affect this pass
        let cities = self.cache.keys().await;
        debug!(count = cities.len(), "Refreshing all cached weather data");

        // Least recently used first, so re-inserting preserves recency order
        let mut report = RefreshReport::default();
        for city in cities.into_iter().rev() {
            match self.fetcher.fetch(&city).await {
                Ok(data) => {
                    self.cache.put(city.clone(), Arc::new(data)).await;
                    report.succeeded += 1;
                    debug!(city = %city, "Refreshed cached weather data");
                }
                Err(e) => {
                    report.failed += 1;
                    warn!(city = %city, error = %e, "Failed to refresh weather data");
                }
            }
        }

        info!(
            succeeded = report.succeeded,
            failed = report.failed,
            "Cache refresh completed"
        );
        report
    }
}

/// Serves weather for one API key from its own cache, fetching on a miss
///
/// In [`OperatingMode::Polling`] the provider also owns a [`PollingService`]
/// that refreshes every cached city on a fixed interval. Request handling is
/// the same in both modes.
pub struct WeatherProvider<F: Fetcher> {
    api_key: String,
    mode: OperatingMode,
    core: Arc<ProviderCore<F>>,
    poller: Option<PollingService>,
}

impl<F: Fetcher> WeatherProvider<F> {
    /// Create a provider; in polling mode the background refresh starts immediately
    pub async fn new(
        api_key: &str,
        mode: OperatingMode,
        fetcher: F,
        settings: &ProviderSettings,
    ) -> Result<Self> {
        let cache = LruTtlCache::new(settings.cache_capacity, settings.cache_ttl)?;
        let core = Arc::new(ProviderCore { fetcher, cache });

        let poller = match mode {
            OperatingMode::Polling => {
                let job_core = core.clone();
                let job: RefreshJob = Arc::new(move || {
                    let core = job_core.clone();
                    async move { core.refresh_all().await }.boxed()
                });
                let poller = PollingService::new(
                    format!("weather-polling-{}", mask_api_key(api_key)),
                    settings.polling_interval,
                    job,
                )?;
                poller.start().await;
                Some(poller)
            }
            OperatingMode::OnDemand => None,
        };

        info!(api_key = %mask_api_key(api_key), mode = %mode, "Weather provider initialized");

        Ok(Self {
            api_key: api_key.to_string(),
            mode,
            core,
            poller,
        })
    }

    /// Current weather for a city, from cache if present and fresh
    pub async fn get_weather(&self, city: &str) -> Result<WeatherResponse> {
        let city = city.trim();
        if city.is_empty() {
            return Err(WeatherError::InvalidArgument(
                "City name cannot be empty".to_string(),
            ));
        }

        if let Some(cached) = self.core.cache.get(city).await {
            debug!(city, "Returning cached weather data");
            return Ok(WeatherResponse::from(cached.as_ref()));
        }

        debug!(city, "No cached data, fetching from API");
        let data = self.core.fetch_and_cache(city).await?;
        Ok(WeatherResponse::from(data.as_ref()))
    }

    /// Re-fetch every currently cached city, skipping failures
    pub async fn refresh_all(&self) -> RefreshReport {
        self.core.refresh_all().await
    }

    /// Stop background polling, if any; safe to call more than once
    pub async fn shutdown(&self) {
        if let Some(poller) = &self.poller {
            poller.stop().await;
            info!(api_key = %mask_api_key(&self.api_key), "Weather provider shutdown completed");
        }
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn mode(&self) -> OperatingMode {
        self.mode
    }

    pub async fn cache_size(&self) -> usize {
        self.core.cache.len().await
    }

    pub async fn cache_stats(&self) -> CacheStats {
        self.core.cache.stats().await
    }

    /// Whether a background refresh loop is currently active
    pub async fn is_polling(&self) -> bool {
        match &self.poller {
            Some(poller) => poller.is_running().await,
            None => false,
        }
    }
}
