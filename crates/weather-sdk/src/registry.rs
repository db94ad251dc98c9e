use std::collections::HashMap;
use std::sync::Arc;

use openweather_client::{mask_api_key, OpenWeatherClient};
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::config::{OperatingMode, ProviderSettings, SdkConfig};
use crate::error::{Result, WeatherError};
use crate::fetcher::Fetcher;
use crate::provider::WeatherProvider;

/// Builds the fetcher for a newly created provider from its API key
pub type FetcherFactory<F> = Box<dyn Fn(&str) -> F + Send + Sync>;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct ProviderKey {
    api_key: String,
    mode: OperatingMode,
}

impl ProviderKey {
    fn new(api_key: &str, mode: OperatingMode) -> Result<Self> {
        let api_key = api_key.trim();
        if api_key.is_empty() {
            return Err(WeatherError::InvalidArgument(
                "API key cannot be empty".to_string(),
            ));
        }
        Ok(Self {
            api_key: api_key.to_string(),
            mode,
        })
    }
}

/// Hands out one shared [`WeatherProvider`] per (API key, mode) pair
///
/// Providers are created lazily on first request and live until removed or
/// until [`ProviderRegistry::shutdown_all`]. Lookup and construction happen in
/// one critical section, so concurrent first requests for the same key always
/// observe the same instance.
pub struct ProviderRegistry<F: Fetcher> {
    providers: Mutex<HashMap<ProviderKey, Arc<WeatherProvider<F>>>>,
    settings: ProviderSettings,
    make_fetcher: FetcherFactory<F>,
    default_key: Option<ProviderKey>,
}

impl ProviderRegistry<OpenWeatherClient> {
    /// Registry of OpenWeatherMap-backed providers using the configured API URL
    ///
    /// The configured API key and mode become the target of [`ProviderRegistry::get_default`].
    pub fn from_config(config: &SdkConfig) -> Self {
        let api_url = config.api_url.clone();
        let mut registry = Self::new(
            config.provider.clone(),
            Box::new(move |api_key: &str| OpenWeatherClient::new(api_key, &api_url)),
        );
        registry.default_key = ProviderKey::new(&config.api_key, config.mode).ok();
        registry
    }
}

impl<F: Fetcher> ProviderRegistry<F> {
    pub fn new(settings: ProviderSettings, make_fetcher: FetcherFactory<F>) -> Self {
        info!(
            cache_capacity = settings.cache_capacity,
            cache_ttl_secs = settings.cache_ttl.as_secs(),
            polling_interval_secs = settings.polling_interval.as_secs(),
            "Provider registry initialized"
        );

        Self {
            providers: Mutex::new(HashMap::new()),
            settings,
            make_fetcher,
            default_key: None,
        }
    }

    /// Set the API key and mode served by [`ProviderRegistry::get_default`]
    pub fn with_default(mut self, api_key: &str, mode: OperatingMode) -> Result<Self> {
        self.default_key = Some(ProviderKey::new(api_key, mode)?);
        Ok(self)
    }

    /// Get the provider for this API key and mode, creating it on first use
    pub async fn get(&self, api_key: &str, mode: OperatingMode) -> Result<Arc<WeatherProvider<F>>> {
        let key = ProviderKey::new(api_key, mode)?;
        self.get_or_create(key).await
    }

    /// Get the provider for the configured API key and mode
    pub async fn get_default(&self) -> Result<Arc<WeatherProvider<F>>> {
        let key = self
            .default_key
            .clone()
            .ok_or_else(|| WeatherError::Config("No default API key configured".to_string()))?;
        self.get_or_create(key).await
    }

    async fn get_or_create(&self, key: ProviderKey) -> Result<Arc<WeatherProvider<F>>> {
        let mut providers = self.providers.lock().await;
        if let Some(existing) = providers.get(&key) {
            return Ok(existing.clone());
        }

        info!(
            api_key = %mask_api_key(&key.api_key),
            mode = %key.mode,
            "Creating new weather provider"
        );

        let fetcher = (self.make_fetcher)(&key.api_key);
        let provider =
            Arc::new(WeatherProvider::new(&key.api_key, key.mode, fetcher, &self.settings).await?);
        providers.insert(key, provider.clone());
        Ok(provider)
    }

    /// Remove and shut down a provider. Returns `false` if none was registered.
    pub async fn remove(&self, api_key: &str, mode: OperatingMode) -> Result<bool> {
        let key = ProviderKey::new(api_key, mode)?;
        let removed = self.providers.lock().await.remove(&key);

        match removed {
            Some(provider) => {
                provider.shutdown().await;
                info!(
                    api_key = %mask_api_key(&key.api_key),
                    mode = %key.mode,
                    "Removed and shut down weather provider"
                );
                Ok(true)
            }
            None => {
                warn!(
                    api_key = %mask_api_key(&key.api_key),
                    mode = %key.mode,
                    "Weather provider not found for removal"
                );
                Ok(false)
            }
        }
    }

    /// Shut down and forget every provider
    pub async fn shutdown_all(&self) {
        info!("Shutting down all weather providers");

        let drained: Vec<_> = self.providers.lock().await.drain().map(|(_, p)| p).collect();
        for provider in &drained {
            provider.shutdown().await;
        }

        info!(count = drained.len(), "All weather providers shut down");
    }

    pub async fn active_count(&self) -> usize {
        self.providers.lock().await.len()
    }
}
