//! The seam between providers and the remote weather API

use std::future::Future;

use openweather_client::{FetchError, OpenWeatherClient, WeatherData};

/// Retrieves current weather for a city from a remote source
///
/// Implementations do their own transport-level retry policy, if any;
/// providers call `fetch` once per miss or refresh and never retry.
pub trait Fetcher: Send + Sync + 'static {
    fn fetch(
        &self,
        city: &str,
    ) -> impl Future<Output = Result<WeatherData, FetchError>> + Send;
}

impl Fetcher for OpenWeatherClient {
    async fn fetch(&self, city: &str) -> Result<WeatherData, FetchError> {
        self.current_weather(city).await
    }
}
