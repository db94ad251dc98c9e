//! Scriptable fetcher for provider, poller, and registry tests

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use openweather_client::{FetchError, Main, WeatherData};

use crate::fetcher::Fetcher;

#[derive(Default)]
struct FakeState {
    calls: AtomicUsize,
    per_city: Mutex<HashMap<String, usize>>,
    failing: Mutex<HashMap<String, FetchError>>,
    slow: Mutex<HashSet<String>>,
    delay: Mutex<Option<Duration>>,
}

/// Returns a reading whose temperature is the number of fetches so far for that city
#[derive(Clone, Default)]
pub(crate) struct FakeFetcher {
    state: Arc<FakeState>,
}

impl FakeFetcher {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn calls(&self) -> usize {
        self.state.calls.load(Ordering::SeqCst)
    }

    pub(crate) fn calls_for(&self, city: &str) -> usize {
        self.state
            .per_city
            .lock()
            .unwrap()
            .get(city)
            .copied()
            .unwrap_or(0)
    }

    pub(crate) fn fail(&self, city: &str, err: FetchError) {
        self.state
            .failing
            .lock()
            .unwrap()
            .insert(city.to_string(), err);
    }

    pub(crate) fn recover(&self, city: &str) {
        self.state.failing.lock().unwrap().remove(city);
    }

    /// Make fetches for `city` take `delay` of (tokio) time
    pub(crate) fn slow_down(&self, city: &str, delay: Duration) {
        self.state.slow.lock().unwrap().insert(city.to_string());
        *self.state.delay.lock().unwrap() = Some(delay);
    }
}

impl Fetcher for FakeFetcher {
    async fn fetch(&self, city: &str) -> Result<WeatherData, FetchError> {
        self.state.calls.fetch_add(1, Ordering::SeqCst);
        let count = {
            let mut per_city = self.state.per_city.lock().unwrap();
            let count = per_city.entry(city.to_string()).or_insert(0);
            *count += 1;
            *count
        };

        let delay = if self.state.slow.lock().unwrap().contains(city) {
            *self.state.delay.lock().unwrap()
        } else {
            None
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if let Some(err) = self.state.failing.lock().unwrap().get(city) {
            return Err(err.clone());
        }

        Ok(WeatherData {
            main: Some(Main {
                temp: Some(count as f64),
                feels_like: None,
            }),
            name: Some(city.to_string()),
            ..WeatherData::default()
        })
    }
}
