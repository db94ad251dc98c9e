use std::time::Duration;

use reqwest::StatusCode;
use tracing::{debug, error, info};

use crate::error::{FetchError, Result};
use crate::types::WeatherData;

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";
const DEFAULT_USER_AGENT: &str = "weather-sdk-rs/0.1";
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// OpenWeatherMap client bound to a single API key
pub struct OpenWeatherClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl OpenWeatherClient {
    /// Create a client against the public OpenWeatherMap API
    pub fn with_api_key(api_key: &str) -> Self {
        Self::new(api_key, DEFAULT_BASE_URL)
    }

    /// Create a client against a custom base URL (e.g. a proxy or a test server)
    pub fn new(api_key: &str, base_url: &str) -> Self {
        let client = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(REQUEST_TIMEOUT)
            .user_agent(DEFAULT_USER_AGENT)
            .build()
            .expect("Failed to create HTTP client");

        info!(base_url, "OpenWeatherMap client initialized");

        Self {
            client,
            api_key: api_key.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch current weather for a city
    pub async fn current_weather(&self, city: &str) -> Result<WeatherData> {
        let url = format!(
            "{}/weather?q={}&appid={}",
            self.base_url,
            urlencoding::encode(city),
            urlencoding::encode(&self.api_key)
        );

        debug!(
            city,
            api_key = %mask_api_key(&self.api_key),
            "Requesting current weather"
        );

        let response = self.client.get(&url).send().await.map_err(|e| {
            error!(city, error = %e, "Weather request failed");
            FetchError::Transport(e.without_url().to_string())
        })?;

        let status = response.status();
        debug!(city, status = %status, "Weather API responded");

        if status.is_success() {
            let body = response.text().await?;
            let data: WeatherData = serde_json::from_str(&body)?;
            info!(city, "Fetched current weather");
            return Ok(data);
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|e| format!("failed to read error body: {}", e));
        error!(city, status = %status, body = %body, "Weather API error");

        Err(error_for_status(status, city))
    }
}

/// Map a non-success status to the matching error kind
fn error_for_status(status: StatusCode, city: &str) -> FetchError {
    match status {
        StatusCode::NOT_FOUND => FetchError::NotFound(city.to_string()),
        StatusCode::UNAUTHORIZED => FetchError::Unauthorized,
        StatusCode::TOO_MANY_REQUESTS => FetchError::RateLimited,
        StatusCode::BAD_REQUEST => FetchError::BadRequest(city.to_string()),
        StatusCode::INTERNAL_SERVER_ERROR => {
            FetchError::Upstream("OpenWeatherMap API internal error".to_string())
        }
        other => FetchError::Upstream(format!("HTTP {} for city: {}", other.as_u16(), city)),
    }
}

/// Render an API key safe for logs and diagnostics
pub fn mask_api_key(api_key: &str) -> String {
    let chars: Vec<char> = api_key.chars().collect();
    if chars.len() <= 8 {
        return "***".to_string();
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", head, tail)
}
