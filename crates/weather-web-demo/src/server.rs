//! HTTP server for the weather demo
//!
//! Provides /health, /weather?city=..., and /weather/cache/info endpoints,
//! all served by the registry's default provider.

use crate::error::ApiError;
use crate::types::{CacheInfoBody, HealthResponse, WeatherBody};
use axum::{
    extract::{Query, State},
    response::Json,
    routing::get,
    Router,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::future::Future;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::info;
use weather_sdk::{mask_api_key, Fetcher, ProviderRegistry};

/// Shared state for the HTTP server
pub struct ServerState<F: Fetcher> {
    pub registry: ProviderRegistry<F>,
    pub started_at: DateTime<Utc>,
}

impl<F: Fetcher> ServerState<F> {
    pub fn new(registry: ProviderRegistry<F>) -> Self {
        Self {
            registry,
            started_at: Utc::now(),
        }
    }
}

pub type SharedState<F> = Arc<ServerState<F>>;

#[derive(Debug, Deserialize)]
pub struct WeatherQuery {
    city: Option<String>,
}

/// Create the HTTP router
pub fn create_router<F: Fetcher>(state: SharedState<F>) -> Router {
    Router::new()
        .route("/health", get(health::<F>))
        .route("/weather", get(get_weather::<F>))
        .route("/weather/cache/info", get(get_cache_info::<F>))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Start the HTTP server, returning once `shutdown` resolves
pub async fn start_server<F: Fetcher>(
    state: SharedState<F>,
    port: u16,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> std::io::Result<()> {
    let router = create_router(state);
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    info!("Starting HTTP server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await
}

/// Health check endpoint
async fn health<F: Fetcher>(State(state): State<SharedState<F>>) -> Json<HealthResponse> {
    let uptime_secs = (Utc::now() - state.started_at).num_seconds().max(0) as u64;

    Json(HealthResponse {
        status: "ok".to_string(),
        uptime_secs,
        active_providers: state.registry.active_count().await,
    })
}

/// Current weather for `?city=`
async fn get_weather<F: Fetcher>(
    State(state): State<SharedState<F>>,
    Query(query): Query<WeatherQuery>,
) -> Result<Json<WeatherBody>, ApiError> {
    let city = query
        .city
        .filter(|c| !c.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest("City parameter is required".to_string()))?;

    info!(city = %city, "Received weather request");

    let provider = state.registry.get_default().await?;
    let weather = provider.get_weather(&city).await?;
    let cache_size = provider.cache_size().await;

    Ok(Json(WeatherBody {
        weather,
        cache_size,
    }))
}

/// Cache size and identity of the default provider
async fn get_cache_info<F: Fetcher>(
    State(state): State<SharedState<F>>,
) -> Result<Json<CacheInfoBody>, ApiError> {
    let provider = state.registry.get_default().await?;

    Ok(Json(CacheInfoBody {
        cache_size: provider.cache_size().await,
        operating_mode: provider.mode(),
        api_key: mask_api_key(provider.api_key()),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tower::ServiceExt;
    use weather_sdk::{FetchError, Main, OperatingMode, ProviderSettings, WeatherData};

    const API_KEY: &str = "demo-key-abcdef123456";

    /// Fetcher answering from a fixed table of cities
    #[derive(Clone, Default)]
    struct TableFetcher {
        calls: Arc<AtomicUsize>,
    }

    impl Fetcher for TableFetcher {
        async fn fetch(&self, city: &str) -> Result<WeatherData, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match city {
                "Atlantis" => Err(FetchError::NotFound(city.to_string())),
                "Secret" => Err(FetchError::Unauthorized),
                "Busy" => Err(FetchError::RateLimited),
                "Boom" => Err(FetchError::Upstream("HTTP 503".to_string())),
                _ => Ok(WeatherData {
                    main: Some(Main {
                        temp: Some(291.5),
                        feels_like: Some(290.9),
                    }),
                    name: Some(city.to_string()),
                    ..WeatherData::default()
                }),
            }
        }
    }

    fn create_test_state(fetcher: TableFetcher) -> SharedState<TableFetcher> {
        let settings = ProviderSettings {
            cache_capacity: 2,
            cache_ttl: Duration::from_secs(600),
            polling_interval: Duration::from_secs(600),
        };
        let registry = ProviderRegistry::new(settings, Box::new(move |_: &str| fetcher.clone()))
            .with_default(API_KEY, OperatingMode::OnDemand)
            .unwrap();
        Arc::new(ServerState::new(registry))
    }

    async fn get_json(router: Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let response = router
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let router = create_router(create_test_state(TableFetcher::default()));

        let (status, json) = get_json(router, "/health").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "ok");
        assert!(json["uptime_secs"].as_u64().is_some());
        assert_eq!(json["active_providers"], 0);
    }

    #[tokio::test]
    async fn test_weather_endpoint_success_and_cache_hit() {
        let fetcher = TableFetcher::default();
        let state = create_test_state(fetcher.clone());

        let (status, json) = get_json(create_router(state.clone()), "/weather?city=London").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["name"], "London");
        assert_eq!(json["temperature"]["temp"], 291.5);
        assert_eq!(json["cacheSize"], 1);

        let (status, _) = get_json(create_router(state.clone()), "/weather?city=London").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);
        assert_eq!(state.registry.active_count().await, 1);
    }

    #[tokio::test]
    async fn test_weather_endpoint_requires_city() {
        let fetcher = TableFetcher::default();
        let state = create_test_state(fetcher.clone());

        for uri in ["/weather", "/weather?city=", "/weather?city=%20%20"] {
            let (status, json) = get_json(create_router(state.clone()), uri).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(json["error"], "City parameter is required");
        }
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_weather_endpoint_error_statuses() {
        let state = create_test_state(TableFetcher::default());

        let cases = [
            ("Atlantis", StatusCode::NOT_FOUND),
            ("Secret", StatusCode::UNAUTHORIZED),
            ("Busy", StatusCode::TOO_MANY_REQUESTS),
            ("Boom", StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (city, expected) in cases {
            let uri = format!("/weather?city={}", city);
            let (status, json) = get_json(create_router(state.clone()), &uri).await;
            assert_eq!(status, expected, "city {}", city);
            assert!(json["error"].as_str().is_some());
        }
    }

    #[tokio::test]
    async fn test_cache_info_endpoint() {
        let state = create_test_state(TableFetcher::default());
        get_json(create_router(state.clone()), "/weather?city=Paris").await;

        let (status, json) = get_json(create_router(state), "/weather/cache/info").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["cacheSize"], 1);
        assert_eq!(json["operatingMode"], "ON_DEMAND");
        assert_eq!(json["apiKey"], "demo...3456");
    }
}
