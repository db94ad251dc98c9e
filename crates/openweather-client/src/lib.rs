//! OpenWeatherMap Client
//!
//! A small client for the OpenWeatherMap current-weather endpoint
//! (`GET /weather?q={city}`). Each HTTP failure class maps to its own
//! [`FetchError`] variant so callers can respond to them differently.
//! The client performs no caching or retries of its own.

mod client;
mod error;
mod types;

pub use client::{mask_api_key, OpenWeatherClient, DEFAULT_BASE_URL};
pub use error::{FetchError, Result};
pub use types::{Conditions, Main, Sys, WeatherData, Wind};
