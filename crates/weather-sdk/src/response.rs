//! Caller-facing weather shape
//!
//! A flattened view of [`WeatherData`] with stable field names and order,
//! independent of the upstream payload layout.

use openweather_client::WeatherData;
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WeatherResponse {
    pub weather: WeatherInfo,
    pub temperature: TemperatureInfo,
    pub visibility: Option<i64>,
    pub wind: WindInfo,
    /// Observation time, unix seconds
    pub datetime: Option<i64>,
    pub sys: SysInfo,
    pub timezone: Option<i64>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WeatherInfo {
    pub main: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TemperatureInfo {
    pub temp: Option<f64>,
    pub feels_like: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WindInfo {
    pub speed: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SysInfo {
    pub sunrise: Option<i64>,
    pub sunset: Option<i64>,
}

impl From<&WeatherData> for WeatherResponse {
    fn from(data: &WeatherData) -> Self {
        // Only the primary condition is exposed
        let weather = data
            .primary_conditions()
            .map(|c| WeatherInfo {
                main: c.main.clone(),
                description: c.description.clone(),
            })
            .unwrap_or_default();

        let temperature = data
            .main
            .as_ref()
            .map(|m| TemperatureInfo {
                temp: m.temp,
                feels_like: m.feels_like,
            })
            .unwrap_or_default();

        let sys = data
            .sys
            .as_ref()
            .map(|s| SysInfo {
                sunrise: s.sunrise,
                sunset: s.sunset,
            })
            .unwrap_or_default();

        Self {
            weather,
            temperature,
            visibility: data.visibility,
            wind: WindInfo {
                speed: data.wind.as_ref().and_then(|w| w.speed),
            },
            datetime: data.dt,
            sys,
            timezone: data.timezone,
            name: data.name.clone(),
        }
    }
}
