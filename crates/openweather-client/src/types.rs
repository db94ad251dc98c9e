//! Wire types for the OpenWeatherMap current-weather endpoint

use serde::{Deserialize, Serialize};

/// Current weather for one city, as returned by `GET /weather`
///
/// Only the fields the SDK exposes are kept; anything else in the payload is ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeatherData {
    #[serde(default)]
    pub weather: Vec<Conditions>,
    pub main: Option<Main>,
    pub visibility: Option<i64>,
    pub wind: Option<Wind>,
    /// Observation time, unix seconds
    pub dt: Option<i64>,
    pub sys: Option<Sys>,
    /// Shift in seconds from UTC
    pub timezone: Option<i64>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Conditions {
    pub main: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Main {
    pub temp: Option<f64>,
    pub feels_like: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Wind {
    pub speed: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Sys {
    pub sunrise: Option<i64>,
    pub sunset: Option<i64>,
}

impl WeatherData {
    /// The primary condition, if the API reported any
    pub fn primary_conditions(&self) -> Option<&Conditions> {
        self.weather.first()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weather_data_deserialization() {
        let json = r#"{
            "coord": {"lon": -0.1257, "lat": 51.5085},
            "weather": [
                {"id": 803, "main": "Clouds", "description": "broken clouds", "icon": "04d"},
                {"id": 500, "main": "Rain", "description": "light rain", "icon": "10d"}
            ],
            "base": "stations",
            "main": {"temp": 285.9, "feels_like": 285.2, "pressure": 1012, "humidity": 76},
            "visibility": 10000,
            "wind": {"speed": 4.63, "deg": 240},
            "dt": 1700000000,
            "sys": {"country": "GB", "sunrise": 1699946000, "sunset": 1699979000},
            "timezone": 0,
            "id": 2643743,
            "name": "London",
            "cod": 200
        }"#;

        let data: WeatherData = serde_json::from_str(json).unwrap();
        assert_eq!(data.name.as_deref(), Some("London"));
        assert_eq!(data.weather.len(), 2);
        let primary = data.primary_conditions().unwrap();
        assert_eq!(primary.main.as_deref(), Some("Clouds"));
        assert_eq!(primary.description.as_deref(), Some("broken clouds"));
        assert_eq!(data.main.as_ref().unwrap().feels_like, Some(285.2));
        assert_eq!(data.visibility, Some(10000));
        assert_eq!(data.wind.as_ref().unwrap().speed, Some(4.63));
        assert_eq!(data.dt, Some(1700000000));
        assert_eq!(data.sys.as_ref().unwrap().sunset, Some(1699979000));
        assert_eq!(data.timezone, Some(0));
    }

    #[test]
    fn test_sparse_payload_deserializes() {
        let data: WeatherData = serde_json::from_str(r#"{"name": "Nowhere"}"#).unwrap();
        assert!(data.weather.is_empty());
        assert!(data.primary_conditions().is_none());
        assert!(data.main.is_none());
        assert!(data.sys.is_none());
    }
}
