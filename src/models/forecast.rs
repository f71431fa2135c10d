//! Forecast payload models
//!
//! Field names mirror the Open-Meteo wire format so the hourly and daily
//! series can be passed through to callers verbatim.

use serde::{Deserialize, Serialize};

/// Current observation block reported by the forecast provider
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CurrentWeather {
    pub temperature: Option<f64>,
    pub windspeed: Option<f64>,
    /// Observation timestamp; need not land on an hourly boundary
    pub time: Option<String>,
}

/// Hourly series as parallel arrays: index `i` in every array belongs to
/// `time[i]`. Individual slots may be null when the provider has gaps.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HourlySeries {
    #[serde(default)]
    pub time: Vec<String>,
    #[serde(rename = "relativehumidity_2m", default)]
    pub relative_humidity: Vec<Option<f64>>,
    #[serde(default)]
    pub visibility: Vec<Option<f64>>,
    #[serde(rename = "apparent_temperature", default)]
    pub apparent_temperature: Vec<Option<f64>>,
    #[serde(rename = "windspeed_10m", default)]
    pub wind_speed: Vec<Option<f64>>,
}

/// Daily series as parallel arrays
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DailySeries {
    #[serde(default)]
    pub time: Vec<String>,
    #[serde(rename = "temperature_2m_max", default)]
    pub temperature_max: Vec<Option<f64>>,
    #[serde(rename = "temperature_2m_min", default)]
    pub temperature_min: Vec<Option<f64>>,
    #[serde(rename = "precipitation_probability_max", default)]
    pub precipitation_probability_max: Vec<Option<f64>>,
    #[serde(rename = "weathercode", default)]
    pub weather_code: Vec<Option<u8>>,
}

/// Full forecast response for one location
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ForecastPayload {
    pub current_weather: Option<CurrentWeather>,
    pub hourly: Option<HourlySeries>,
    #[serde(default)]
    pub daily: DailySeries,
    #[serde(default)]
    pub timezone: String,
}

impl ForecastPayload {
    /// A payload without daily timestamps carries no usable forecast.
    /// Absence of `hourly` is tolerated; current-conditions fields degrade
    /// to null instead.
    #[must_use]
    pub fn is_usable(&self) -> bool {
        !self.daily.time.is_empty()
    }
}

/// Single current-conditions values projected from the hourly series.
/// Derived, never fetched directly; every field is nullable.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct CurrentConditions {
    pub temperature: Option<f64>,
    pub windspeed: Option<f64>,
    pub humidity: Option<f64>,
    pub visibility: Option<f64>,
    pub apparent_temperature: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usable_requires_daily_time() {
        let mut payload = ForecastPayload::default();
        assert!(!payload.is_usable());

        payload.daily.time.push("2024-01-01".to_string());
        assert!(payload.is_usable());
    }

    #[test]
    fn test_hourly_parses_provider_names() {
        let json = serde_json::json!({
            "timezone": "Asia/Jerusalem",
            "daily": { "time": ["2024-01-01"], "temperature_2m_max": [21.3] },
            "hourly": {
                "time": ["2024-01-01T00:00"],
                "relativehumidity_2m": [55.0],
                "windspeed_10m": [null]
            }
        });
        let payload: ForecastPayload = serde_json::from_value(json).unwrap();
        let hourly = payload.hourly.unwrap();
        assert_eq!(hourly.relative_humidity, vec![Some(55.0)]);
        assert_eq!(hourly.wind_speed, vec![None]);
        assert_eq!(payload.daily.temperature_max, vec![Some(21.3)]);
    }
}
