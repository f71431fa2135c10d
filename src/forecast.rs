//! Forecast fetch and response assembly for the Open-Meteo API

use crate::conditions::{align_index, extract_current, hourly_times};
use crate::models::{
    CurrentConditions, CurrentWeather, DailySeries, ForecastPayload, GeocodedLocation, HourlySeries,
};
use crate::{Result, WeatherNowError};
use serde::Serialize;
use tracing::instrument;

/// Forecast API client
pub struct ForecastClient {
    client: reqwest::Client,
    base_url: String,
}

impl ForecastClient {
    #[must_use]
    pub fn new(client: reqwest::Client, base_url: String) -> Self {
        Self { client, base_url }
    }

    /// Fetch the full forecast payload for a point
    #[instrument(skip(self))]
    pub async fn fetch_forecast(&self, latitude: f64, longitude: f64) -> Result<ForecastPayload> {
        let url = format!(
            "{}/v1/forecast?latitude={}&longitude={}&current_weather=true&hourly=relativehumidity_2m,visibility,apparent_temperature,windspeed_10m&daily=temperature_2m_max,temperature_2m_min,precipitation_probability_max,weathercode&timezone=auto",
            self.base_url, latitude, longitude
        );

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| WeatherNowError::upstream(format!("Forecast request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(WeatherNowError::upstream(format!(
                "Forecast API returned status {}",
                response.status()
            )));
        }

        response.json().await.map_err(|e| {
            WeatherNowError::upstream(format!("Failed to parse forecast response: {e}"))
        })
    }
}

/// The final answer shape for the HTTP weather endpoint.
/// Hourly and daily series are passed through verbatim.
#[derive(Debug, Serialize)]
pub struct WeatherAnswer {
    pub location: GeocodedLocation,
    pub timezone: String,
    pub current: CurrentConditions,
    pub current_weather: Option<CurrentWeather>,
    pub hourly: Option<HourlySeries>,
    pub daily: DailySeries,
}

/// Compose a resolved location and a raw forecast payload into the answer.
/// A payload with no daily timestamps counts as "no forecast data".
pub fn assemble(location: GeocodedLocation, payload: ForecastPayload) -> Result<WeatherAnswer> {
    if !payload.is_usable() {
        return Err(WeatherNowError::not_found(format!(
            "No forecast data available for {}",
            location.name
        )));
    }

    let index = align_index(
        hourly_times(&payload),
        payload
            .current_weather
            .as_ref()
            .and_then(|c| c.time.as_deref()),
    );
    let current = extract_current(&payload, index);

    Ok(WeatherAnswer {
        location,
        timezone: payload.timezone,
        current,
        current_weather: payload.current_weather,
        hourly: payload.hourly,
        daily: payload.daily,
    })
}

/// Compact human-readable daily summary, used as the global-provider text
/// block on the tool server.
#[must_use]
pub fn daily_summary_text(label: &str, payload: &ForecastPayload) -> String {
    let daily = &payload.daily;
    let mut lines = vec![format!("Forecast for {label}:")];
    for (i, date) in daily.time.iter().enumerate() {
        let max = daily.temperature_max.get(i).copied().flatten();
        let min = daily.temperature_min.get(i).copied().flatten();
        let precipitation = daily.precipitation_probability_max.get(i).copied().flatten();
        let description = daily
            .weather_code
            .get(i)
            .copied()
            .flatten()
            .map_or("Unknown", weather_code_to_description);

        let mut line = format!("{date}: {description}");
        if let (Some(min), Some(max)) = (min, max) {
            line.push_str(&format!(", {min:.0}\u{b0}C to {max:.0}\u{b0}C"));
        }
        if let Some(precipitation) = precipitation {
            line.push_str(&format!(", {precipitation:.0}% chance of precipitation"));
        }
        lines.push(line);
    }
    lines.join("\n")
}

/// Convert a WMO weather code to a human-readable description
#[must_use]
pub fn weather_code_to_description(code: u8) -> &'static str {
    match code {
        0 => "Clear sky",
        1 => "Mainly clear",
        2 => "Partly cloudy",
        3 => "Overcast",
        45 => "Fog",
        48 => "Depositing rime fog",
        51 => "Light drizzle",
        53 => "Moderate drizzle",
        55 => "Dense drizzle",
        56 => "Light freezing drizzle",
        57 => "Dense freezing drizzle",
        61 => "Slight rain",
        63 => "Moderate rain",
        65 => "Heavy rain",
        66 => "Light freezing rain",
        67 => "Heavy freezing rain",
        71 => "Slight snow fall",
        73 => "Moderate snow fall",
        75 => "Heavy snow fall",
        77 => "Snow grains",
        80 => "Slight rain showers",
        81 => "Moderate rain showers",
        82 => "Violent rain showers",
        85 => "Slight snow showers",
        86 => "Heavy snow showers",
        95 => "Thunderstorm",
        96 => "Thunderstorm with slight hail",
        99 => "Thunderstorm with heavy hail",
        _ => "Unknown",
    }
}
