//! National Weather Service client
//!
//! The NWS API is an indirection: raw coordinates resolve to a point
//! reference which links to the gridded forecast resource. Points outside
//! the US grid silently resolve without a forecast URL, which is what
//! drives the fallback to the global provider.

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use tracing::instrument;

/// Point reference returned by the points endpoint
#[derive(Debug, Clone)]
pub struct PointReference {
    /// Gridded forecast resource URL, absent outside NWS coverage
    pub forecast_url: Option<String>,
}

/// One named period of a gridded forecast (e.g. "Tonight")
#[derive(Debug, Clone, Deserialize)]
pub struct ForecastPeriod {
    pub name: String,
    pub temperature: i32,
    #[serde(rename = "temperatureUnit")]
    pub temperature_unit: String,
    #[serde(rename = "windSpeed")]
    pub wind_speed: String,
    #[serde(rename = "windDirection")]
    pub wind_direction: String,
    #[serde(rename = "detailedForecast")]
    pub detailed_forecast: String,
}

/// One active weather alert
#[derive(Debug, Clone, Deserialize)]
pub struct Alert {
    pub event: String,
    pub severity: String,
    #[serde(rename = "areaDesc")]
    pub area_desc: String,
    pub headline: Option<String>,
    pub description: Option<String>,
}

/// NWS API client
pub struct NwsClient {
    client: reqwest::Client,
    base_url: String,
}

impl NwsClient {
    #[must_use]
    pub fn new(client: reqwest::Client, base_url: String) -> Self {
        Self { client, base_url }
    }

    /// Resolve a point reference by exact coordinates (4-decimal rounding,
    /// the precision the points endpoint expects)
    #[instrument(skip(self))]
    pub async fn lookup_point(&self, latitude: f64, longitude: f64) -> Result<PointReference> {
        let url = format!("{}/points/{latitude:.4},{longitude:.4}", self.base_url);
        let response: wire::PointsResponse = self.get_json(&url).await?;
        Ok(PointReference {
            forecast_url: response.properties.forecast,
        })
    }

    /// Fetch the gridded forecast behind a point reference
    #[instrument(skip(self))]
    pub async fn fetch_forecast(&self, forecast_url: &str) -> Result<Vec<ForecastPeriod>> {
        let response: wire::ForecastResponse = self.get_json(forecast_url).await?;
        Ok(response.properties.periods)
    }

    /// Active alerts for a two-letter state code
    #[instrument(skip(self))]
    pub async fn active_alerts(&self, state: &str) -> Result<Vec<Alert>> {
        let url = format!(
            "{}/alerts/active/area/{}",
            self.base_url,
            state.to_uppercase()
        );
        let response: wire::AlertResponse = self.get_json(&url).await?;
        Ok(response
            .features
            .into_iter()
            .map(|feature| feature.properties)
            .collect())
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T> {
        let response = self
            .client
            .get(url)
            .header("Accept", "application/geo+json")
            .send()
            .await
            .with_context(|| format!("Request to {url} failed"))?;

        if !response.status().is_success() {
            bail!("NWS returned status {} for {url}", response.status());
        }

        response
            .json()
            .await
            .with_context(|| format!("Failed to parse NWS response from {url}"))
    }
}

/// NWS API response envelopes
mod wire {
    use super::{Alert, ForecastPeriod};
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    pub struct PointsResponse {
        pub properties: PointsProperties,
    }

    #[derive(Debug, Deserialize)]
    pub struct PointsProperties {
        #[serde(default)]
        pub forecast: Option<String>,
    }

    #[derive(Debug, Deserialize)]
    pub struct ForecastResponse {
        pub properties: ForecastProperties,
    }

    #[derive(Debug, Deserialize)]
    pub struct ForecastProperties {
        pub periods: Vec<ForecastPeriod>,
    }

    #[derive(Debug, Deserialize)]
    pub struct AlertResponse {
        #[serde(default)]
        pub features: Vec<AlertFeature>,
    }

    #[derive(Debug, Deserialize)]
    pub struct AlertFeature {
        pub properties: Alert,
    }
}
