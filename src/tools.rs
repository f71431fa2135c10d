//! MCP tool server exposing the forecast core to an LLM agent
//!
//! Tools return preformatted text blocks, never structured errors: a failed
//! lookup becomes a descriptive message for the agent to relay.

use crate::config::WeatherNowConfig;
use crate::forecast::{ForecastClient, daily_summary_text};
use crate::geocoding::Geocoder;
use crate::models::ForecastPayload;
use crate::nws::{Alert, ForecastPeriod, NwsClient, PointReference};
use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{CallToolResult, Content, ServerCapabilities, ServerInfo};
use rmcp::transport::stdio;
use rmcp::{
    ErrorData as McpError, ServerHandler, ServiceExt, tool, tool_handler, tool_router,
};
use schemars::JsonSchema;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, warn};

#[derive(Debug, Deserialize, JsonSchema)]
pub struct GetForecastRequest {
    #[schemars(description = "Latitude of the location, -90 to 90")]
    pub latitude: f64,
    #[schemars(description = "Longitude of the location, -180 to 180")]
    pub longitude: f64,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct GetAlertsRequest {
    #[schemars(description = "Two-letter US state code, e.g. CA or NY")]
    pub state: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct GetCityWeatherRequest {
    #[schemars(description = "City name, free text")]
    pub city: String,
    #[schemars(description = "Country name or ISO 3166-1 alpha-2 code")]
    pub country: String,
}

/// Terminal states of the two-provider forecast chain
enum ForecastOutcome {
    /// Primary gridded forecast succeeded
    Gridded(Vec<ForecastPeriod>),
    /// Secondary global provider succeeded
    Global(ForecastPayload),
    /// Both tiers exhausted; carries the message for the caller
    Failed(String),
}

#[derive(Clone)]
pub struct WeatherTools {
    geocoder: Arc<Geocoder>,
    forecast: Arc<ForecastClient>,
    nws: Arc<NwsClient>,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl WeatherTools {
    pub fn new(config: &WeatherNowConfig) -> anyhow::Result<Self> {
        let client = config.providers.client()?;
        Ok(Self {
            geocoder: Arc::new(Geocoder::new(
                client.clone(),
                config.providers.geocoding_base_url.clone(),
            )),
            forecast: Arc::new(ForecastClient::new(
                client.clone(),
                config.providers.forecast_base_url.clone(),
            )),
            nws: Arc::new(NwsClient::new(client, config.providers.nws_base_url.clone())),
            tool_router: Self::tool_router(),
        })
    }

    #[tool(description = "Get the weather forecast for a pair of coordinates")]
    async fn get_forecast(
        &self,
        Parameters(GetForecastRequest {
            latitude,
            longitude,
        }): Parameters<GetForecastRequest>,
    ) -> Result<CallToolResult, McpError> {
        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return Ok(text_result(format!(
                "Invalid coordinates ({latitude}, {longitude}): latitude must be within [-90, 90] and longitude within [-180, 180]."
            )));
        }

        let label = format!("{latitude:.4}, {longitude:.4}");
        let text = match self.point_forecast(latitude, longitude).await {
            ForecastOutcome::Gridded(periods) => format_periods(&label, &periods),
            ForecastOutcome::Global(payload) => daily_summary_text(&label, &payload),
            ForecastOutcome::Failed(message) => message,
        };
        Ok(text_result(text))
    }

    #[tool(description = "Get active weather alerts for a US state")]
    async fn get_alerts(
        &self,
        Parameters(GetAlertsRequest { state }): Parameters<GetAlertsRequest>,
    ) -> Result<CallToolResult, McpError> {
        let state = state.trim();
        if state.len() != 2 || !state.chars().all(|c| c.is_ascii_alphabetic()) {
            return Ok(text_result(format!(
                "Invalid state code '{state}': expected a two-letter US state code such as CA or NY."
            )));
        }

        let text = match self.nws.active_alerts(state).await {
            Ok(alerts) => format_alerts(state, &alerts),
            Err(error) => {
                warn!(%error, "alert lookup failed");
                format!("Unable to fetch alerts for {}: {error}", state.to_uppercase())
            }
        };
        Ok(text_result(text))
    }

    #[tool(description = "Get the weather forecast for a city and country")]
    async fn get_city_weather(
        &self,
        Parameters(GetCityWeatherRequest { city, country }): Parameters<GetCityWeatherRequest>,
    ) -> Result<CallToolResult, McpError> {
        let city = city.trim();
        let country = country.trim();
        if city.is_empty() || country.is_empty() {
            return Ok(text_result(
                "Both city and country are required.".to_string(),
            ));
        }

        let location = match self.geocoder.resolve_location(city, country, "en").await {
            Ok(location) => location,
            Err(error) => return Ok(text_result(error.user_message())),
        };

        let label = format!("{} ({})", location.name, location.format_coordinates());
        let text = match self
            .point_forecast(location.latitude, location.longitude)
            .await
        {
            ForecastOutcome::Gridded(periods) => format_periods(&label, &periods),
            ForecastOutcome::Global(payload) => daily_summary_text(&label, &payload),
            ForecastOutcome::Failed(message) => message,
        };
        Ok(text_result(text))
    }

    /// Two-provider chain for one forecast lookup.
    ///
    /// Point-resolution failures (fetch error or missing forecast URL) fall
    /// back to the global provider; a failure fetching the gridded forecast
    /// resource itself is terminal.
    async fn point_forecast(&self, latitude: f64, longitude: f64) -> ForecastOutcome {
        match self.nws.lookup_point(latitude, longitude).await {
            Ok(PointReference {
                forecast_url: Some(url),
            }) => match self.nws.fetch_forecast(&url).await {
                Ok(periods) => ForecastOutcome::Gridded(periods),
                Err(error) => {
                    warn!(%error, "gridded forecast fetch failed");
                    ForecastOutcome::Failed(format!(
                        "Unable to fetch the forecast for ({latitude:.4}, {longitude:.4}): {error}"
                    ))
                }
            },
            Ok(PointReference { forecast_url: None }) => {
                debug!("point has no gridded coverage, trying the global provider");
                self.global_forecast(latitude, longitude).await
            }
            Err(error) => {
                warn!(%error, "point lookup failed, trying the global provider");
                self.global_forecast(latitude, longitude).await
            }
        }
    }

    async fn global_forecast(&self, latitude: f64, longitude: f64) -> ForecastOutcome {
        match self.forecast.fetch_forecast(latitude, longitude).await {
            Ok(payload) if payload.is_usable() => ForecastOutcome::Global(payload),
            Ok(_) => ForecastOutcome::Failed(format!(
                "No forecast data is available for ({latitude:.4}, {longitude:.4})."
            )),
            Err(error) => {
                warn!(%error, "global forecast fetch failed");
                ForecastOutcome::Failed(format!(
                    "Unable to fetch a forecast for ({latitude:.4}, {longitude:.4}). Both forecast providers are unreachable."
                ))
            }
        }
    }
}

#[tool_handler]
impl ServerHandler for WeatherTools {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            instructions: Some(
                "Weather lookup tools: forecasts by coordinates or by city and country, \
                 and active weather alerts for US states."
                    .to_string(),
            ),
            ..Default::default()
        }
    }
}

fn text_result(text: String) -> CallToolResult {
    CallToolResult::success(vec![Content::text(text)])
}

fn format_periods(label: &str, periods: &[ForecastPeriod]) -> String {
    if periods.is_empty() {
        return format!("No forecast periods available for {label}.");
    }
    let mut lines = vec![format!("Forecast for {label}:")];
    for period in periods {
        lines.push(format!(
            "{}: {}\u{b0}{}, wind {} {}. {}",
            period.name,
            period.temperature,
            period.temperature_unit,
            period.wind_speed,
            period.wind_direction,
            period.detailed_forecast
        ));
    }
    lines.join("\n")
}

fn format_alerts(state: &str, alerts: &[Alert]) -> String {
    let state = state.to_uppercase();
    if alerts.is_empty() {
        return format!("No active alerts for {state}.");
    }
    let mut lines = vec![format!("Active alerts for {state}:")];
    for alert in alerts {
        let headline = alert
            .headline
            .as_deref()
            .or(alert.description.as_deref())
            .unwrap_or("No details available");
        lines.push(format!(
            "{} ({}) - {}: {}",
            alert.event, alert.severity, alert.area_desc, headline
        ));
    }
    lines.join("\n")
}

/// Serve the tool server over stdio until the client disconnects
pub async fn run_stdio(config: &WeatherNowConfig) -> anyhow::Result<()> {
    tracing::info!("Starting WeatherNow tool server on stdio");
    let service = WeatherTools::new(config)?.serve(stdio()).await?;
    service.waiting().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_periods() {
        let periods = vec![ForecastPeriod {
            name: "Tonight".to_string(),
            temperature: 65,
            temperature_unit: "F".to_string(),
            wind_speed: "5 to 10 mph".to_string(),
            wind_direction: "SW".to_string(),
            detailed_forecast: "Partly cloudy.".to_string(),
        }];
        let text = format_periods("Springfield", &periods);
        assert!(text.starts_with("Forecast for Springfield:"));
        assert!(text.contains("Tonight: 65\u{b0}F, wind 5 to 10 mph SW. Partly cloudy."));
    }

    #[test]
    fn test_format_alerts_empty() {
        assert_eq!(format_alerts("ca", &[]), "No active alerts for CA.");
    }

    #[test]
    fn test_format_alerts() {
        let alerts = vec![Alert {
            event: "Flood Warning".to_string(),
            severity: "Severe".to_string(),
            area_desc: "Sangamon County".to_string(),
            headline: Some("Flood Warning until noon".to_string()),
            description: None,
        }];
        let text = format_alerts("IL", &alerts);
        assert!(text.contains("Flood Warning (Severe) - Sangamon County"));
        assert!(text.contains("until noon"));
    }
}
