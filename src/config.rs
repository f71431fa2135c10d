//! Configuration management for the `WeatherNow` application
//!
//! Loads configuration from environment variables with serde-backed
//! defaults for every setting, so the service runs with no setup.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

/// Root configuration structure for the `WeatherNow` application
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherNowConfig {
    /// HTTP server configuration
    pub server: ServerConfig,
    /// Upstream provider configuration
    pub providers: ProvidersConfig,
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Listen port for the HTTP API
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Upstream provider settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvidersConfig {
    /// Base URL for the Open-Meteo geocoding API
    #[serde(default = "default_geocoding_base_url")]
    pub geocoding_base_url: String,
    /// Base URL for the Open-Meteo forecast API
    #[serde(default = "default_forecast_base_url")]
    pub forecast_base_url: String,
    /// Base URL for the National Weather Service API
    #[serde(default = "default_nws_base_url")]
    pub nws_base_url: String,
    /// Base URL for the REST Countries directory
    #[serde(default = "default_countries_base_url")]
    pub countries_base_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u32,
    /// User agent sent to upstream providers
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

// Default value functions
fn default_port() -> u16 {
    8080
}

fn default_geocoding_base_url() -> String {
    "https://geocoding-api.open-meteo.com".to_string()
}

fn default_forecast_base_url() -> String {
    "https://api.open-meteo.com".to_string()
}

fn default_nws_base_url() -> String {
    "https://api.weather.gov".to_string()
}

fn default_countries_base_url() -> String {
    "https://restcountries.com".to_string()
}

fn default_timeout() -> u32 {
    30
}

fn default_user_agent() -> String {
    format!("weathernow/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for WeatherNowConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                port: default_port(),
            },
            providers: ProvidersConfig {
                geocoding_base_url: default_geocoding_base_url(),
                forecast_base_url: default_forecast_base_url(),
                nws_base_url: default_nws_base_url(),
                countries_base_url: default_countries_base_url(),
                timeout_seconds: default_timeout(),
                user_agent: default_user_agent(),
            },
        }
    }
}

impl WeatherNowConfig {
    /// Load configuration from `WEATHERNOW_*` environment variables,
    /// falling back to defaults for anything unset.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(port) = env::var("WEATHERNOW_PORT") {
            config.server.port = port
                .parse()
                .with_context(|| format!("Invalid WEATHERNOW_PORT value: {port}"))?;
        }
        if let Ok(url) = env::var("WEATHERNOW_GEOCODING_URL") {
            config.providers.geocoding_base_url = url;
        }
        if let Ok(url) = env::var("WEATHERNOW_FORECAST_URL") {
            config.providers.forecast_base_url = url;
        }
        if let Ok(url) = env::var("WEATHERNOW_NWS_URL") {
            config.providers.nws_base_url = url;
        }
        if let Ok(url) = env::var("WEATHERNOW_COUNTRIES_URL") {
            config.providers.countries_base_url = url;
        }
        if let Ok(timeout) = env::var("WEATHERNOW_TIMEOUT_SECONDS") {
            config.providers.timeout_seconds = timeout
                .parse()
                .with_context(|| format!("Invalid WEATHERNOW_TIMEOUT_SECONDS value: {timeout}"))?;
        }

        Ok(config)
    }
}

impl ProvidersConfig {
    /// Build the shared HTTP client used for all provider calls
    pub fn client(&self) -> Result<reqwest::Client> {
        reqwest::Client::builder()
            .timeout(Duration::from_secs(self.timeout_seconds.into()))
            .user_agent(self.user_agent.clone())
            .build()
            .with_context(|| "Failed to create HTTP client")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = WeatherNowConfig::default();
        assert_eq!(config.server.port, 8080);
        assert!(config.providers.geocoding_base_url.contains("open-meteo"));
        assert!(config.providers.nws_base_url.contains("weather.gov"));
        assert!(config.providers.countries_base_url.contains("restcountries"));
        assert_eq!(config.providers.timeout_seconds, 30);
    }

    #[test]
    fn test_client_builds() {
        let config = WeatherNowConfig::default();
        assert!(config.providers.client().is_ok());
    }
}
