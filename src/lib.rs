//! `WeatherNow` - city weather lookup service
//!
//! This library provides the core functionality for resolving a free-text
//! city + country pair into a geocoded location, fetching and aligning
//! provider forecasts, and serving country directory data. The same core is
//! exposed over an HTTP API and an MCP tool server.

pub mod api;
pub mod conditions;
pub mod config;
pub mod countries;
pub mod error;
pub mod forecast;
pub mod geocoding;
pub mod models;
pub mod nws;
pub mod tools;
pub mod web;

// Re-export core types for public API
pub use conditions::{align_index, extract_current};
pub use config::WeatherNowConfig;
pub use countries::CountryDirectory;
pub use error::WeatherNowError;
pub use forecast::{ForecastClient, WeatherAnswer};
pub use geocoding::{CityEntry, Geocoder, pick_location};
pub use models::{CountryEntry, CurrentConditions, ForecastPayload, GeocodedLocation};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, WeatherNowError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
