//! Core data models shared across the resolver, providers and transports

pub mod country;
pub mod forecast;
pub mod location;

pub use country::CountryEntry;
pub use forecast::{CurrentConditions, CurrentWeather, DailySeries, ForecastPayload, HourlySeries};
pub use location::GeocodedLocation;
