//! Location resolution against the Open-Meteo geocoding API
//!
//! Turns a free-text city name into ranked geocoded candidates, then
//! disambiguates by the caller-supplied country.

use crate::models::GeocodedLocation;
use crate::{Result, WeatherNowError};
use serde::Serialize;
use std::collections::HashSet;
use tracing::{debug, instrument};

/// Candidate limit for the single-location forecast flow
pub const FORECAST_CANDIDATES: usize = 10;
/// Candidate limit for the cities-by-country flow
pub const CITY_LIST_CANDIDATES: usize = 20;

/// A de-duplicated city suggestion for dropdown population
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CityEntry {
    pub name: String,
    pub admin1: Option<String>,
}

/// Geocoding client
pub struct Geocoder {
    client: reqwest::Client,
    base_url: String,
}

impl Geocoder {
    #[must_use]
    pub fn new(client: reqwest::Client, base_url: String) -> Self {
        Self { client, base_url }
    }

    /// Fetch up to `count` candidates for a city name
    #[instrument(skip(self))]
    pub async fn search(
        &self,
        city: &str,
        lang: &str,
        count: usize,
    ) -> Result<Vec<GeocodedLocation>> {
        let url = format!(
            "{}/v1/search?name={}&count={}&language={}&format=json",
            self.base_url,
            urlencoding::encode(city),
            count,
            urlencoding::encode(lang)
        );

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| WeatherNowError::upstream(format!("Geocoding request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(WeatherNowError::upstream(format!(
                "Geocoding API returned status {}",
                response.status()
            )));
        }

        let parsed: open_meteo::GeocodingResponse = response.json().await.map_err(|e| {
            WeatherNowError::upstream(format!("Failed to parse geocoding response: {e}"))
        })?;

        let candidates = parsed.results.unwrap_or_default();
        debug!("Geocoder returned {} candidates for {city}", candidates.len());
        Ok(candidates)
    }

    /// Resolve one city + country pair to a single location
    pub async fn resolve_location(
        &self,
        city: &str,
        country: &str,
        lang: &str,
    ) -> Result<GeocodedLocation> {
        let candidates = self.search(city, lang, FORECAST_CANDIDATES).await?;
        if candidates.is_empty() {
            return Err(WeatherNowError::not_found(format!(
                "No locations found for '{city}'"
            )));
        }
        pick_location(&candidates, country).cloned().ok_or_else(|| {
            WeatherNowError::not_found(format!("No match for '{city}' in country '{country}'"))
        })
    }

    /// City suggestions inside one country, de-duplicated by
    /// (lowercased name, admin1) in first-seen order
    pub async fn list_cities(
        &self,
        country: &str,
        query: &str,
        lang: &str,
    ) -> Result<Vec<CityEntry>> {
        let candidates = self.search(query, lang, CITY_LIST_CANDIDATES).await?;
        let needle = normalize_country(country);
        let in_country: Vec<GeocodedLocation> = candidates
            .into_iter()
            .filter(|c| matches_country(c, &needle))
            .collect();
        Ok(dedupe_cities(in_country))
    }
}

/// Disambiguate a candidate list by a target country.
///
/// A two-character country string is treated as an ISO code, anything else
/// as a country name; comparison is against the trimmed lowercase form.
/// When the filter matches nothing the first candidate overall wins, on the
/// assumption the provider already ordered by relevance. Returns `None`
/// only for an empty candidate list.
#[must_use]
pub fn pick_location<'a>(
    candidates: &'a [GeocodedLocation],
    country: &str,
) -> Option<&'a GeocodedLocation> {
    let first = candidates.first()?;
    let needle = normalize_country(country);
    let matched = candidates.iter().find(|c| matches_country(c, &needle));
    Some(matched.unwrap_or(first))
}

fn normalize_country(country: &str) -> String {
    country.trim().to_lowercase()
}

fn matches_country(candidate: &GeocodedLocation, needle: &str) -> bool {
    if needle.chars().count() == 2 {
        candidate
            .country_code
            .as_deref()
            .is_some_and(|code| code.to_lowercase() == needle)
    } else {
        candidate
            .country
            .as_deref()
            .is_some_and(|name| name.to_lowercase() == needle)
    }
}

fn dedupe_cities(candidates: Vec<GeocodedLocation>) -> Vec<CityEntry> {
    let mut seen = HashSet::new();
    let mut cities = Vec::new();
    for candidate in candidates {
        let key = (candidate.name.to_lowercase(), candidate.admin1.clone());
        if seen.insert(key) {
            cities.push(CityEntry {
                name: candidate.name,
                admin1: candidate.admin1,
            });
        }
    }
    cities
}

/// Open-Meteo geocoding API response envelope
mod open_meteo {
    use crate::models::GeocodedLocation;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    pub struct GeocodingResponse {
        pub results: Option<Vec<GeocodedLocation>>,
    }
}
