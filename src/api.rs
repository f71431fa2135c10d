//! HTTP API handlers
//!
//! Thin request plumbing over the forecast core: handlers trim and validate
//! string parameters, call into the core, and serialize its plain result
//! objects to JSON. Errors map to `{"error": ...}` bodies with 400/404/502.

use crate::config::WeatherNowConfig;
use crate::countries::CountryDirectory;
use crate::error::WeatherNowError;
use crate::forecast::{self, ForecastClient, WeatherAnswer};
use crate::geocoding::{CityEntry, Geocoder};
use crate::models::{CountryEntry, GeocodedLocation};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::get;
use axum::Router;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

/// Shared handler state; the country cache lives here, injected rather than
/// process-global
#[derive(Clone)]
pub struct AppState {
    pub geocoder: Arc<Geocoder>,
    pub forecast: Arc<ForecastClient>,
    pub countries: Arc<CountryDirectory>,
}

impl AppState {
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
            countries: Arc::new(CountryDirectory::new(
                client,
                config.providers.countries_base_url.clone(),
            )),
        })
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/location", get(get_location))
        .route("/weather", get(get_weather))
        .route("/countries", get(get_countries))
        .route("/countries/search", get(search_countries))
        .route("/cities", get(get_cities))
        .with_state(state)
}

impl IntoResponse for WeatherNowError {
    fn into_response(self) -> Response {
        let status = match &self {
            WeatherNowError::Validation { .. } => StatusCode::BAD_REQUEST,
            WeatherNowError::NotFound { .. } => StatusCode::NOT_FOUND,
            WeatherNowError::Upstream { .. } => StatusCode::BAD_GATEWAY,
        };
        (status, Json(json!({ "error": self.user_message() }))).into_response()
    }
}

fn default_lang() -> String {
    "en".to_string()
}

#[derive(Debug, Deserialize)]
struct PlaceQuery {
    #[serde(default)]
    city: String,
    #[serde(default)]
    country: String,
    #[serde(default = "default_lang")]
    lang: String,
}

#[derive(Debug, Deserialize)]
struct CountriesQuery {
    #[serde(default = "default_lang")]
    lang: String,
    #[serde(default)]
    refresh: bool,
}

#[derive(Debug, Deserialize)]
struct CountrySearchQuery {
    #[serde(default = "default_lang")]
    lang: String,
    #[serde(default)]
    query: String,
}

#[derive(Debug, Deserialize)]
struct CitiesQuery {
    #[serde(default)]
    country: String,
    #[serde(default)]
    query: String,
    #[serde(default = "default_lang")]
    lang: String,
}

#[derive(Debug, Serialize)]
struct LocationAnswer {
    location: GeocodedLocation,
}

#[derive(Debug, Serialize)]
struct CountriesAnswer {
    countries: Vec<CountryEntry>,
}

#[derive(Debug, Serialize)]
struct CitiesAnswer {
    cities: Vec<CityEntry>,
}

fn require<'a>(value: &'a str, field: &str) -> Result<&'a str, WeatherNowError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(WeatherNowError::validation(format!("{field} is required")));
    }
    Ok(trimmed)
}

async fn get_location(
    State(state): State<AppState>,
    Query(params): Query<PlaceQuery>,
) -> Result<Json<LocationAnswer>, WeatherNowError> {
    let city = require(&params.city, "city")?;
    let country = require(&params.country, "country")?;
    let location = state
        .geocoder
        .resolve_location(city, country, &params.lang)
        .await?;
    Ok(Json(LocationAnswer { location }))
}

async fn get_weather(
    State(state): State<AppState>,
    Query(params): Query<PlaceQuery>,
) -> Result<Json<WeatherAnswer>, WeatherNowError> {
    let city = require(&params.city, "city")?;
    let country = require(&params.country, "country")?;

    let location = state
        .geocoder
        .resolve_location(city, country, &params.lang)
        .await?;
    let payload = state
        .forecast
        .fetch_forecast(location.latitude, location.longitude)
        .await?;
    let answer = forecast::assemble(location, payload)?;
    Ok(Json(answer))
}

async fn get_countries(
    State(state): State<AppState>,
    Query(params): Query<CountriesQuery>,
) -> Result<Json<CountriesAnswer>, WeatherNowError> {
    let countries = state
        .countries
        .list_countries(&params.lang, params.refresh)
        .await?;
    if countries.is_empty() {
        return Err(WeatherNowError::upstream(
            "Country directory returned no entries",
        ));
    }
    Ok(Json(CountriesAnswer { countries }))
}

async fn search_countries(
    State(state): State<AppState>,
    Query(params): Query<CountrySearchQuery>,
) -> Result<Json<CountriesAnswer>, WeatherNowError> {
    let query = require(&params.query, "query")?;
    // Zero matches is a valid empty success here, unlike the full list
    let countries = state.countries.search_countries(&params.lang, query).await?;
    Ok(Json(CountriesAnswer { countries }))
}

async fn get_cities(
    State(state): State<AppState>,
    Query(params): Query<CitiesQuery>,
) -> Result<Json<CitiesAnswer>, WeatherNowError> {
    let country = require(&params.country, "country")?;
    let query = require(&params.query, "query")?;
    let cities = state
        .geocoder
        .list_cities(country, query, &params.lang)
        .await?;
    Ok(Json(CitiesAnswer { cities }))
}
