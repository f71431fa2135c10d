//! Country directory backed by the REST Countries API
//!
//! Serves the country dropdown: a per-language cached full list with
//! locale-selected display names, and a live free-text search. The cache is
//! an explicit object injected into request handlers, populated lazily per
//! language key and invalidated only by a caller-supplied refresh flag.

use crate::models::CountryEntry;
use crate::{Result, WeatherNowError};
use icu::collator::options::{CollatorOptions, Strength};
use icu::collator::Collator;
use icu::locale::Locale;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::{debug, instrument, warn};

const COUNTRY_FIELDS: &str = "name,cca2,translations,altSpellings";
const HEBREW_TAG: &str = "he";

/// Country directory with a per-language in-memory cache.
///
/// Concurrent first requests for the same uncached language may each fetch
/// and overwrite the same entry; both compute the same deterministic result
/// from the same upstream data, so last write wins.
pub struct CountryDirectory {
    client: reqwest::Client,
    base_url: String,
    cache: RwLock<HashMap<String, Vec<CountryEntry>>>,
}

impl CountryDirectory {
    #[must_use]
    pub fn new(client: reqwest::Client, base_url: String) -> Self {
        Self {
            client,
            base_url,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Full country list for a language, from cache unless `refresh` is set
    #[instrument(skip(self))]
    pub async fn list_countries(&self, lang: &str, refresh: bool) -> Result<Vec<CountryEntry>> {
        let key = lang.trim().to_lowercase();

        if !refresh {
            if let Some(cached) = self.cache.read().await.get(&key) {
                debug!("Serving {} countries from cache for '{key}'", cached.len());
                return Ok(cached.clone());
            }
        }

        // Fetch outside the lock; no lock is held across a suspension point
        let entries = self.fetch_all(&key).await?;
        self.cache.write().await.insert(key, entries.clone());
        Ok(entries)
    }

    async fn fetch_all(&self, lang: &str) -> Result<Vec<CountryEntry>> {
        let url = format!("{}/v3.1/all?fields={COUNTRY_FIELDS}", self.base_url);
        let raw = self.fetch_countries(&url).await?;

        let mut entries: Vec<CountryEntry> = raw
            .into_iter()
            .filter_map(|country| map_country(country, lang))
            .collect();
        sort_entries(&mut entries, lang);
        debug!("Fetched {} countries for '{lang}'", entries.len());
        Ok(entries)
    }

    /// Free-text search via the directory's translation endpoint.
    /// Always live, never cached; an upstream 404 means zero matches.
    #[instrument(skip(self))]
    pub async fn search_countries(&self, lang: &str, query: &str) -> Result<Vec<CountryEntry>> {
        let url = format!(
            "{}/v3.1/translation/{}?fields={COUNTRY_FIELDS}",
            self.base_url,
            urlencoding::encode(query.trim())
        );

        let response = self.client.get(&url).send().await.map_err(|e| {
            WeatherNowError::upstream(format!("Country search request failed: {e}"))
        })?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(Vec::new());
        }
        if !response.status().is_success() {
            return Err(WeatherNowError::upstream(format!(
                "Country directory returned status {}",
                response.status()
            )));
        }

        let raw: Vec<rest_countries::Country> = response.json().await.map_err(|e| {
            WeatherNowError::upstream(format!("Failed to parse country search response: {e}"))
        })?;

        let lang = lang.trim().to_lowercase();
        let mut entries: Vec<CountryEntry> = raw
            .into_iter()
            .filter_map(|country| map_country(country, &lang))
            .collect();
        sort_entries(&mut entries, &lang);
        Ok(entries)
    }

    async fn fetch_countries(&self, url: &str) -> Result<Vec<rest_countries::Country>> {
        let response = self.client.get(url).send().await.map_err(|e| {
            WeatherNowError::upstream(format!("Country directory request failed: {e}"))
        })?;

        if !response.status().is_success() {
            return Err(WeatherNowError::upstream(format!(
                "Country directory returned status {}",
                response.status()
            )));
        }

        response.json().await.map_err(|e| {
            WeatherNowError::upstream(format!("Failed to parse country directory response: {e}"))
        })
    }
}

/// Map one upstream record to a directory entry.
///
/// Entries missing a country code or an English common name are dropped.
/// For the Hebrew locale the display name prefers the translated Hebrew
/// common name, then the native Hebrew name, then the English common name;
/// every other locale gets the English common name (the directory carries
/// no arbitrary-locale translations).
fn map_country(raw: rest_countries::Country, lang: &str) -> Option<CountryEntry> {
    let code = raw.cca2.filter(|c| !c.is_empty())?.to_uppercase();
    let name = raw.name?;
    let english = name.common.filter(|n| !n.is_empty())?;

    let hebrew = raw
        .translations
        .get("heb")
        .and_then(|t| t.common.clone())
        .or_else(|| {
            name.native_name
                .get("heb")
                .and_then(|t| t.common.clone())
        });

    let display = if lang == HEBREW_TAG {
        hebrew.clone().unwrap_or_else(|| english.clone())
    } else {
        english.clone()
    };

    Some(CountryEntry {
        code,
        name: display,
        english_name: english,
        hebrew_name: hebrew,
        alt_spellings: raw.alt_spellings,
    })
}

/// Sort entries by display name using the locale's collation rules,
/// falling back to byte order when the language tag does not parse
fn sort_entries(entries: &mut [CountryEntry], lang: &str) {
    let collator = lang.parse::<Locale>().ok().and_then(|locale| {
        let mut options = CollatorOptions::default();
        options.strength = Some(Strength::Secondary);
        Collator::try_new(locale.into(), options).ok()
    });

    match collator {
        Some(collator) => entries.sort_by(|a, b| collator.compare(&a.name, &b.name)),
        None => {
            warn!("No collation data for '{lang}', falling back to byte order");
            entries.sort_by(|a, b| a.name.cmp(&b.name));
        }
    }
}

/// REST Countries v3.1 response structures
mod rest_countries {
    use serde::Deserialize;
    use std::collections::HashMap;

    #[derive(Debug, Deserialize)]
    pub struct Country {
        pub name: Option<CountryName>,
        pub cca2: Option<String>,
        #[serde(default)]
        pub translations: HashMap<String, Translation>,
        #[serde(rename = "altSpellings", default)]
        pub alt_spellings: Vec<String>,
    }

    #[derive(Debug, Deserialize)]
    pub struct CountryName {
        pub common: Option<String>,
        #[serde(rename = "nativeName", default)]
        pub native_name: HashMap<String, Translation>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct Translation {
        pub common: Option<String>,
        #[allow(dead_code)]
        pub official: Option<String>,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_country(json: serde_json::Value) -> rest_countries::Country {
        serde_json::from_value(json).unwrap()
    }

    fn israel() -> rest_countries::Country {
        raw_country(serde_json::json!({
            "name": {
                "common": "Israel",
                "nativeName": { "heb": { "common": "ישראל", "official": "מדינת ישראל" } }
            },
            "cca2": "IL",
            "translations": { "heb": { "common": "ישראל", "official": "מדינת ישראל" } },
            "altSpellings": ["IL", "State of Israel"]
        }))
    }

    #[test]
    fn test_hebrew_locale_prefers_hebrew_name() {
        let entry = map_country(israel(), "he").unwrap();
        assert_eq!(entry.code, "IL");
        assert_eq!(entry.name, "ישראל");
        assert_eq!(entry.english_name, "Israel");
        assert_eq!(entry.hebrew_name.as_deref(), Some("ישראל"));
    }

    #[test]
    fn test_other_locale_uses_english_name() {
        let entry = map_country(israel(), "fr").unwrap();
        assert_eq!(entry.name, "Israel");
        assert_eq!(entry.english_name, "Israel");
        // The Hebrew name still rides along for callers that want it
        assert!(entry.hebrew_name.is_some());
    }

    #[test]
    fn test_hebrew_falls_back_to_native_then_english() {
        let native_only = raw_country(serde_json::json!({
            "name": {
                "common": "Testland",
                "nativeName": { "heb": { "common": "טסטלנד" } }
            },
            "cca2": "TL",
            "translations": {}
        }));
        assert_eq!(map_country(native_only, "he").unwrap().name, "טסטלנד");

        let english_only = raw_country(serde_json::json!({
            "name": { "common": "Testland" },
            "cca2": "TL"
        }));
        assert_eq!(map_country(english_only, "he").unwrap().name, "Testland");
    }

    #[test]
    fn test_entries_without_code_or_name_dropped() {
        let no_code = raw_country(serde_json::json!({
            "name": { "common": "Ghost" }
        }));
        assert!(map_country(no_code, "en").is_none());

        let no_name = raw_country(serde_json::json!({ "cca2": "GH" }));
        assert!(map_country(no_name, "en").is_none());
    }

    #[test]
    fn test_locale_aware_sorting() {
        let mut entries: Vec<CountryEntry> = ["Åland", "Zimbabwe", "Albania"]
            .iter()
            .map(|name| CountryEntry {
                code: "XX".to_string(),
                name: (*name).to_string(),
                english_name: (*name).to_string(),
                hebrew_name: None,
                alt_spellings: Vec::new(),
            })
            .collect();
        sort_entries(&mut entries, "en");
        // Diacritics sort adjacent to their base letter, not after 'Z'
        let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Åland", "Albania", "Zimbabwe"]);
    }

    #[test]
    fn test_byte_order_fallback_for_unparseable_tag() {
        let mut entries: Vec<CountryEntry> = ["b", "a"]
            .iter()
            .map(|name| CountryEntry {
                code: name.to_uppercase(),
                name: (*name).to_string(),
                english_name: (*name).to_string(),
                hebrew_name: None,
                alt_spellings: Vec::new(),
            })
            .collect();
        sort_entries(&mut entries, "!!not-a-tag!!");
        assert_eq!(entries[0].name, "a");
    }
}
