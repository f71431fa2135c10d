//! Geocoded location model

use serde::{Deserialize, Serialize};

/// A single geocoder candidate: coordinates plus administrative metadata.
/// Immutable once fetched; recomputed per request, never persisted.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct GeocodedLocation {
    /// Place name as reported by the geocoder
    pub name: String,
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
    /// Country display name
    #[serde(default)]
    pub country: Option<String>,
    /// Country code (ISO 3166-1 alpha-2)
    #[serde(default)]
    pub country_code: Option<String>,
    /// First-level administrative division (state, district)
    #[serde(default)]
    pub admin1: Option<String>,
}

impl GeocodedLocation {
    /// Create a bare location from coordinates and a name
    #[must_use]
    pub fn new(latitude: f64, longitude: f64, name: String) -> Self {
        Self {
            name,
            latitude,
            longitude,
            country: None,
            country_code: None,
            admin1: None,
        }
    }

    /// Round coordinates to a fixed precision, as gridded providers expect
    #[must_use]
    pub fn rounded_coordinates(&self, precision: u32) -> (f64, f64) {
        let multiplier = 10_f64.powi(i32::try_from(precision).unwrap_or(4));
        let lat = (self.latitude * multiplier).round() / multiplier;
        let lon = (self.longitude * multiplier).round() / multiplier;
        (lat, lon)
    }

    /// Format location as a coordinates string
    #[must_use]
    pub fn format_coordinates(&self) -> String {
        format!("{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rounded_coordinates() {
        let location = GeocodedLocation::new(32.081_234, 34.781_456, "Tel Aviv".to_string());
        let (lat, lon) = location.rounded_coordinates(2);
        assert_eq!(lat, 32.08);
        assert_eq!(lon, 34.78);
    }

    #[test]
    fn test_wire_field_names() {
        let location = GeocodedLocation {
            name: "Tel Aviv".to_string(),
            latitude: 32.0853,
            longitude: 34.7818,
            country: Some("Israel".to_string()),
            country_code: Some("IL".to_string()),
            admin1: Some("Tel Aviv".to_string()),
        };
        let json = serde_json::to_value(&location).unwrap();
        assert_eq!(json["country_code"], "IL");
        assert_eq!(json["admin1"], "Tel Aviv");
    }
}
