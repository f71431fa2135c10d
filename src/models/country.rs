//! Country directory entry model

use serde::{Deserialize, Serialize};

/// One entry in the country dropdown directory.
/// Identity key is `code`; `name` is locale-selected at fetch time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CountryEntry {
    /// ISO 3166-1 alpha-2 code, uppercase
    pub code: String,
    /// Display name selected for the requested locale
    pub name: String,
    /// English common name, regardless of requested locale
    pub english_name: String,
    /// Hebrew name when the directory provides one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hebrew_name: Option<String>,
    /// Alternative spellings for free-text matching
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub alt_spellings: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_optional_fields_omitted_on_wire() {
        let entry = CountryEntry {
            code: "FR".to_string(),
            name: "France".to_string(),
            english_name: "France".to_string(),
            hebrew_name: None,
            alt_spellings: Vec::new(),
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert!(json.get("hebrew_name").is_none());
        assert!(json.get("alt_spellings").is_none());
        assert_eq!(json["english_name"], "France");
    }
}
