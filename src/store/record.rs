//! Cached place records
//!
//! Wire shape of one durable index entry:
//! ```json
//! {
//!   "city": "Mysore",
//!   "categories": { "places": [ {"name": "..", "description": "..", "tip": ".."} ] },
//!   "lat": 12.2958,
//!   "lon": 76.6394,
//!   "images": ["/path/to/mysore-....jpg"],
//!   "map_image": "/path/to/mysore_map.png"
//! }
//! ```
//! `city` and `categories` are required; everything else defaults. Entries
//! that fail this shape are dropped on load instead of failing the store.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// A single recommendation item
///
/// Providers may repeat content across calls, so no uniqueness is enforced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub tip: String,
}

/// Latitude/longitude pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

/// Everything cached for one place
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaceRecord {
    /// Original human-entered place name; the most recent save wins
    #[serde(rename = "city")]
    pub display_name: String,

    /// Category name (lowercase) to suggestion list, list order preserved
    pub categories: BTreeMap<String, Vec<Suggestion>>,

    /// Latitude, once known
    #[serde(default)]
    pub lat: Option<f64>,

    /// Longitude, once known
    #[serde(default)]
    pub lon: Option<f64>,

    /// Local files for downloaded photos, append-only
    #[serde(default)]
    pub images: Vec<PathBuf>,

    /// Local file for the rendered or placeholder map
    #[serde(default)]
    pub map_image: Option<PathBuf>,
}

impl PlaceRecord {
    /// Create an empty record for a place
    pub fn new(display_name: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            categories: BTreeMap::new(),
            lat: None,
            lon: None,
            images: Vec::new(),
            map_image: None,
        }
    }

    /// Both coordinates, when known
    pub fn coordinates(&self) -> Option<Coordinates> {
        match (self.lat, self.lon) {
            (Some(lat), Some(lon)) => Some(Coordinates { lat, lon }),
            _ => None,
        }
    }

    /// Overwrite coordinates only with a non-null value; `None` never
    /// clears a previously stored pair.
    pub fn set_coordinates(&mut self, coords: Option<Coordinates>) {
        if let Some(c) = coords {
            self.lat = Some(c.lat);
            self.lon = Some(c.lon);
        }
    }

    /// Suggestions stored for a category, if any
    pub fn suggestions(&self, category: &str) -> Option<&[Suggestion]> {
        self.categories
            .get(&category.to_lowercase())
            .map(|items| items.as_slice())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Suggestion {
        Suggestion {
            name: "Palace".to_string(),
            description: "The old royal residence.".to_string(),
            tip: "Go early.".to_string(),
        }
    }

    #[test]
    fn test_wire_field_names() {
        let mut record = PlaceRecord::new("Mysore");
        record.categories.insert("places".to_string(), vec![sample()]);
        record.lat = Some(12.2958);

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["city"], "Mysore");
        assert_eq!(json["categories"]["places"][0]["name"], "Palace");
        assert_eq!(json["lat"], 12.2958);
        assert!(json["lon"].is_null());
        assert!(json["map_image"].is_null());
    }

    #[test]
    fn test_optional_fields_default_on_load() {
        let record: PlaceRecord =
            serde_json::from_str(r#"{"city": "Goa", "categories": {}}"#).unwrap();
        assert_eq!(record.display_name, "Goa");
        assert!(record.images.is_empty());
        assert!(record.coordinates().is_none());
    }

    #[test]
    fn test_missing_required_fields_rejected() {
        assert!(serde_json::from_str::<PlaceRecord>(r#"{"city": "Goa"}"#).is_err());
        assert!(serde_json::from_str::<PlaceRecord>(r#"{"categories": {}}"#).is_err());
        assert!(serde_json::from_str::<PlaceRecord>(r#"{"city": 7, "categories": {}}"#).is_err());
    }

    #[test]
    fn test_coordinates_never_cleared_by_none() {
        let mut record = PlaceRecord::new("Goa");
        record.set_coordinates(Some(Coordinates { lat: 15.3, lon: 74.1 }));
        record.set_coordinates(None);
        assert_eq!(record.coordinates().unwrap().lat, 15.3);
    }

    #[test]
    fn test_suggestions_lookup_is_case_insensitive() {
        let mut record = PlaceRecord::new("Goa");
        record.categories.insert("food".to_string(), vec![sample()]);
        assert!(record.suggestions("Food").is_some());
        assert!(record.suggestions("hotels").is_none());
    }

    #[test]
    fn test_suggestion_tip_defaults_empty() {
        let s: Suggestion =
            serde_json::from_str(r#"{"name": "Fort", "description": "Seaside fort."}"#).unwrap();
        assert_eq!(s.tip, "");
    }
}
