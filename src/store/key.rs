//! Place key normalization
//!
//! A `PlaceKey` is the stable identifier derived from a free-text place
//! name. It doubles as the index key and the filename component for every
//! artifact cached for that place, so it is restricted to `[a-z0-9-]`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Normalized place identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlaceKey(String);

impl PlaceKey {
    /// Normalize a display name into a key.
    ///
    /// Lowercases the input and drops every character outside `[a-z0-9-]`,
    /// including all whitespace ("New York" becomes "newyork"). Returns
    /// `None` when nothing survives.
    pub fn normalize(display_name: &str) -> Option<Self> {
        let key: String = display_name
            .to_lowercase()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || *c == '-')
            .collect();
        if key.is_empty() {
            None
        } else {
            Some(Self(key))
        }
    }

    /// The key as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlaceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for PlaceKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_and_whitespace_variants_collapse() {
        let expected = PlaceKey::normalize("New York").unwrap();
        assert_eq!(expected.as_str(), "newyork");
        for variant in ["new york", " new york ", "NEW YORK", "New\tYork"] {
            assert_eq!(PlaceKey::normalize(variant).unwrap(), expected);
        }
    }

    #[test]
    fn test_hyphen_retained() {
        assert_eq!(PlaceKey::normalize("NEW-YORK").unwrap().as_str(), "new-york");
    }

    #[test]
    fn test_punctuation_dropped() {
        assert_eq!(PlaceKey::normalize("São Paulo!").unwrap().as_str(), "sopaulo");
        assert_eq!(PlaceKey::normalize("St. John's").unwrap().as_str(), "stjohns");
    }

    #[test]
    fn test_idempotent() {
        let once = PlaceKey::normalize("Mysore City").unwrap();
        let twice = PlaceKey::normalize(once.as_str()).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_empty_and_symbol_only_rejected() {
        assert!(PlaceKey::normalize("").is_none());
        assert!(PlaceKey::normalize("   ").is_none());
        assert!(PlaceKey::normalize("!!!").is_none());
    }
}
