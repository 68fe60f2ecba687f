//! Attribute mapping configuration.

use serde::{Deserialize, Serialize};

/// One configured field correspondence between the platform and a service.
///
/// Entries with either side missing are silently skipped during mapping;
/// they never produce an error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingEntry {
    /// Platform attribute name (may be a dotted path).
    #[serde(default)]
    pub hull: Option<String>,
    /// Service field name.
    #[serde(default)]
    pub service: Option<String>,
    /// Whether the platform side may overwrite an existing value.
    #[serde(default)]
    pub overwrite: bool,
}

impl MappingEntry {
    /// Create a complete entry.
    pub fn new(hull: impl Into<String>, service: impl Into<String>) -> Self {
        Self {
            hull: Some(hull.into()),
            service: Some(service.into()),
            overwrite: false,
        }
    }

    /// Check whether both sides are configured.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.hull.is_some() && self.service.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_incomplete_entries() {
        assert!(MappingEntry::new("name", "name").is_complete());
        assert!(!MappingEntry::default().is_complete());

        let entry = MappingEntry {
            hull: Some("name".to_string()),
            service: None,
            overwrite: true,
        };
        assert!(!entry.is_complete());
    }

    #[test]
    fn test_deserializes_with_missing_sides() {
        let entry: MappingEntry = serde_json::from_str(r#"{ "hull": "name" }"#).unwrap();
        assert_eq!(entry.hull.as_deref(), Some("name"));
        assert!(entry.service.is_none());
        assert!(!entry.overwrite);
    }
}
