// Settings module
// Flat string-keyed settings map

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{PlannerError, Result};

pub const TOTAL_LEAVES_KEY: &str = "totalLeaves";
pub const DEFAULT_TOTAL_LEAVES: u32 = 25;

/// Key/value settings. Values are kept as strings, the way the store keeps them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, serde_json::Value>", into = "BTreeMap<String, String>")]
pub struct Settings {
    values: BTreeMap<String, String>,
}

impl From<BTreeMap<String, serde_json::Value>> for Settings {
    fn from(raw: BTreeMap<String, serde_json::Value>) -> Self {
        let values = raw
            .into_iter()
            .filter_map(|(key, value)| {
                let value = match value {
                    serde_json::Value::String(s) => s,
                    serde_json::Value::Null => return None,
                    other => other.to_string(),
                };
                Some((key, value))
            })
            .collect();
        Self { values }
    }
}

impl From<Settings> for BTreeMap<String, String> {
    fn from(settings: Settings) -> Self {
        settings.values
    }
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    /// Merge another map into this one; later values win.
    pub fn merge(&mut self, other: &Settings) {
        for (key, value) in &other.values {
            self.values.insert(key.clone(), value.clone());
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Yearly leave quota; falls back to the default when missing or invalid.
    pub fn total_leaves(&self) -> u32 {
        self.get(TOTAL_LEAVES_KEY)
            .and_then(|value| value.trim().parse::<u32>().ok())
            .filter(|total| *total > 0)
            .unwrap_or(DEFAULT_TOTAL_LEAVES)
    }

    /// Validate values for the keys this application understands.
    pub fn validate(&self) -> Result<()> {
        if let Some(raw) = self.get(TOTAL_LEAVES_KEY) {
            match raw.trim().parse::<u32>() {
                Ok(total) if total > 0 => {}
                _ => {
                    return Err(PlannerError::validation(
                        "totalLeaves must be a positive integer",
                    ))
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_total_leaves() {
        assert_eq!(Settings::new().total_leaves(), 25);
        assert_eq!(Settings::new().with(TOTAL_LEAVES_KEY, "abc").total_leaves(), 25);
        assert_eq!(Settings::new().with(TOTAL_LEAVES_KEY, "0").total_leaves(), 25);
        assert_eq!(Settings::new().with(TOTAL_LEAVES_KEY, "30").total_leaves(), 30);
    }

    #[test]
    fn test_deserializes_numbers_and_strings() {
        let settings: Settings =
            serde_json::from_str(r#"{"totalLeaves": 27, "theme": "dark", "gone": null}"#).unwrap();
        assert_eq!(settings.get("totalLeaves"), Some("27"));
        assert_eq!(settings.get("theme"), Some("dark"));
        assert_eq!(settings.get("gone"), None);
    }

    #[test]
    fn test_validate_total_leaves() {
        assert!(Settings::new().with(TOTAL_LEAVES_KEY, "-2").validate().is_err());
        assert!(Settings::new().with(TOTAL_LEAVES_KEY, "0").validate().is_err());
        assert!(Settings::new().with(TOTAL_LEAVES_KEY, "12").validate().is_ok());
        assert!(Settings::new().with("theme", "light").validate().is_ok());
    }

    #[test]
    fn test_serializes_as_flat_map() {
        let settings = Settings::new().with(TOTAL_LEAVES_KEY, "25");
        assert_eq!(
            serde_json::to_string(&settings).unwrap(),
            r#"{"totalLeaves":"25"}"#
        );
    }

    #[test]
    fn test_merge_overwrites() {
        let mut base = Settings::new().with(TOTAL_LEAVES_KEY, "25").with("theme", "light");
        base.merge(&Settings::new().with(TOTAL_LEAVES_KEY, "28"));
        assert_eq!(base.total_leaves(), 28);
        assert_eq!(base.get("theme"), Some("light"));
    }
}
