/*
 * item_value.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Resolved item values keyed by item name.

use indexmap::IndexMap;
use kots_kinds::{ConfigValue, ConfigValues};
use serde::{Deserialize, Serialize};

/// The current value and default of one config item.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemValue {
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub default: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub filename: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub repeatable_item: String,
}

/// Item values by item name, in the order they were supplied.
pub type ItemValues = IndexMap<String, ItemValue>;

impl ItemValue {
    pub fn new(value: impl Into<String>, default: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            default: default.into(),
            ..Self::default()
        }
    }

    /// An empty value counts as unset.
    pub fn has_value(&self) -> bool {
        !self.value.is_empty()
    }

    pub fn value_str(&self) -> &str {
        &self.value
    }

    pub fn default_str(&self) -> &str {
        &self.default
    }

    /// The value when set, otherwise the default.
    pub fn resolved(&self) -> &str {
        if self.has_value() {
            &self.value
        } else {
            &self.default
        }
    }
}

impl From<&ConfigValue> for ItemValue {
    /// A plaintext value replaces both the stored value and its default.
    fn from(saved: &ConfigValue) -> Self {
        if !saved.value_plaintext.is_empty() {
            return Self {
                value: saved.value_plaintext.clone(),
                filename: saved.filename.clone(),
                repeatable_item: saved.repeatable_item.clone(),
                ..Self::default()
            };
        }
        Self {
            value: saved.value.clone(),
            default: saved.default.clone(),
            filename: saved.filename.clone(),
            repeatable_item: saved.repeatable_item.clone(),
        }
    }
}

/// Item values for every entry of a `ConfigValues` document.
pub fn item_values_from(config_values: &ConfigValues) -> ItemValues {
    config_values
        .spec
        .values
        .iter()
        .map(|(name, saved)| (name.clone(), ItemValue::from(saved)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_resolved_prefers_value() {
        assert_eq!(ItemValue::new("v", "d").resolved(), "v");
        assert_eq!(ItemValue::new("", "d").resolved(), "d");
        assert!(!ItemValue::new("", "d").has_value());
    }

    #[test]
    fn test_from_saved_values() {
        let values = ConfigValues::new(
            "app",
            IndexMap::from([
                (
                    "hostname".to_string(),
                    ConfigValue {
                        default: "localhost".to_string(),
                        value: "example.com".to_string(),
                        ..ConfigValue::default()
                    },
                ),
                (
                    "password".to_string(),
                    ConfigValue {
                        value: "ZW5jcnlwdGVk".to_string(),
                        value_plaintext: "hunter2".to_string(),
                        default: "changeme".to_string(),
                        ..ConfigValue::default()
                    },
                ),
            ]),
        );

        let items = item_values_from(&values);
        assert_eq!(
            items.keys().collect::<Vec<_>>(),
            vec!["hostname", "password"]
        );
        assert_eq!(items["hostname"], ItemValue::new("example.com", "localhost"));
        assert_eq!(items["password"], ItemValue::new("hunter2", ""));
    }
}
