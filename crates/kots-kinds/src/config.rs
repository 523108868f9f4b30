/*
 * config.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! The `Config` kind: the declarative schema of an application's settings.

use std::collections::{BTreeMap, HashSet};

use kots_multitype::{BoolOrString, QuotedBool};
use serde::{Deserialize, Serialize};

use crate::meta::{Object, ObjectMeta, is_false, is_zero};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(rename = "apiVersion")]
    pub api_version: String,
    pub kind: String,
    #[serde(default, skip_serializing_if = "ObjectMeta::is_empty")]
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub spec: ConfigSpec,
}

impl Config {
    pub fn new(name: impl Into<String>, spec: ConfigSpec) -> Self {
        Self {
            api_version: crate::API_VERSION.to_string(),
            kind: Self::KIND.to_string(),
            metadata: ObjectMeta::named(name),
            spec,
        }
    }
}

impl Object for Config {
    const KIND: &'static str = "Config";

    fn metadata(&self) -> &ObjectMeta {
        &self.metadata
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigSpec {
    #[serde(default)]
    pub groups: Vec<ConfigGroup>,
}

impl ConfigSpec {
    /// Every item of every group, in declaration order.
    pub fn items(&self) -> impl Iterator<Item = &ConfigItem> {
        self.groups.iter().flat_map(|g| g.items.iter())
    }

    /// Names used by more than one item or child item.
    ///
    /// Item names are the join key against saved values, so they must be
    /// unique across the whole spec. Each duplicate is reported once, in
    /// order of its second appearance.
    pub fn duplicate_item_names(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut duplicates = Vec::new();
        for item in self.items() {
            let names = std::iter::once(item.name.as_str())
                .chain(item.items.iter().map(|c| c.name.as_str()));
            for name in names {
                if !seen.insert(name) && !duplicates.iter().any(|d| d == name) {
                    duplicates.push(name.to_string());
                }
            }
        }
        duplicates
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigGroup {
    pub name: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default, skip_serializing_if = "QuotedBool::is_empty")]
    pub when: QuotedBool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<ConfigItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigItem {
    pub name: String,
    #[serde(rename = "type", default)]
    pub item_type: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub title: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub help_text: String,
    #[serde(default, skip_serializing_if = "is_false")]
    pub recommended: bool,
    #[serde(default)]
    pub default: BoolOrString,
    #[serde(default)]
    pub value: BoolOrString,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub data: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub error: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub multi_value: Vec<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub readonly: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub write_once: bool,
    #[serde(default, skip_serializing_if = "QuotedBool::is_empty")]
    pub when: QuotedBool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub multiple: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub hidden: bool,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub affix: String,
    #[serde(default, skip_serializing_if = "is_false")]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<ConfigChildItem>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub filename: String,
    #[serde(default, skip_serializing_if = "is_false")]
    pub repeatable: bool,
    #[serde(rename = "minimumCount", default, skip_serializing_if = "is_zero")]
    pub minimum_count: i64,
    #[serde(rename = "countByGroup", default, skip_serializing_if = "BTreeMap::is_empty")]
    pub count_by_group: BTreeMap<String, i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<ConfigItemValidation>,
}

impl ConfigItem {
    /// Item types a user can edit. An empty type means `text`.
    pub const EDITABLE_TYPES: &'static [&'static str] = &[
        "",
        "bool",
        "dropdown",
        "file",
        "password",
        "radio",
        "select_many",
        "select_one",
        "text",
        "textarea",
    ];

    pub fn new(name: impl Into<String>, item_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            item_type: item_type.into(),
            ..Self::default()
        }
    }

    /// Read-only items are always recomputed from their templates.
    pub fn is_read_only(&self) -> bool {
        self.readonly || !Self::EDITABLE_TYPES.contains(&self.item_type.as_str())
    }

    /// Hidden items and items switched off by `when` are not shown.
    pub fn is_hidden(&self) -> bool {
        self.hidden || self.when.is_false()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigChildItem {
    pub name: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "is_false")]
    pub recommended: bool,
    #[serde(default)]
    pub default: BoolOrString,
    #[serde(default)]
    pub value: BoolOrString,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<ConfigItemValidation>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigItemValidation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regex: Option<RegexValidator>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegexValidator {
    pub pattern: String,
    #[serde(default)]
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const CONFIG: &str = r#"
apiVersion: kots.io/v1beta1
kind: Config
metadata:
  name: app-config
spec:
  groups:
  - name: database
    title: Database
    when: '{{repl true}}'
    items:
    - name: db_type
      type: select_one
      default: embedded
      items:
      - name: embedded
        title: Embedded
      - name: external
        title: External
    - name: db_password
      type: password
      required: true
      validation:
        regex:
          pattern: ^.{8,}$
          message: too short
    - name: enabled
      type: bool
      default: true
"#;

    fn parse() -> Config {
        serde_yaml::from_str(CONFIG).unwrap()
    }

    #[test]
    fn test_decode_config() {
        let config = parse();
        assert_eq!(config.metadata.name, "app-config");
        assert_eq!(config.spec.groups.len(), 1);

        let group = &config.spec.groups[0];
        assert_eq!(group.when, QuotedBool::new("{{repl true}}"));
        assert_eq!(group.items[0].default, BoolOrString::from_string("embedded"));
        assert_eq!(group.items[0].items.len(), 2);
        assert_eq!(group.items[1].value, BoolOrString::default());
        assert_eq!(group.items[2].default, BoolOrString::from_bool(true));

        let regex = group.items[1]
            .validation
            .as_ref()
            .and_then(|v| v.regex.as_ref())
            .unwrap();
        assert_eq!(regex.pattern, "^.{8,}$");
    }

    #[test]
    fn test_default_and_value_always_serialized() {
        let item = ConfigItem::new("a", "text");
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["default"], serde_json::json!(""));
        assert_eq!(json["value"], serde_json::json!(""));
        assert!(json.get("when").is_none());
        assert!(json.get("hidden").is_none());
    }

    #[test]
    fn test_items_iterates_all_groups() {
        let spec = ConfigSpec {
            groups: vec![
                ConfigGroup {
                    name: "one".to_string(),
                    items: vec![ConfigItem::new("a", "text")],
                    ..ConfigGroup::default()
                },
                ConfigGroup {
                    name: "two".to_string(),
                    items: vec![ConfigItem::new("b", "text"), ConfigItem::new("c", "bool")],
                    ..ConfigGroup::default()
                },
            ],
        };
        let names: Vec<&str> = spec.items().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_duplicate_item_names() {
        let config = parse();
        assert!(config.spec.duplicate_item_names().is_empty());

        let mut item = ConfigItem::new("radio", "radio");
        item.items.push(ConfigChildItem {
            name: "db_type".to_string(),
            ..ConfigChildItem::default()
        });
        let mut spec = config.spec.clone();
        spec.groups[0].items.push(item);
        spec.groups[0].items.push(ConfigItem::new("radio", "text"));

        assert_eq!(spec.duplicate_item_names(), vec!["db_type", "radio"]);
    }

    #[test]
    fn test_read_only_and_hidden() {
        assert!(!ConfigItem::new("a", "").is_read_only());
        assert!(!ConfigItem::new("a", "text").is_read_only());
        assert!(ConfigItem::new("a", "label").is_read_only());

        let mut item = ConfigItem::new("a", "text");
        item.readonly = true;
        assert!(item.is_read_only());

        item.when = QuotedBool::new("false");
        assert!(item.is_hidden());
    }
}
