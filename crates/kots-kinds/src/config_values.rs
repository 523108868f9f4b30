/*
 * config_values.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! The `ConfigValues` kind: a user's saved answers to a `Config`.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::meta::{Object, ObjectMeta};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigValues {
    #[serde(rename = "apiVersion")]
    pub api_version: String,
    pub kind: String,
    #[serde(default, skip_serializing_if = "ObjectMeta::is_empty")]
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub spec: ConfigValuesSpec,
}

impl ConfigValues {
    pub fn new(name: impl Into<String>, values: IndexMap<String, ConfigValue>) -> Self {
        Self {
            api_version: crate::API_VERSION.to_string(),
            kind: Self::KIND.to_string(),
            metadata: ObjectMeta::named(name),
            spec: ConfigValuesSpec { values },
        }
    }
}

impl Object for ConfigValues {
    const KIND: &'static str = "ConfigValues";

    fn metadata(&self) -> &ObjectMeta {
        &self.metadata
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigValuesSpec {
    #[serde(default)]
    pub values: IndexMap<String, ConfigValue>,
}

/// One saved answer, keyed by item name in [`ConfigValuesSpec::values`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigValue {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub default: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub value: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub data: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub value_plaintext: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub data_plaintext: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub filename: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub repeatable_item: String,
}

impl ConfigValue {
    pub fn with_value(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_decode_preserves_order() {
        let values: ConfigValues = serde_yaml::from_str(
            r#"
apiVersion: kots.io/v1beta1
kind: ConfigValues
spec:
  values:
    zeta:
      value: "1"
    alpha:
      default: abc
      repeatableItem: hosts
    mid:
      value: file-contents
      filename: cert.pem
"#,
        )
        .unwrap();

        let keys: Vec<&str> = values.spec.values.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
        assert_eq!(values.spec.values["alpha"].default, "abc");
        assert_eq!(values.spec.values["alpha"].repeatable_item, "hosts");
        assert_eq!(values.spec.values["mid"].filename, "cert.pem");
    }

    #[test]
    fn test_empty_fields_are_omitted() {
        let json = serde_json::to_string(&ConfigValue::with_value("x")).unwrap();
        assert_eq!(json, r#"{"value":"x"}"#);
    }
}
