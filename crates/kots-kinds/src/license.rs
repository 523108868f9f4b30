/*
 * license.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! The `License` kind.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::meta::{Object, ObjectMeta, is_false, is_zero};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct License {
    #[serde(rename = "apiVersion")]
    pub api_version: String,
    pub kind: String,
    #[serde(default, skip_serializing_if = "ObjectMeta::is_empty")]
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub spec: LicenseSpec,
}

impl Object for License {
    const KIND: &'static str = "License";

    fn metadata(&self) -> &ObjectMeta {
        &self.metadata
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LicenseSpec {
    /// Base64 encoded signature over the license body.
    #[serde(default)]
    pub signature: String,
    #[serde(default)]
    pub app_slug: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub endpoint: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub customer_name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub customer_email: String,
    #[serde(rename = "channelID", default, skip_serializing_if = "String::is_empty")]
    pub channel_id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub channel_name: String,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub license_sequence: i64,
    #[serde(rename = "licenseID", default)]
    pub license_id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub license_type: String,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_airgap_supported: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_git_ops_supported: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_snapshot_supported: bool,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub entitlements: BTreeMap<String, EntitlementField>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntitlementField {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub title: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default)]
    pub value: EntitlementValue,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub value_type: String,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_hidden: bool,
}

/// An entitlement value: an integer, a string or a boolean.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntitlementValue {
    Int(i64),
    Bool(bool),
    String(String),
}

impl Default for EntitlementValue {
    fn default() -> Self {
        EntitlementValue::String(String::new())
    }
}

impl fmt::Display for EntitlementValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntitlementValue::Int(n) => write!(f, "{}", n),
            EntitlementValue::Bool(b) => write!(f, "{}", b),
            EntitlementValue::String(s) => f.write_str(s),
        }
    }
}
