/*
 * application.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! The `Application` kind: metadata the admin console shows for an app.

use serde::{Deserialize, Serialize};

use crate::meta::{Object, ObjectMeta, is_false};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Application {
    #[serde(rename = "apiVersion")]
    pub api_version: String,
    pub kind: String,
    #[serde(default, skip_serializing_if = "ObjectMeta::is_empty")]
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub spec: ApplicationSpec,
}

impl Object for Application {
    const KIND: &'static str = "Application";

    fn metadata(&self) -> &ObjectMeta {
        &self.metadata
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationSpec {
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub icon: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub release_notes: String,
    #[serde(default, skip_serializing_if = "is_false")]
    pub allow_rollback: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub status_informers: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ports: Vec<ApplicationPort>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub additional_images: Vec<String>,
    #[serde(rename = "requireMinimalRBACPrivileges", default, skip_serializing_if = "is_false")]
    pub require_minimal_rbac_privileges: bool,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub min_kots_version: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub target_kots_version: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationPort {
    pub service_name: String,
    pub service_port: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_port: Option<u16>,
    #[serde(rename = "applicationUrl", default, skip_serializing_if = "String::is_empty")]
    pub application_url: String,
}
