/*
 * license_context.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! The `LicenseFieldValue` template function.

use kots_kinds::License;
use kots_template::{Args, FunctionContext, TemplateResult, Value};

/// Template functions that read the application license.
///
/// Without a license every field renders as the empty string, so a template
/// that mentions the license still renders the rest of its text.
#[derive(Debug, Clone, Copy, Default)]
pub struct LicenseContext<'a> {
    license: Option<&'a License>,
}

impl<'a> LicenseContext<'a> {
    pub fn new(license: Option<&'a License>) -> Self {
        Self { license }
    }

    /// A well-known license field or an entitlement, rendered as a string.
    /// Unknown names are empty.
    pub fn field_value(&self, name: &str) -> String {
        let Some(license) = self.license else {
            return String::new();
        };
        let spec = &license.spec;
        match name {
            "isSnapshotSupported" => spec.is_snapshot_supported.to_string(),
            "isGitOpsSupported" => spec.is_git_ops_supported.to_string(),
            "isAirgapSupported" => spec.is_airgap_supported.to_string(),
            "licenseType" => spec.license_type.clone(),
            "licenseSequence" => spec.license_sequence.to_string(),
            "signature" => spec.signature.clone(),
            "appSlug" => spec.app_slug.clone(),
            "channelID" => spec.channel_id.clone(),
            "channelName" => spec.channel_name.clone(),
            "customerName" => spec.customer_name.clone(),
            "customerEmail" => spec.customer_email.clone(),
            "licenseID" | "licenseId" => spec.license_id.clone(),
            "endpoint" => spec.endpoint.clone(),
            entitlement => spec
                .entitlements
                .get(entitlement)
                .map(|field| field.value.to_string())
                .unwrap_or_default(),
        }
    }
}

impl FunctionContext for LicenseContext<'_> {
    fn call(&self, name: &str, values: &[Value]) -> Option<TemplateResult<Value>> {
        if name != "LicenseFieldValue" {
            return None;
        }
        let args = Args::new(name, values);
        Some(
            args.exactly(1)
                .and_then(|()| Ok(Value::String(self.field_value(&args.string(0)?)))),
        )
    }
}
