/*
 * render.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Rendering a `Config` document against saved values.

use kots_kinds::{Config, KotsObject, License, Object, Scheme};
use kots_multitype::BoolOrString;
use kots_template::Builder;

use crate::config_context::ConfigContext;
use crate::error::{ConfigError, ConfigResult};
use crate::item_value::{ItemValues, item_values_from};
use crate::license_context::LicenseContext;

/// Renders config documents.
///
/// The scheme decides which documents decode; the license, when present,
/// backs `LicenseFieldValue`.
#[derive(Debug, Clone)]
pub struct ConfigRenderer {
    scheme: Scheme,
    license: Option<License>,
}

impl Default for ConfigRenderer {
    fn default() -> Self {
        Self::new(Scheme::kots())
    }
}

impl ConfigRenderer {
    pub fn new(scheme: Scheme) -> Self {
        Self {
            scheme,
            license: None,
        }
    }

    pub fn with_license(mut self, license: License) -> Self {
        self.license = Some(license);
        self
    }

    pub fn license(&self) -> Option<&License> {
        self.license.as_ref()
    }

    pub fn scheme(&self) -> &Scheme {
        &self.scheme
    }

    /// Decode a `Config` document.
    pub fn decode_config(&self, data: &str) -> ConfigResult<Config> {
        let object = self
            .scheme
            .decode(data)
            .map_err(|source| ConfigError::DecodeConfig { source })?;
        match object {
            KotsObject::Config(config) => Ok(config),
            other => Err(ConfigError::UnexpectedKind {
                expected: Config::KIND,
                found: other.kind().to_string(),
            }),
        }
    }

    /// Decode a `ConfigValues` document into item values.
    pub fn unmarshal_config_values_content(&self, data: &str) -> ConfigResult<ItemValues> {
        let object = self
            .scheme
            .decode(data)
            .map_err(|source| ConfigError::DecodeValues { source })?;
        match object {
            KotsObject::ConfigValues(values) => Ok(item_values_from(&values)),
            other => Err(ConfigError::UnexpectedKind {
                expected: "ConfigValues",
                found: other.kind().to_string(),
            }),
        }
    }

    /// Render a `Config` document with the saved values in `values_data`.
    ///
    /// Every item is resolved against the saved values, the resolved
    /// `value`/`default` strings replace the item templates, the document
    /// is re-marshalled, and the remaining `{{repl ...}}` directives (`when`,
    /// titles, ...) are evaluated. Missing or malformed values are treated
    /// as no values. Comments and key order of the input are not preserved.
    pub fn template_config(&self, spec_data: &str, values_data: &str) -> ConfigResult<String> {
        let mut config = self.decode_config(spec_data)?;
        let saved = self.saved_values(values_data);

        let duplicates = config.spec.duplicate_item_names();
        if !duplicates.is_empty() {
            return Err(ConfigError::DuplicateItems { names: duplicates });
        }

        let license = self.license.as_ref();
        let context = ConfigContext::build(&config.spec.groups, &saved, license)?;
        apply_values_to_config(&mut config, context.item_values());
        let marshalled = marshal_config(&config)?;

        let builder = Builder::new()
            .with_context(LicenseContext::new(license))
            .with_context(&context);

        builder
            .render(&marshalled)
            .map_err(|source| ConfigError::Render { source })
    }

    fn saved_values(&self, data: &str) -> ItemValues {
        if data.trim().is_empty() {
            return ItemValues::new();
        }
        match self.unmarshal_config_values_content(data) {
            Ok(values) => values,
            Err(err) => {
                tracing::warn!(error = %err, "Ignoring unreadable config values");
                ItemValues::new()
            }
        }
    }
}

/// [`ConfigRenderer::template_config`] with the default renderer.
///
/// # Example
///
/// ```
/// let spec = r#"
/// apiVersion: kots.io/v1beta1
/// kind: Config
/// spec:
///   groups:
///   - name: settings
///     items:
///     - name: hostname
///       type: text
///       default: '{{repl ToUpper "example.com"}}'
/// "#;
///
/// let rendered = kots_config::template_config(spec, "").unwrap();
/// assert!(rendered.contains("default: EXAMPLE.COM"));
/// assert!(!rendered.contains("repl"));
/// ```
pub fn template_config(spec_data: &str, values_data: &str) -> ConfigResult<String> {
    ConfigRenderer::default().template_config(spec_data, values_data)
}

/// [`ConfigRenderer::unmarshal_config_values_content`] with the default
/// renderer.
pub fn unmarshal_config_values_content(data: &str) -> ConfigResult<ItemValues> {
    ConfigRenderer::default().unmarshal_config_values_content(data)
}

/// Overwrite the `value` and `default` of every item and child item that
/// has an entry in `values`. Other items keep their literals.
pub fn apply_values_to_config(config: &mut Config, values: &ItemValues) {
    for item in config.spec.groups.iter_mut().flat_map(|g| g.items.iter_mut()) {
        if let Some(saved) = values.get(&item.name) {
            item.value = BoolOrString::from_string(saved.value_str());
            item.default = BoolOrString::from_string(saved.default_str());
        }
        for child in &mut item.items {
            if let Some(saved) = values.get(&child.name) {
                child.value = BoolOrString::from_string(saved.value_str());
                child.default = BoolOrString::from_string(saved.default_str());
            }
        }
    }
}

/// Serialize a config document as YAML.
pub fn marshal_config(config: &Config) -> ConfigResult<String> {
    serde_yaml::to_string(config).map_err(|source| ConfigError::Marshal { source })
}
