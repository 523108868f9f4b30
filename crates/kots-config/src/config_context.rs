/*
 * config_context.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! The `ConfigOption*` template functions and the construction of their
//! item values.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use kots_kinds::{ConfigGroup, ConfigItem, License};
use kots_template::{Args, Builder, FunctionContext, TemplateResult, Value};

use crate::depgraph::DependencyGraph;
use crate::error::ConfigResult;
use crate::item_value::{ItemValue, ItemValues};
use crate::license_context::LicenseContext;

/// Template functions that read config item values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigContext {
    item_values: ItemValues,
}

impl ConfigContext {
    pub fn new(item_values: ItemValues) -> Self {
        Self { item_values }
    }

    /// Resolve every item of `groups`.
    ///
    /// Items are visited in dependency order. An editable item that already
    /// has a saved value keeps it; every other item gets its `default` and
    /// `value` rendered against the items resolved so far, the saved
    /// values, the license and the static functions. A template that fails
    /// to render leaves that field empty.
    pub fn build(
        groups: &[ConfigGroup],
        saved: &ItemValues,
        license: Option<&License>,
    ) -> ConfigResult<Self> {
        let mut context = Self::new(saved.clone());
        let items: Vec<&ConfigItem> = groups.iter().flat_map(|g| g.items.iter()).collect();

        let mut graph = DependencyGraph::from_groups(groups);
        let mut heads = graph.head_nodes()?;
        while !heads.is_empty() {
            tracing::debug!(items = ?heads, "Resolving config items");
            for name in &heads {
                graph.resolve(name);
                let Some(item) = items.iter().find(|item| &item.name == name) else {
                    continue;
                };

                if !item.is_read_only()
                    && context.item_values.get(name).is_some_and(ItemValue::has_value)
                {
                    continue;
                }

                let resolved = context.render_item(item, license);
                context.item_values.insert(name.clone(), resolved);
            }
            heads = graph.head_nodes()?;
        }

        Ok(context)
    }

    fn render_item(&self, item: &ConfigItem, license: Option<&License>) -> ItemValue {
        let builder = Builder::new()
            .with_context(LicenseContext::new(license))
            .with_context(self);
        let render = |field: &str, text: String| match builder.render(&text) {
            Ok(rendered) => rendered,
            Err(err) => {
                tracing::warn!(item = %item.name, field, error = %err, "Failed to render config item template");
                String::new()
            }
        };

        let previous = self.item_values.get(&item.name);
        ItemValue {
            default: render("default", item.default.to_string()),
            value: render("value", item.value.to_string()),
            filename: previous.map(|v| v.filename.clone()).unwrap_or_default(),
            repeatable_item: previous
                .map(|v| v.repeatable_item.clone())
                .unwrap_or_default(),
        }
    }

    pub fn item_values(&self) -> &ItemValues {
        &self.item_values
    }

    pub fn into_item_values(self) -> ItemValues {
        self.item_values
    }

    pub fn get(&self, name: &str) -> Option<&ItemValue> {
        self.item_values.get(name)
    }

    /// The item's value, falling back to its default. `None` for unknown items.
    pub fn option(&self, name: &str) -> Option<&str> {
        self.item_values.get(name).map(ItemValue::resolved)
    }

    fn config_option(&self, name: &str) -> String {
        match self.option(name) {
            Some(value) => value.to_string(),
            None => {
                tracing::debug!(item = %name, "ConfigOption references an unknown item");
                String::new()
            }
        }
    }

    fn config_option_data(&self, name: &str) -> String {
        let encoded = self.config_option(name);
        match BASE64.decode(encoded.trim().as_bytes()) {
            Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
            Err(err) => {
                tracing::debug!(item = %name, error = %err, "ConfigOptionData value is not base64");
                String::new()
            }
        }
    }
}

impl FunctionContext for ConfigContext {
    fn call(&self, name: &str, values: &[Value]) -> Option<TemplateResult<Value>> {
        let args = Args::new(name, values);
        let result = match name {
            "ConfigOption" => args
                .exactly(1)
                .and_then(|()| Ok(Value::String(self.config_option(&args.string(0)?)))),
            "ConfigOptionData" => args
                .exactly(1)
                .and_then(|()| Ok(Value::String(self.config_option_data(&args.string(0)?)))),
            "ConfigOptionFilename" => args.exactly(1).and_then(|()| {
                let item = args.string(0)?;
                let filename = self.get(&item).map(|v| v.filename.clone()).unwrap_or_default();
                Ok(Value::String(filename))
            }),
            "ConfigOptionEquals" => args.exactly(2).and_then(|()| {
                let expected = args.string(1)?;
                let equal = self.option(&args.string(0)?).is_some_and(|v| v == expected);
                Ok(Value::Bool(equal))
            }),
            "ConfigOptionNotEquals" => args.exactly(2).and_then(|()| {
                let expected = args.string(1)?;
                let differs = self.option(&args.string(0)?).is_some_and(|v| v != expected);
                Ok(Value::Bool(differs))
            }),
            _ => return None,
        };
        Some(result)
    }
}
