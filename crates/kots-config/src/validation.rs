/*
 * validation.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Validation of rendered item values against their declared validators.
//!
//! Failures are reported as data for display next to the offending item,
//! never as `Err`.

use kots_kinds::{ConfigChildItem, ConfigItem, ConfigItemValidation, ConfigSpec, RegexValidator};
use kots_multitype::BoolOrString;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Validation failures of one group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigGroupValidationError {
    pub name: String,
    pub item_errors: Vec<ConfigItemValidationError>,
}

/// Validation failures of one item and its child items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigItemValidationError {
    pub name: String,
    #[serde(rename = "type")]
    pub item_type: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub validation_errors: Vec<ValidationError>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub child_item_errors: Vec<ConfigItemValidationError>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regex: Option<RegexValidator>,
}

/// Validate every visible item that declares a validator.
///
/// Returns `None` when no item in `spec` declares validation, otherwise
/// the groups with at least one failing item (empty when all pass).
pub fn validate_config_spec(spec: &ConfigSpec) -> Option<Vec<ConfigGroupValidationError>> {
    if !has_validators(spec) {
        return None;
    }

    let errors = spec
        .groups
        .iter()
        .filter_map(|group| {
            let item_errors: Vec<_> = group.items.iter().filter_map(validate_item).collect();
            (!item_errors.is_empty()).then(|| ConfigGroupValidationError {
                name: group.name.clone(),
                item_errors,
            })
        })
        .collect();
    Some(errors)
}

fn has_validators(spec: &ConfigSpec) -> bool {
    spec.items().any(|item| {
        item.validation.is_some() || item.items.iter().any(|child| child.validation.is_some())
    })
}

fn validate_item(item: &ConfigItem) -> Option<ConfigItemValidationError> {
    if item.is_hidden() {
        return None;
    }

    let validation_errors = item
        .validation
        .as_ref()
        .map(|validation| validate(validatable_value(&item.value, &item.default), validation))
        .unwrap_or_default();
    let child_item_errors: Vec<_> = item
        .items
        .iter()
        .filter_map(|child| validate_child(child, &item.item_type))
        .collect();

    if validation_errors.is_empty() && child_item_errors.is_empty() {
        return None;
    }
    Some(ConfigItemValidationError {
        name: item.name.clone(),
        item_type: item.item_type.clone(),
        validation_errors,
        child_item_errors,
    })
}

fn validate_child(child: &ConfigChildItem, item_type: &str) -> Option<ConfigItemValidationError> {
    let validation = child.validation.as_ref()?;
    let validation_errors = validate(validatable_value(&child.value, &child.default), validation);
    (!validation_errors.is_empty()).then(|| ConfigItemValidationError {
        name: child.name.clone(),
        item_type: item_type.to_string(),
        validation_errors,
        child_item_errors: Vec::new(),
    })
}

/// The value when set, otherwise the default.
fn validatable_value(value: &BoolOrString, default: &BoolOrString) -> String {
    let value = value.to_string();
    if value.is_empty() {
        default.to_string()
    } else {
        value
    }
}

/// Empty values are not checked; required-ness is reported separately.
fn validate(value: String, validation: &ConfigItemValidation) -> Vec<ValidationError> {
    if value.is_empty() {
        return Vec::new();
    }
    validation
        .regex
        .iter()
        .filter_map(|validator| validate_regex(&value, validator))
        .collect()
}

fn validate_regex(value: &str, validator: &RegexValidator) -> Option<ValidationError> {
    match Regex::new(&validator.pattern) {
        Ok(regex) if regex.is_match(value) => None,
        Ok(_) => Some(ValidationError {
            message: validator.message.clone(),
            regex: Some(validator.clone()),
        }),
        Err(err) => Some(ValidationError {
            message: format!("Invalid regex: {}", err),
            regex: Some(validator.clone()),
        }),
    }
}
