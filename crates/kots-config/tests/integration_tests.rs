/*
 * integration_tests.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Integration tests for kots-config using test fixtures.
 */

use std::path::Path;

use kots_config::{
    ConfigRenderer, missing_required_config, template_config, unmarshal_config_values_content,
    validate_config_spec,
};
use kots_kinds::{Config, ConfigItem, License};
use kots_multitype::BoolOrString;
use pretty_assertions::assert_eq;

/// Helper to get the path to test fixtures
fn fixture_path(name: &str) -> std::path::PathBuf {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    Path::new(manifest_dir).join("test-fixtures").join(name)
}

fn load_fixture(name: &str) -> String {
    std::fs::read_to_string(fixture_path(name))
        .unwrap_or_else(|_| panic!("Failed to read fixture: {}", name))
}

fn render(spec: &str, values: &str) -> Config {
    let output = template_config(&load_fixture(spec), values).unwrap();
    serde_yaml::from_str(&output)
        .unwrap_or_else(|err| panic!("Rendered config does not parse: {}\n{}", err, output))
}

fn item<'a>(config: &'a Config, name: &str) -> &'a ConfigItem {
    config
        .spec
        .items()
        .find(|item| item.name == name)
        .unwrap_or_else(|| panic!("No item named {}", name))
}

fn text(s: &str) -> BoolOrString {
    BoolOrString::from_string(s)
}

// ============================================================================
// Rendering
// ============================================================================

#[test]
fn test_render_with_saved_values() {
    let config = render("config.yaml", &load_fixture("config-values.yaml"));

    assert_eq!(config.metadata.name, "sample-app");

    let a_string = item(&config, "a_string");
    assert_eq!(a_string.value, text("xyz789"));
    assert_eq!(a_string.default, text(""));

    assert_eq!(item(&config, "db_type").default, text("embedded"));
    assert!(item(&config, "db_host").when.is_false());
    assert_eq!(item(&config, "db_enabled").when.as_str(), "true");
    assert_eq!(item(&config, "db_user").default, text("admin"));
    assert_eq!(
        item(&config, "connection_url").value,
        text("postgres://admin@postgres:5432")
    );
    assert_eq!(item(&config, "secret_token").value, text("czNjcmV0"));
    assert_eq!(item(&config, "port").value, text("http"));
    assert_eq!(item(&config, "port").default, text(""));
}

#[test]
fn test_render_without_saved_values() {
    let config = render("config.yaml", "");

    let a_string = item(&config, "a_string");
    assert_eq!(a_string.value, text(""));
    assert_eq!(a_string.default, text("abc123"));
    assert_eq!(item(&config, "port").default, text("8080"));
}

#[test]
fn test_saved_choice_switches_dependent_items() {
    let config = render("config.yaml", &load_fixture("config-values-external.yaml"));

    assert_eq!(item(&config, "db_type").value, text("external"));
    assert_eq!(item(&config, "db_host").when.as_str(), "true");
    assert_eq!(item(&config, "db_enabled").when.as_str(), "true");
    assert_eq!(
        item(&config, "connection_url").value,
        text("postgres://admin@:5432")
    );
}

#[test]
fn test_render_with_license() {
    let license: License = serde_yaml::from_str(&load_fixture("license.yaml")).unwrap();
    let output = ConfigRenderer::default()
        .with_license(license)
        .template_config(&load_fixture("licensed-config.yaml"), "")
        .unwrap();
    let config: Config = serde_yaml::from_str(&output).unwrap();

    assert_eq!(config.spec.groups[0].title, "Acme Corp settings");
    assert_eq!(item(&config, "node_count").default, text("5"));
    assert_eq!(
        item(&config, "node_summary").value,
        text("5 of 5 nodes on Stable")
    );
}

#[test]
fn test_render_without_license() {
    let config = render("licensed-config.yaml", "");

    assert_eq!(config.spec.groups[0].title, " settings");
    assert_eq!(item(&config, "node_summary").value, text(" of  nodes on "));
}

#[test]
fn test_unmarshal_values_fixture() {
    let values = unmarshal_config_values_content(&load_fixture("config-values.yaml")).unwrap();
    let names: Vec<_> = values.keys().map(String::as_str).collect();
    assert_eq!(names, vec!["a_string", "port"]);
    assert_eq!(values["port"].value_str(), "http");
}

// ============================================================================
// Validation and required items
// ============================================================================

#[test]
fn test_validate_rendered_config() {
    let config = render("config.yaml", &load_fixture("config-values.yaml"));
    let errors = validate_config_spec(&config.spec).unwrap();

    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].name, "network");
    let item_errors = &errors[0].item_errors;
    assert_eq!(item_errors.len(), 1);
    assert_eq!(item_errors[0].name, "port");
    assert_eq!(item_errors[0].validation_errors[0].message, "Port must be a number");
}

#[test]
fn test_validate_rendered_defaults_pass() {
    let config = render("config.yaml", "");
    assert_eq!(validate_config_spec(&config.spec), Some(Vec::new()));
}

#[test]
fn test_required_item_hidden_by_when() {
    let config = render("config.yaml", "");
    let (names, titles) = missing_required_config(&config.spec.groups);
    assert!(names.is_empty());
    assert!(titles.is_empty());
}

#[test]
fn test_required_item_shown_by_saved_choice() {
    let config = render("config.yaml", &load_fixture("config-values-external.yaml"));
    let (names, titles) = missing_required_config(&config.spec.groups);
    assert_eq!(names, vec!["db_host"]);
    assert_eq!(titles, vec!["Database host"]);
}
