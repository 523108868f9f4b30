/*
 * integration_tests.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Integration tests for kots-kinds using test fixtures.
 */

use std::path::Path;

use kots_kinds::{KotsObject, Scheme, SchemeError};
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

#[test]
fn test_decode_application_fixture() {
    let object = Scheme::kots().decode(&load_fixture("application.yaml")).unwrap();
    assert_eq!(object.kind(), "Application");

    let app = object.into_application().unwrap();
    assert_eq!(app.metadata.name, "sample-app");
    assert_eq!(app.spec.title, "Sample App");
    assert!(app.spec.allow_rollback);
    assert!(app.spec.require_minimal_rbac_privileges);
    assert_eq!(app.spec.status_informers.len(), 2);
    assert_eq!(app.spec.ports[0].service_port, 80);
    assert_eq!(app.spec.ports[0].local_port, Some(8888));
    assert_eq!(app.spec.ports[0].application_url, "http://web");
    assert_eq!(app.spec.min_kots_version, "1.60.0");
}

#[test]
fn test_decode_config_fixture() {
    let config = Scheme::kots()
        .decode(&load_fixture("config.yaml"))
        .unwrap()
        .into_config()
        .unwrap();

    let group = &config.spec.groups[0];
    assert_eq!(group.when.as_str(), r#"{{repl ConfigOptionEquals "mode" "full"}}"#);

    let names: Vec<_> = config.spec.items().map(|item| item.name.as_str()).collect();
    assert_eq!(names, vec!["db_type", "db_password", "tls_enabled", "replicas"]);

    let db_type = &group.items[0];
    assert_eq!(db_type.default, BoolOrString::from_string("embedded"));
    assert_eq!(db_type.items.len(), 2);

    let password = &group.items[1];
    assert!(password.required);
    let regex = password.validation.as_ref().unwrap().regex.as_ref().unwrap();
    assert_eq!(regex.pattern, "^.{8,}$");

    let tls = &group.items[2];
    assert_eq!(tls.default, BoolOrString::from_bool(true));
    assert_eq!(tls.when.as_str(), "true");

    let replicas = &group.items[3];
    assert!(replicas.repeatable);
    assert_eq!(replicas.minimum_count, 1);
    assert_eq!(replicas.count_by_group["database"], 2);
    assert!(config.spec.duplicate_item_names().is_empty());
}

#[test]
fn test_config_survives_reencoding() {
    let scheme = Scheme::kots();
    let object = scheme.decode(&load_fixture("config.yaml")).unwrap();
    let KotsObject::Config(config) = &object else {
        panic!("expected a Config, got {}", object.kind());
    };

    let encoded = serde_yaml::to_string(config).unwrap();
    assert_eq!(scheme.decode(&encoded).unwrap(), object);
}

#[test]
fn test_fixture_rejected_by_empty_scheme() {
    let err = Scheme::new().decode(&load_fixture("config.yaml")).unwrap_err();
    assert!(matches!(err, SchemeError::NotRegistered { .. }));
}
