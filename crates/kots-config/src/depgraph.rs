/*
 * depgraph.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Dependencies between config items.
//!
//! An item depends on another when its `default` or `value` template calls
//! a `ConfigOption*` function with the other item's name as a string
//! literal. Items are resolved in rounds: every item whose dependencies are
//! all resolved is ready.

use std::collections::{BTreeMap, BTreeSet};

use kots_kinds::{ConfigGroup, ConfigItem};
use kots_multitype::BoolOrString;
use kots_template::Template;

use crate::error::{ConfigError, ConfigResult};

/// Functions whose first argument names another item.
pub fn is_config_option_function(name: &str) -> bool {
    name.starts_with("ConfigOption")
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyGraph {
    /// Unresolved items and the unresolved items each one waits on.
    dependencies: BTreeMap<String, BTreeSet<String>>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the graph for every item of `groups`.
    ///
    /// References to names that are not items are dropped, as are
    /// self-references. Templates that fail to parse contribute no edges;
    /// rendering reports them later.
    pub fn from_groups(groups: &[ConfigGroup]) -> Self {
        let mut graph = Self::new();
        for item in groups.iter().flat_map(|g| g.items.iter()) {
            graph.add_node(&item.name);
        }
        for item in groups.iter().flat_map(|g| g.items.iter()) {
            for dependency in item_references(item) {
                if dependency != item.name && graph.contains(&dependency) {
                    graph.add_dependency(&item.name, dependency);
                }
            }
        }
        graph
    }

    pub fn add_node(&mut self, name: &str) {
        self.dependencies.entry(name.to_string()).or_default();
    }

    /// Record that `item` waits on `depends_on`. Both become nodes.
    pub fn add_dependency(&mut self, item: &str, depends_on: impl Into<String>) {
        let depends_on = depends_on.into();
        self.add_node(&depends_on);
        self.dependencies
            .entry(item.to_string())
            .or_default()
            .insert(depends_on);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.dependencies.contains_key(name)
    }

    pub fn is_empty(&self) -> bool {
        self.dependencies.is_empty()
    }

    pub fn dependencies_of(&self, name: &str) -> Option<&BTreeSet<String>> {
        self.dependencies.get(name)
    }

    /// Unresolved items with nothing left to wait on, sorted by name.
    ///
    /// Fails with [`ConfigError::DependencyCycle`] when items remain but
    /// none of them is ready.
    pub fn head_nodes(&self) -> ConfigResult<Vec<String>> {
        let ready: Vec<String> = self
            .dependencies
            .iter()
            .filter(|(_, waiting_on)| waiting_on.is_empty())
            .map(|(name, _)| name.clone())
            .collect();
        if ready.is_empty() && !self.is_empty() {
            return Err(ConfigError::DependencyCycle {
                items: self.dependencies.keys().cloned().collect(),
            });
        }
        Ok(ready)
    }

    /// Mark `name` resolved: drop it and release everything waiting on it.
    pub fn resolve(&mut self, name: &str) {
        self.dependencies.remove(name);
        for waiting_on in self.dependencies.values_mut() {
            waiting_on.remove(name);
        }
    }
}

/// Item names referenced by an item's `default` and `value` templates.
fn item_references(item: &ConfigItem) -> Vec<String> {
    let mut references = Vec::new();
    for source in [&item.default, &item.value] {
        let BoolOrString::String(text) = source else {
            continue;
        };
        let template = match Template::compile(text) {
            Ok(template) => template,
            Err(err) => {
                tracing::debug!(item = %item.name, error = %err, "Skipping unparseable template in dependency scan");
                continue;
            }
        };
        references.extend(
            template
                .function_calls()
                .into_iter()
                .filter(|call| is_config_option_function(call.name))
                .filter_map(|call| call.first_arg.map(str::to_string)),
        );
    }
    references
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn item(name: &str, default: &str, value: &str) -> ConfigItem {
        ConfigItem {
            default: BoolOrString::from_string(default),
            value: BoolOrString::from_string(value),
            ..ConfigItem::new(name, "text")
        }
    }

    fn groups(items: Vec<ConfigItem>) -> Vec<ConfigGroup> {
        vec![ConfigGroup {
            name: "main".to_string(),
            items,
            ..ConfigGroup::default()
        }]
    }

    fn names(set: &BTreeSet<String>) -> Vec<&str> {
        set.iter().map(String::as_str).collect()
    }

    #[test]
    fn test_edges_from_config_option_calls() {
        let graph = DependencyGraph::from_groups(&groups(vec![
            item("a", "", ""),
            item("b", r#"{{repl ConfigOption "a"}}"#, ""),
            item(
                "c",
                r#"{{repl if ConfigOptionEquals "b" "x"}}y{{repl end}}"#,
                r#"{{repl ConfigOptionData "a" | Base64Encode}}"#,
            ),
        ]));
        assert_eq!(names(graph.dependencies_of("a").unwrap()), Vec::<&str>::new());
        assert_eq!(names(graph.dependencies_of("b").unwrap()), vec!["a"]);
        assert_eq!(names(graph.dependencies_of("c").unwrap()), vec!["a", "b"]);
    }

    #[test]
    fn test_unknown_self_and_unparseable_references_ignored() {
        let graph = DependencyGraph::from_groups(&groups(vec![
            item("a", r#"{{repl ConfigOption "missing"}}"#, r#"{{repl ConfigOption "a"}}"#),
            item("b", "{{repl if true}}", ""),
        ]));
        assert!(graph.dependencies_of("a").unwrap().is_empty());
        assert!(graph.dependencies_of("b").unwrap().is_empty());
        assert!(!graph.contains("missing"));
    }

    #[test]
    fn test_rounds_resolve_in_order() {
        let mut graph = DependencyGraph::from_groups(&groups(vec![
            item("z", "", ""),
            item("c", r#"{{repl ConfigOption "b"}}"#, ""),
            item("b", r#"{{repl ConfigOption "a"}}"#, ""),
            item("a", "", ""),
        ]));

        let mut rounds = Vec::new();
        loop {
            let heads = graph.head_nodes().unwrap();
            if heads.is_empty() {
                break;
            }
            for head in &heads {
                graph.resolve(head);
            }
            rounds.push(heads);
        }
        assert_eq!(
            rounds,
            vec![
                vec!["a".to_string(), "z".to_string()],
                vec!["b".to_string()],
                vec!["c".to_string()],
            ]
        );
    }

    #[test]
    fn test_cycle_detected() {
        let mut graph = DependencyGraph::from_groups(&groups(vec![
            item("root", "", ""),
            item("a", r#"{{repl ConfigOption "b"}}"#, ""),
            item("b", r#"{{repl ConfigOption "a"}}"#, ""),
        ]));
        assert_eq!(graph.head_nodes().unwrap(), vec!["root".to_string()]);
        graph.resolve("root");

        match graph.head_nodes() {
            Err(ConfigError::DependencyCycle { items }) => {
                assert_eq!(items, vec!["a".to_string(), "b".to_string()]);
            }
            other => panic!("expected a cycle, got {:?}", other),
        }
    }
}
