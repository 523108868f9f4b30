/*
 * required.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Required items that still have no value.

use kots_kinds::{ConfigGroup, ConfigItem};

/// Required items the user can see. Hidden items and items switched off
/// by `when` never block.
pub fn is_required_item(item: &ConfigItem) -> bool {
    item.required && !item.is_hidden()
}

/// Neither value nor default renders to anything.
pub fn is_unset_item(item: &ConfigItem) -> bool {
    item.value.to_string().is_empty() && item.default.to_string().is_empty()
}

/// Names and titles of the required items that are unset, in declaration
/// order. Items without a title report their name as the title. Groups
/// switched off by `when` are skipped.
pub fn missing_required_config(groups: &[ConfigGroup]) -> (Vec<String>, Vec<String>) {
    let mut names = Vec::new();
    let mut titles = Vec::new();
    for group in groups.iter().filter(|g| !g.when.is_false()) {
        for item in &group.items {
            if is_required_item(item) && is_unset_item(item) {
                names.push(item.name.clone());
                titles.push(if item.title.is_empty() {
                    item.name.clone()
                } else {
                    item.title.clone()
                });
            }
        }
    }
    (names, titles)
}
