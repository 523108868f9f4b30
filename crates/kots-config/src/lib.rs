/*
 * lib.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Rendering and validation of kots `Config` documents.
//!
//! [`template_config`] takes a `Config` document and the user's saved
//! `ConfigValues`, merges the saved answers into the items, and evaluates
//! every `{{repl ...}}` directive in the result. Item templates can refer
//! to each other through `ConfigOption` and friends; items are resolved in
//! dependency order and cycles are rejected.
//!
//! [`validate_config_spec`] checks rendered item values against the regex
//! validators items declare, and [`missing_required_config`] lists required
//! items that are still unset.

pub mod config_context;
pub mod depgraph;
pub mod error;
pub mod item_value;
pub mod license_context;
pub mod render;
pub mod required;
pub mod validation;

pub use config_context::ConfigContext;
pub use depgraph::DependencyGraph;
pub use error::{ConfigError, ConfigResult};
pub use item_value::{ItemValue, ItemValues, item_values_from};
pub use license_context::LicenseContext;
pub use render::{
    ConfigRenderer, apply_values_to_config, marshal_config, template_config,
    unmarshal_config_values_content,
};
pub use required::{is_required_item, is_unset_item, missing_required_config};
pub use validation::{
    ConfigGroupValidationError, ConfigItemValidationError, ValidationError, validate_config_spec,
};
