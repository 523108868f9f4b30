/*
 * error.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Error types for config rendering.

use kots_kinds::SchemeError;
use kots_template::TemplateError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config spec could not be decoded.
    #[error("failed to decode config data: {source}")]
    DecodeConfig {
        #[source]
        source: SchemeError,
    },

    /// Config values could not be decoded.
    #[error("failed to decode config values: {source}")]
    DecodeValues {
        #[source]
        source: SchemeError,
    },

    /// A document decoded to a different kind than expected.
    #[error("expected a {expected} document, got {found}")]
    UnexpectedKind {
        expected: &'static str,
        found: String,
    },

    /// Item names must be unique across the whole spec.
    #[error("duplicate config item names: {}", .names.join(", "))]
    DuplicateItems { names: Vec<String> },

    /// Items whose templates reference each other in a loop.
    #[error("config items have a dependency cycle: {}", .items.join(", "))]
    DependencyCycle { items: Vec<String> },

    #[error("failed to marshal config: {source}")]
    Marshal {
        #[source]
        source: serde_yaml::Error,
    },

    /// The marshalled config failed to render.
    #[error("failed to render config template: {source}")]
    Render {
        #[source]
        source: TemplateError,
    },
}

pub type ConfigResult<T> = Result<T, ConfigError>;
