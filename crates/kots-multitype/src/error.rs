/*
 * error.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Error types for multitype conversions.

use thiserror::Error;

/// A string could not be interpreted as a boolean.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid boolean value: {value:?}")]
pub struct ParseBoolError {
    /// The rejected input.
    pub value: String,
}

impl ParseBoolError {
    pub(crate) fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }
}
