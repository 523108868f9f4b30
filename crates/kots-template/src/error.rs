/*
 * error.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Error types for template parsing and evaluation.

use thiserror::Error;

/// Errors that can occur during template operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TemplateError {
    /// Error parsing the template syntax.
    #[error("Parse error at offset {offset}: {message}")]
    ParseError { message: String, offset: usize },

    /// A function name no context defines.
    #[error("function \"{name}\" not defined")]
    UnknownFunction { name: String },

    /// A function rejected its arguments.
    #[error("Invalid arguments for '{function}': {message}")]
    InvalidArguments { function: String, message: String },

    /// Template file could not be read.
    #[error("Failed to read template {path}: {message}")]
    IoError { path: String, message: String },

    /// Error evaluating the template.
    #[error("Evaluation error: {message}")]
    EvaluationError { message: String },
}

impl TemplateError {
    pub(crate) fn parse(message: impl Into<String>, offset: usize) -> Self {
        TemplateError::ParseError {
            message: message.into(),
            offset,
        }
    }

    pub(crate) fn evaluation(message: impl Into<String>) -> Self {
        TemplateError::EvaluationError {
            message: message.into(),
        }
    }
}

/// Result type for template operations.
pub type TemplateResult<T> = Result<T, TemplateError>;
