/*
 * error.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Error types for decoding kots documents.

use thiserror::Error;

use crate::scheme::GroupVersionKind;

#[derive(Debug, Error)]
pub enum SchemeError {
    /// The document is not a YAML/JSON mapping.
    #[error("invalid document")]
    InvalidDocument {
        #[source]
        source: serde_yaml::Error,
    },

    /// The document has no `kind`.
    #[error("document is missing a kind")]
    MissingKind,

    /// No decoder is registered for the document's kind.
    #[error("no kind is registered for {gvk}")]
    NotRegistered { gvk: GroupVersionKind },

    /// The registered decoder rejected the document.
    #[error("failed to decode {gvk}")]
    Decode {
        gvk: GroupVersionKind,
        #[source]
        source: serde_yaml::Error,
    },
}

pub type SchemeResult<T> = Result<T, SchemeError>;
