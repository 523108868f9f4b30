/*
 * lib.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Multitype scalars for kots CRD documents.
//!
//! Several kots fields accept either a bare boolean or a string on the wire,
//! following the Kubernetes `IntOrString` convention:
//!
//! - [`BoolOrString`]: remembers which form was decoded and re-encodes it
//!   the same way.
//! - [`QuotedBool`]: always stored as a string, but common boolean spellings
//!   (`yes`, `off`, `1`, ...) are normalized to `"true"`/`"false"`.
//!
//! Both types decode through serde. `QuotedBool`'s serde impl follows YAML
//! rules; JSON payloads go through [`QuotedBool::from_json`] or
//! [`quoted_bool::deserialize_json`], which only normalize the raw tokens
//! `true`, `false`, `1` and `0`.
//!
//! # Example
//!
//! ```
//! use kots_multitype::{BoolOrString, QuotedBool};
//!
//! let value: BoolOrString = serde_json::from_str("\"abc123\"").unwrap();
//! assert_eq!(value, BoolOrString::from_string("abc123"));
//!
//! let when: QuotedBool = serde_yaml::from_str("yes").unwrap();
//! assert_eq!(when.as_str(), "true");
//!
//! let when = QuotedBool::from_json("\"yes\"").unwrap();
//! assert_eq!(when.as_str(), "yes");
//! ```

pub mod bool_or_string;
pub mod error;
pub mod quoted_bool;

pub use bool_or_string::{BoolOrString, parse_bool};
pub use error::ParseBoolError;
pub use quoted_bool::QuotedBool;
