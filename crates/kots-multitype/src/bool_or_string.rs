/*
 * bool_or_string.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! A scalar holding either a boolean or a string.

use std::fmt;

use serde::de::{self, Deserialize, Deserializer, Visitor};
use serde::ser::{Serialize, Serializer};

use crate::error::ParseBoolError;

/// A value that is either a boolean or a string.
///
/// Decoding keeps the form found on the wire: a bare `true` becomes
/// [`BoolOrString::Bool`], a quoted `"true"` becomes [`BoolOrString::String`].
/// Encoding writes the value back in the same form, with no wrapper object.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BoolOrString {
    /// A bare boolean.
    Bool(bool),
    /// A string literal.
    String(String),
}

impl BoolOrString {
    pub fn from_bool(value: bool) -> Self {
        BoolOrString::Bool(value)
    }

    pub fn from_string(value: impl Into<String>) -> Self {
        BoolOrString::String(value.into())
    }

    /// Interpret the value as a boolean.
    ///
    /// Strings are parsed with [`parse_bool`]; anything outside its grammar
    /// (for example `"123"` or `""`) is an error.
    pub fn as_bool(&self) -> Result<bool, ParseBoolError> {
        match self {
            BoolOrString::Bool(b) => Ok(*b),
            BoolOrString::String(s) => parse_bool(s),
        }
    }

    /// Like [`as_bool`](Self::as_bool), but unparsable strings are `false`.
    pub fn bool_or_default_false(&self) -> bool {
        self.as_bool().unwrap_or(false)
    }

    /// True for the empty string.
    pub fn is_empty(&self) -> bool {
        matches!(self, BoolOrString::String(s) if s.is_empty())
    }
}

impl Default for BoolOrString {
    fn default() -> Self {
        BoolOrString::String(String::new())
    }
}

/// Strings render verbatim; `true` renders as `"1"` and `false` as `""`.
impl fmt::Display for BoolOrString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoolOrString::String(s) => f.write_str(s),
            BoolOrString::Bool(true) => f.write_str("1"),
            BoolOrString::Bool(false) => Ok(()),
        }
    }
}

impl From<bool> for BoolOrString {
    fn from(value: bool) -> Self {
        BoolOrString::Bool(value)
    }
}

impl From<&str> for BoolOrString {
    fn from(value: &str) -> Self {
        BoolOrString::String(value.to_string())
    }
}

impl From<String> for BoolOrString {
    fn from(value: String) -> Self {
        BoolOrString::String(value)
    }
}

/// Parse a boolean with the strict grammar used for config values.
///
/// Accepts `1 t T TRUE true True` and `0 f F FALSE false False`.
pub fn parse_bool(s: &str) -> Result<bool, ParseBoolError> {
    match s {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(false),
        _ => Err(ParseBoolError::new(s)),
    }
}

impl Serialize for BoolOrString {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            BoolOrString::Bool(b) => serializer.serialize_bool(*b),
            BoolOrString::String(s) => serializer.serialize_str(s),
        }
    }
}

struct BoolOrStringVisitor;

impl<'de> Visitor<'de> for BoolOrStringVisitor {
    type Value = BoolOrString;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a boolean or a string")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
        Ok(BoolOrString::Bool(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        Ok(BoolOrString::String(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
        Ok(BoolOrString::String(v))
    }

    // An explicit null behaves like an absent field.
    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(BoolOrString::default())
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(BoolOrString::default())
    }
}

impl<'de> Deserialize<'de> for BoolOrString {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(BoolOrStringVisitor)
    }
}
