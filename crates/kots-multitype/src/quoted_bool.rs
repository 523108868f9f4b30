/*
 * quoted_bool.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! A string-valued field whose boolean spellings are normalized.

use std::fmt;

use serde::de::{self, Deserialize, Deserializer, Unexpected, Visitor};
use serde::ser::{Serialize, Serializer};

/// A string that was possibly written as a boolean.
///
/// The `Deserialize` impl follows YAML rules and normalizes boolean-like
/// input to the literal strings `"true"` and `"false"`:
///
/// - bare booleans map to their name;
/// - integers map to `"false"` when zero and `"true"` otherwise, so `45`
///   decodes as `"true"`;
/// - the YAML 1.1 spellings (`y`, `Yes`, `OFF`, ...) map by exact match,
///   without case folding;
/// - any other string is kept as written.
///
/// JSON input has its own, stricter rules; see [`QuotedBool::from_json`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct QuotedBool(String);

impl QuotedBool {
    pub fn new(value: impl Into<String>) -> Self {
        QuotedBool(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True when the value is exactly `"false"`.
    pub fn is_false(&self) -> bool {
        self.0 == "false"
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// Decode a JSON token.
    ///
    /// Only the raw tokens `true`, `false`, `1` and `0` are normalized.
    /// Strings are kept verbatim, so `"yes"` stays `"yes"`, and any other
    /// number is an error.
    pub fn from_json(data: &str) -> serde_json::Result<Self> {
        let mut deserializer = serde_json::Deserializer::from_str(data);
        let value = deserialize_json(&mut deserializer)?;
        deserializer.end()?;
        Ok(value)
    }
}

impl fmt::Display for QuotedBool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for QuotedBool {
    fn from(value: &str) -> Self {
        QuotedBool(value.to_string())
    }
}

impl From<String> for QuotedBool {
    fn from(value: String) -> Self {
        QuotedBool(value)
    }
}

impl PartialEq<str> for QuotedBool {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for QuotedBool {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

fn normalize_token(token: &str) -> Option<&'static str> {
    match token {
        "y" | "Y" | "yes" | "Yes" | "YES" | "true" | "True" | "TRUE" | "on" | "On" | "ON" => {
            Some("true")
        }
        "n" | "N" | "no" | "No" | "NO" | "false" | "False" | "FALSE" | "off" | "Off" | "OFF" => {
            Some("false")
        }
        _ => None,
    }
}

fn from_bool(value: bool) -> QuotedBool {
    QuotedBool(if value { "true" } else { "false" }.to_string())
}

impl Serialize for QuotedBool {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

struct QuotedBoolVisitor;

impl<'de> Visitor<'de> for QuotedBoolVisitor {
    type Value = QuotedBool;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a boolean, an integer or a string")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
        Ok(from_bool(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(from_bool(v != 0))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(from_bool(v != 0))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        match normalize_token(v) {
            Some(normalized) => Ok(QuotedBool(normalized.to_string())),
            None => Ok(QuotedBool(v.to_string())),
        }
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
        match normalize_token(&v) {
            Some(normalized) => Ok(QuotedBool(normalized.to_string())),
            None => Ok(QuotedBool(v)),
        }
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(QuotedBool::default())
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(QuotedBool::default())
    }
}

impl<'de> Deserialize<'de> for QuotedBool {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(QuotedBoolVisitor)
    }
}

/// Decode with the JSON token rules of [`QuotedBool::from_json`].
///
/// For use as `#[serde(deserialize_with = "kots_multitype::quoted_bool::deserialize_json")]`
/// on fields of JSON payloads.
pub fn deserialize_json<'de, D: Deserializer<'de>>(deserializer: D) -> Result<QuotedBool, D::Error> {
    deserializer.deserialize_any(JsonTokenVisitor)
}

struct JsonTokenVisitor;

impl JsonTokenVisitor {
    fn integer<E: de::Error>(self, v: i128, unexpected: Unexpected<'_>) -> Result<QuotedBool, E> {
        match v {
            0 => Ok(from_bool(false)),
            1 => Ok(from_bool(true)),
            _ => Err(E::invalid_value(unexpected, &self)),
        }
    }
}

impl<'de> Visitor<'de> for JsonTokenVisitor {
    type Value = QuotedBool;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("true, false, 0, 1 or a string")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
        Ok(from_bool(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        self.integer(i128::from(v), Unexpected::Signed(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        self.integer(i128::from(v), Unexpected::Unsigned(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        Ok(QuotedBool(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
        Ok(QuotedBool(v))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(QuotedBool::default())
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(QuotedBool::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn serde_from_json(raw: &str) -> QuotedBool {
        serde_json::from_str(raw).unwrap()
    }

    fn from_yaml(raw: &str) -> QuotedBool {
        serde_yaml::from_str(raw).unwrap()
    }

    // ========================================================================
    // JSON tokens
    // ========================================================================

    #[test]
    fn test_json_tokens() {
        assert_eq!(QuotedBool::from_json("true").unwrap(), QuotedBool::new("true"));
        assert_eq!(QuotedBool::from_json("false").unwrap(), QuotedBool::new("false"));
        assert_eq!(QuotedBool::from_json("1").unwrap(), QuotedBool::new("true"));
        assert_eq!(QuotedBool::from_json("0").unwrap(), QuotedBool::new("false"));
        assert!(QuotedBool::from_json("null").unwrap().is_empty());
    }

    #[test]
    fn test_json_quoted_spellings_kept() {
        assert_eq!(QuotedBool::from_json(r#""yes""#).unwrap(), QuotedBool::new("yes"));
        assert_eq!(QuotedBool::from_json(r#""Off""#).unwrap(), QuotedBool::new("Off"));
        assert_eq!(QuotedBool::from_json(r#""true""#).unwrap(), QuotedBool::new("true"));
    }

    #[test]
    fn test_json_other_numbers_rejected() {
        assert!(QuotedBool::from_json("45").is_err());
        assert!(QuotedBool::from_json("-1").is_err());
        assert!(QuotedBool::from_json("1.5").is_err());
        assert!(QuotedBool::from_json("[true]").is_err());
        assert!(QuotedBool::from_json("1 2").is_err());
    }

    #[test]
    fn test_json_field_with_deserialize_with() {
        #[derive(serde::Deserialize)]
        struct Payload {
            #[serde(default, deserialize_with = "deserialize_json")]
            when: QuotedBool,
        }

        let payload: Payload = serde_json::from_str(r#"{"when": "yes"}"#).unwrap();
        assert_eq!(payload.when, QuotedBool::new("yes"));
        let payload: Payload = serde_json::from_str(r#"{"when": 1}"#).unwrap();
        assert_eq!(payload.when, QuotedBool::new("true"));
        let payload: Payload = serde_json::from_str("{}").unwrap();
        assert!(payload.when.is_empty());
        assert!(serde_json::from_str::<Payload>(r#"{"when": 45}"#).is_err());
    }

    // ========================================================================
    // Serde impl (YAML rules)
    // ========================================================================

    #[test]
    fn test_serde_impl_json_integers() {
        assert_eq!(serde_from_json("1"), QuotedBool::new("true"));
        assert_eq!(serde_from_json("0"), QuotedBool::new("false"));
    }

    #[test]
    fn test_serde_impl_json_booleans() {
        assert_eq!(serde_from_json("true"), QuotedBool::new("true"));
        assert_eq!(serde_from_json("false"), QuotedBool::new("false"));
    }

    #[test]
    fn test_serde_impl_json_plain_string() {
        assert_eq!(serde_from_json(r#""hello world""#), QuotedBool::new("hello world"));
        assert_eq!(serde_from_json(r#""{{repl true}}""#), QuotedBool::new("{{repl true}}"));
    }

    #[test]
    fn test_serde_impl_json_null_is_empty() {
        assert!(serde_from_json("null").is_empty());
    }

    #[test]
    fn test_serde_impl_json_float_is_rejected() {
        let result: Result<QuotedBool, _> = serde_json::from_str("1.5");
        assert!(result.is_err());
    }

    #[test]
    fn test_yaml_spellings() {
        assert_eq!(from_yaml("no"), QuotedBool::new("false"));
        assert_eq!(from_yaml("Off"), QuotedBool::new("false"));
        assert_eq!(from_yaml("YES"), QuotedBool::new("true"));
        assert_eq!(from_yaml("on"), QuotedBool::new("true"));
        // enumeration is exact, not case-insensitive
        assert_eq!(from_yaml("yEs"), QuotedBool::new("yEs"));
    }

    #[test]
    fn test_yaml_nonzero_integer_is_true() {
        assert_eq!(from_yaml("45"), QuotedBool::new("true"));
        assert_eq!(from_yaml("-3"), QuotedBool::new("true"));
        assert_eq!(from_yaml("0"), QuotedBool::new("false"));
    }

    #[test]
    fn test_yaml_string_kept() {
        assert_eq!(from_yaml("'hello'"), QuotedBool::new("hello"));
    }

    #[test]
    fn test_serialize_as_string() {
        let value = QuotedBool::new("true");
        assert_eq!(serde_json::to_string(&value).unwrap(), r#""true""#);
    }

    #[test]
    fn test_is_false() {
        assert!(QuotedBool::new("false").is_false());
        assert!(!QuotedBool::new("").is_false());
        assert!(!QuotedBool::new("0").is_false());
    }
}
