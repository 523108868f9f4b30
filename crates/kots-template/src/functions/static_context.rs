/*
 * functions/static_context.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Functions that do not depend on any application state: time, string
//! helpers, encodings, arithmetic and parsing.

use std::fmt::Write;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::{DateTime, SecondsFormat, Utc};
use kots_multitype::parse_bool;

use super::{Args, FunctionContext};
use crate::error::{TemplateError, TemplateResult};
use crate::value::Value;

/// Stateless template functions.
///
/// The clock can be pinned with [`StaticContext::with_now`] so rendered
/// output is reproducible.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticContext {
    now: Option<DateTime<Utc>>,
}

impl StaticContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_now(now: DateTime<Utc>) -> Self {
        Self { now: Some(now) }
    }

    fn now(&self) -> DateTime<Utc> {
        self.now.unwrap_or_else(Utc::now)
    }
}

impl FunctionContext for StaticContext {
    fn call(&self, name: &str, values: &[Value]) -> Option<TemplateResult<Value>> {
        let args = Args::new(name, values);
        let result = match name {
            "Now" => args.exactly(0).map(|()| Value::String(rfc3339(self.now()))),
            "NowFmt" => args
                .exactly(1)
                .and_then(|()| now_fmt(&args, self.now()).map(Value::String)),
            "ToLower" => map_string(&args, |s| s.to_lowercase()),
            "ToUpper" => map_string(&args, |s| s.to_uppercase()),
            "TrimSpace" => map_string(&args, |s| s.trim().to_string()),
            "Trim" => trim(&args),
            "UrlEncode" => map_string(&args, |s| query_escape(&s)),
            "Base64Encode" => map_string(&args, |s| BASE64.encode(s)),
            "Base64Decode" => map_string(&args, |s| {
                BASE64
                    .decode(s.as_bytes())
                    .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
                    .unwrap_or_default()
            }),
            "Split" => split(&args),
            "Add" => arithmetic(&args, Op::Add),
            "Sub" => arithmetic(&args, Op::Sub),
            "Mult" => arithmetic(&args, Op::Mult),
            "Div" => arithmetic(&args, Op::Div),
            "ParseBool" => args
                .exactly(1)
                .and_then(|()| Ok(Value::Bool(parse_bool(&args.string(0)?).unwrap_or(false)))),
            "ParseInt" => parse_int(&args),
            "ParseFloat" => args.exactly(1).and_then(|()| {
                Ok(Value::Float(args.string(0)?.trim().parse::<f64>().unwrap_or(0.0)))
            }),
            "HumanSize" => args
                .exactly(1)
                .and_then(|()| args.number(0))
                .map(|n| Value::String(human_size(n.as_f64().unwrap_or_default()))),
            _ => return None,
        };
        Some(result)
    }
}

fn rfc3339(time: DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Format the current time with a strftime pattern. An empty pattern
/// means RFC 3339.
fn now_fmt(args: &Args<'_>, now: DateTime<Utc>) -> TemplateResult<String> {
    let format = args.string(0)?;
    if format.is_empty() {
        return Ok(rfc3339(now));
    }
    let mut out = String::new();
    write!(out, "{}", now.format(&format))
        .map_err(|_| args.error(format!("invalid time format {:?}", format)))?;
    Ok(out)
}

fn map_string(args: &Args<'_>, f: impl FnOnce(String) -> String) -> TemplateResult<Value> {
    args.exactly(1)?;
    Ok(Value::String(f(args.string(0)?)))
}

/// `Trim s` trims whitespace; `Trim s cutset` trims any of the characters
/// in `cutset` from both ends.
fn trim(args: &Args<'_>) -> TemplateResult<Value> {
    args.expect(1, 2)?;
    let s = args.string(0)?;
    let trimmed = match args.optional_string(1)? {
        Some(cutset) => s.trim_matches(|c: char| cutset.contains(c)).to_string(),
        None => s.trim().to_string(),
    };
    Ok(Value::String(trimmed))
}

fn split(args: &Args<'_>) -> TemplateResult<Value> {
    args.exactly(2)?;
    let s = args.string(0)?;
    let sep = args.string(1)?;
    let parts = if sep.is_empty() {
        s.chars().map(|c| Value::String(c.to_string())).collect()
    } else {
        s.split(sep.as_str()).map(Value::from).collect()
    };
    Ok(Value::List(parts))
}

/// Query-string escaping: spaces become `+`.
fn query_escape(s: &str) -> String {
    urlencoding::encode(s).replace("%20", "+")
}

#[derive(Debug, Clone, Copy)]
enum Op {
    Add,
    Sub,
    Mult,
    Div,
}

/// Integer arithmetic when both operands are integers, float otherwise.
fn arithmetic(args: &Args<'_>, op: Op) -> TemplateResult<Value> {
    args.exactly(2)?;
    let (a, b) = (args.number(0)?, args.number(1)?);

    if let (Value::Int(x), Value::Int(y)) = (&a, &b) {
        let (x, y) = (*x, *y);
        let result = match op {
            Op::Add => x.checked_add(y),
            Op::Sub => x.checked_sub(y),
            Op::Mult => x.checked_mul(y),
            Op::Div if y == 0 => return Err(args.error("integer divide by zero")),
            Op::Div => x.checked_div(y),
        };
        return result
            .map(Value::Int)
            .ok_or_else(|| args.error("integer overflow"));
    }

    let (x, y) = match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) => (x, y),
        _ => return Err(TemplateError::evaluation("non-numeric operand")),
    };
    let result = match op {
        Op::Add => x + y,
        Op::Sub => x - y,
        Op::Mult => x * y,
        Op::Div => x / y,
    };
    Ok(Value::Float(result))
}

/// `ParseInt s [base]`. Unparseable input yields 0; base 0 infers the base
/// from a `0x`, `0o` or `0b` prefix.
fn parse_int(args: &Args<'_>) -> TemplateResult<Value> {
    args.expect(1, 2)?;
    let s = args.string(0)?;
    let base = if args.len() > 1 { args.int(1)? } else { 10 };

    let s = s.trim();
    let (negative, digits) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };
    let (radix, digits) = match base {
        0 => {
            let lower = digits.to_ascii_lowercase();
            if lower.starts_with("0x") {
                (16, &digits[2..])
            } else if lower.starts_with("0o") {
                (8, &digits[2..])
            } else if lower.starts_with("0b") {
                (2, &digits[2..])
            } else {
                (10, digits)
            }
        }
        2..=36 => (base as u32, digits),
        _ => return Err(args.error(format!("invalid base {}", base))),
    };

    let parsed = i64::from_str_radix(digits, radix).unwrap_or(0);
    Ok(Value::Int(if negative { -parsed } else { parsed }))
}

const SIZE_UNITS: [&str; 9] = ["B", "kB", "MB", "GB", "TB", "PB", "EB", "ZB", "YB"];

/// Size in decimal units with four significant digits, e.g. `2.048kB`.
pub(crate) fn human_size(size: f64) -> String {
    let mut size = size;
    let mut unit = 0;
    while size >= 1000.0 && unit < SIZE_UNITS.len() - 1 {
        size /= 1000.0;
        unit += 1;
    }
    format!("{}{}", significant(size, 4), SIZE_UNITS[unit])
}

fn significant(value: f64, digits: i32) -> String {
    if value == 0.0 || !value.is_finite() {
        return value.to_string();
    }
    let magnitude = value.abs().log10().floor() as i32;
    let decimals = (digits - 1 - magnitude).max(0) as usize;
    let formatted = format!("{:.*}", decimals, value);
    if formatted.contains('.') {
        formatted
            .trim_end_matches('0')
            .trim_end_matches('.')
            .to_string()
    } else {
        formatted
    }
}
