/*
 * functions/builtins.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Language builtins available to every template.
//!
//! `and` and `or` are not here: they short-circuit, so the evaluator
//! handles them before arguments are evaluated.

use std::cmp::Ordering;

use super::Args;
use crate::error::TemplateResult;
use crate::value::Value;

pub(crate) fn call(name: &str, values: &[Value]) -> Option<TemplateResult<Value>> {
    let args = Args::new(name, values);
    let result = match name {
        "not" => args
            .exactly(1)
            .and_then(|()| Ok(Value::Bool(!args.value(0)?.is_truthy()))),
        "eq" => eq(&args),
        "ne" => args
            .exactly(2)
            .and_then(|()| equal(&args, args.value(0)?, args.value(1)?))
            .map(|equal| Value::Bool(!equal)),
        "lt" => compare(&args).map(|o| Value::Bool(o == Ordering::Less)),
        "le" => compare(&args).map(|o| Value::Bool(o != Ordering::Greater)),
        "gt" => compare(&args).map(|o| Value::Bool(o == Ordering::Greater)),
        "ge" => compare(&args).map(|o| Value::Bool(o != Ordering::Less)),
        "len" => len(&args),
        "index" => index(&args),
        "print" => Ok(Value::String(sprint(values))),
        "printf" => args
            .expect(1, usize::MAX)
            .and_then(|()| Ok(Value::String(sprintf(&args.string(0)?, &values[1..])))),
        "println" => {
            let words: Vec<String> = values.iter().map(Value::render).collect();
            Ok(Value::String(format!("{}\n", words.join(" "))))
        }
        _ => return None,
    };
    Some(result)
}

/// `eq a b c ...` is true when `a` equals any of the others.
fn eq(args: &Args<'_>) -> TemplateResult<Value> {
    args.expect(2, usize::MAX)?;
    let first = args.value(0)?;
    for other in &args.values()[1..] {
        if equal(args, first, other)? {
            return Ok(Value::Bool(true));
        }
    }
    Ok(Value::Bool(false))
}

fn equal(args: &Args<'_>, a: &Value, b: &Value) -> TemplateResult<bool> {
    match (a, b) {
        (Value::Int(x), Value::Int(y)) => Ok(x == y),
        (Value::Int(_) | Value::Float(_), Value::Int(_) | Value::Float(_)) => {
            Ok(a.as_f64() == b.as_f64())
        }
        (Value::Bool(x), Value::Bool(y)) => Ok(x == y),
        (Value::String(x), Value::String(y)) => Ok(x == y),
        (Value::Null, Value::Null) => Ok(true),
        (Value::Null, _) | (_, Value::Null) => Ok(false),
        (Value::List(_), _) | (_, Value::List(_)) => {
            Err(args.error("lists cannot be compared"))
        }
        _ => Err(args.error(format!(
            "incompatible types for comparison: {} and {}",
            a.type_name(),
            b.type_name()
        ))),
    }
}

fn compare(args: &Args<'_>) -> TemplateResult<Ordering> {
    args.exactly(2)?;
    let (a, b) = (args.value(0)?, args.value(1)?);
    let ordering = match (a, b) {
        (Value::Int(x), Value::Int(y)) => Some(x.cmp(y)),
        (Value::Int(_) | Value::Float(_), Value::Int(_) | Value::Float(_)) => {
            a.as_f64().zip(b.as_f64()).and_then(|(x, y)| x.partial_cmp(&y))
        }
        (Value::String(x), Value::String(y)) => Some(x.cmp(y)),
        _ => {
            return Err(args.error(format!(
                "incompatible types for comparison: {} and {}",
                a.type_name(),
                b.type_name()
            )));
        }
    };
    ordering.ok_or_else(|| args.error("values are not ordered"))
}

fn len(args: &Args<'_>) -> TemplateResult<Value> {
    args.exactly(1)?;
    match args.value(0)? {
        Value::String(s) => Ok(Value::Int(s.len() as i64)),
        Value::List(items) => Ok(Value::Int(items.len() as i64)),
        other => Err(args.error(format!("len of type {}", other.type_name()))),
    }
}

/// `index list 1 0` is `list[1][0]`.
fn index(args: &Args<'_>) -> TemplateResult<Value> {
    args.expect(1, usize::MAX)?;
    let mut current = args.value(0)?;
    for position in 1..args.len() {
        let i = args.int(position)?;
        current = match current {
            Value::List(items) => usize::try_from(i)
                .ok()
                .and_then(|i| items.get(i))
                .ok_or_else(|| args.error(format!("index out of range: {}", i)))?,
            other => {
                return Err(args.error(format!("can't index item of type {}", other.type_name())));
            }
        };
    }
    Ok(current.clone())
}

/// Concatenate values, adding a space between operands when neither side
/// is a string.
pub(crate) fn sprint(values: &[Value]) -> String {
    let mut out = String::new();
    for (i, value) in values.iter().enumerate() {
        if i > 0 && !value.is_string() && !values[i - 1].is_string() {
            out.push(' ');
        }
        out.push_str(&value.render());
    }
    out
}

/// printf-style formatting with the `%s %v %d %q %t %%` verbs.
///
/// Problems are reported inline (`%!d(string=x)`, `%!s(MISSING)`) and do
/// not fail the render.
pub(crate) fn sprintf(format: &str, values: &[Value]) -> String {
    let mut out = String::with_capacity(format.len());
    let mut remaining = values.iter();
    let mut chars = format.chars();

    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        let Some(verb) = chars.next() else {
            out.push_str("%!(NOVERB)");
            break;
        };
        if verb == '%' {
            out.push('%');
            continue;
        }
        let Some(value) = remaining.next() else {
            out.push_str(&format!("%!{}(MISSING)", verb));
            continue;
        };
        let bad_verb = || format!("%!{}({}={})", verb, value.type_name(), value.render());
        match (verb, value) {
            ('s' | 'v', _) => out.push_str(&value.render()),
            ('d', Value::Int(n)) => out.push_str(&n.to_string()),
            ('t', Value::Bool(b)) => out.push_str(&b.to_string()),
            ('q', Value::String(s)) => out.push_str(&format!("{:?}", s)),
            _ => out.push_str(&bad_verb()),
        }
    }

    let extra: Vec<String> = remaining
        .map(|value| format!("{}={}", value.type_name(), value.render()))
        .collect();
    if !extra.is_empty() {
        out.push_str(&format!("%!(EXTRA {})", extra.join(", ")));
    }
    out
}
