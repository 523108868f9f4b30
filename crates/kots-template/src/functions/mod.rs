/*
 * functions/mod.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Function contexts.
//!
//! Every function a template can call comes from a [`FunctionContext`].
//! A [`Builder`](crate::Builder) holds an ordered list of contexts and
//! falls back to the language builtins (`eq`, `not`, `printf`, ...).

pub(crate) mod builtins;
mod static_context;

pub use static_context::StaticContext;

use crate::error::{TemplateError, TemplateResult};
use crate::value::Value;

/// A named set of template functions.
pub trait FunctionContext {
    /// Call `name` with already evaluated arguments.
    ///
    /// Returns `None` when this context does not define `name`, so the
    /// lookup can move on to the next context.
    fn call(&self, name: &str, args: &[Value]) -> Option<TemplateResult<Value>>;
}

impl<T: FunctionContext + ?Sized> FunctionContext for &T {
    fn call(&self, name: &str, args: &[Value]) -> Option<TemplateResult<Value>> {
        (**self).call(name, args)
    }
}

impl<T: FunctionContext + ?Sized> FunctionContext for Box<T> {
    fn call(&self, name: &str, args: &[Value]) -> Option<TemplateResult<Value>> {
        (**self).call(name, args)
    }
}

/// Positional arguments of one function call, with typed accessors that
/// report errors against the function name.
#[derive(Debug, Clone, Copy)]
pub struct Args<'a> {
    function: &'a str,
    values: &'a [Value],
}

impl<'a> Args<'a> {
    pub fn new(function: &'a str, values: &'a [Value]) -> Self {
        Self { function, values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &'a [Value] {
        self.values
    }

    /// Require between `min` and `max` arguments, inclusive.
    pub fn expect(&self, min: usize, max: usize) -> TemplateResult<()> {
        let len = self.values.len();
        if (min..=max).contains(&len) {
            return Ok(());
        }
        let expected = if min == max {
            min.to_string()
        } else if max == usize::MAX {
            format!("at least {}", min)
        } else {
            format!("{} to {}", min, max)
        };
        Err(self.error(format!("expected {} argument(s), got {}", expected, len)))
    }

    pub fn exactly(&self, count: usize) -> TemplateResult<()> {
        self.expect(count, count)
    }

    pub fn value(&self, index: usize) -> TemplateResult<&'a Value> {
        self.values
            .get(index)
            .ok_or_else(|| self.error(format!("missing argument {}", index + 1)))
    }

    /// String view of a scalar argument. `nil` is the empty string.
    pub fn string(&self, index: usize) -> TemplateResult<String> {
        match self.value(index)? {
            Value::String(s) => Ok(s.clone()),
            Value::Null => Ok(String::new()),
            scalar @ (Value::Bool(_) | Value::Int(_) | Value::Float(_)) => Ok(scalar.render()),
            Value::List(_) => Err(self.error(format!(
                "argument {} must be a string, got list",
                index + 1
            ))),
        }
    }

    pub fn optional_string(&self, index: usize) -> TemplateResult<Option<String>> {
        if index < self.values.len() {
            self.string(index).map(Some)
        } else {
            Ok(None)
        }
    }

    /// Integer argument. Numeric strings are accepted.
    pub fn int(&self, index: usize) -> TemplateResult<i64> {
        match self.value(index)? {
            Value::Int(n) => Ok(*n),
            Value::String(s) => s.trim().parse().map_err(|_| {
                self.error(format!("argument {} is not an integer: {:?}", index + 1, s))
            }),
            other => Err(self.error(format!(
                "argument {} must be an integer, got {}",
                index + 1,
                other.type_name()
            ))),
        }
    }

    /// Numeric argument as an `Int` or `Float` value. Numeric strings are
    /// parsed, preferring integers.
    pub fn number(&self, index: usize) -> TemplateResult<Value> {
        match self.value(index)? {
            n @ (Value::Int(_) | Value::Float(_)) => Ok(n.clone()),
            Value::String(s) => {
                let s = s.trim();
                if let Ok(n) = s.parse::<i64>() {
                    Ok(Value::Int(n))
                } else if let Ok(f) = s.parse::<f64>() {
                    Ok(Value::Float(f))
                } else {
                    Err(self.error(format!("argument {} is not a number: {:?}", index + 1, s)))
                }
            }
            other => Err(self.error(format!(
                "argument {} must be a number, got {}",
                index + 1,
                other.type_name()
            ))),
        }
    }

    pub fn error(&self, message: impl Into<String>) -> TemplateError {
        TemplateError::InvalidArguments {
            function: self.function.to_string(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_arity_messages() {
        let values = [Value::from("a")];
        let args = Args::new("Split", &values);
        assert_eq!(
            args.exactly(2).unwrap_err(),
            TemplateError::InvalidArguments {
                function: "Split".to_string(),
                message: "expected 2 argument(s), got 1".to_string(),
            }
        );
        assert!(args.expect(1, 2).is_ok());
        assert!(matches!(
            args.expect(2, usize::MAX).unwrap_err(),
            TemplateError::InvalidArguments { message, .. } if message == "expected at least 2 argument(s), got 1"
        ));
    }

    #[test]
    fn test_typed_accessors() {
        let values = [
            Value::Int(7),
            Value::from(" 12 "),
            Value::Null,
            Value::from("1.5"),
            Value::List(vec![]),
        ];
        let args = Args::new("f", &values);
        assert_eq!(args.int(0).unwrap(), 7);
        assert_eq!(args.int(1).unwrap(), 12);
        assert_eq!(args.string(0).unwrap(), "7");
        assert_eq!(args.string(2).unwrap(), "");
        assert_eq!(args.number(3).unwrap(), Value::Float(1.5));
        assert!(args.string(4).is_err());
        assert!(args.value(5).is_err());
        assert_eq!(args.optional_string(5).unwrap(), None);
    }
}
