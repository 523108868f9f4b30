/*
 * builder.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Function lookup for template rendering.

use std::fmt;

use crate::error::{TemplateError, TemplateResult};
use crate::functions::{FunctionContext, StaticContext, builtins};
use crate::parser::Template;
use crate::value::Value;

/// An ordered set of function contexts used to render templates.
///
/// Lookup searches the most recently added context first, so a later
/// context shadows functions of the same name in earlier ones. Names no
/// context defines fall through to the language builtins.
pub struct Builder<'a> {
    contexts: Vec<Box<dyn FunctionContext + 'a>>,
}

impl<'a> Builder<'a> {
    /// A builder with the [`StaticContext`] functions.
    pub fn new() -> Self {
        Self::empty().with_context(StaticContext::new())
    }

    /// A builder with only the builtins.
    pub fn empty() -> Self {
        Self {
            contexts: Vec::new(),
        }
    }

    pub fn with_context(mut self, context: impl FunctionContext + 'a) -> Self {
        self.push_context(context);
        self
    }

    pub fn push_context(&mut self, context: impl FunctionContext + 'a) {
        self.contexts.push(Box::new(context));
    }

    pub fn context_count(&self) -> usize {
        self.contexts.len()
    }

    /// Call a function by name.
    pub fn call(&self, name: &str, args: &[Value]) -> TemplateResult<Value> {
        self.contexts
            .iter()
            .rev()
            .find_map(|context| context.call(name, args))
            .or_else(|| builtins::call(name, args))
            .unwrap_or_else(|| {
                Err(TemplateError::UnknownFunction {
                    name: name.to_string(),
                })
            })
    }

    /// Compile and render `text` in one step.
    pub fn render(&self, text: &str) -> TemplateResult<String> {
        Template::compile(text)?.render(self)
    }
}

impl Default for Builder<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Builder<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Builder")
            .field("contexts", &self.contexts.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    struct Fixed(&'static str, &'static str);

    impl FunctionContext for Fixed {
        fn call(&self, name: &str, _args: &[Value]) -> Option<TemplateResult<Value>> {
            (name == self.0).then(|| Ok(Value::from(self.1)))
        }
    }

    #[test]
    fn test_later_context_shadows_earlier() {
        let builder = Builder::empty()
            .with_context(Fixed("Name", "first"))
            .with_context(Fixed("Name", "second"));
        assert_eq!(builder.render("{{repl Name}}").unwrap(), "second");
    }

    #[test]
    fn test_context_shadows_static_function() {
        let builder = Builder::new().with_context(Fixed("ToUpper", "shadowed"));
        assert_eq!(builder.render(r#"{{repl ToUpper "x"}}"#).unwrap(), "shadowed");
    }

    #[test]
    fn test_builtins_without_contexts() {
        let builder = Builder::empty();
        assert_eq!(builder.context_count(), 0);
        assert_eq!(builder.render(r#"{{repl printf "%d" 3}}"#).unwrap(), "3");
        assert_eq!(
            builder.render(r#"{{repl ToUpper "x"}}"#).unwrap_err(),
            TemplateError::UnknownFunction {
                name: "ToUpper".to_string()
            }
        );
    }

    #[test]
    fn test_render_reports_parse_errors() {
        assert!(matches!(
            Builder::new().render("{{repl if true}}").unwrap_err(),
            TemplateError::ParseError { .. }
        ));
    }
}
