/*
 * evaluator.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Template evaluation.
//!
//! Walks the AST and writes the rendered output, calling into the
//! [`Builder`]'s function contexts for every function call.

use crate::ast::{Call, Conditional, Expr, Pipeline, TemplateNode};
use crate::builder::Builder;
use crate::error::{TemplateError, TemplateResult};
use crate::parser::Template;
use crate::value::Value;

impl Template {
    /// Render the template, resolving function calls through `builder`.
    ///
    /// # Example
    ///
    /// ```
    /// use kots_template::{Builder, Template};
    ///
    /// let template = Template::compile(r#"name: {{repl ToUpper "app"}}"#).unwrap();
    /// assert_eq!(template.render(&Builder::new()).unwrap(), "name: APP");
    /// ```
    pub fn render(&self, builder: &Builder<'_>) -> TemplateResult<String> {
        let mut out = String::with_capacity(self.source.len());
        evaluate_nodes(&self.nodes, builder, &mut out)?;
        Ok(out)
    }
}

fn evaluate_nodes(
    nodes: &[TemplateNode],
    builder: &Builder<'_>,
    out: &mut String,
) -> TemplateResult<()> {
    for node in nodes {
        evaluate_node(node, builder, out)?;
    }
    Ok(())
}

fn evaluate_node(node: &TemplateNode, builder: &Builder<'_>, out: &mut String) -> TemplateResult<()> {
    match node {
        TemplateNode::Literal(literal) => out.push_str(&literal.text),
        TemplateNode::Action(action) => {
            let value = evaluate_pipeline(&action.pipeline, builder)?;
            out.push_str(&value.render());
        }
        TemplateNode::Conditional(conditional) => {
            evaluate_conditional(conditional, builder, out)?;
        }
        TemplateNode::Comment(_) => {}
    }
    Ok(())
}

fn evaluate_conditional(
    conditional: &Conditional,
    builder: &Builder<'_>,
    out: &mut String,
) -> TemplateResult<()> {
    for (condition, body) in &conditional.branches {
        if evaluate_pipeline(condition, builder)?.is_truthy() {
            return evaluate_nodes(body, builder, out);
        }
    }
    if let Some(body) = &conditional.else_branch {
        evaluate_nodes(body, builder, out)?;
    }
    Ok(())
}

/// Evaluate a pipeline. Each command after the first receives the previous
/// result as its final argument.
pub(crate) fn evaluate_pipeline(pipeline: &Pipeline, builder: &Builder<'_>) -> TemplateResult<Value> {
    let mut result: Option<Value> = None;
    for command in &pipeline.commands {
        result = Some(evaluate_command(command, result.take(), builder)?);
    }
    Ok(result.unwrap_or_default())
}

fn evaluate_command(
    command: &Expr,
    piped: Option<Value>,
    builder: &Builder<'_>,
) -> TemplateResult<Value> {
    match command {
        Expr::Call(call) => evaluate_call(call, piped, builder),
        _ if piped.is_some() => Err(TemplateError::evaluation(
            "can't give argument to non-function",
        )),
        _ => evaluate_expr(command, builder),
    }
}

fn evaluate_expr(expr: &Expr, builder: &Builder<'_>) -> TemplateResult<Value> {
    match expr {
        Expr::Constant(value, _) => Ok(value.clone()),
        Expr::Call(call) => evaluate_call(call, None, builder),
        Expr::Pipeline(pipeline) => evaluate_pipeline(pipeline, builder),
    }
}

fn evaluate_call(call: &Call, piped: Option<Value>, builder: &Builder<'_>) -> TemplateResult<Value> {
    if call.name == "and" || call.name == "or" {
        return evaluate_logical(call, piped, builder);
    }

    let mut args = call
        .args
        .iter()
        .map(|arg| evaluate_expr(arg, builder))
        .collect::<TemplateResult<Vec<_>>>()?;
    args.extend(piped);
    builder.call(&call.name, &args)
}

/// `and` and `or` evaluate their arguments left to right and stop at the
/// first one that decides the result, which is returned as-is.
fn evaluate_logical(call: &Call, piped: Option<Value>, builder: &Builder<'_>) -> TemplateResult<Value> {
    if call.args.is_empty() && piped.is_none() {
        return Err(TemplateError::InvalidArguments {
            function: call.name.clone(),
            message: "expected at least 1 argument".to_string(),
        });
    }

    let stop_on = call.name == "or";
    let mut last = Value::Null;
    for arg in &call.args {
        let value = evaluate_expr(arg, builder)?;
        if value.is_truthy() == stop_on {
            return Ok(value);
        }
        last = value;
    }
    Ok(piped.unwrap_or(last))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::functions::FunctionContext;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;

    fn render(source: &str) -> TemplateResult<String> {
        Template::compile(source)?.render(&Builder::new())
    }

    /// Records every call it sees and answers `Probe` with its first argument.
    #[derive(Default)]
    struct Probe {
        calls: RefCell<Vec<String>>,
    }

    impl FunctionContext for Probe {
        fn call(&self, name: &str, args: &[Value]) -> Option<TemplateResult<Value>> {
            (name == "Probe").then(|| {
                let arg = args.first().cloned().unwrap_or_default();
                self.calls.borrow_mut().push(arg.render());
                Ok(arg)
            })
        }
    }

    // ========================================================================
    // Output
    // ========================================================================

    #[test]
    fn test_literal_passthrough() {
        assert_eq!(render("a: {{ b }}\n").unwrap(), "a: {{ b }}\n");
    }

    #[test]
    fn test_action_output() {
        assert_eq!(
            render(r#"x{{repl ToUpper "abc"}}y repl{{ 1 }} {{repl true}}"#).unwrap(),
            "xABCy 1 true"
        );
    }

    #[test]
    fn test_nil_renders_empty() {
        assert_eq!(render("[{{repl nil}}]").unwrap(), "[]");
    }

    #[test]
    fn test_comment_not_rendered() {
        assert_eq!(render("a{{repl /* hidden */}}b").unwrap(), "ab");
    }

    // ========================================================================
    // Pipelines
    // ========================================================================

    #[test]
    fn test_pipeline_passes_last_argument() {
        assert_eq!(render(r#"{{repl "  Mixed " | TrimSpace | ToLower}}"#).unwrap(), "mixed");
        assert_eq!(render(r#"{{repl "b" | printf "%s-%s" "a"}}"#).unwrap(), "a-b");
    }

    #[test]
    fn test_pipe_into_constant_fails() {
        let err = Template::compile(r#"{{repl "a" | ("b")}}"#)
            .unwrap()
            .render(&Builder::new())
            .unwrap_err();
        assert_eq!(
            err,
            TemplateError::evaluation("can't give argument to non-function")
        );
    }

    #[test]
    fn test_unknown_function() {
        assert_eq!(
            render("{{repl Nope}}").unwrap_err(),
            TemplateError::UnknownFunction {
                name: "Nope".to_string()
            }
        );
    }

    // ========================================================================
    // Conditionals and logic
    // ========================================================================

    #[test]
    fn test_conditional_branches() {
        let source = r#"{{repl if eq "b" "a"}}A{{repl else if eq "b" "b"}}B{{repl else}}C{{repl end}}"#;
        assert_eq!(render(source).unwrap(), "B");
        assert_eq!(render("{{repl if false}}x{{repl else}}y{{repl end}}").unwrap(), "y");
        assert_eq!(render("{{repl if 0}}x{{repl end}}").unwrap(), "");
    }

    #[test]
    fn test_string_false_is_truthy() {
        assert_eq!(render(r#"{{repl if "false"}}yes{{repl end}}"#).unwrap(), "yes");
    }

    #[test]
    fn test_and_or_return_deciding_operand() {
        assert_eq!(render(r#"{{repl or "" "x" "y"}}"#).unwrap(), "x");
        assert_eq!(render(r#"{{repl and "a" 0 "b"}}"#).unwrap(), "0");
        assert_eq!(render(r#"{{repl and "a" "b"}}"#).unwrap(), "b");
        assert_eq!(render(r#"{{repl or false ""}}"#).unwrap(), "");
    }

    #[test]
    fn test_and_or_short_circuit() {
        let probe = Probe::default();
        let builder = Builder::new().with_context(&probe);

        let template = Template::compile(r#"{{repl or (Probe "a") (Probe "b")}}"#).unwrap();
        assert_eq!(template.render(&builder).unwrap(), "a");
        assert_eq!(*probe.calls.borrow(), vec!["a".to_string()]);

        let template = Template::compile(r#"{{repl and (Probe "") (Probe "c")}}"#).unwrap();
        assert_eq!(template.render(&builder).unwrap(), "");
        assert_eq!(*probe.calls.borrow(), vec!["a".to_string(), String::new()]);
    }

    #[test]
    fn test_logical_with_piped_value() {
        assert_eq!(render(r#"{{repl "z" | or false}}"#).unwrap(), "z");
        assert_eq!(render(r#"{{repl "z" | and true}}"#).unwrap(), "z");
    }

    #[test]
    fn test_logical_requires_arguments() {
        assert!(matches!(
            render("{{repl and}}").unwrap_err(),
            TemplateError::InvalidArguments { .. }
        ));
    }
}
