/*
 * ast.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Template AST types.
//!
//! A template is a sequence of [`TemplateNode`]s. Actions hold a
//! [`Pipeline`] of commands; each command is an [`Expr`]. Every node carries
//! the byte range it was parsed from.

use crate::value::Value;

/// Byte range in the template source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}

/// A node in the template AST.
#[derive(Debug, Clone, PartialEq)]
pub enum TemplateNode {
    /// Literal text to be output as-is.
    Literal(Literal),

    /// An action whose result is written to the output: `{{repl pipeline}}`
    Action(Action),

    /// Conditional block: `{{repl if p}}...{{repl else if q}}...{{repl else}}...{{repl end}}`
    Conditional(Conditional),

    /// Comment (not rendered): `{{repl /* comment */}}`
    Comment(Span),
}

/// Literal text node.
#[derive(Debug, Clone, PartialEq)]
pub struct Literal {
    pub text: String,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Action {
    pub pipeline: Pipeline,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Conditional {
    /// `if` and `else if` branches, in order.
    pub branches: Vec<(Pipeline, Vec<TemplateNode>)>,
    pub else_branch: Option<Vec<TemplateNode>>,
    pub span: Span,
}

/// Commands separated by `|`.
///
/// The result of each command is passed as the final argument of the next.
#[derive(Debug, Clone, PartialEq)]
pub struct Pipeline {
    pub commands: Vec<Expr>,
    pub span: Span,
}

/// An operand or a function call.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A string, number, boolean or `nil` constant.
    Constant(Value, Span),

    /// A function call. Bare identifiers in argument position are calls
    /// with no arguments.
    Call(Call),

    /// A parenthesized pipeline.
    Pipeline(Box<Pipeline>),
}

impl Expr {
    pub fn span(&self) -> Span {
        match self {
            Expr::Constant(_, span) => *span,
            Expr::Call(call) => call.span,
            Expr::Pipeline(pipeline) => pipeline.span,
        }
    }

    /// The string value of a constant string operand.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Expr::Constant(Value::String(s), _) => Some(s),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub name: String,
    pub args: Vec<Expr>,
    pub span: Span,
}

/// A function call found in a template, as reported by
/// [`Template::function_calls`](crate::Template::function_calls).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FunctionCall<'a> {
    pub name: &'a str,
    /// The first argument, when it is a string constant.
    pub first_arg: Option<&'a str>,
}

pub(crate) fn collect_calls<'a>(nodes: &'a [TemplateNode], out: &mut Vec<FunctionCall<'a>>) {
    for node in nodes {
        match node {
            TemplateNode::Action(action) => collect_pipeline_calls(&action.pipeline, out),
            TemplateNode::Conditional(conditional) => {
                for (condition, body) in &conditional.branches {
                    collect_pipeline_calls(condition, out);
                    collect_calls(body, out);
                }
                if let Some(body) = &conditional.else_branch {
                    collect_calls(body, out);
                }
            }
            TemplateNode::Literal(_) | TemplateNode::Comment(_) => {}
        }
    }
}

fn collect_pipeline_calls<'a>(pipeline: &'a Pipeline, out: &mut Vec<FunctionCall<'a>>) {
    for command in &pipeline.commands {
        collect_expr_calls(command, out);
    }
}

fn collect_expr_calls<'a>(expr: &'a Expr, out: &mut Vec<FunctionCall<'a>>) {
    match expr {
        Expr::Constant(..) => {}
        Expr::Call(call) => {
            out.push(FunctionCall {
                name: &call.name,
                first_arg: call.args.first().and_then(Expr::as_str),
            });
            for arg in &call.args {
                collect_expr_calls(arg, out);
            }
        }
        Expr::Pipeline(pipeline) => collect_pipeline_calls(pipeline, out),
    }
}
