/*
 * parser.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Template parser.
//!
//! Parsing happens in two passes. The scanner splits the source into
//! literal text and action bodies delimited by `{{repl`/`repl{{` and `}}`;
//! each action body is tokenized and parsed into a pipeline or a control
//! keyword. The block pass then folds `if`/`else`/`end` actions into
//! [`Conditional`] nodes.

use std::path::Path;

use crate::ast::{
    Action, Call, Conditional, Expr, FunctionCall, Literal, Pipeline, Span, TemplateNode,
    collect_calls,
};
use crate::error::{TemplateError, TemplateResult};
use crate::value::Value;

/// Opening delimiters. `repl{{` is an alias of `{{repl`.
pub const OPEN_DELIMITERS: [&str; 2] = ["{{repl", "repl{{"];

pub const CLOSE_DELIMITER: &str = "}}";

/// A compiled template ready for evaluation.
#[derive(Debug, Clone)]
pub struct Template {
    /// The parsed template AST.
    pub(crate) nodes: Vec<TemplateNode>,

    /// Source text the template was compiled from.
    pub(crate) source: String,
}

impl Template {
    /// Parse template source text.
    pub fn compile(source: &str) -> TemplateResult<Self> {
        let mut segments = scan(source)?.into_iter();
        let (nodes, end) = parse_nodes(&mut segments)?;
        match end {
            BlockEnd::Eof => Ok(Template {
                nodes,
                source: source.to_string(),
            }),
            BlockEnd::End(span) => Err(TemplateError::parse("unexpected {{end}}", span.start)),
            BlockEnd::Else(span) | BlockEnd::ElseIf(_, span) => {
                Err(TemplateError::parse("unexpected {{else}}", span.start))
            }
        }
    }

    /// Read and parse a template file.
    pub fn compile_from_file(path: &Path) -> TemplateResult<Self> {
        let source = std::fs::read_to_string(path).map_err(|e| TemplateError::IoError {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::compile(&source)
    }

    pub fn nodes(&self) -> &[TemplateNode] {
        &self.nodes
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// True when the template contains anything besides literal text.
    pub fn has_actions(&self) -> bool {
        self.nodes
            .iter()
            .any(|node| !matches!(node, TemplateNode::Literal(_)))
    }

    /// Every function call in the template, in source order, including
    /// calls nested in arguments and inside conditional branches.
    pub fn function_calls(&self) -> Vec<FunctionCall<'_>> {
        let mut calls = Vec::new();
        collect_calls(&self.nodes, &mut calls);
        calls
    }
}

// ============================================================================
// Scanner
// ============================================================================

enum Segment {
    Text(Literal),
    Action(ActionKind, Span),
}

enum ActionKind {
    Pipeline(Pipeline),
    If(Pipeline),
    ElseIf(Pipeline),
    Else,
    End,
    Comment,
}

fn scan(source: &str) -> TemplateResult<Vec<Segment>> {
    let mut segments = Vec::new();
    let mut pos = 0;

    while let Some((open, delimiter)) = find_open(source, pos) {
        if open > pos {
            segments.push(Segment::Text(Literal {
                text: source[pos..open].to_string(),
                span: Span::new(pos, open),
            }));
        }

        let body_start = open + delimiter.len();
        let close = find_close(source, body_start)
            .ok_or_else(|| TemplateError::parse("unclosed action", open))?;
        let kind = parse_action(&source[body_start..close], body_start)?;
        let end = close + CLOSE_DELIMITER.len();
        segments.push(Segment::Action(kind, Span::new(open, end)));
        pos = end;
    }

    if pos < source.len() {
        segments.push(Segment::Text(Literal {
            text: source[pos..].to_string(),
            span: Span::new(pos, source.len()),
        }));
    }
    Ok(segments)
}

fn find_open(source: &str, from: usize) -> Option<(usize, &'static str)> {
    OPEN_DELIMITERS
        .iter()
        .filter_map(|delimiter| {
            source[from..]
                .find(delimiter)
                .map(|offset| (from + offset, *delimiter))
        })
        .min_by_key(|(offset, _)| *offset)
}

/// Find the closing delimiter, skipping over quoted strings.
fn find_close(source: &str, from: usize) -> Option<usize> {
    let bytes = source.as_bytes();
    let mut quote: Option<u8> = None;
    let mut i = from;
    while i < bytes.len() {
        let b = bytes[i];
        match quote {
            Some(b'"') if b == b'\\' => {
                i += 2;
                continue;
            }
            Some(q) if b == q => quote = None,
            Some(_) => {}
            None if b == b'"' || b == b'`' => quote = Some(b),
            None if bytes[i..].starts_with(CLOSE_DELIMITER.as_bytes()) => return Some(i),
            None => {}
        }
        i += 1;
    }
    None
}

// ============================================================================
// Block structure
// ============================================================================

/// How a run of nodes ended.
enum BlockEnd {
    Eof,
    ElseIf(Pipeline, Span),
    Else(Span),
    End(Span),
}

fn parse_nodes(
    segments: &mut std::vec::IntoIter<Segment>,
) -> TemplateResult<(Vec<TemplateNode>, BlockEnd)> {
    let mut nodes = Vec::new();
    while let Some(segment) = segments.next() {
        match segment {
            Segment::Text(literal) => nodes.push(TemplateNode::Literal(literal)),
            Segment::Action(kind, span) => match kind {
                ActionKind::Pipeline(pipeline) => {
                    nodes.push(TemplateNode::Action(Action { pipeline, span }))
                }
                ActionKind::Comment => nodes.push(TemplateNode::Comment(span)),
                ActionKind::If(condition) => {
                    let conditional = parse_conditional(condition, span, segments)?;
                    nodes.push(TemplateNode::Conditional(conditional));
                }
                ActionKind::ElseIf(condition) => {
                    return Ok((nodes, BlockEnd::ElseIf(condition, span)));
                }
                ActionKind::Else => return Ok((nodes, BlockEnd::Else(span))),
                ActionKind::End => return Ok((nodes, BlockEnd::End(span))),
            },
        }
    }
    Ok((nodes, BlockEnd::Eof))
}

fn parse_conditional(
    first: Pipeline,
    start: Span,
    segments: &mut std::vec::IntoIter<Segment>,
) -> TemplateResult<Conditional> {
    let unclosed = || TemplateError::parse("unclosed if: missing {{repl end}}", start.start);
    let mut branches = Vec::new();
    let mut condition = first;

    loop {
        let (body, end) = parse_nodes(segments)?;
        branches.push((condition, body));
        match end {
            BlockEnd::ElseIf(next, _) => condition = next,
            BlockEnd::Else(_) => {
                let (else_body, end) = parse_nodes(segments)?;
                return match end {
                    BlockEnd::End(end_span) => Ok(Conditional {
                        branches,
                        else_branch: Some(else_body),
                        span: Span::new(start.start, end_span.end),
                    }),
                    BlockEnd::Else(span) | BlockEnd::ElseIf(_, span) => Err(
                        TemplateError::parse("expected {{end}} after {{else}}", span.start),
                    ),
                    BlockEnd::Eof => Err(unclosed()),
                };
            }
            BlockEnd::End(end_span) => {
                return Ok(Conditional {
                    branches,
                    else_branch: None,
                    span: Span::new(start.start, end_span.end),
                });
            }
            BlockEnd::Eof => return Err(unclosed()),
        }
    }
}

// ============================================================================
// Action bodies
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Ident(String),
    Str(String),
    Number(Value),
    LParen,
    RParen,
    Pipe,
}

impl Token {
    fn describe(&self) -> String {
        match self {
            Token::Ident(name) => format!("identifier {:?}", name),
            Token::Str(s) => format!("string {:?}", s),
            Token::Number(n) => format!("number {}", n),
            Token::LParen => "\"(\"".to_string(),
            Token::RParen => "\")\"".to_string(),
            Token::Pipe => "\"|\"".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
struct Lexeme {
    token: Token,
    span: Span,
}

fn parse_action(body: &str, base: usize) -> TemplateResult<ActionKind> {
    let trimmed = body.trim();
    if trimmed.starts_with("/*") {
        return if trimmed.len() >= 4 && trimmed.ends_with("*/") {
            Ok(ActionKind::Comment)
        } else {
            Err(TemplateError::parse("unclosed comment", base))
        };
    }

    let mut parser = TokenParser {
        tokens: tokenize(body, base)?,
        pos: 0,
        end: base + body.len(),
    };

    let kind = match parser.peek_keyword() {
        Some("if") => {
            parser.pos += 1;
            ActionKind::If(parser.parse_pipeline()?)
        }
        Some("else") => {
            parser.pos += 1;
            if parser.peek_keyword() == Some("if") {
                parser.pos += 1;
                ActionKind::ElseIf(parser.parse_pipeline()?)
            } else {
                ActionKind::Else
            }
        }
        Some("end") => {
            parser.pos += 1;
            ActionKind::End
        }
        Some(keyword) => {
            return Err(TemplateError::parse(
                format!("{:?} actions are not supported", keyword),
                parser.offset(),
            ));
        }
        None => ActionKind::Pipeline(parser.parse_pipeline()?),
    };
    parser.expect_end()?;
    Ok(kind)
}

fn tokenize(body: &str, base: usize) -> TemplateResult<Vec<Lexeme>> {
    let mut tokens = Vec::new();
    let mut i = 0;

    while let Some(c) = body[i..].chars().next() {
        let start = base + i;
        let single = |token| Lexeme {
            token,
            span: Span::new(start, start + 1),
        };

        match c {
            c if c.is_whitespace() => {
                i += c.len_utf8();
            }
            '(' => {
                tokens.push(single(Token::LParen));
                i += 1;
            }
            ')' => {
                tokens.push(single(Token::RParen));
                i += 1;
            }
            '|' => {
                tokens.push(single(Token::Pipe));
                i += 1;
            }
            '"' => {
                let (text, len) = lex_quoted(&body[i..], start)?;
                tokens.push(Lexeme {
                    token: Token::Str(text),
                    span: Span::new(start, start + len),
                });
                i += len;
            }
            '`' => {
                let close = body[i + 1..]
                    .find('`')
                    .ok_or_else(|| TemplateError::parse("unterminated raw quoted string", start))?;
                let text = &body[i + 1..i + 1 + close];
                let len = close + 2;
                tokens.push(Lexeme {
                    token: Token::Str(text.to_string()),
                    span: Span::new(start, start + len),
                });
                i += len;
            }
            c if c.is_ascii_digit() || starts_signed_number(&body[i..]) => {
                let (value, len) = lex_number(&body[i..], start)?;
                tokens.push(Lexeme {
                    token: Token::Number(value),
                    span: Span::new(start, start + len),
                });
                i += len;
            }
            c if c.is_alphabetic() || c == '_' => {
                let len = body[i..]
                    .find(|c: char| !(c.is_alphanumeric() || c == '_'))
                    .unwrap_or(body.len() - i);
                tokens.push(Lexeme {
                    token: Token::Ident(body[i..i + len].to_string()),
                    span: Span::new(start, start + len),
                });
                i += len;
            }
            '$' => {
                return Err(TemplateError::parse("template variables are not supported", start));
            }
            '.' => {
                return Err(TemplateError::parse("field access is not supported", start));
            }
            other => {
                return Err(TemplateError::parse(
                    format!("unexpected {:?} in action", other),
                    start,
                ));
            }
        }
    }
    Ok(tokens)
}

fn starts_signed_number(s: &str) -> bool {
    let mut chars = s.chars();
    matches!(chars.next(), Some('-' | '+')) && chars.next().is_some_and(|c| c.is_ascii_digit())
}

/// Lex a double-quoted string starting at the opening quote.
/// Returns the unescaped text and the byte length consumed.
fn lex_quoted(s: &str, offset: usize) -> TemplateResult<(String, usize)> {
    let mut text = String::new();
    let mut chars = s.char_indices().skip(1);
    while let Some((i, c)) = chars.next() {
        match c {
            '"' => return Ok((text, i + 1)),
            '\\' => {
                let escaped = match chars.next() {
                    Some((_, 'n')) => '\n',
                    Some((_, 't')) => '\t',
                    Some((_, 'r')) => '\r',
                    Some((_, '\\')) => '\\',
                    Some((_, '"')) => '"',
                    Some((_, '\'')) => '\'',
                    Some((j, other)) => {
                        return Err(TemplateError::parse(
                            format!("unknown escape sequence \\{}", other),
                            offset + j,
                        ));
                    }
                    None => break,
                };
                text.push(escaped);
            }
            '\n' => break,
            c => text.push(c),
        }
    }
    Err(TemplateError::parse("unterminated quoted string", offset))
}

fn lex_number(s: &str, offset: usize) -> TemplateResult<(Value, usize)> {
    let bytes = s.as_bytes();
    let mut len = 0;
    let mut is_float = false;

    if matches!(bytes.first(), Some(b'-' | b'+')) {
        len += 1;
    }
    while len < bytes.len() && bytes[len].is_ascii_digit() {
        len += 1;
    }
    if len < bytes.len() && bytes[len] == b'.' {
        is_float = true;
        len += 1;
        while len < bytes.len() && bytes[len].is_ascii_digit() {
            len += 1;
        }
    }
    if len < bytes.len() && matches!(bytes[len], b'e' | b'E') {
        is_float = true;
        len += 1;
        if len < bytes.len() && matches!(bytes[len], b'-' | b'+') {
            len += 1;
        }
        while len < bytes.len() && bytes[len].is_ascii_digit() {
            len += 1;
        }
    }

    let text = &s[..len];
    let bad_number = || TemplateError::parse(format!("bad number syntax: {:?}", text), offset);
    if s[len..]
        .chars()
        .next()
        .is_some_and(|c| c.is_alphanumeric() || c == '_' || c == '.')
    {
        return Err(bad_number());
    }

    let value = if is_float {
        Value::Float(text.parse::<f64>().map_err(|_| bad_number())?)
    } else {
        Value::Int(text.parse::<i64>().map_err(|_| bad_number())?)
    };
    Ok((value, len))
}

struct TokenParser {
    tokens: Vec<Lexeme>,
    pos: usize,
    /// Offset just past the action body, for errors at end of input.
    end: usize,
}

impl TokenParser {
    fn peek(&self) -> Option<&Lexeme> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Lexeme> {
        let lexeme = self.tokens.get(self.pos).cloned();
        if lexeme.is_some() {
            self.pos += 1;
        }
        lexeme
    }

    fn offset(&self) -> usize {
        self.peek().map_or(self.end, |lexeme| lexeme.span.start)
    }

    fn peek_keyword(&self) -> Option<&'static str> {
        match &self.peek()?.token {
            Token::Ident(name) => match name.as_str() {
                "if" => Some("if"),
                "else" => Some("else"),
                "end" => Some("end"),
                "range" => Some("range"),
                "with" => Some("with"),
                "define" => Some("define"),
                "template" => Some("template"),
                "block" => Some("block"),
                _ => None,
            },
            _ => None,
        }
    }

    fn expect_end(&self) -> TemplateResult<()> {
        match self.peek() {
            Some(lexeme) => Err(TemplateError::parse(
                format!("unexpected {} in action", lexeme.token.describe()),
                lexeme.span.start,
            )),
            None => Ok(()),
        }
    }

    fn parse_pipeline(&mut self) -> TemplateResult<Pipeline> {
        let start = self.offset();
        let mut commands = vec![self.parse_command()?];
        while matches!(self.peek().map(|l| &l.token), Some(Token::Pipe)) {
            self.pos += 1;
            commands.push(self.parse_command()?);
        }
        let end = commands.last().map_or(start, |c| c.span().end);
        Ok(Pipeline {
            commands,
            span: Span::new(start, end),
        })
    }

    fn parse_command(&mut self) -> TemplateResult<Expr> {
        let start = self.offset();
        let mut operands = Vec::new();
        while let Some(lexeme) = self.peek() {
            if matches!(lexeme.token, Token::Pipe | Token::RParen) {
                break;
            }
            operands.push(self.parse_operand()?);
        }

        let mut operands = operands.into_iter();
        let Some(first) = operands.next() else {
            return Err(TemplateError::parse("missing value for command", start));
        };
        let rest: Vec<Expr> = operands.collect();

        match first {
            // An identifier heads the command: the other operands are its arguments.
            Expr::Call(mut call) if call.args.is_empty() => {
                if let Some(last) = rest.last() {
                    call.span.end = last.span().end;
                }
                call.args = rest;
                Ok(Expr::Call(call))
            }
            other if rest.is_empty() => Ok(other),
            other => Err(TemplateError::parse(
                "can't give argument to non-function",
                other.span().start,
            )),
        }
    }

    fn parse_operand(&mut self) -> TemplateResult<Expr> {
        let Some(lexeme) = self.next() else {
            return Err(TemplateError::parse("missing value for command", self.end));
        };
        let span = lexeme.span;

        match lexeme.token {
            Token::Str(text) => Ok(Expr::Constant(Value::String(text), span)),
            Token::Number(value) => Ok(Expr::Constant(value, span)),
            Token::Ident(name) => {
                let constant = match name.as_str() {
                    "true" => Some(Value::Bool(true)),
                    "false" => Some(Value::Bool(false)),
                    "nil" => Some(Value::Null),
                    _ => None,
                };
                Ok(match constant {
                    Some(value) => Expr::Constant(value, span),
                    None => Expr::Call(Call {
                        name,
                        args: Vec::new(),
                        span,
                    }),
                })
            }
            Token::LParen => {
                let mut pipeline = self.parse_pipeline()?;
                match self.next() {
                    Some(Lexeme {
                        token: Token::RParen,
                        span: close,
                    }) => {
                        pipeline.span = Span::new(span.start, close.end);
                        Ok(Expr::Pipeline(Box::new(pipeline)))
                    }
                    Some(other) => Err(TemplateError::parse(
                        format!("unexpected {} in operand", other.token.describe()),
                        other.span.start,
                    )),
                    None => Err(TemplateError::parse("unclosed left paren", span.start)),
                }
            }
            Token::RParen => Err(TemplateError::parse("unexpected right paren", span.start)),
            Token::Pipe => Err(TemplateError::parse("missing value for command", span.start)),
        }
    }
}
