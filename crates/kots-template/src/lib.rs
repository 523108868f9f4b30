/*
 * lib.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Template engine for kots `{{repl ...}}` directives.
//!
//! Only actions opened with `{{repl` or `repl{{` are evaluated; anything
//! else, including plain `{{ ... }}`, passes through untouched so Helm and
//! other templating layered on top of the same text is preserved.
//!
//! # Syntax
//!
//! - Function calls: `{{repl ConfigOption "hostname"}}`
//! - Pipelines: `{{repl ConfigOption "name" | ToUpper}}`, where each command
//!   receives the previous result as its last argument
//! - Nested calls: `{{repl or (ConfigOptionEquals "a" "1") (ConfigOptionEquals "b" "1")}}`
//! - Conditionals: `{{repl if ...}}...{{repl else if ...}}...{{repl else}}...{{repl end}}`
//! - Comments: `{{repl /* comment */}}`
//! - Constants: `"strings"`, `` `raw strings` ``, numbers, `true`, `false`, `nil`
//!
//! # Functions
//!
//! Functions come from the [`FunctionContext`]s registered on a [`Builder`].
//! [`StaticContext`] provides stateless helpers (`Now`, `ToUpper`,
//! `Base64Encode`, `Add`, ...); callers add their own contexts for
//! application state. The builtins `and`, `or`, `not`, `eq`, `ne`, `lt`,
//! `le`, `gt`, `ge`, `len`, `index`, `print`, `printf` and `println` are
//! always available.
//!
//! # Example
//!
//! ```
//! use kots_template::{Builder, FunctionContext, TemplateResult, Value};
//!
//! struct Hostname;
//!
//! impl FunctionContext for Hostname {
//!     fn call(&self, name: &str, _args: &[Value]) -> Option<TemplateResult<Value>> {
//!         (name == "Hostname").then(|| Ok(Value::from("example.com")))
//!     }
//! }
//!
//! let builder = Builder::new().with_context(Hostname);
//! let output = builder.render("url: https://{{repl Hostname | ToUpper}}").unwrap();
//! assert_eq!(output, "url: https://EXAMPLE.COM");
//! ```

pub mod ast;
pub mod builder;
pub mod error;
mod evaluator;
pub mod functions;
pub mod parser;
pub mod value;

pub use ast::FunctionCall;
pub use builder::Builder;
pub use error::{TemplateError, TemplateResult};
pub use functions::{Args, FunctionContext, StaticContext};
pub use parser::Template;
pub use value::Value;
