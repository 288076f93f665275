//! # Frond
//!
//! A tree-walking evaluation core for a directive/expression template
//! language, in the FreeMarker tradition.
//!
//! Frond takes an already-parsed template tree of directives and
//! expressions, validates its structure, folds its constant
//! subexpressions, and processes it against a data model into rendered
//! text. Expression evaluation, directive execution, scoping, output
//! capture, and auto-escaping all live here; lexing and parsing are a
//! front end's job.
//!
//! ## Architecture
//!
//! - **AST** ([`ast`]): expression and directive trees with spans,
//!   canonical source forms, validation, and constant folding
//! - **Values** ([`value`]): the capability-based runtime value model
//! - **Evaluation** ([`eval`]): expressions to values
//! - **Execution** ([`exec`]): directives to output and control flow
//! - **Environment** ([`environment`]): scopes, sinks, loops, calls
//!
//! ## Example
//!
//! ```
//! use frond::ast::{Block, Expr, Node};
//! use frond::{EvalContext, Template, Value};
//!
//! let root = Block::new(vec![
//!     Node::text("Hello "),
//!     Node::interpolation(Expr::var("name")),
//!     Node::text("!"),
//! ]);
//! let ctx = EvalContext::default();
//! let template = Template::new("greeting", root, &ctx).unwrap();
//! let data = Value::hash(vec![("name".to_string(), Value::str("World"))]);
//! let out = template.process(data, &ctx).unwrap();
//! assert_eq!(out, "Hello World!");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod arith;
pub mod ast;
pub mod coerce;
pub mod compare;
pub mod context;
pub mod environment;
pub mod error;
pub mod eval;
pub mod exec;
pub mod format;
pub mod output;
pub mod settings;
pub mod template;
pub mod value;

// Re-export main types
pub use arith::{ArithmeticEngine, ArithmeticError, DefaultArithmeticEngine};
pub use context::{EvalContext, VERSION};
pub use environment::Environment;
pub use error::{EvalError, ParseError, Result, SourceLocation};
pub use eval::{eval_expr, eval_to_bool, Evaluate};
pub use exec::{execute_block, Execute, Flow};
pub use output::{HtmlFormat, Markup, OutputFormat, PlainTextFormat};
pub use settings::{RuntimeSettings, SettingKey};
pub use template::Template;
pub use value::{
    CallArgs, CollectionValue, DateKind, DateValue, DirectiveValue, FunctionValue, MacroKind,
    MacroParam, MacroValue, Number, ObjectValue, RangeValue, Value,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_exists() {
        assert!(!VERSION.is_empty());
    }
}
