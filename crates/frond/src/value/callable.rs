//! Callable value capabilities
//!
//! Host functions and directives come in through the [`FunctionValue`] and
//! [`DirectiveValue`] traits; macros and functions defined inside a
//! template become [`MacroValue`]s bound into the namespace.

use crate::ast::{Block, Expr};
use crate::context::EvalContext;
use crate::environment::Environment;
use crate::error::Result;
use crate::value::Value;

/// Evaluated positional and named arguments of a call site.
#[derive(Debug, Clone, Default)]
pub struct CallArgs {
    /// Arguments given by position, in source order
    pub positional: Vec<Value>,
    /// Arguments given by name, in source order
    pub named: Vec<(String, Value)>,
}

impl CallArgs {
    /// Look up a named argument.
    pub fn named(&self, name: &str) -> Option<&Value> {
        self.named
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }
}

/// Host-function capability: positional+named arguments in, one value out.
pub trait FunctionValue: std::fmt::Debug + Send + Sync {
    /// Name used in error messages.
    fn name(&self) -> &str {
        "host function"
    }

    /// Invoke the function.
    fn call(&self, args: CallArgs) -> Result<Value>;
}

/// Host-directive capability: like a function, but writes to the output
/// sink through the environment and may receive nested content.
pub trait DirectiveValue: std::fmt::Debug + Send + Sync {
    /// Name used in error messages.
    fn name(&self) -> &str {
        "host directive"
    }

    /// Execute the directive. `body` is the nested content block from the
    /// call site, if any; run it with [`crate::exec::execute_block`].
    fn execute(
        &self,
        args: CallArgs,
        body: Option<&Block>,
        env: &mut Environment,
        ctx: &EvalContext,
    ) -> Result<()>;
}

/// Whether a template-defined callable is a macro (writes output) or a
/// function (returns a value through `#return`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MacroKind {
    /// `<#macro ...>`: executed for its output
    Macro,
    /// `<#function ...>`: executed for its `#return` value, output
    /// discarded
    Function,
}

/// One declared parameter of a macro or function.
#[derive(Debug, Clone, PartialEq)]
pub struct MacroParam {
    /// Parameter name
    pub name: String,
    /// Default value expression; parameters without one are required
    pub default: Option<Expr>,
}

/// A macro or function defined by a `<#macro>`/`<#function>` directive.
///
/// Immutable once constructed; shared between the namespace binding and
/// any number of call sites.
#[derive(Debug)]
pub struct MacroValue {
    /// Declared name
    pub name: String,
    /// Declared parameters, in source order
    pub params: Vec<MacroParam>,
    /// The body block
    pub body: Block,
    /// Macro or function
    pub kind: MacroKind,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Number;

    #[test]
    fn test_call_args_named_lookup() {
        let args = CallArgs {
            positional: vec![],
            named: vec![
                ("a".to_string(), Value::Number(Number::Int(1))),
                ("b".to_string(), Value::Bool(true)),
            ],
        };
        assert!(matches!(args.named("b"), Some(Value::Bool(true))));
        assert!(args.named("c").is_none());
    }

    #[test]
    fn test_macro_def_nodes_compare_structurally() {
        use crate::ast::{Node, NodeKind};

        let def = || NodeKind::MacroDef {
            name: "greet".to_string(),
            params: vec![MacroParam {
                name: "who".to_string(),
                default: Some(Expr::str("world")),
            }],
            kind: MacroKind::Macro,
            body: Block::new(vec![Node::text("hi")]),
        };
        assert_eq!(def(), def());

        let no_default = NodeKind::MacroDef {
            name: "greet".to_string(),
            params: vec![MacroParam {
                name: "who".to_string(),
                default: None,
            }],
            kind: MacroKind::Macro,
            body: Block::new(vec![Node::text("hi")]),
        };
        assert_ne!(def(), no_default);
    }
}
