//! Per-invocation interpreter state
//!
//! One [`Environment`] per `process` call, never shared. The state is
//! split by concern: variable scopes, output sinks, running loops, and
//! calls in progress each live in their own sub-structure with their own
//! invariants, and the environment itself is just their meeting point
//! plus a few scalar flags.

mod iter;
mod macro_ctx;
mod output;
mod scope;

pub use iter::{IterationContext, IterationContextStack};
pub use macro_ctx::{MacroCallStack, MacroInvocation};
pub use output::OutputState;
pub use scope::ScopeStack;

use std::sync::Arc;

use crate::ast::Span;
use crate::context::EvalContext;
use crate::error::{EvalError, SourceLocation};
use crate::settings::RuntimeSettings;
use crate::value::Value;
use crate::Result;

/// The mutable state of one template invocation.
#[derive(Debug)]
pub struct Environment {
    name: Arc<str>,

    /// Variable scopes
    pub scopes: ScopeStack,

    /// Output sinks
    pub out: OutputState,

    /// Running loops
    pub iterations: IterationContextStack,

    /// Macro and function calls in progress
    pub calls: MacroCallStack,

    /// This invocation's runtime settings, mutated by `#setting`
    pub settings: RuntimeSettings,

    /// While set, invalid-reference errors skip building their detailed
    /// message; the existence operators use this for subtrees whose
    /// failure they are about to absorb anyway
    pub fast_invalid_reference: bool,

    /// Message of the last evaluation error this invocation observed,
    /// reported by the `.error` special variable
    pub last_error: Option<String>,
}

impl Environment {
    /// State for one invocation of the named template.
    pub fn new(name: impl Into<Arc<str>>, data_model: Value, ctx: &EvalContext) -> Self {
        Environment {
            name: name.into(),
            scopes: ScopeStack::new(data_model),
            out: OutputState::new(),
            iterations: IterationContextStack::default(),
            calls: MacroCallStack::default(),
            settings: ctx.settings.clone(),
            fast_invalid_reference: false,
            last_error: None,
        }
    }

    /// The template name.
    pub fn template_name(&self) -> &Arc<str> {
        &self.name
    }

    /// Resolve a bare identifier: visible loop variables first, then the
    /// scope chain.
    pub fn lookup(&self, name: &str) -> Option<Value> {
        if let Some(iteration) = self.iterations.find_visible(name) {
            return Some(iteration.value.clone());
        }
        self.scopes.lookup(name)
    }

    /// A source location in this template.
    pub fn location(&self, span: Span) -> SourceLocation {
        SourceLocation {
            template: Arc::clone(&self.name),
            span,
        }
    }

    /// Poll the shared interrupt flag.
    pub fn check_interrupt(&self, ctx: &EvalContext) -> Result<()> {
        if ctx.interrupt_requested() {
            return Err(EvalError::Interrupted);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loop_variable_shadows_scopes() {
        let ctx = EvalContext::default();
        let data = Value::hash(vec![("x".to_string(), Value::int(1))]);
        let mut env = Environment::new("t", data, &ctx);
        assert_eq!(env.lookup("x"), Some(Value::int(1)));

        env.iterations.push(Some("x".to_string()), None);
        env.iterations.top_mut().unwrap().value = Value::int(99);
        assert_eq!(env.lookup("x"), Some(Value::int(99)));

        env.iterations.pop();
        assert_eq!(env.lookup("x"), Some(Value::int(1)));
    }

    #[test]
    fn test_interrupt_polling() {
        let ctx = EvalContext::default();
        let env = Environment::new("t", Value::empty_hash(), &ctx);
        assert!(env.check_interrupt(&ctx).is_ok());
        ctx.request_interrupt();
        assert!(matches!(
            env.check_interrupt(&ctx),
            Err(EvalError::Interrupted)
        ));
    }
}
