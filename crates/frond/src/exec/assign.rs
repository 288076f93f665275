//! The assignment directives: `#assign`, `#global`, `#local`
//!
//! Both the expression form and the capturing block form. The captured
//! block output becomes markup when auto-escaping is on, so writing the
//! variable back out later does not escape it twice.

use std::sync::Arc;

use crate::ast::{AssignScope, Block, Expr};
use crate::context::EvalContext;
use crate::environment::Environment;
use crate::error::EvalError;
use crate::eval::Evaluate;
use crate::output::Markup;
use crate::value::Value;
use crate::Result;

use super::{execute_block, Flow};

pub(super) fn execute_assign(
    scope: AssignScope,
    name: &str,
    value: &Expr,
    env: &mut Environment,
    ctx: &EvalContext,
) -> Result<Flow> {
    let value = value.eval(env, ctx)?;
    store(scope, name, value, env)?;
    Ok(Flow::Normal)
}

pub(super) fn execute_assign_block(
    scope: AssignScope,
    name: &str,
    body: &Block,
    env: &mut Environment,
    ctx: &EvalContext,
) -> Result<Flow> {
    env.out.push_capture();
    let result = execute_block(body, env, ctx);
    let captured = env.out.pop_capture();
    let flow = result?;
    let captured = captured.ok_or_else(|| EvalError::Internal {
        message: "capture sink vanished under a capturing assignment".to_string(),
    })?;
    let value = if ctx.auto_escaping {
        Value::Markup(Markup::from_markup(Arc::clone(&ctx.output_format), captured))
    } else {
        Value::str(captured)
    };
    store(scope, name, value, env)?;
    Ok(flow)
}

fn store(scope: AssignScope, name: &str, value: Value, env: &mut Environment) -> Result<()> {
    match scope {
        AssignScope::Namespace => env.scopes.set_namespace(name, value),
        AssignScope::Global => env.scopes.set_global(name, value),
        AssignScope::Local => {
            if !env.scopes.set_local(name, value) {
                return Err(EvalError::Internal {
                    message: "#local outside a macro or function body".to_string(),
                });
            }
        }
    }
    Ok(())
}
