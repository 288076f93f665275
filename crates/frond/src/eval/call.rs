//! Function-call expressions
//!
//! `f(args)` accepts a host function or a template-defined `#function`.
//! Macros are directive-side callables; calling one inside an expression
//! is an error that names the right syntax.

use crate::ast::Expr;
use crate::context::EvalContext;
use crate::environment::Environment;
use crate::error::EvalError;
use crate::exec;
use crate::value::{CallArgs, MacroKind, Value};
use crate::Result;

use super::Evaluate;

pub(super) fn eval(
    target: &Expr,
    positional: &[Expr],
    named: &[(String, Expr)],
    env: &mut Environment,
    ctx: &EvalContext,
) -> Result<Value> {
    let callee = target.eval(env, ctx)?;
    let args = eval_args(positional, named, env, ctx)?;
    match &callee {
        Value::Function(function) => function.call(args),
        Value::Macro(def) if def.kind == MacroKind::Function => {
            exec::call_function(def.clone(), args, env, ctx)
        }
        Value::Macro(def) => Err(EvalError::Uncallable {
            actual: format!(
                "macro {} (macros are called as directives, with <@{}.../>)",
                def.name, def.name
            ),
            location: None,
        }),
        other => Err(EvalError::Uncallable {
            actual: other.type_name(),
            location: None,
        }),
    }
}

pub(crate) fn eval_args(
    positional: &[Expr],
    named: &[(String, Expr)],
    env: &mut Environment,
    ctx: &EvalContext,
) -> Result<CallArgs> {
    let mut args = CallArgs::default();
    for arg in positional {
        args.positional.push(arg.eval(env, ctx)?);
    }
    for (name, arg) in named {
        args.named.push((name.clone(), arg.eval(env, ctx)?));
    }
    Ok(args)
}
