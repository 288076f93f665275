//! The existence operators `??` and `!`
//!
//! Two protection shapes, on purpose. A bare operand protects only its
//! own final lookup step: `a.b??` still fails when `a` itself is missing.
//! A parenthesized operand protects the whole subtree: `(a.b)??` absorbs
//! any invalid reference inside, evaluated with the fast flag so the
//! absorbed errors never build their detailed messages. The flag is
//! restored on every path.

use crate::ast::{Expr, ExprKind};
use crate::context::EvalContext;
use crate::environment::Environment;
use crate::value::Value;
use crate::Result;

use super::Evaluate;

pub(super) fn eval_exists(
    target: &Expr,
    env: &mut Environment,
    ctx: &EvalContext,
) -> Result<Value> {
    Ok(Value::Bool(eval_optional(target, env, ctx)?.is_some()))
}

pub(super) fn eval_default(
    target: &Expr,
    fallback: Option<&Expr>,
    env: &mut Environment,
    ctx: &EvalContext,
) -> Result<Value> {
    match eval_optional(target, env, ctx)? {
        Some(value) => Ok(value),
        None => match fallback {
            Some(fallback) => fallback.eval(env, ctx),
            None => Ok(Value::Nothing),
        },
    }
}

/// Evaluate an existence-operator operand to "present" or "missing".
pub(super) fn eval_optional(
    target: &Expr,
    env: &mut Environment,
    ctx: &EvalContext,
) -> Result<Option<Value>> {
    match &target.kind {
        // Whole-subtree protection for a parenthesized operand.
        ExprKind::Paren(inner) => eval_protected(inner, env, ctx),

        // Bare operands: only the final lookup step is protected; errors
        // in the steps before it propagate.
        ExprKind::Var(name) => Ok(env.lookup(name)),
        ExprKind::Dot { target: inner, key } => {
            let container = inner.eval(env, ctx)?;
            if !container.is_hash() {
                return Ok(None);
            }
            Ok(container.get_key(key))
        }
        ExprKind::Index { target: inner, key } => {
            let container = inner.eval(env, ctx)?;
            let key_value = key.eval(env, ctx)?;
            if let Some(n) = key_value.as_number() {
                let Some(index) = n.as_index().filter(|i| *i >= 0) else {
                    return Ok(None);
                };
                return Ok(container.get_index(index as usize));
            }
            match key_value.as_string() {
                Some(key_text) => Ok(container.get_key(&key_text)),
                None => Ok(None),
            }
        }

        // Anything else is evaluated normally; whatever it produces is
        // "present", and its errors are its own.
        _ => target.eval(env, ctx).map(Some),
    }
}

fn eval_protected(
    expr: &Expr,
    env: &mut Environment,
    ctx: &EvalContext,
) -> Result<Option<Value>> {
    let saved = env.fast_invalid_reference;
    env.fast_invalid_reference = true;
    let result = expr.eval(env, ctx);
    env.fast_invalid_reference = saved;
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.is_invalid_reference() => Ok(None),
        Err(e) => Err(e),
    }
}
