//! Expression evaluation
//!
//! One submodule per expression family; `Evaluate` on [`Expr`] dispatches
//! exhaustively on the kind. Every error leaving a node gets the node's
//! source location attached exactly once, at the innermost frame that
//! knows a span.

mod binary;
pub(crate) mod builtins;
mod call;
pub(crate) use call::eval_args;
mod containers;
mod existence;
mod range;
mod string_lit;
mod unary;
mod var;

use crate::ast::{Expr, ExprKind};
use crate::coerce;
use crate::context::EvalContext;
use crate::environment::Environment;
use crate::error::EvalError;
use crate::value::Value;
use crate::Result;

/// Evaluation of one expression node.
pub trait Evaluate {
    /// Evaluate to a value.
    fn eval(&self, env: &mut Environment, ctx: &EvalContext) -> Result<Value>;
}

impl Evaluate for Expr {
    fn eval(&self, env: &mut Environment, ctx: &EvalContext) -> Result<Value> {
        // A memoized literal never re-evaluates.
        if let Some(constant) = &self.constant {
            return Ok(constant.clone());
        }
        let result = match &self.kind {
            ExprKind::Bool(b) => Ok(Value::Bool(*b)),
            ExprKind::Number(n) => Ok(Value::Number(*n)),
            ExprKind::StringLit(parts) => string_lit::eval(parts, env, ctx),
            ExprKind::Var(name) => var::eval_var(self, name, env),
            ExprKind::Special(special) => var::eval_special(*special, env, ctx),
            ExprKind::Dot { target, key } => containers::eval_dot(self, target, key, env, ctx),
            ExprKind::Index { target, key } => containers::eval_index(self, target, key, env, ctx),
            ExprKind::Unary { op, operand } => unary::eval(*op, operand, env, ctx),
            ExprKind::Binary { op, left, right } => binary::eval(self, *op, left, right, env, ctx),
            ExprKind::Range { begin, end } => range::eval(begin, end, env, ctx),
            ExprKind::SeqLit(items) => containers::eval_seq_lit(items, env, ctx),
            ExprKind::HashLit(pairs) => containers::eval_hash_lit(pairs, env, ctx),
            ExprKind::Call {
                target,
                positional,
                named,
            } => call::eval(target, positional, named, env, ctx),
            ExprKind::Builtin { target, name, args } => {
                builtins::eval(self, target, name, args, env, ctx)
            }
            ExprKind::Exists(target) => existence::eval_exists(target, env, ctx),
            ExprKind::Default { target, fallback } => {
                existence::eval_default(target, fallback.as_deref(), env, ctx)
            }
            ExprKind::Paren(inner) => inner.eval(env, ctx),
        };
        result.map_err(|e| e.at(env.location(self.span)))
    }
}

/// Evaluate an expression (free-function form of [`Evaluate::eval`]).
pub fn eval_expr(expr: &Expr, env: &mut Environment, ctx: &EvalContext) -> Result<Value> {
    expr.eval(env, ctx)
}

/// Evaluate an expression and coerce it to a boolean.
pub fn eval_to_bool(expr: &Expr, env: &mut Environment, ctx: &EvalContext) -> Result<bool> {
    let value = expr.eval(env, ctx)?;
    coerce::to_bool(&value).map_err(|e| {
        e.blamed(|| expr.canonical_form())
            .at(env.location(expr.span))
    })
}

/// The invalid-reference error for `expr`, respecting the fast flag.
pub(crate) fn invalid_reference(
    expr: &Expr,
    env: &Environment,
    tip: Option<&'static str>,
) -> EvalError {
    if env.fast_invalid_reference {
        return EvalError::InvalidReferenceFast;
    }
    EvalError::InvalidReference {
        blame: Some(expr.canonical_form()),
        tip,
        location: None,
    }
}
