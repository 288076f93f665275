//! Unary operators

use crate::ast::{Expr, UnaryOp};
use crate::context::EvalContext;
use crate::environment::Environment;
use crate::error::EvalError;
use crate::value::Value;
use crate::Result;

use super::{eval_to_bool, Evaluate};

pub(super) fn eval(
    op: UnaryOp,
    operand: &Expr,
    env: &mut Environment,
    ctx: &EvalContext,
) -> Result<Value> {
    match op {
        UnaryOp::Not => Ok(Value::Bool(!eval_to_bool(operand, env, ctx)?)),
        UnaryOp::Neg => {
            let value = operand.eval(env, ctx)?;
            let n = value.as_number().ok_or_else(|| {
                EvalError::TypeMismatch {
                    expected: "a number",
                    actual: value.type_name(),
                    blame: Some(operand.canonical_form()),
                    location: None,
                }
                .at(env.location(operand.span))
            })?;
            let negated = ctx
                .arithmetic
                .neg(n)
                .map_err(|source| EvalError::Arithmetic {
                    source,
                    location: None,
                })?;
            Ok(Value::Number(negated))
        }
    }
}
