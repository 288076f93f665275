//! Range expressions

use crate::ast::{Expr, RangeEnd};
use crate::context::EvalContext;
use crate::environment::Environment;
use crate::error::EvalError;
use crate::value::{RangeValue, Value};
use crate::Result;

use super::Evaluate;

pub(super) fn eval(
    begin: &Expr,
    end: &RangeEnd,
    env: &mut Environment,
    ctx: &EvalContext,
) -> Result<Value> {
    let begin_n = eval_int(begin, env, ctx)?;
    let range = match end {
        RangeEnd::Inclusive(e) => RangeValue::inclusive(begin_n, eval_int(e, env, ctx)?),
        RangeEnd::Exclusive(e) => RangeValue::exclusive(begin_n, eval_int(e, env, ctx)?),
        RangeEnd::Length(e) => RangeValue::with_length(begin_n, eval_int(e, env, ctx)?),
        RangeEnd::Unbounded => RangeValue::unbounded(begin_n),
    };
    Ok(Value::Range(range))
}

fn eval_int(expr: &Expr, env: &mut Environment, ctx: &EvalContext) -> Result<i64> {
    let value = expr.eval(env, ctx)?;
    value
        .as_number()
        .and_then(|n| n.as_index())
        .ok_or_else(|| {
            EvalError::TypeMismatch {
                expected: "an integer",
                actual: value.type_name(),
                blame: Some(expr.canonical_form()),
                location: None,
            }
            .at(env.location(expr.span))
        })
}
