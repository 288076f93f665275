//! Member access, indexing, and container literals

use indexmap::IndexMap;

use crate::ast::Expr;
use crate::coerce;
use crate::context::EvalContext;
use crate::environment::Environment;
use crate::error::EvalError;
use crate::value::Value;
use crate::Result;

use super::{invalid_reference, Evaluate};

const MISSING_KEY_TIP: &str = "The hash exists, but has no entry under this key. \
     Specify a default with key!default, or test with key??";

const OUT_OF_BOUNDS_TIP: &str = "The index was negative or past the end of the sequence";

/// `target.key`.
pub(super) fn eval_dot(
    expr: &Expr,
    target: &Expr,
    key: &str,
    env: &mut Environment,
    ctx: &EvalContext,
) -> Result<Value> {
    let container = target.eval(env, ctx)?;
    if !container.is_hash() {
        return Err(EvalError::TypeMismatch {
            expected: "a hash",
            actual: container.type_name(),
            blame: Some(target.canonical_form()),
            location: None,
        });
    }
    container
        .get_key(key)
        .ok_or_else(|| invalid_reference(expr, env, Some(MISSING_KEY_TIP)))
}

/// `target[key]`: a number key indexes a sequence, a string key looks up
/// a hash.
pub(super) fn eval_index(
    expr: &Expr,
    target: &Expr,
    key: &Expr,
    env: &mut Environment,
    ctx: &EvalContext,
) -> Result<Value> {
    let container = target.eval(env, ctx)?;
    let key_value = key.eval(env, ctx)?;

    if let Some(n) = key_value.as_number() {
        if !container.is_seq() {
            return Err(EvalError::TypeMismatch {
                expected: "a sequence",
                actual: container.type_name(),
                blame: Some(target.canonical_form()),
                location: None,
            });
        }
        let index = n.as_index().filter(|i| *i >= 0).ok_or_else(|| {
            EvalError::TypeMismatch {
                expected: "a non-negative integer index",
                actual: format!("the number {}", crate::format::number_to_text(n)),
                blame: Some(key.canonical_form()),
                location: None,
            }
            .at(env.location(key.span))
        })?;
        return container
            .get_index(index as usize)
            .ok_or_else(|| invalid_reference(expr, env, Some(OUT_OF_BOUNDS_TIP)));
    }

    if key_value.as_string().is_some() {
        let key_text = coerce::to_plain_text(&key_value, &env.settings)
            .map_err(|e| e.blamed(|| key.canonical_form()).at(env.location(key.span)))?;
        if !container.is_hash() {
            return Err(EvalError::TypeMismatch {
                expected: "a hash",
                actual: container.type_name(),
                blame: Some(target.canonical_form()),
                location: None,
            });
        }
        return container
            .get_key(&key_text)
            .ok_or_else(|| invalid_reference(expr, env, Some(MISSING_KEY_TIP)));
    }

    Err(EvalError::TypeMismatch {
        expected: "a string or a number key",
        actual: key_value.type_name(),
        blame: Some(key.canonical_form()),
        location: None,
    }
    .at(env.location(key.span)))
}

/// `[a, b, c]`.
pub(super) fn eval_seq_lit(
    items: &[Expr],
    env: &mut Environment,
    ctx: &EvalContext,
) -> Result<Value> {
    let mut values = Vec::with_capacity(items.len());
    for item in items {
        values.push(item.eval(env, ctx)?);
    }
    Ok(Value::seq(values))
}

/// `{"k": v}`. Keys evaluate to strings; a repeated key keeps its first
/// position but takes the last value.
pub(super) fn eval_hash_lit(
    pairs: &[(Expr, Expr)],
    env: &mut Environment,
    ctx: &EvalContext,
) -> Result<Value> {
    let mut map: IndexMap<String, Value> = IndexMap::with_capacity(pairs.len());
    for (key, value) in pairs {
        let key_value = key.eval(env, ctx)?;
        let key_text = coerce::to_plain_text(&key_value, &env.settings)
            .map_err(|e| e.blamed(|| key.canonical_form()).at(env.location(key.span)))?;
        let value = value.eval(env, ctx)?;
        map.insert(key_text, value);
    }
    Ok(Value::Hash(std::sync::Arc::new(map)))
}
