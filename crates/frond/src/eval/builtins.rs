//! The `?name` builtins
//!
//! A deliberately small set. Unknown names are rejected at template
//! construction against [`NAMES`]; at evaluation time a name outside the
//! set is a front-end bug.

use crate::ast::{Expr, ExprKind};
use crate::coerce;
use crate::compare;
use crate::context::EvalContext;
use crate::environment::Environment;
use crate::error::EvalError;
use crate::format;
use crate::value::Value;
use crate::Result;

use super::{existence, invalid_reference, Evaluate};

/// Every supported builtin name, sorted.
pub const NAMES: &[&str] = &[
    "c",
    "cap_first",
    "contains",
    "counter",
    "first",
    "has_content",
    "has_next",
    "index",
    "is_first",
    "is_last",
    "join",
    "keys",
    "last",
    "length",
    "lower_case",
    "seq_contains",
    "size",
    "string",
    "trim",
    "upper_case",
    "values",
];

const LOOP_BUILTINS: &[&str] = &["index", "counter", "has_next", "is_first", "is_last"];

pub(super) fn eval(
    expr: &Expr,
    target: &Expr,
    name: &str,
    args: &[Expr],
    env: &mut Environment,
    ctx: &EvalContext,
) -> Result<Value> {
    if LOOP_BUILTINS.contains(&name) {
        return eval_loop_builtin(target, name, args, env);
    }

    // ?has_content shares the final-step protection of the existence
    // operators: a missing variable has no content rather than erroring.
    if name == "has_content" {
        expect_arg_count(name, args, 0)?;
        let value = existence::eval_optional(target, env, ctx)?;
        return Ok(Value::Bool(match value {
            Some(value) => !coerce::is_empty(&value),
            None => false,
        }));
    }

    let value = target.eval(env, ctx)?;
    match name {
        "size" => {
            expect_arg_count(name, args, 0)?;
            eval_size(expr, target, &value, env)
        }
        "length" => {
            expect_arg_count(name, args, 0)?;
            let text = string_target(target, &value, env)?;
            Ok(Value::int(text.chars().count() as i64))
        }
        "keys" => {
            expect_arg_count(name, args, 0)?;
            let keys = value.hash_keys().ok_or_else(|| {
                type_mismatch("an extended hash", &value, target, env)
            })?;
            Ok(Value::seq(keys.into_iter().map(Value::from).collect()))
        }
        "values" => {
            expect_arg_count(name, args, 0)?;
            let values = value.hash_values().ok_or_else(|| {
                type_mismatch("an extended hash", &value, target, env)
            })?;
            Ok(Value::seq(values))
        }
        "first" => {
            expect_arg_count(name, args, 0)?;
            seq_target(target, &value, env)?;
            value
                .get_index(0)
                .ok_or_else(|| invalid_reference(expr, env, Some("the sequence was empty")))
        }
        "last" => {
            expect_arg_count(name, args, 0)?;
            seq_target(target, &value, env)?;
            let len = value.seq_len().ok_or_else(|| {
                type_mismatch("a bounded sequence", &value, target, env)
            })?;
            len.checked_sub(1)
                .and_then(|i| value.get_index(i))
                .ok_or_else(|| invalid_reference(expr, env, Some("the sequence was empty")))
        }
        "contains" => {
            let needle = one_string_arg(name, args, env, ctx)?;
            let haystack = string_target(target, &value, env)?;
            Ok(Value::Bool(haystack.contains(&needle)))
        }
        "seq_contains" => {
            expect_arg_count(name, args, 1)?;
            let needle = args[0].eval(env, ctx)?;
            let iter = value.try_iter().ok_or_else(|| {
                type_mismatch("a sequence or collection", &value, target, env)
            })?;
            if value.seq_len().is_none() && matches!(value, Value::Range(_)) {
                return Err(type_mismatch("a bounded sequence", &value, target, env));
            }
            for item in iter {
                if compare::values_equal_lenient(&item, &needle, ctx.arithmetic.as_ref())? {
                    return Ok(Value::Bool(true));
                }
            }
            Ok(Value::Bool(false))
        }
        "join" => {
            let separator = one_string_arg(name, args, env, ctx)?;
            let iter = value.try_iter().ok_or_else(|| {
                type_mismatch("a sequence or collection", &value, target, env)
            })?;
            if matches!(value, Value::Range(_)) && value.seq_len().is_none() {
                return Err(type_mismatch("a bounded sequence", &value, target, env));
            }
            let mut out = String::new();
            for (i, item) in iter.enumerate() {
                if i > 0 {
                    out.push_str(&separator);
                }
                let text = coerce::to_plain_text(&item, &env.settings)
                    .map_err(|e| e.blamed(|| target.canonical_form()))?;
                out.push_str(&text);
            }
            Ok(Value::str(out))
        }
        "upper_case" => {
            expect_arg_count(name, args, 0)?;
            Ok(Value::str(string_target(target, &value, env)?.to_uppercase()))
        }
        "lower_case" => {
            expect_arg_count(name, args, 0)?;
            Ok(Value::str(string_target(target, &value, env)?.to_lowercase()))
        }
        "cap_first" => {
            expect_arg_count(name, args, 0)?;
            let text = string_target(target, &value, env)?;
            let mut chars = text.chars();
            Ok(Value::str(match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => text,
            }))
        }
        "trim" => {
            expect_arg_count(name, args, 0)?;
            Ok(Value::str(string_target(target, &value, env)?.trim().to_string()))
        }
        "string" => {
            expect_arg_count(name, args, 0)?;
            if let Some(b) = value.as_bool() {
                if value.as_string().is_none() {
                    return Ok(Value::str(format::bool_to_text(b, &env.settings)));
                }
            }
            coerce::to_plain_text(&value, &env.settings)
                .map(Value::str)
                .map_err(|e| e.blamed(|| target.canonical_form()))
        }
        "c" => {
            expect_arg_count(name, args, 0)?;
            if let Some(n) = value.as_number() {
                return Ok(Value::str(format::number_to_text(n)));
            }
            match value {
                Value::Bool(b) => Ok(Value::str(if b { "true" } else { "false" })),
                other => Err(type_mismatch("a number or a boolean", &other, target, env)),
            }
        }
        other => Err(EvalError::Internal {
            message: format!("builtin ?{other} passed template validation but has no evaluator"),
        }),
    }
}

fn eval_loop_builtin(
    target: &Expr,
    name: &str,
    args: &[Expr],
    env: &Environment,
) -> Result<Value> {
    expect_arg_count(name, args, 0)?;
    let ExprKind::Var(var_name) = &target.kind else {
        return Err(EvalError::InvalidArguments {
            callee: format!("?{name}"),
            message: "the left side must be a loop variable name".to_string(),
            location: None,
        });
    };
    let iteration = env.iterations.find_visible(var_name).ok_or_else(|| {
        EvalError::InvalidArguments {
            callee: format!("?{name}"),
            message: format!("\"{var_name}\" is not a loop variable of any enclosing #list"),
            location: None,
        }
    })?;
    Ok(match name {
        "index" => Value::int(iteration.index as i64),
        "counter" => Value::int(iteration.index as i64 + 1),
        "has_next" => Value::Bool(iteration.has_next),
        "is_first" => Value::Bool(iteration.index == 0),
        "is_last" => Value::Bool(!iteration.has_next),
        other => {
            return Err(EvalError::Internal {
                message: format!("?{other} is not a loop builtin"),
            })
        }
    })
}

fn eval_size(expr: &Expr, target: &Expr, value: &Value, env: &Environment) -> Result<Value> {
    if let Some(len) = value.seq_len() {
        return Ok(Value::int(len as i64));
    }
    if matches!(value, Value::Range(_)) {
        return Err(invalid_reference(
            expr,
            env,
            Some("a right-unbounded range has no size"),
        ));
    }
    if let Some(keys) = value.hash_keys() {
        return Ok(Value::int(keys.len() as i64));
    }
    Err(type_mismatch("a sequence or an extended hash", value, target, env))
}

fn string_target(target: &Expr, value: &Value, env: &Environment) -> Result<String> {
    coerce::to_plain_text(value, &env.settings)
        .map_err(|e| e.blamed(|| target.canonical_form()).at(env.location(target.span)))
}

fn seq_target(target: &Expr, value: &Value, env: &Environment) -> Result<()> {
    if value.is_seq() {
        return Ok(());
    }
    Err(type_mismatch("a sequence", value, target, env))
}

fn type_mismatch(
    expected: &'static str,
    value: &Value,
    target: &Expr,
    env: &Environment,
) -> EvalError {
    EvalError::TypeMismatch {
        expected,
        actual: value.type_name(),
        blame: Some(target.canonical_form()),
        location: None,
    }
    .at(env.location(target.span))
}

fn expect_arg_count(name: &str, args: &[Expr], expected: usize) -> Result<()> {
    if args.len() == expected {
        return Ok(());
    }
    Err(EvalError::InvalidArguments {
        callee: format!("?{name}"),
        message: format!("expected {expected} argument(s), got {}", args.len()),
        location: None,
    })
}

fn one_string_arg(
    name: &str,
    args: &[Expr],
    env: &mut Environment,
    ctx: &EvalContext,
) -> Result<String> {
    expect_arg_count(name, args, 1)?;
    let value = args[0].eval(env, ctx)?;
    coerce::to_plain_text(&value, &env.settings)
        .map_err(|e| e.blamed(|| args[0].canonical_form()).at(env.location(args[0].span)))
}
