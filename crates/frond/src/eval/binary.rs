//! Binary operators
//!
//! `&&`/`||` short-circuit on the left operand. `+` is overloaded: number
//! addition through the arithmetic engine, then sequence concatenation,
//! hash union, and finally string/markup concatenation. The remaining
//! arithmetic operators are numbers-only, and all comparisons go through
//! the shared routine in [`crate::compare`].

use std::sync::Arc;

use indexmap::IndexMap;

use crate::ast::{BinOp, Expr};
use crate::coerce::{self, CoercedText};
use crate::compare::{self, CmpOp};
use crate::context::EvalContext;
use crate::environment::Environment;
use crate::error::EvalError;
use crate::output::Markup;
use crate::value::{Number, Value};
use crate::Result;

use super::{eval_to_bool, Evaluate};

pub(super) fn eval(
    expr: &Expr,
    op: BinOp,
    left: &Expr,
    right: &Expr,
    env: &mut Environment,
    ctx: &EvalContext,
) -> Result<Value> {
    match op {
        BinOp::And => {
            let result = eval_to_bool(left, env, ctx)? && eval_to_bool(right, env, ctx)?;
            Ok(Value::Bool(result))
        }
        BinOp::Or => {
            let result = eval_to_bool(left, env, ctx)? || eval_to_bool(right, env, ctx)?;
            Ok(Value::Bool(result))
        }
        BinOp::Eq | BinOp::Ne | BinOp::Lt | BinOp::Lte | BinOp::Gt | BinOp::Gte => {
            let lv = left.eval(env, ctx)?;
            let rv = right.eval(env, ctx)?;
            let cmp_op = match op {
                BinOp::Eq => CmpOp::Eq,
                BinOp::Ne => CmpOp::Ne,
                BinOp::Lt => CmpOp::Lt,
                BinOp::Lte => CmpOp::Lte,
                BinOp::Gt => CmpOp::Gt,
                BinOp::Gte => CmpOp::Gte,
                _ => unreachable!("comparison arm covers Eq/Ne/Lt/Lte/Gt/Gte only"),
            };
            compare::compare(&lv, cmp_op, &rv, ctx.arithmetic.as_ref(), false)
                .map(Value::Bool)
                .map_err(|e| e.blamed(|| expr.canonical_form()))
        }
        BinOp::Add => {
            let lv = left.eval(env, ctx)?;
            let rv = right.eval(env, ctx)?;
            eval_add(&lv, &rv, left, right, env, ctx)
        }
        BinOp::Sub | BinOp::Mul | BinOp::Div | BinOp::Mod => {
            let ln = eval_number_operand(left, env, ctx)?;
            let rn = eval_number_operand(right, env, ctx)?;
            let engine = ctx.arithmetic.as_ref();
            let result = match op {
                BinOp::Sub => engine.sub(ln, rn),
                BinOp::Mul => engine.mul(ln, rn),
                BinOp::Div => engine.div(ln, rn),
                BinOp::Mod => engine.rem(ln, rn),
                _ => unreachable!("arithmetic arm covers Sub/Mul/Div/Mod only"),
            };
            result
                .map(Value::Number)
                .map_err(|source| EvalError::Arithmetic {
                    source,
                    location: None,
                })
        }
    }
}

fn eval_number_operand(expr: &Expr, env: &mut Environment, ctx: &EvalContext) -> Result<Number> {
    let value = expr.eval(env, ctx)?;
    value.as_number().ok_or_else(|| {
        EvalError::TypeMismatch {
            expected: "a number",
            actual: value.type_name(),
            blame: Some(expr.canonical_form()),
            location: None,
        }
        .at(env.location(expr.span))
    })
}

/// `+`: numbers add; sequences concatenate; hashes union with the right
/// side winning on key collisions; everything else concatenates as text
/// or markup.
fn eval_add(
    lv: &Value,
    rv: &Value,
    left: &Expr,
    right: &Expr,
    env: &Environment,
    ctx: &EvalContext,
) -> Result<Value> {
    if let (Some(a), Some(b)) = (lv.as_number(), rv.as_number()) {
        return ctx
            .arithmetic
            .add(a, b)
            .map(Value::Number)
            .map_err(|source| EvalError::Arithmetic {
                source,
                location: None,
            });
    }

    if lv.is_seq() && rv.is_seq() {
        return concat_seqs(lv, rv, left, right, env);
    }

    if let (Value::Hash(a), Value::Hash(b)) = (lv, rv) {
        let mut merged: IndexMap<String, Value> = IndexMap::with_capacity(a.len() + b.len());
        merged.extend(a.iter().map(|(k, v)| (k.clone(), v.clone())));
        merged.extend(b.iter().map(|(k, v)| (k.clone(), v.clone())));
        return Ok(Value::Hash(Arc::new(merged)));
    }

    concat_text(lv, rv, left, right, env)
}

fn concat_seqs(
    lv: &Value,
    rv: &Value,
    left: &Expr,
    right: &Expr,
    env: &Environment,
) -> Result<Value> {
    let bounded = |value: &Value, expr: &Expr| {
        value.seq_len().ok_or_else(|| {
            EvalError::TypeMismatch {
                expected: "a bounded sequence",
                actual: value.type_name(),
                blame: Some(expr.canonical_form()),
                location: None,
            }
            .at(env.location(expr.span))
        })
    };
    let ln = bounded(lv, left)?;
    let rn = bounded(rv, right)?;
    let mut items = Vec::with_capacity(ln + rn);
    if let Some(iter) = lv.try_iter() {
        items.extend(iter);
    }
    if let Some(iter) = rv.try_iter() {
        items.extend(iter);
    }
    Ok(Value::seq(items))
}

fn concat_text(
    lv: &Value,
    rv: &Value,
    left: &Expr,
    right: &Expr,
    env: &Environment,
) -> Result<Value> {
    let coerce_side = |value: &Value, expr: &Expr| {
        coerce::to_text_or_markup(value, &env.settings)
            .map_err(|e| e.blamed(|| expr.canonical_form()).at(env.location(expr.span)))
    };
    let lt = coerce_side(lv, left)?;
    let rt = coerce_side(rv, right)?;
    match (lt, rt) {
        (CoercedText::Plain(a), CoercedText::Plain(b)) => Ok(Value::str(format!("{a}{b}"))),
        (CoercedText::Markup(a), CoercedText::Plain(b)) => {
            let b = Markup::from_plain(Arc::clone(&a.format), &b);
            markup_concat(&a, &b)
        }
        (CoercedText::Plain(a), CoercedText::Markup(b)) => {
            let a = Markup::from_plain(Arc::clone(&b.format), &a);
            markup_concat(&a, &b)
        }
        (CoercedText::Markup(a), CoercedText::Markup(b)) => markup_concat(&a, &b),
    }
}

fn markup_concat(a: &Markup, b: &Markup) -> Result<Value> {
    a.concat(b)
        .map(Value::Markup)
        .ok_or_else(|| EvalError::TypeMismatch {
            expected: "markup of one output format",
            actual: format!(
                "markup of {} and markup of {}",
                a.format.name(),
                b.format.name()
            ),
            blame: None,
            location: None,
        })
}
