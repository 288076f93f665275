//! The `#list` family: `#list`, `#items`, `#sep`
//!
//! The one-part form binds the item variable itself. The two-part form
//! pushes a variable-less iteration context carrying the source; the
//! nested `#items` takes the source, binds the variable, and drives the
//! actual iteration inside that same context. `#sep` consults the
//! innermost visible context's `has_next`.

use std::iter::Peekable;

use crate::ast::{Block, Expr, ListDir};
use crate::coerce;
use crate::context::EvalContext;
use crate::environment::Environment;
use crate::error::EvalError;
use crate::eval::Evaluate;
use crate::value::Value;
use crate::Result;

use super::{execute_block, Flow};

pub(super) fn execute_list(
    list: &ListDir,
    env: &mut Environment,
    ctx: &EvalContext,
) -> Result<Flow> {
    let source = list.seq.eval(env, ctx)?;

    match &list.item {
        Some(item) => {
            let Some(iter) = source.try_iter() else {
                return Err(not_iterable(&list.seq, &source));
            };
            let mut iter = iter.peekable();
            if iter.peek().is_none() {
                drop(iter);
                return execute_else(list, env, ctx);
            }
            env.iterations.push(Some(item.clone()), None);
            let flow = run_loop(&mut iter, &list.body, env, ctx);
            env.iterations.pop();
            flow
        }
        None => {
            // A host collection may be single-pass, and this form walks
            // the source twice (the emptiness check here, the iteration
            // in #items), so drain it into a sequence up front.
            let source = if matches!(source, Value::Collection(_)) {
                let items: Vec<Value> = match source.try_iter() {
                    Some(iter) => iter.collect(),
                    None => return Err(not_iterable(&list.seq, &source)),
                };
                Value::seq(items)
            } else {
                if source.try_iter().is_none() {
                    return Err(not_iterable(&list.seq, &source));
                }
                source
            };
            if coerce::is_empty(&source) {
                return execute_else(list, env, ctx);
            }
            // The variable and the iteration are deferred to #items; the
            // body runs once with the source parked in the context.
            env.iterations.push(None, Some(source));
            let flow = execute_block(&list.body, env, ctx);
            env.iterations.pop();
            match flow? {
                Flow::Break => Ok(Flow::Normal),
                other => Ok(other),
            }
        }
    }
}

pub(super) fn execute_items(
    item: &str,
    body: &Block,
    env: &mut Environment,
    ctx: &EvalContext,
) -> Result<Flow> {
    let source = match env.iterations.top_mut() {
        Some(context) if context.var_name.is_none() => {
            context.var_name = Some(item.to_string());
            context.source.take().ok_or_else(|| EvalError::Internal {
                message: "#items ran twice in the same #list".to_string(),
            })?
        }
        _ => {
            return Err(EvalError::Internal {
                message: "#items outside a variable-less #list".to_string(),
            })
        }
    };
    let Some(iter) = source.try_iter() else {
        return Err(EvalError::TypeMismatch {
            expected: "something iterable (a sequence, range, or collection)",
            actual: source.type_name(),
            blame: None,
            location: None,
        });
    };
    let mut iter = iter.peekable();
    run_loop(&mut iter, body, env, ctx)
}

pub(super) fn execute_sep(body: &Block, env: &mut Environment, ctx: &EvalContext) -> Result<Flow> {
    let has_next = env
        .iterations
        .innermost_visible()
        .ok_or_else(|| EvalError::Internal {
            message: "#sep outside a loop body".to_string(),
        })?
        .has_next;
    if !has_next {
        return Ok(Flow::Normal);
    }
    execute_block(body, env, ctx)
}

/// Drive the innermost iteration context over the items. `#break` is
/// consumed here; `#continue` just moves to the next item.
fn run_loop(
    iter: &mut Peekable<impl Iterator<Item = Value>>,
    body: &Block,
    env: &mut Environment,
    ctx: &EvalContext,
) -> Result<Flow> {
    let mut index = 0;
    while let Some(item) = iter.next() {
        env.check_interrupt(ctx)?;
        let has_next = iter.peek().is_some();
        let context = env.iterations.top_mut().ok_or_else(|| EvalError::Internal {
            message: "loop body ran without an iteration context".to_string(),
        })?;
        context.value = item;
        context.index = index;
        context.has_next = has_next;

        match execute_block(body, env, ctx)? {
            Flow::Normal | Flow::Continue => {}
            Flow::Break => return Ok(Flow::Normal),
            other => return Ok(other),
        }
        index += 1;
    }
    Ok(Flow::Normal)
}

fn execute_else(list: &ListDir, env: &mut Environment, ctx: &EvalContext) -> Result<Flow> {
    match &list.else_body {
        Some(body) => execute_block(body, env, ctx),
        None => Ok(Flow::Normal),
    }
}

fn not_iterable(seq: &Expr, value: &Value) -> EvalError {
    EvalError::TypeMismatch {
        expected: "something iterable (a sequence, range, or collection)",
        actual: value.type_name(),
        blame: Some(seq.canonical_form()),
        location: None,
    }
}
