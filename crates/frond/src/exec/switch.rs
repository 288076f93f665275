//! The `#switch` directive
//!
//! The subject is evaluated once. Case values are evaluated in order
//! until one compares equal, then execution falls through every later
//! case body and the `#default` body until a `#break`. With no matching
//! case, only the `#default` body runs.

use crate::ast::{Block, Expr, SwitchCase};
use crate::compare;
use crate::context::EvalContext;
use crate::environment::Environment;
use crate::eval::Evaluate;
use crate::Result;

use super::{execute_block, Flow};

pub(super) fn execute(
    subject: &Expr,
    cases: &[SwitchCase],
    default: Option<&Block>,
    env: &mut Environment,
    ctx: &EvalContext,
) -> Result<Flow> {
    let subject_value = subject.eval(env, ctx)?;

    let mut matched = None;
    for (i, case) in cases.iter().enumerate() {
        let case_value = case.matches.eval(env, ctx)?;
        let equal = compare::values_equal(&subject_value, &case_value, ctx.arithmetic.as_ref())
            .map_err(|e| e.blamed(|| case.matches.canonical_form()))?;
        if equal {
            matched = Some(i);
            break;
        }
    }

    match matched {
        Some(first) => {
            for case in &cases[first..] {
                match execute_block(&case.body, env, ctx)? {
                    Flow::Normal => {}
                    Flow::Break => return Ok(Flow::Normal),
                    other => return Ok(other),
                }
            }
            run_default(default, env, ctx)
        }
        None => run_default(default, env, ctx),
    }
}

fn run_default(
    default: Option<&Block>,
    env: &mut Environment,
    ctx: &EvalContext,
) -> Result<Flow> {
    let Some(body) = default else {
        return Ok(Flow::Normal);
    };
    match execute_block(body, env, ctx)? {
        Flow::Break => Ok(Flow::Normal),
        other => Ok(other),
    }
}
