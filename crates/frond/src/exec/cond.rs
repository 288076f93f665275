//! The `#if`/`#elseif`/`#else` chain

use crate::ast::IfBranch;
use crate::context::EvalContext;
use crate::environment::Environment;
use crate::eval::eval_to_bool;
use crate::Result;

use super::{execute_block, Flow};

pub(super) fn execute(
    branches: &[IfBranch],
    env: &mut Environment,
    ctx: &EvalContext,
) -> Result<Flow> {
    for branch in branches {
        match &branch.cond {
            Some(cond) => {
                if eval_to_bool(cond, env, ctx)? {
                    return execute_block(&branch.body, env, ctx);
                }
            }
            // The #else branch; validation keeps it last.
            None => return execute_block(&branch.body, env, ctx),
        }
    }
    Ok(Flow::Normal)
}
