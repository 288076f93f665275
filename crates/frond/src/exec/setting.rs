//! The `#setting` directive

use crate::ast::Expr;
use crate::coerce;
use crate::context::EvalContext;
use crate::environment::Environment;
use crate::eval::Evaluate;
use crate::settings::SettingKey;
use crate::Result;

use super::Flow;

pub(super) fn execute(
    key: SettingKey,
    value: &Expr,
    env: &mut Environment,
    ctx: &EvalContext,
) -> Result<Flow> {
    let evaluated = value.eval(env, ctx)?;
    let text = coerce::to_plain_text(&evaluated, &env.settings)
        .map_err(|e| e.blamed(|| value.canonical_form()))?;
    tracing::debug!(setting = key.name(), value = %text, "runtime setting changed");
    env.settings.set(key, text);
    Ok(Flow::Normal)
}
