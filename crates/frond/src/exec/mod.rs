//! Directive execution
//!
//! `Execute` on [`Node`] returns a [`Flow`] signal instead of a value.
//! Control flow is data, not errors: `#break`, `#continue`, `#return`,
//! and `#stop` travel up through `execute_block` and are consumed by the
//! construct that defines them. A signal that reaches a boundary with no
//! consumer is a front-end bug, never silently dropped.

mod assign;
mod compress;
mod cond;
mod list;
mod macros;
mod setting;
mod switch;

pub use compress::compress_whitespace;
pub(crate) use macros::{call_function, register_top_level};

use crate::ast::{Block, Node, NodeKind};
use crate::coerce::{self, CoercedText};
use crate::context::EvalContext;
use crate::environment::Environment;
use crate::error::EvalError;
use crate::eval::Evaluate;
use crate::value::Value;
use crate::Result;

/// The control-flow signal a directive hands back to its parent.
#[derive(Debug, Clone, PartialEq)]
pub enum Flow {
    /// Keep going
    Normal,
    /// `#break`: consumed by the nearest loop or `#switch`
    Break,
    /// `#continue`: consumed by the nearest loop
    Continue,
    /// `#return`: consumed by the macro or function invocation
    Return(Option<Value>),
    /// `#stop`: converted to [`EvalError::Stop`] at the template top
    Stop(Option<String>),
}

/// Execution of one directive node.
pub trait Execute {
    /// Execute, producing a control-flow signal.
    fn execute(&self, env: &mut Environment, ctx: &EvalContext) -> Result<Flow>;
}

impl Execute for Node {
    fn execute(&self, env: &mut Environment, ctx: &EvalContext) -> Result<Flow> {
        let result = match &self.kind {
            NodeKind::Text(text) => {
                env.out.write(text);
                Ok(Flow::Normal)
            }
            NodeKind::Interpolation(expr) => write_value(expr, env, ctx).map(|()| Flow::Normal),
            NodeKind::If(branches) => cond::execute(branches, env, ctx),
            NodeKind::List(list) => list::execute_list(list, env, ctx),
            NodeKind::Items { item, body } => list::execute_items(item, body, env, ctx),
            NodeKind::Sep(body) => list::execute_sep(body, env, ctx),
            NodeKind::Break => Ok(Flow::Break),
            NodeKind::Continue => Ok(Flow::Continue),
            NodeKind::Switch {
                subject,
                cases,
                default,
            } => switch::execute(subject, cases, default.as_ref(), env, ctx),
            NodeKind::Assign { scope, name, value } => {
                assign::execute_assign(*scope, name, value, env, ctx)
            }
            NodeKind::AssignBlock { scope, name, body } => {
                assign::execute_assign_block(*scope, name, body, env, ctx)
            }
            NodeKind::MacroDef {
                name,
                params,
                kind,
                body,
            } => {
                macros::define(name, params, *kind, body, env);
                Ok(Flow::Normal)
            }
            NodeKind::UserCall {
                target,
                positional,
                named,
                loop_vars,
                body,
            } => macros::execute_user_call(target, positional, named, loop_vars, body, env, ctx),
            NodeKind::Nested { args } => macros::execute_nested(args, env, ctx),
            NodeKind::Return { value } => match value {
                Some(value) => Ok(Flow::Return(Some(value.eval(env, ctx)?))),
                None => Ok(Flow::Return(None)),
            },
            NodeKind::Stop { message } => match message {
                Some(message) => {
                    let value = message.eval(env, ctx)?;
                    let text = coerce::to_plain_text(&value, &env.settings)
                        .map_err(|e| e.blamed(|| message.canonical_form()))?;
                    Ok(Flow::Stop(Some(text)))
                }
                None => Ok(Flow::Stop(None)),
            },
            NodeKind::Setting { key, value } => setting::execute(*key, value, env, ctx),
            NodeKind::Compress(body) => compress::execute(body, env, ctx),
            NodeKind::Trim(_) => Ok(Flow::Normal),
        };
        result.map_err(|e| e.at(env.location(self.span)))
    }
}

/// Run a block's nodes in order, stopping at the first non-normal signal.
pub fn execute_block(block: &Block, env: &mut Environment, ctx: &EvalContext) -> Result<Flow> {
    for node in &block.nodes {
        match node.execute(env, ctx)? {
            Flow::Normal => {}
            other => return Ok(other),
        }
    }
    Ok(Flow::Normal)
}

/// Evaluate an interpolation and write it, applying auto-escaping.
fn write_value(expr: &crate::ast::Expr, env: &mut Environment, ctx: &EvalContext) -> Result<()> {
    let value = expr.eval(env, ctx)?;
    let coerced = coerce::to_text_or_markup(&value, &env.settings)
        .map_err(|e| e.blamed(|| expr.canonical_form()))?;
    match coerced {
        CoercedText::Plain(text) => {
            if ctx.auto_escaping {
                env.out.write(&ctx.output_format.escape(&text));
            } else {
                env.out.write(&text);
            }
            Ok(())
        }
        CoercedText::Markup(markup) => {
            if markup.same_format(ctx.output_format.as_ref()) {
                env.out.write(&markup.markup);
                return Ok(());
            }
            // Markup of another format: fall back to its plain source.
            match &markup.plain {
                Some(plain) => {
                    if ctx.auto_escaping {
                        env.out.write(&ctx.output_format.escape(plain));
                    } else {
                        env.out.write(plain);
                    }
                    Ok(())
                }
                None => Err(EvalError::TypeMismatch {
                    expected: "markup of the active output format",
                    actual: format!("markup ({})", markup.format.name()),
                    blame: Some(expr.canonical_form()),
                    location: None,
                }),
            }
        }
    }
}
