//! The `#compress` directive
//!
//! The body's output is captured, whitespace-normalized, and written out.
//! Normalization collapses horizontal whitespace runs to one space,
//! collapses runs containing a line break to the run's first line break,
//! and strips leading and trailing whitespace entirely.

use crate::ast::Block;
use crate::context::EvalContext;
use crate::environment::Environment;
use crate::error::EvalError;
use crate::Result;

use super::{execute_block, Flow};

pub(super) fn execute(body: &Block, env: &mut Environment, ctx: &EvalContext) -> Result<Flow> {
    env.out.push_capture();
    let result = execute_block(body, env, ctx);
    let captured = env.out.pop_capture();
    let flow = result?;
    let captured = captured.ok_or_else(|| EvalError::Internal {
        message: "capture sink vanished under #compress".to_string(),
    })?;
    env.out.write(&compress_whitespace(&captured));
    Ok(flow)
}

/// Whitespace-normalize text the way `#compress` does. Idempotent.
pub fn compress_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut run_break: Option<&str> = None;
    let mut in_run = false;
    let mut rest = text;

    while let Some(c) = rest.chars().next() {
        if c.is_whitespace() {
            if !in_run {
                in_run = true;
                run_break = None;
            }
            // Remember the run's first line break, preferring the full
            // CRLF pair when present.
            if run_break.is_none() {
                if rest.starts_with("\r\n") {
                    run_break = Some("\r\n");
                } else if c == '\n' || c == '\r' {
                    run_break = Some(if c == '\n' { "\n" } else { "\r" });
                }
            }
            rest = &rest[c.len_utf8()..];
        } else {
            if in_run {
                if !out.is_empty() {
                    out.push_str(run_break.unwrap_or(" "));
                }
                in_run = false;
            }
            out.push(c);
            rest = &rest[c.len_utf8()..];
        }
    }
    // A trailing run is dropped entirely.
    out
}
