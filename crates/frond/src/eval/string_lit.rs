//! String literals with embedded interpolations
//!
//! `"Hello ${name}!"` concatenates literal runs with the coerced fragment
//! values. As soon as one fragment is markup, the whole literal is
//! promoted to markup: the runs accumulated so far (and every later plain
//! run) are escaped through that fragment's format.

use std::sync::Arc;

use crate::ast::StrPart;
use crate::coerce::{self, CoercedText};
use crate::context::EvalContext;
use crate::environment::Environment;
use crate::error::EvalError;
use crate::output::Markup;
use crate::value::Value;
use crate::Result;

use super::Evaluate;

enum Accum {
    Plain(String),
    Markup(Markup),
}

pub(super) fn eval(parts: &[StrPart], env: &mut Environment, ctx: &EvalContext) -> Result<Value> {
    let mut acc = Accum::Plain(String::new());
    for part in parts {
        match part {
            StrPart::Text(text) => push_plain(&mut acc, text)?,
            StrPart::Interp(expr) => {
                let value = expr.eval(env, ctx)?;
                match coerce::to_text_or_markup(&value, &env.settings)
                    .map_err(|e| e.blamed(|| expr.canonical_form()).at(env.location(expr.span)))?
                {
                    CoercedText::Plain(text) => push_plain(&mut acc, &text)?,
                    CoercedText::Markup(m) => push_markup(&mut acc, &m)?,
                }
            }
        }
    }
    Ok(match acc {
        Accum::Plain(text) => Value::str(text),
        Accum::Markup(markup) => Value::Markup(markup),
    })
}

fn push_plain(acc: &mut Accum, text: &str) -> Result<()> {
    match acc {
        Accum::Plain(buf) => {
            buf.push_str(text);
            Ok(())
        }
        Accum::Markup(markup) => {
            let next = Markup::from_plain(Arc::clone(&markup.format), text);
            *markup = concat(markup, &next)?;
            Ok(())
        }
    }
}

fn push_markup(acc: &mut Accum, m: &Markup) -> Result<()> {
    match acc {
        Accum::Plain(buf) => {
            let prefix = Markup::from_plain(Arc::clone(&m.format), buf);
            *acc = Accum::Markup(concat(&prefix, m)?);
            Ok(())
        }
        Accum::Markup(markup) => {
            *markup = concat(markup, m)?;
            Ok(())
        }
    }
}

fn concat(left: &Markup, right: &Markup) -> Result<Markup> {
    left.concat(right).ok_or_else(|| EvalError::TypeMismatch {
        expected: "markup of one output format",
        actual: format!(
            "markup of {} and markup of {}",
            left.format.name(),
            right.format.name()
        ),
        blame: None,
        location: None,
    })
}
