//! Variable and special-variable resolution

use time::OffsetDateTime;

use crate::ast::{Expr, SpecialVar};
use crate::context::{EvalContext, VERSION};
use crate::environment::Environment;
use crate::error::EvalError;
use crate::value::{DateKind, DateValue, ObjectValue, Value};
use crate::Result;

use super::invalid_reference;

const MISSING_VAR_TIP: &str = "If the failing variable is known to legally be missing, \
     either specify a default value, like name!default, or use \
     <#if name??>when present</#if>";

/// A bare identifier, resolved through the scope chain.
pub(super) fn eval_var(expr: &Expr, name: &str, env: &Environment) -> Result<Value> {
    env.lookup(name)
        .ok_or_else(|| invalid_reference(expr, env, Some(MISSING_VAR_TIP)))
}

/// The locale exposed as an object value by `.localeObject`.
#[derive(Debug)]
struct LocaleObject {
    tag: String,
}

impl ObjectValue for LocaleObject {
    fn type_name(&self) -> &str {
        "a locale"
    }

    fn as_string(&self) -> Option<String> {
        Some(self.tag.clone())
    }

    fn is_hash(&self) -> bool {
        true
    }

    fn get_key(&self, key: &str) -> Option<Value> {
        let lang = self.tag.split(['_', '-']).next().unwrap_or(&self.tag);
        match key {
            "language" => Some(Value::str(lang)),
            "country" => self.tag.split(['_', '-']).nth(1).map(Value::str),
            _ => None,
        }
    }
}

/// A `.name` special variable.
pub(super) fn eval_special(
    special: SpecialVar,
    env: &Environment,
    ctx: &EvalContext,
) -> Result<Value> {
    let value = match special {
        SpecialVar::AutoEsc => Value::Bool(ctx.auto_escaping),
        SpecialVar::CurrentTemplateName | SpecialVar::MainTemplateName => {
            Value::Str(env.template_name().clone())
        }
        SpecialVar::DataModel => env.scopes.data_model().clone(),
        SpecialVar::Error => match &env.last_error {
            Some(message) => Value::str(message.clone()),
            None => {
                return Err(EvalError::InvalidReference {
                    blame: Some(".error".to_string()),
                    tip: Some("no error has been caught in this invocation"),
                    location: None,
                })
            }
        },
        SpecialVar::Globals => env.scopes.globals_hash(),
        SpecialVar::Lang => Value::str(env.settings.lang()),
        SpecialVar::Locale => Value::str(env.settings.locale.clone()),
        SpecialVar::LocaleObject => Value::Object(std::sync::Arc::new(LocaleObject {
            tag: env.settings.locale.clone(),
        })),
        SpecialVar::Locals => env.scopes.locals_hash(),
        SpecialVar::Main | SpecialVar::Namespace => env.scopes.namespace_hash(),
        SpecialVar::Now => Value::Date(DateValue {
            when: OffsetDateTime::now_utc(),
            kind: DateKind::DateTime,
        }),
        SpecialVar::OutputEncoding => match &env.settings.output_encoding {
            Some(encoding) => Value::str(encoding.clone()),
            None => {
                return Err(EvalError::InvalidReference {
                    blame: Some(".outputEncoding".to_string()),
                    tip: Some("the outputEncoding setting is not set"),
                    location: None,
                })
            }
        },
        SpecialVar::OutputFormat => Value::str(ctx.output_format.name().to_string()),
        SpecialVar::UrlEscapingCharset => match &env.settings.url_escaping_charset {
            Some(charset) => Value::str(charset.clone()),
            None => {
                return Err(EvalError::InvalidReference {
                    blame: Some(".urlEscapingCharset".to_string()),
                    tip: Some("the urlEscapingCharset setting is not set"),
                    location: None,
                })
            }
        },
        SpecialVar::Vars => env.scopes.vars_hash(),
        SpecialVar::Version => Value::str(VERSION),
    };
    Ok(value)
}
