//! Value-to-scalar coercion
//!
//! Three text coercions exist on purpose and must not be merged: an
//! interpolation may produce markup, a string context must reject markup,
//! and a few operations force markup down to its plain source. Callers
//! pick the one that matches their contract.

use crate::error::EvalError;
use crate::output::Markup;
use crate::settings::RuntimeSettings;
use crate::value::Value;
use crate::{format, Result};

/// The result of the interpolation-side text coercion.
#[derive(Debug, Clone, PartialEq)]
pub enum CoercedText {
    /// Plain text; the writer escapes it when auto-escaping is on
    Plain(String),
    /// Already-escaped markup; the writer passes it through
    Markup(Markup),
}

/// Boolean coercion. Only boolean-capable values pass; there is no truthy
/// fallback for other types.
pub fn to_bool(value: &Value) -> Result<bool> {
    value.as_bool().ok_or_else(|| EvalError::TypeMismatch {
        expected: "a boolean",
        actual: value.type_name(),
        blame: None,
        location: None,
    })
}

/// Text coercion for interpolations: plain text or markup.
pub fn to_text_or_markup(value: &Value, settings: &RuntimeSettings) -> Result<CoercedText> {
    if let Value::Markup(m) = value {
        return Ok(CoercedText::Markup(m.clone()));
    }
    scalar_to_text(value, settings).map(CoercedText::Plain)
}

/// Text coercion for string contexts: markup is an error here, because
/// silently treating escaped text as a string would double-escape or leak.
pub fn to_plain_text(value: &Value, settings: &RuntimeSettings) -> Result<String> {
    if let Value::Markup(m) = value {
        return Err(EvalError::TypeMismatch {
            expected: "a plain string",
            actual: format!("markup ({})", m.format.name()),
            blame: None,
            location: None,
        });
    }
    scalar_to_text(value, settings)
}

/// Forced plain-text coercion: markup falls back to its plain source, or
/// to the escaped text when the source is unknown.
pub fn to_plain_text_forced(value: &Value, settings: &RuntimeSettings) -> Result<String> {
    if let Value::Markup(m) = value {
        return Ok(match &m.plain {
            Some(plain) => plain.to_string(),
            None => m.markup.to_string(),
        });
    }
    scalar_to_text(value, settings)
}

fn scalar_to_text(value: &Value, settings: &RuntimeSettings) -> Result<String> {
    if let Some(s) = value.as_string() {
        return Ok(s.into_owned());
    }
    if let Some(n) = value.as_number() {
        return format::format_number(n, settings);
    }
    if let Some(d) = value.as_date() {
        return format::format_date(d, settings);
    }
    if let Some(b) = value.as_bool() {
        return format::format_bool(b, settings);
    }
    Err(EvalError::TypeMismatch {
        expected: "a string or something automatically convertible to string \
                   (number, date, or boolean)",
        actual: value.type_name(),
        blame: None,
        location: None,
    })
}

/// Emptiness, as tested by `?has_content` and the emptiness side of the
/// default operator family.
///
/// The capability checks run in a fixed order, so a value with several
/// capabilities answers by its most collection-like one.
pub fn is_empty(value: &Value) -> bool {
    if let Value::Object(o) = value {
        if let Some(empty) = o.is_empty_hint() {
            return empty;
        }
    }
    if let Value::Range(r) = value {
        return r.len() == Some(0);
    }
    if let Some(len) = value.seq_len() {
        return len == 0;
    }
    if let Some(s) = value.as_string() {
        return s.is_empty();
    }
    match value {
        Value::Markup(m) => return m.is_empty(),
        Value::Collection(c) => return c.iter_values().next().is_none(),
        _ => {}
    }
    if let Some(empty) = value.hash_is_empty() {
        return empty;
    }
    if value.as_number().is_some() || value.as_date().is_some() || value.as_bool().is_some() {
        return false;
    }
    true
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::output::HtmlFormat;
    use crate::value::Number;

    fn settings() -> RuntimeSettings {
        RuntimeSettings::default()
    }

    #[test]
    fn test_to_bool_rejects_non_booleans() {
        assert!(to_bool(&Value::Bool(true)).unwrap());
        assert!(!to_bool(&Value::Nothing).unwrap());
        assert!(matches!(
            to_bool(&Value::int(1)).unwrap_err(),
            EvalError::TypeMismatch { .. }
        ));
    }

    #[test]
    fn test_three_text_coercions_differ_on_markup() {
        let m = Value::Markup(Markup::from_plain(Arc::new(HtmlFormat), "a<b"));
        assert!(matches!(
            to_text_or_markup(&m, &settings()).unwrap(),
            CoercedText::Markup(_)
        ));
        assert!(to_plain_text(&m, &settings()).is_err());
        assert_eq!(to_plain_text_forced(&m, &settings()).unwrap(), "a<b");
    }

    #[test]
    fn test_scalar_text_coercion() {
        assert_eq!(
            to_plain_text(&Value::int(7), &settings()).unwrap(),
            "7"
        );
        assert_eq!(
            to_plain_text(&Value::str("hi"), &settings()).unwrap(),
            "hi"
        );
        // Booleans need an explicit format.
        assert!(to_plain_text(&Value::Bool(true), &settings()).is_err());
    }

    #[test]
    fn test_is_empty_precedence() {
        assert!(is_empty(&Value::Nothing));
        assert!(is_empty(&Value::str("")));
        assert!(!is_empty(&Value::str("x")));
        assert!(is_empty(&Value::seq(vec![])));
        assert!(!is_empty(&Value::seq(vec![Value::int(1)])));
        assert!(is_empty(&Value::hash(vec![])));
        assert!(!is_empty(&Value::Number(Number::Int(0))));
        assert!(!is_empty(&Value::Bool(false)));

        #[derive(Debug)]
        struct AlwaysEmpty;
        impl crate::value::ObjectValue for AlwaysEmpty {
            fn as_string(&self) -> Option<String> {
                Some("text".to_string())
            }
            fn is_empty_hint(&self) -> Option<bool> {
                Some(true)
            }
        }
        // The hint wins over the non-empty string capability.
        assert!(is_empty(&Value::Object(Arc::new(AlwaysEmpty))));
    }

    #[test]
    fn test_is_empty_on_markup_and_collections() {
        let blank = Value::Markup(Markup::from_plain(Arc::new(HtmlFormat), ""));
        assert!(is_empty(&blank));
        let text = Value::Markup(Markup::from_plain(Arc::new(HtmlFormat), "x"));
        assert!(!is_empty(&text));

        #[derive(Debug)]
        struct Items(Vec<Value>);
        impl crate::value::CollectionValue for Items {
            fn iter_values(&self) -> Box<dyn Iterator<Item = Value> + '_> {
                Box::new(self.0.iter().cloned())
            }
        }
        assert!(is_empty(&Value::Collection(Arc::new(Items(vec![])))));
        assert!(!is_empty(&Value::Collection(Arc::new(Items(vec![
            Value::int(1)
        ])))));
    }
}
