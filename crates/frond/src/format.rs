//! Scalar formatting
//!
//! Turns numbers, booleans, and date-like values into text under the
//! active runtime settings. All failures are [`EvalError::Format`] with a
//! message the template author can act on.

use time::format_description;

use crate::error::EvalError;
use crate::settings::RuntimeSettings;
use crate::value::{DateKind, DateValue, Number};

/// Format a number under the active `numberFormat`.
///
/// `"c"` is the computer format (round-trippable, locale-independent);
/// `"number"` is the locale-default format. Other format strings are not
/// supported by the bundled formatter.
pub fn format_number(n: Number, settings: &RuntimeSettings) -> Result<String, EvalError> {
    match settings.number_format.as_str() {
        "c" | "number" => Ok(number_to_text(n)),
        other => Err(EvalError::Format {
            message: format!(
                "unsupported number format {other:?}; the supported formats are \"number\" and \"c\""
            ),
            location: None,
        }),
    }
}

/// The computer format of a number, also used by the `?c` builtin
/// regardless of the `numberFormat` setting.
pub fn number_to_text(n: Number) -> String {
    match n {
        Number::Int(i) => i.to_string(),
        Number::Float(f) => f.to_string(),
    }
}

/// Format a boolean for interpolation. Requires an explicit
/// `booleanFormat` pair; booleans have no universal written form.
pub fn format_bool(b: bool, settings: &RuntimeSettings) -> Result<String, EvalError> {
    match settings.boolean_pair() {
        Some((t, f)) => Ok(if b { t } else { f }.to_string()),
        None => Err(EvalError::Format {
            message: "cannot interpolate a boolean without a booleanFormat setting, \
                      like \"yes,no\"; or use ?string or ?c"
                .to_string(),
            location: None,
        }),
    }
}

/// The `?string` form of a boolean: the `booleanFormat` pair when set,
/// `true`/`false` otherwise.
pub fn bool_to_text(b: bool, settings: &RuntimeSettings) -> String {
    match settings.boolean_pair() {
        Some((t, f)) => if b { t } else { f }.to_string(),
        None => if b { "true" } else { "false" }.to_string(),
    }
}

/// Format a date-like value under the format setting matching its kind.
pub fn format_date(d: DateValue, settings: &RuntimeSettings) -> Result<String, EvalError> {
    let pattern = match d.kind {
        DateKind::Date => &settings.date_format,
        DateKind::Time => &settings.time_format,
        DateKind::DateTime => &settings.date_time_format,
        DateKind::Unknown => {
            return Err(EvalError::Format {
                message: "the date-like value has no known kind; refine it to a date, \
                          a time, or a date-time before formatting"
                    .to_string(),
                location: None,
            })
        }
    };
    let desc = format_description::parse_borrowed::<2>(pattern).map_err(|e| EvalError::Format {
        message: format!("bad date format {pattern:?}: {e}"),
        location: None,
    })?;
    d.when.format(&desc).map_err(|e| EvalError::Format {
        message: format!("cannot format the date-like value with {pattern:?}: {e}"),
        location: None,
    })
}
