//! Error types for template evaluation and template construction

use std::sync::Arc;

use thiserror::Error;

use crate::arith::ArithmeticError;
use crate::ast::Span;

/// Where in which template something went wrong.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLocation {
    /// Lookup name of the template
    pub template: Arc<str>,

    /// Position within the template source
    pub span: Span,
}

impl std::fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "in template \"{}\" at line {}, column {}",
            self.template, self.span.begin_line, self.span.begin_col
        )
    }
}

/// Evaluation-time error taxonomy.
///
/// Control flow (`break`/`continue`/`return`) is *not* represented here;
/// it travels through [`crate::exec::Flow`] and is consumed at its defining
/// construct. Everything in this enum is a genuine failure.
#[derive(Error, Debug)]
pub enum EvalError {
    /// An expression evaluated to no value where a value was required.
    #[error("{}", invalid_reference_message(.blame, .tip, .location))]
    InvalidReference {
        /// Canonical form of the blamed expression
        blame: Option<String>,
        /// Kind-specific hint for the template author
        tip: Option<&'static str>,
        /// Source position of the blamed expression
        location: Option<SourceLocation>,
    },

    /// The no-detail variant of [`EvalError::InvalidReference`], produced
    /// while the fast-invalid-reference flag is set.
    #[error("Invalid reference")]
    InvalidReferenceFast,

    /// A value did not have the capability an operation required.
    #[error(
        "Type mismatch: expected {expected}, but {} is {actual}{}",
        .blame.as_deref().map(|b| format!("`{b}`")).unwrap_or_else(|| "the value".to_string()),
        .location.as_ref().map(|l| format!(" ({l})")).unwrap_or_default()
    )]
    TypeMismatch {
        /// Description of the expected capability set
        expected: &'static str,
        /// Descriptive type name of the actual value
        actual: String,
        /// Canonical form of the blamed expression
        blame: Option<String>,
        /// Source position of the blamed expression
        location: Option<SourceLocation>,
    },

    /// An arithmetic-engine failure, wrapped with blame information.
    #[error("Arithmetic error{}: {source}", .location.as_ref().map(|l| format!(" ({l})")).unwrap_or_default())]
    Arithmetic {
        /// The engine-level failure
        #[source]
        source: ArithmeticError,
        /// Source position of the failing operation
        location: Option<SourceLocation>,
    },

    /// The template raised `#stop`.
    #[error("Template processing stopped: {message}{}", .location.as_ref().map(|l| format!(" ({l})")).unwrap_or_default())]
    Stop {
        /// The message given to `#stop`, or a default
        message: String,
        /// Source position of the `#stop` directive
        location: Option<SourceLocation>,
    },

    /// The externally-set interrupt flag was observed.
    #[error("Template processing was interrupted")]
    Interrupted,

    /// A call was attempted on a value that is not callable.
    #[error("Cannot call {actual}{}", .location.as_ref().map(|l| format!(" ({l})")).unwrap_or_default())]
    Uncallable {
        /// Descriptive type name of the value
        actual: String,
        /// Source position of the call
        location: Option<SourceLocation>,
    },

    /// Macro, function, or builtin arguments did not match the declaration.
    #[error("Invalid arguments to {callee}: {message}{}", .location.as_ref().map(|l| format!(" ({l})")).unwrap_or_default())]
    InvalidArguments {
        /// Name of the callee
        callee: String,
        /// What was wrong
        message: String,
        /// Source position of the call
        location: Option<SourceLocation>,
    },

    /// Macro and function calls nested deeper than the configured limit.
    #[error("Call depth limit of {limit} exceeded{}", .location.as_ref().map(|l| format!(" ({l})")).unwrap_or_default())]
    CallDepthExceeded {
        /// The configured limit
        limit: usize,
        /// Source position of the call that crossed the limit
        location: Option<SourceLocation>,
    },

    /// A value could not be formatted with the active format settings.
    #[error("Formatting failed: {message}{}", .location.as_ref().map(|l| format!(" ({l})")).unwrap_or_default())]
    Format {
        /// What was wrong
        message: String,
        /// Source position of the formatted expression
        location: Option<SourceLocation>,
    },

    /// A condition that indicates a bug in the parser front end or in frond
    /// itself, such as a control-flow signal escaping its construct.
    #[error("Internal error (this indicates a bug in the template front end): {message}")]
    Internal {
        /// Diagnostic description
        message: String,
    },
}

fn invalid_reference_message(
    blame: &Option<String>,
    tip: &Option<&'static str>,
    location: &Option<SourceLocation>,
) -> String {
    let mut msg = match blame {
        Some(b) => format!("The following has evaluated to nothing or missing: {b}"),
        None => "An expression has evaluated to nothing or missing".to_string(),
    };
    if let Some(loc) = location {
        msg.push_str(&format!(" ({loc})"));
    }
    if let Some(tip) = tip {
        msg.push_str(&format!("\nTip: {tip}"));
    }
    msg
}

impl EvalError {
    /// Attach a source location if none is set yet.
    ///
    /// The innermost frame that knows a span calls this; outer frames leave
    /// an already-blamed error alone.
    pub fn at(self, loc: SourceLocation) -> Self {
        match self {
            EvalError::InvalidReference {
                blame,
                tip,
                location: None,
            } => EvalError::InvalidReference {
                blame,
                tip,
                location: Some(loc),
            },
            EvalError::TypeMismatch {
                expected,
                actual,
                blame,
                location: None,
            } => EvalError::TypeMismatch {
                expected,
                actual,
                blame,
                location: Some(loc),
            },
            EvalError::Arithmetic {
                source,
                location: None,
            } => EvalError::Arithmetic {
                source,
                location: Some(loc),
            },
            EvalError::Stop {
                message,
                location: None,
            } => EvalError::Stop {
                message,
                location: Some(loc),
            },
            EvalError::Uncallable {
                actual,
                location: None,
            } => EvalError::Uncallable {
                actual,
                location: Some(loc),
            },
            EvalError::InvalidArguments {
                callee,
                message,
                location: None,
            } => EvalError::InvalidArguments {
                callee,
                message,
                location: Some(loc),
            },
            EvalError::Format {
                message,
                location: None,
            } => EvalError::Format {
                message,
                location: Some(loc),
            },
            EvalError::CallDepthExceeded {
                limit,
                location: None,
            } => EvalError::CallDepthExceeded {
                limit,
                location: Some(loc),
            },
            other => other,
        }
    }

    /// Attach a blamed expression (its canonical form) if none is set yet.
    /// Only the variants that describe a failing expression carry blame.
    pub fn blamed(self, with: impl FnOnce() -> String) -> Self {
        match self {
            EvalError::InvalidReference {
                blame: None,
                tip,
                location,
            } => EvalError::InvalidReference {
                blame: Some(with()),
                tip,
                location,
            },
            EvalError::TypeMismatch {
                expected,
                actual,
                blame: None,
                location,
            } => EvalError::TypeMismatch {
                expected,
                actual,
                blame: Some(with()),
                location,
            },
            other => other,
        }
    }

    /// Whether this is either flavor of invalid-reference error.
    pub fn is_invalid_reference(&self) -> bool {
        matches!(
            self,
            EvalError::InvalidReference { .. } | EvalError::InvalidReferenceFast
        )
    }
}

/// Template-construction-time error taxonomy.
///
/// These are the errors the external parser front end reports to template
/// authors before execution ever begins: unknown `#setting` keys, unknown
/// special variables, and directives in places the grammar cannot reject
/// on its own.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ParseError {
    /// `#setting` with a key that does not exist at all.
    #[error("{}", unknown_name_message("setting", .name, .suggestion, .supported))]
    UnknownSetting {
        /// The key as written
        name: String,
        /// A likely-intended correction, if one was found
        suggestion: Option<String>,
        /// The full list of runtime-changeable keys
        supported: &'static [&'static str],
    },

    /// `#setting` with a key that exists, but only at configuration-build
    /// time.
    #[error(
        "The \"{name}\" setting can only be set in the configuration, \
         not inside a template with #setting"
    )]
    ConfigOnlySetting {
        /// The key as written
        name: String,
    },

    /// A `.name` special variable that is not in the closed namespace.
    #[error("{}", unknown_name_message("special variable", .name, .suggestion, .supported))]
    UnknownSpecialVariable {
        /// The name as written
        name: String,
        /// A likely-intended correction, if one was found
        suggestion: Option<String>,
        /// The full list of supported names
        supported: &'static [&'static str],
    },

    /// A `?name` builtin that frond does not provide.
    #[error("{}", unknown_name_message("builtin", .name, .suggestion, .supported))]
    UnknownBuiltin {
        /// The name as written
        name: String,
        /// A likely-intended correction, if one was found
        suggestion: Option<String>,
        /// The full list of supported names
        supported: &'static [&'static str],
    },

    /// A directive used outside the construct that gives it meaning.
    #[error("#{directive} is only allowed {requirement}")]
    MisplacedDirective {
        /// The directive name, without `#`
        directive: &'static str,
        /// Where it would have been legal
        requirement: &'static str,
    },

    /// A macro or function declared two parameters with the same name, or a
    /// required parameter after an optional one.
    #[error("Invalid parameter list of {callee}: {message}")]
    InvalidParameterList {
        /// Name of the macro or function
        callee: String,
        /// What was wrong
        message: String,
    },
}

fn unknown_name_message(
    what: &str,
    name: &str,
    suggestion: &Option<String>,
    supported: &'static [&'static str],
) -> String {
    let mut msg = format!("Unknown {what} name: \"{name}\".");
    match suggestion {
        Some(s) => {
            msg.push_str(&format!("\nThe correct name is: {s}"));
        }
        None => {
            msg.push_str("\nThe supported names are: ");
            msg.push_str(&supported.join(", "));
        }
    }
    msg
}

/// Result type alias for evaluation.
pub type Result<T> = std::result::Result<T, EvalError>;

/// Convert a snake_case name to camelCase, for "did you mean" suggestions.
pub(crate) fn snake_to_camel(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper_next = false;
    for ch in name.chars() {
        if ch == '_' {
            upper_next = true;
        } else if upper_next {
            out.extend(ch.to_uppercase());
            upper_next = false;
        } else {
            out.push(ch);
        }
    }
    out
}

/// Convert a camelCase name to snake_case, for "did you mean" suggestions.
pub(crate) fn camel_to_snake(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 2);
    for ch in name.chars() {
        if ch.is_ascii_uppercase() {
            out.push('_');
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

/// Suggest a correction for `name` against a sorted list of valid names.
///
/// Only convention mistakes are corrected (snake_case written where
/// camelCase was meant); anything fancier is left to the full name list.
pub(crate) fn suggest_name(name: &str, valid: &'static [&'static str]) -> Option<String> {
    if name.contains('_') {
        let camel = snake_to_camel(name);
        if valid.contains(&camel.as_str()) {
            return Some(camel);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snake_to_camel() {
        assert_eq!(snake_to_camel("number_format"), "numberFormat");
        assert_eq!(snake_to_camel("locale"), "locale");
        assert_eq!(snake_to_camel("url_escaping_charset"), "urlEscapingCharset");
    }

    #[test]
    fn test_camel_to_snake() {
        assert_eq!(camel_to_snake("upperCase"), "upper_case");
        assert_eq!(camel_to_snake("trim"), "trim");
    }

    #[test]
    fn test_suggest_name_finds_camel_case() {
        static VALID: &[&str] = &["numberFormat", "locale"];
        assert_eq!(
            suggest_name("number_format", VALID),
            Some("numberFormat".to_string())
        );
        assert_eq!(suggest_name("nmber_format", VALID), None);
        assert_eq!(suggest_name("locale", VALID), None);
    }

    #[test]
    fn test_at_fills_location_once() {
        let loc1 = SourceLocation {
            template: "a.ftl".into(),
            span: crate::ast::Span::new(1, 2, 1, 5),
        };
        let loc2 = SourceLocation {
            template: "b.ftl".into(),
            span: crate::ast::Span::new(9, 9, 9, 9),
        };
        let err = EvalError::Stop {
            message: "x".into(),
            location: None,
        }
        .at(loc1.clone())
        .at(loc2);
        match err {
            EvalError::Stop { location, .. } => assert_eq!(location, Some(loc1)),
            _ => panic!("expected Stop"),
        }
    }

    #[test]
    fn test_invalid_reference_message_has_tip() {
        let err = EvalError::InvalidReference {
            blame: Some("user.name".to_string()),
            tip: Some("check the data model"),
            location: None,
        };
        let msg = err.to_string();
        assert!(msg.contains("user.name"));
        assert!(msg.contains("Tip:"));
    }
}
