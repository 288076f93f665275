//! The `.name` special-variable namespace
//!
//! A closed set resolved at construction time. Unknown names are rejected
//! with the full supported list, and a snake_case spelling of a known
//! camelCase name gets a direct correction.

use crate::error::{suggest_name, ParseError};

/// The supported special variables, in the order of [`SpecialVar::NAMES`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecialVar {
    /// Whether auto-escaping is active for the current output format
    AutoEsc,
    /// Name of the template being executed
    CurrentTemplateName,
    /// The data-model root as a hash
    DataModel,
    /// Message of the error being handled (recovery blocks)
    Error,
    /// The globals scope as a hash
    Globals,
    /// Language part of the locale
    Lang,
    /// Locale tag as a string
    Locale,
    /// Locale as an object value
    LocaleObject,
    /// The innermost local scope as a hash
    Locals,
    /// The main namespace as a hash
    Main,
    /// Name of the top-level template
    MainTemplateName,
    /// The current namespace as a hash
    Namespace,
    /// The current date-time
    Now,
    /// The output encoding setting
    OutputEncoding,
    /// Name of the active output format
    OutputFormat,
    /// The URL escaping charset setting
    UrlEscapingCharset,
    /// Variables as visible from the current position, as a hash
    Vars,
    /// The engine version string
    Version,
}

impl SpecialVar {
    /// All supported names, sorted.
    pub const NAMES: &'static [&'static str] = &[
        "autoEsc",
        "currentTemplateName",
        "dataModel",
        "error",
        "globals",
        "lang",
        "locale",
        "localeObject",
        "locals",
        "main",
        "mainTemplateName",
        "namespace",
        "now",
        "outputEncoding",
        "outputFormat",
        "urlEscapingCharset",
        "vars",
        "version",
    ];

    /// Resolve a written name.
    pub fn from_name(name: &str) -> Result<Self, ParseError> {
        let var = match name {
            "autoEsc" => SpecialVar::AutoEsc,
            "currentTemplateName" => SpecialVar::CurrentTemplateName,
            "dataModel" => SpecialVar::DataModel,
            "error" => SpecialVar::Error,
            "globals" => SpecialVar::Globals,
            "lang" => SpecialVar::Lang,
            "locale" => SpecialVar::Locale,
            "localeObject" => SpecialVar::LocaleObject,
            "locals" => SpecialVar::Locals,
            "main" => SpecialVar::Main,
            "mainTemplateName" => SpecialVar::MainTemplateName,
            "namespace" => SpecialVar::Namespace,
            "now" => SpecialVar::Now,
            "outputEncoding" => SpecialVar::OutputEncoding,
            "outputFormat" => SpecialVar::OutputFormat,
            "urlEscapingCharset" => SpecialVar::UrlEscapingCharset,
            "vars" => SpecialVar::Vars,
            "version" => SpecialVar::Version,
            _ => {
                return Err(ParseError::UnknownSpecialVariable {
                    name: name.to_string(),
                    suggestion: suggest_name(name, Self::NAMES),
                    supported: Self::NAMES,
                })
            }
        };
        Ok(var)
    }

    /// The canonical written name.
    pub fn name(self) -> &'static str {
        match self {
            SpecialVar::AutoEsc => "autoEsc",
            SpecialVar::CurrentTemplateName => "currentTemplateName",
            SpecialVar::DataModel => "dataModel",
            SpecialVar::Error => "error",
            SpecialVar::Globals => "globals",
            SpecialVar::Lang => "lang",
            SpecialVar::Locale => "locale",
            SpecialVar::LocaleObject => "localeObject",
            SpecialVar::Locals => "locals",
            SpecialVar::Main => "main",
            SpecialVar::MainTemplateName => "mainTemplateName",
            SpecialVar::Namespace => "namespace",
            SpecialVar::Now => "now",
            SpecialVar::OutputEncoding => "outputEncoding",
            SpecialVar::OutputFormat => "outputFormat",
            SpecialVar::UrlEscapingCharset => "urlEscapingCharset",
            SpecialVar::Vars => "vars",
            SpecialVar::Version => "version",
        }
    }
}
