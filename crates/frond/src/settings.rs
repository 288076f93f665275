//! Runtime-changeable settings
//!
//! `#setting` may change a small allow-listed set of keys for the rest of
//! the current invocation. Keys that exist but are fixed at configuration
//! time get their own error, so the author learns *where* to set them
//! rather than just "unknown name".

use crate::error::{suggest_name, ParseError};

/// The runtime-changeable setting keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingKey {
    /// `locale`
    Locale,
    /// `numberFormat`
    NumberFormat,
    /// `booleanFormat`
    BooleanFormat,
    /// `dateFormat`
    DateFormat,
    /// `timeFormat`
    TimeFormat,
    /// `dateTimeFormat`
    DateTimeFormat,
    /// `timeZone`
    TimeZone,
    /// `outputEncoding`
    OutputEncoding,
    /// `urlEscapingCharset`
    UrlEscapingCharset,
}

impl SettingKey {
    /// All runtime-changeable names, sorted.
    pub const NAMES: &'static [&'static str] = &[
        "booleanFormat",
        "dateFormat",
        "dateTimeFormat",
        "locale",
        "numberFormat",
        "outputEncoding",
        "timeFormat",
        "timeZone",
        "urlEscapingCharset",
    ];

    /// Keys that exist but can only be set when building the configuration.
    pub const CONFIG_ONLY: &'static [&'static str] = &["autoEscapingPolicy", "outputFormat"];

    /// Resolve a written `#setting` key.
    pub fn parse(name: &str) -> Result<Self, ParseError> {
        let key = match name {
            "locale" => SettingKey::Locale,
            "numberFormat" => SettingKey::NumberFormat,
            "booleanFormat" => SettingKey::BooleanFormat,
            "dateFormat" => SettingKey::DateFormat,
            "timeFormat" => SettingKey::TimeFormat,
            "dateTimeFormat" => SettingKey::DateTimeFormat,
            "timeZone" => SettingKey::TimeZone,
            "outputEncoding" => SettingKey::OutputEncoding,
            "urlEscapingCharset" => SettingKey::UrlEscapingCharset,
            _ if Self::CONFIG_ONLY.contains(&name) => {
                return Err(ParseError::ConfigOnlySetting {
                    name: name.to_string(),
                })
            }
            _ => {
                return Err(ParseError::UnknownSetting {
                    name: name.to_string(),
                    suggestion: suggest_name(name, Self::NAMES)
                        .or_else(|| suggest_name(name, Self::CONFIG_ONLY)),
                    supported: Self::NAMES,
                })
            }
        };
        Ok(key)
    }

    /// The canonical written name.
    pub fn name(self) -> &'static str {
        match self {
            SettingKey::Locale => "locale",
            SettingKey::NumberFormat => "numberFormat",
            SettingKey::BooleanFormat => "booleanFormat",
            SettingKey::DateFormat => "dateFormat",
            SettingKey::TimeFormat => "timeFormat",
            SettingKey::DateTimeFormat => "dateTimeFormat",
            SettingKey::TimeZone => "timeZone",
            SettingKey::OutputEncoding => "outputEncoding",
            SettingKey::UrlEscapingCharset => "urlEscapingCharset",
        }
    }
}

/// The per-invocation snapshot of the runtime-changeable settings.
///
/// Cloned from the [`crate::context::EvalContext`] when an environment is
/// created; `#setting` mutates the snapshot, never the shared context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeSettings {
    /// Locale tag, like `en_US`
    pub locale: String,
    /// Number format: `"number"` for locale-default, `"c"` for the
    /// computer format
    pub number_format: String,
    /// Boolean format as a `"true word,false word"` pair, or empty to
    /// make boolean interpolation an error
    pub boolean_format: String,
    /// Date-only format description
    pub date_format: String,
    /// Time-only format description
    pub time_format: String,
    /// Date-time format description
    pub date_time_format: String,
    /// Time zone name
    pub time_zone: String,
    /// Output encoding, if set
    pub output_encoding: Option<String>,
    /// URL escaping charset, if set
    pub url_escaping_charset: Option<String>,
}

impl Default for RuntimeSettings {
    fn default() -> Self {
        RuntimeSettings {
            locale: "en_US".to_string(),
            number_format: "number".to_string(),
            boolean_format: String::new(),
            date_format: "[year]-[month]-[day]".to_string(),
            time_format: "[hour]:[minute]:[second]".to_string(),
            date_time_format: "[year]-[month]-[day] [hour]:[minute]:[second]".to_string(),
            time_zone: "UTC".to_string(),
            output_encoding: None,
            url_escaping_charset: None,
        }
    }
}

impl RuntimeSettings {
    /// Apply a `#setting` change.
    pub fn set(&mut self, key: SettingKey, value: String) {
        match key {
            SettingKey::Locale => self.locale = value,
            SettingKey::NumberFormat => self.number_format = value,
            SettingKey::BooleanFormat => self.boolean_format = value,
            SettingKey::DateFormat => self.date_format = value,
            SettingKey::TimeFormat => self.time_format = value,
            SettingKey::DateTimeFormat => self.date_time_format = value,
            SettingKey::TimeZone => self.time_zone = value,
            SettingKey::OutputEncoding => self.output_encoding = Some(value),
            SettingKey::UrlEscapingCharset => self.url_escaping_charset = Some(value),
        }
    }

    /// The `booleanFormat` split into its true/false words, when set to a
    /// well-formed pair.
    pub fn boolean_pair(&self) -> Option<(&str, &str)> {
        let (t, f) = self.boolean_format.split_once(',')?;
        if t.is_empty() {
            return None;
        }
        Some((t, f))
    }

    /// The language part of the locale tag (`en` of `en_US`).
    pub fn lang(&self) -> &str {
        self.locale
            .split(['_', '-'])
            .next()
            .unwrap_or(&self.locale)
    }
}
