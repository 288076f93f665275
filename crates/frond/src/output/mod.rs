//! Output formats and markup values
//!
//! An [`OutputFormat`] decides what auto-escaping means for a template's
//! output. The evaluator only relies on the contract here: escape plain
//! text, construct markup from already-escaped source, concatenate, and
//! report emptiness. Concrete escaping beyond the bundled minimal HTML
//! implementation is a collaborator's job.

use std::sync::Arc;

/// The escaping contract of one output language.
pub trait OutputFormat: std::fmt::Debug + Send + Sync {
    /// Format name, like `"plainText"` or `"HTML"`. Two formats are the
    /// same format iff their names are equal.
    fn name(&self) -> &str;

    /// Whether values interpolated into this format need escaping at all.
    fn is_markup(&self) -> bool;

    /// Escape plain text into this format.
    fn escape(&self, plain: &str) -> String;
}

/// A chunk of output that is already in escaped form.
///
/// Carries the originating plain text when it was produced by escaping, so
/// it can be re-escaped into a different format later.
#[derive(Debug, Clone)]
pub struct Markup {
    /// The format this markup belongs to
    pub format: Arc<dyn OutputFormat>,
    /// The escaped text
    pub markup: Arc<str>,
    /// The plain source text, when known
    pub plain: Option<Arc<str>>,
}

impl Markup {
    /// Wrap already-escaped markup (the "from markup" constructor).
    pub fn from_markup(format: Arc<dyn OutputFormat>, markup: impl Into<Arc<str>>) -> Self {
        Markup {
            format,
            markup: markup.into(),
            plain: None,
        }
    }

    /// Escape plain text into markup, remembering the source.
    pub fn from_plain(format: Arc<dyn OutputFormat>, plain: &str) -> Self {
        Markup {
            markup: format.escape(plain).into(),
            plain: Some(plain.into()),
            format,
        }
    }

    /// Whether this markup renders to nothing.
    pub fn is_empty(&self) -> bool {
        self.markup.is_empty()
    }

    /// Whether `other` is in the same format.
    pub fn same_format(&self, other: &dyn OutputFormat) -> bool {
        self.format.name() == other.name()
    }

    /// Concatenate two markup chunks of the same format; `None` when the
    /// formats differ and neither side has a plain source to re-escape.
    pub fn concat(&self, other: &Markup) -> Option<Markup> {
        if self.same_format(other.format.as_ref()) {
            let mut combined = String::with_capacity(self.markup.len() + other.markup.len());
            combined.push_str(&self.markup);
            combined.push_str(&other.markup);
            Some(Markup {
                format: Arc::clone(&self.format),
                markup: combined.into(),
                plain: None,
            })
        } else if let Some(plain) = &other.plain {
            self.concat(&Markup::from_plain(Arc::clone(&self.format), plain))
        } else if let Some(plain) = &self.plain {
            Markup::from_plain(Arc::clone(&other.format), plain).concat(other)
        } else {
            None
        }
    }
}

impl PartialEq for Markup {
    fn eq(&self, other: &Self) -> bool {
        self.format.name() == other.format.name() && self.markup == other.markup
    }
}

/// The non-escaping format; `escape` is the identity.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainTextFormat;

impl OutputFormat for PlainTextFormat {
    fn name(&self) -> &str {
        "plainText"
    }

    fn is_markup(&self) -> bool {
        false
    }

    fn escape(&self, plain: &str) -> String {
        plain.to_string()
    }
}

/// Minimal HTML escaping: `& < > " '`.
#[derive(Debug, Default, Clone, Copy)]
pub struct HtmlFormat;

impl OutputFormat for HtmlFormat {
    fn name(&self) -> &str {
        "HTML"
    }

    fn is_markup(&self) -> bool {
        true
    }

    fn escape(&self, plain: &str) -> String {
        let mut out = String::with_capacity(plain.len());
        for ch in plain.chars() {
            match ch {
                '&' => out.push_str("&amp;"),
                '<' => out.push_str("&lt;"),
                '>' => out.push_str("&gt;"),
                '"' => out.push_str("&quot;"),
                '\'' => out.push_str("&#39;"),
                other => out.push(other),
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html_escape() {
        assert_eq!(
            HtmlFormat.escape("a < b & \"c\""),
            "a &lt; b &amp; &quot;c&quot;"
        );
    }

    #[test]
    fn test_from_plain_remembers_source() {
        let m = Markup::from_plain(Arc::new(HtmlFormat), "a<b");
        assert_eq!(&*m.markup, "a&lt;b");
        assert_eq!(m.plain.as_deref(), Some("a<b"));
    }

    #[test]
    fn test_concat_same_format() {
        let html: Arc<dyn OutputFormat> = Arc::new(HtmlFormat);
        let a = Markup::from_plain(Arc::clone(&html), "x<");
        let b = Markup::from_markup(Arc::clone(&html), "<b>y</b>");
        let joined = a.concat(&b).unwrap();
        assert_eq!(&*joined.markup, "x&lt;<b>y</b>");
    }

    #[test]
    fn test_concat_cross_format_via_plain_source() {
        let html: Arc<dyn OutputFormat> = Arc::new(HtmlFormat);
        let plain: Arc<dyn OutputFormat> = Arc::new(PlainTextFormat);
        let a = Markup::from_markup(Arc::clone(&html), "<b>x</b>");
        let b = Markup::from_plain(plain, "a<b");
        let joined = a.concat(&b).unwrap();
        assert_eq!(&*joined.markup, "<b>x</b>a&lt;b");

        // Neither side knows its plain source: no common format exists.
        let c = Markup::from_markup(Arc::new(PlainTextFormat), "raw");
        assert!(a.concat(&c).is_none());
    }
}
