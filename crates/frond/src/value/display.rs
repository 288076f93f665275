//! Debug formatting for [`Value`]

use std::fmt;

use super::{DateKind, MacroKind, Number, Value};

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nothing => write!(f, "nothing"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Number(Number::Int(n)) => write!(f, "{n}"),
            Value::Number(Number::Float(x)) => write!(f, "{x}"),
            Value::Str(s) => write!(f, "{s:?}"),
            Value::Markup(m) => write!(f, "markup({}, {:?})", m.format.name(), m.markup),
            Value::Date(d) => {
                let kind = match d.kind {
                    DateKind::Date => "date",
                    DateKind::Time => "time",
                    DateKind::DateTime => "datetime",
                    DateKind::Unknown => "date?",
                };
                write!(f, "{kind}({})", d.when)
            }
            Value::Seq(items) => f.debug_list().entries(items.iter()).finish(),
            Value::Hash(map) => f.debug_map().entries(map.iter()).finish(),
            Value::Range(r) => match r.len() {
                Some(n) => write!(f, "range({}, step {}, len {n})", r.begin(), r.step()),
                None => write!(f, "range({}..)", r.begin()),
            },
            Value::Collection(_) => write!(f, "<collection>"),
            Value::Function(func) => write!(f, "<function {}>", func.name()),
            Value::Directive(dir) => write!(f, "<directive {}>", dir.name()),
            Value::Macro(m) => match m.kind {
                MacroKind::Macro => write!(f, "<macro {}>", m.name),
                MacroKind::Function => write!(f, "<function {}>", m.name),
            },
            Value::Object(o) => write!(f, "<{}>", o.type_name()),
        }
    }
}
