//! Constructors, conversions, and equality for [`Value`]

use std::sync::Arc;

use indexmap::IndexMap;

use super::{Number, Value};

impl Value {
    /// A string value.
    pub fn str(s: impl Into<Arc<str>>) -> Self {
        Value::Str(s.into())
    }

    /// An integer number value.
    pub fn int(n: i64) -> Self {
        Value::Number(Number::Int(n))
    }

    /// A float number value.
    pub fn float(f: f64) -> Self {
        Value::Number(Number::Float(f))
    }

    /// A sequence value.
    pub fn seq(items: Vec<Value>) -> Self {
        Value::Seq(Arc::new(items))
    }

    /// A hash value with source-ordered keys.
    pub fn hash(pairs: impl IntoIterator<Item = (String, Value)>) -> Self {
        Value::Hash(Arc::new(pairs.into_iter().collect::<IndexMap<_, _>>()))
    }

    /// The empty hash.
    pub fn empty_hash() -> Self {
        Value::Hash(Arc::new(IndexMap::new()))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::int(n)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::str(s)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::str(s)
    }
}

impl From<Number> for Value {
    fn from(n: Number) -> Self {
        Value::Number(n)
    }
}

/// Structural equality for data variants; pointer identity for callable
/// and host-object variants.
///
/// This is *representation* equality (used by literal memoization and
/// tests), not the template-language `==`, which lives in
/// [`crate::compare`].
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Nothing, Value::Nothing) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Markup(a), Value::Markup(b)) => a == b,
            (Value::Date(a), Value::Date(b)) => a == b,
            (Value::Seq(a), Value::Seq(b)) => a == b,
            (Value::Hash(a), Value::Hash(b)) => {
                a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| x == y)
            }
            (Value::Range(a), Value::Range(b)) => a == b,
            (Value::Collection(a), Value::Collection(b)) => Arc::ptr_eq(a, b),
            (Value::Function(a), Value::Function(b)) => Arc::ptr_eq(a, b),
            (Value::Directive(a), Value::Directive(b)) => Arc::ptr_eq(a, b),
            (Value::Macro(a), Value::Macro(b)) => Arc::ptr_eq(a, b),
            (Value::Object(a), Value::Object(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}
