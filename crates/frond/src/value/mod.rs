//! Runtime value representation
//!
//! The evaluator never touches host types directly; everything it consumes
//! is a [`Value`], and every use site asks for the capability it needs
//! through the `as_*`/`get_*` accessors. A value that lacks the requested
//! capability yields `None`, which the caller turns into an orderly type
//! error.

mod callable;
mod display;
mod impls;
mod object;
mod range;

pub use callable::{CallArgs, DirectiveValue, FunctionValue, MacroKind, MacroParam, MacroValue};
pub use object::ObjectValue;
pub use range::{RangeValue, RangeSize};

use std::borrow::Cow;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::output::Markup;

/// A template-language number: either an exact integer or a float.
///
/// All computation on numbers goes through the
/// [`crate::arith::ArithmeticEngine`].
#[derive(Debug, Clone, Copy)]
pub enum Number {
    /// Exact integer
    Int(i64),
    /// IEEE double
    Float(f64),
}

impl Number {
    /// The value as an f64, widening integers.
    pub fn as_f64(self) -> f64 {
        match self {
            Number::Int(n) => n as f64,
            Number::Float(f) => f,
        }
    }

    /// The value as an i64, if it is an integer or an integral float.
    pub fn as_index(self) -> Option<i64> {
        match self {
            Number::Int(n) => Some(n),
            Number::Float(f) if f.fract() == 0.0 && f.is_finite() => Some(f as i64),
            Number::Float(_) => None,
        }
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Number::Int(a), Number::Int(b)) => a == b,
            (a, b) => a.as_f64() == b.as_f64(),
        }
    }
}

/// The sub-kind of a date-like value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateKind {
    /// Date only (no time part)
    Date,
    /// Time only (no date part)
    Time,
    /// Date and time
    DateTime,
    /// The producer did not say; unusable in comparisons and formatting
    /// until refined
    Unknown,
}

/// A date-like value: an instant plus a [`DateKind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateValue {
    /// The instant
    pub when: time::OffsetDateTime,
    /// Which parts of the instant are meaningful
    pub kind: DateKind,
}

/// Iterator-only value capability.
pub trait CollectionValue: std::fmt::Debug + Send + Sync {
    /// Iterate the values.
    ///
    /// Every evaluator operation that walks the collection starts one
    /// traversal, and `#list src as x` walks it exactly once. Separate
    /// operations (`?has_content`, then a loop) each start their own,
    /// so a source backed by a one-shot iterator should buffer
    /// internally if it can be referenced more than once.
    fn iter_values(&self) -> Box<dyn Iterator<Item = Value> + '_>;
}

/// Runtime value for the frond evaluator.
///
/// A closed set of variants, one per capability bundle. Host objects that
/// implement several capabilities at once come in through
/// [`Value::Object`].
#[derive(Clone)]
pub enum Value {
    /// The multi-typed "missing" value produced by a bare default operator:
    /// empty string, empty sequence, empty hash, boolean false.
    Nothing,

    /// Boolean
    Bool(bool),

    /// Number (integer or float)
    Number(Number),

    /// Plain text
    Str(Arc<str>),

    /// Pre-escaped markup in some output format
    Markup(Markup),

    /// Date-like value
    Date(DateValue),

    /// Indexed sequence
    Seq(Arc<Vec<Value>>),

    /// Hash with stable, source-ordered key iteration
    Hash(Arc<IndexMap<String, Value>>),

    /// Lazily-computed integer sequence
    Range(RangeValue),

    /// Iterator-only collection
    Collection(Arc<dyn CollectionValue>),

    /// Host-provided function
    Function(Arc<dyn FunctionValue>),

    /// Host-provided directive (writes to the output sink)
    Directive(Arc<dyn DirectiveValue>),

    /// Template-defined macro or function
    Macro(Arc<MacroValue>),

    /// Host object exposing a subset of capabilities
    Object(Arc<dyn ObjectValue>),
}

impl Value {
    /// Descriptive type name for error messages.
    pub fn type_name(&self) -> String {
        match self {
            Value::Nothing => "nothing".to_string(),
            Value::Bool(_) => "a boolean".to_string(),
            Value::Number(_) => "a number".to_string(),
            Value::Str(_) => "a string".to_string(),
            Value::Markup(m) => format!("markup ({})", m.format.name()),
            Value::Date(d) => match d.kind {
                DateKind::Date => "a date".to_string(),
                DateKind::Time => "a time".to_string(),
                DateKind::DateTime => "a date-time".to_string(),
                DateKind::Unknown => "a date-like value of unknown kind".to_string(),
            },
            Value::Seq(_) => "a sequence".to_string(),
            Value::Hash(_) => "a hash".to_string(),
            Value::Range(_) => "a range".to_string(),
            Value::Collection(_) => "a collection".to_string(),
            Value::Function(_) => "a function".to_string(),
            Value::Directive(_) => "a directive".to_string(),
            Value::Macro(m) => match m.kind {
                MacroKind::Macro => format!("macro {}", m.name),
                MacroKind::Function => format!("function {}", m.name),
            },
            Value::Object(o) => o.type_name().to_string(),
        }
    }

    // ═══════════════════════════════════════════════════════════════════
    // Scalar capabilities
    // ═══════════════════════════════════════════════════════════════════

    /// Boolean capability.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            Value::Nothing => Some(false),
            Value::Object(o) => o.as_bool(),
            _ => None,
        }
    }

    /// Number capability.
    pub fn as_number(&self) -> Option<Number> {
        match self {
            Value::Number(n) => Some(*n),
            Value::Object(o) => o.as_number(),
            _ => None,
        }
    }

    /// String capability. Markup is deliberately *not* string-capable;
    /// turning markup into text must go through the output-format contract.
    pub fn as_string(&self) -> Option<Cow<'_, str>> {
        match self {
            Value::Str(s) => Some(Cow::Borrowed(s)),
            Value::Nothing => Some(Cow::Borrowed("")),
            Value::Object(o) => o.as_string().map(Cow::Owned),
            _ => None,
        }
    }

    /// Date capability.
    pub fn as_date(&self) -> Option<DateValue> {
        match self {
            Value::Date(d) => Some(*d),
            Value::Object(o) => o.as_date(),
            _ => None,
        }
    }

    // ═══════════════════════════════════════════════════════════════════
    // Hash capability
    // ═══════════════════════════════════════════════════════════════════

    /// Whether by-key lookup is supported.
    pub fn is_hash(&self) -> bool {
        match self {
            Value::Hash(_) | Value::Nothing => true,
            Value::Object(o) => o.is_hash(),
            _ => false,
        }
    }

    /// Look up a key. `None` means "no such key" when [`Value::is_hash`]
    /// is true, and "not a hash" otherwise.
    pub fn get_key(&self, key: &str) -> Option<Value> {
        match self {
            Value::Hash(map) => map.get(key).cloned(),
            Value::Nothing => None,
            Value::Object(o) => o.get_key(key),
            _ => None,
        }
    }

    /// Extended-hash key iteration, in stable source order.
    pub fn hash_keys(&self) -> Option<Vec<String>> {
        match self {
            Value::Hash(map) => Some(map.keys().cloned().collect()),
            Value::Nothing => Some(Vec::new()),
            _ => None,
        }
    }

    /// Extended-hash value iteration, paired consistently with
    /// [`Value::hash_keys`].
    pub fn hash_values(&self) -> Option<Vec<Value>> {
        match self {
            Value::Hash(map) => Some(map.values().cloned().collect()),
            Value::Nothing => Some(Vec::new()),
            _ => None,
        }
    }

    /// Hash emptiness, where known.
    pub fn hash_is_empty(&self) -> Option<bool> {
        match self {
            Value::Hash(map) => Some(map.is_empty()),
            Value::Nothing => Some(true),
            _ => None,
        }
    }

    // ═══════════════════════════════════════════════════════════════════
    // Sequence / collection capabilities
    // ═══════════════════════════════════════════════════════════════════

    /// Whether indexed access is supported.
    pub fn is_seq(&self) -> bool {
        match self {
            Value::Seq(_) | Value::Range(_) | Value::Nothing => true,
            Value::Object(o) => o.seq_len().is_some(),
            _ => false,
        }
    }

    /// Sequence size. `None` for non-sequences and for right-unbounded
    /// ranges.
    pub fn seq_len(&self) -> Option<usize> {
        match self {
            Value::Seq(items) => Some(items.len()),
            Value::Range(r) => r.len(),
            Value::Nothing => Some(0),
            Value::Object(o) => o.seq_len(),
            _ => None,
        }
    }

    /// Indexed access. `None` means out of bounds or not a sequence.
    pub fn get_index(&self, index: usize) -> Option<Value> {
        match self {
            Value::Seq(items) => items.get(index).cloned(),
            Value::Range(r) => r.get(index).map(|n| Value::Number(Number::Int(n))),
            Value::Nothing => None,
            Value::Object(o) => o.get_index(index),
            _ => None,
        }
    }

    /// Iteration capability: sequences, ranges (lazily, including
    /// right-unbounded ones), collections, and the empty Nothing.
    pub fn try_iter(&self) -> Option<Box<dyn Iterator<Item = Value> + '_>> {
        match self {
            Value::Seq(items) => Some(Box::new(items.iter().cloned())),
            Value::Range(r) => Some(Box::new(r.iter().map(|n| Value::Number(Number::Int(n))))),
            Value::Collection(c) => Some(c.iter_values()),
            Value::Nothing => Some(Box::new(std::iter::empty())),
            Value::Object(o) => {
                let len = o.seq_len()?;
                let o = Arc::clone(o);
                Some(Box::new(
                    (0..len).map(move |i| o.get_index(i).unwrap_or(Value::Nothing)),
                ))
            }
            _ => None,
        }
    }
}
