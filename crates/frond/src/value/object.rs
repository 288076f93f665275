//! Host-object capability bridge
//!
//! The reflective object-wrapping layer is an external collaborator; the
//! evaluator only sees it through this trait. Every hook defaults to "not
//! supported", and one object may answer several hooks at once (a hash
//! that is also a sequence, for example).

use crate::value::{DateValue, Number, Value};

/// Capability hooks a wrapped host object may implement.
pub trait ObjectValue: std::fmt::Debug + Send + Sync {
    /// Descriptive type name for error messages.
    fn type_name(&self) -> &str {
        "a host object"
    }

    /// String capability.
    fn as_string(&self) -> Option<String> {
        None
    }

    /// Number capability.
    fn as_number(&self) -> Option<Number> {
        None
    }

    /// Boolean capability.
    fn as_bool(&self) -> Option<bool> {
        None
    }

    /// Date capability.
    fn as_date(&self) -> Option<DateValue> {
        None
    }

    /// Whether by-key lookup is supported. Implementors that return keyed
    /// values from [`ObjectValue::get_key`] must also return `true` here,
    /// so a missing key can be told apart from a missing capability.
    fn is_hash(&self) -> bool {
        false
    }

    /// By-key lookup; `None` is "no such key" when [`ObjectValue::is_hash`]
    /// is true.
    fn get_key(&self, _key: &str) -> Option<Value> {
        None
    }

    /// Sequence size; `Some` enables indexed access and iteration.
    fn seq_len(&self) -> Option<usize> {
        None
    }

    /// Indexed access.
    fn get_index(&self, _index: usize) -> Option<Value> {
        None
    }

    /// Bean-like emptiness hook; consulted before any structural emptiness
    /// rule.
    fn is_empty_hint(&self) -> Option<bool> {
        None
    }
}
