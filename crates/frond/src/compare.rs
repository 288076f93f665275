//! Value comparison
//!
//! One routine serves `==`/`!=`, the relational operators, `#case`
//! matching, and `?seq_contains`, so all of them agree on what "equal"
//! means. The lenient flag turns a type mismatch into "not equal" for the
//! callers that search collections; the operators themselves stay strict.

use std::cmp::Ordering;

use crate::arith::ArithmeticEngine;
use crate::error::EvalError;
use crate::value::{DateKind, Value};
use crate::Result;

/// A comparison operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    /// `==`
    Eq,
    /// `!=`
    Ne,
    /// `<`
    Lt,
    /// `<=`
    Lte,
    /// `>`
    Gt,
    /// `>=`
    Gte,
}

impl CmpOp {
    fn is_equality(self) -> bool {
        matches!(self, CmpOp::Eq | CmpOp::Ne)
    }

    fn of_ordering(self, ord: Ordering) -> bool {
        match self {
            CmpOp::Eq => ord == Ordering::Equal,
            CmpOp::Ne => ord != Ordering::Equal,
            CmpOp::Lt => ord == Ordering::Less,
            CmpOp::Lte => ord != Ordering::Greater,
            CmpOp::Gt => ord == Ordering::Greater,
            CmpOp::Gte => ord != Ordering::Less,
        }
    }
}

/// Compare two values under the language's comparison rules.
///
/// With `lenient` set, an equality test between values that share no
/// comparable capability yields not-equal instead of an error; relational
/// operators are never lenient.
pub fn compare(
    left: &Value,
    op: CmpOp,
    right: &Value,
    engine: &dyn ArithmeticEngine,
    lenient: bool,
) -> Result<bool> {
    if let (Some(a), Some(b)) = (left.as_number(), right.as_number()) {
        let ord = engine.compare(a, b).map_err(|source| EvalError::Arithmetic {
            source,
            location: None,
        })?;
        return Ok(op.of_ordering(ord));
    }

    if let (Some(a), Some(b)) = (left.as_date(), right.as_date()) {
        if a.kind == DateKind::Unknown || b.kind == DateKind::Unknown {
            return Err(EvalError::TypeMismatch {
                expected: "date-like values of a known kind (date, time, or date-time)",
                actual: "a date-like value of unknown kind".to_string(),
                blame: None,
                location: None,
            });
        }
        if a.kind != b.kind {
            return mismatch(left, op, right, lenient);
        }
        return Ok(op.of_ordering(a.when.cmp(&b.when)));
    }

    if let (Some(a), Some(b)) = (left.as_string(), right.as_string()) {
        if !op.is_equality() {
            return Err(EvalError::TypeMismatch {
                expected: "numbers or date-like values (strings support equality only)",
                actual: "two strings".to_string(),
                blame: None,
                location: None,
            });
        }
        let ord = if a == b {
            Ordering::Equal
        } else {
            Ordering::Less
        };
        return Ok(op.of_ordering(ord));
    }

    if let (Some(a), Some(b)) = (left.as_bool(), right.as_bool()) {
        if !op.is_equality() {
            return Err(EvalError::TypeMismatch {
                expected: "numbers or date-like values (booleans support equality only)",
                actual: "two booleans".to_string(),
                blame: None,
                location: None,
            });
        }
        let ord = if a == b {
            Ordering::Equal
        } else {
            Ordering::Less
        };
        return Ok(op.of_ordering(ord));
    }

    mismatch(left, op, right, lenient)
}

/// Equality with the strict rules, shared by `#case` matching.
pub fn values_equal(left: &Value, right: &Value, engine: &dyn ArithmeticEngine) -> Result<bool> {
    compare(left, CmpOp::Eq, right, engine, false)
}

/// Lenient equality, shared by `?seq_contains`.
pub fn values_equal_lenient(
    left: &Value,
    right: &Value,
    engine: &dyn ArithmeticEngine,
) -> Result<bool> {
    compare(left, CmpOp::Eq, right, engine, true)
}

fn mismatch(left: &Value, op: CmpOp, right: &Value, lenient: bool) -> Result<bool> {
    if lenient && op.is_equality() {
        return Ok(op == CmpOp::Ne);
    }
    Err(EvalError::TypeMismatch {
        expected: "two values comparable with each other",
        actual: format!("{} and {}", left.type_name(), right.type_name()),
        blame: None,
        location: None,
    })
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use super::*;
    use crate::arith::DefaultArithmeticEngine;
    use crate::value::{DateValue, Number};

    fn cmp(left: &Value, op: CmpOp, right: &Value) -> Result<bool> {
        compare(left, op, right, &DefaultArithmeticEngine, false)
    }

    #[test]
    fn test_numbers_compare_across_int_and_float() {
        assert!(cmp(&Value::int(2), CmpOp::Eq, &Value::float(2.0)).unwrap());
        assert!(cmp(&Value::int(2), CmpOp::Lt, &Value::float(2.5)).unwrap());
        assert!(cmp(&Value::int(3), CmpOp::Gte, &Value::int(3)).unwrap());
    }

    #[test]
    fn test_strings_support_equality_only() {
        assert!(cmp(&Value::str("a"), CmpOp::Eq, &Value::str("a")).unwrap());
        assert!(cmp(&Value::str("a"), CmpOp::Ne, &Value::str("b")).unwrap());
        assert!(cmp(&Value::str("a"), CmpOp::Lt, &Value::str("b")).is_err());
    }

    #[test]
    fn test_dates_require_known_equal_kinds() {
        let when = datetime!(2020-01-01 00:00:00 UTC);
        let later = datetime!(2020-01-02 00:00:00 UTC);
        let date = |when| Value::Date(DateValue {
            when,
            kind: crate::value::DateKind::Date,
        });
        let unknown = Value::Date(DateValue {
            when,
            kind: crate::value::DateKind::Unknown,
        });
        assert!(cmp(&date(when), CmpOp::Lt, &date(later)).unwrap());
        assert!(cmp(&date(when), CmpOp::Eq, &unknown).is_err());

        let time_kind = Value::Date(DateValue {
            when,
            kind: crate::value::DateKind::Time,
        });
        assert!(cmp(&date(when), CmpOp::Eq, &time_kind).is_err());
    }

    #[test]
    fn test_type_mismatch_strict_vs_lenient() {
        let n = Value::int(1);
        let s = Value::str("1");
        assert!(cmp(&n, CmpOp::Eq, &s).is_err());
        assert!(!values_equal_lenient(&n, &s, &DefaultArithmeticEngine).unwrap());
        // Lenient never reaches through to relational operators.
        assert!(compare(&n, CmpOp::Lt, &s, &DefaultArithmeticEngine, true).is_err());
    }

    #[test]
    fn test_nan_comparison_is_an_error() {
        let nan = Value::Number(Number::Float(f64::NAN));
        assert!(cmp(&nan, CmpOp::Eq, &Value::int(1)).is_err());
    }
}
