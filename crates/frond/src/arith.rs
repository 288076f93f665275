//! Pluggable arithmetic engine
//!
//! All numeric computation in the evaluator goes through an
//! [`ArithmeticEngine`], so integer/decimal semantics can be swapped without
//! touching the operator nodes. The default engine works on an i64/f64
//! tower with checked integer operations.

use std::cmp::Ordering;

use thiserror::Error;

use crate::value::Number;

/// Engine-level numeric failure.
///
/// Operator nodes wrap these into [`crate::EvalError::Arithmetic`] together
/// with blame information.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ArithmeticError {
    /// Integer overflow during `op`
    #[error("integer overflow during {op}")]
    Overflow {
        /// The operator, like `+`
        op: &'static str,
    },

    /// Division or remainder by integer zero
    #[error("division by zero")]
    DivisionByZero,

    /// The operands have no defined ordering (NaN involved)
    #[error("the values cannot be compared (not-a-number involved)")]
    Incomparable,
}

/// Numeric computation strategy used by arithmetic and comparison nodes.
pub trait ArithmeticEngine: std::fmt::Debug + Send + Sync {
    /// `a + b`
    fn add(&self, a: Number, b: Number) -> Result<Number, ArithmeticError>;

    /// `a - b`
    fn sub(&self, a: Number, b: Number) -> Result<Number, ArithmeticError>;

    /// `a * b`
    fn mul(&self, a: Number, b: Number) -> Result<Number, ArithmeticError>;

    /// `a / b`
    fn div(&self, a: Number, b: Number) -> Result<Number, ArithmeticError>;

    /// `a % b`
    fn rem(&self, a: Number, b: Number) -> Result<Number, ArithmeticError>;

    /// `-a`
    fn neg(&self, a: Number) -> Result<Number, ArithmeticError>;

    /// Total ordering of `a` and `b`; errors when NaN is involved.
    fn compare(&self, a: Number, b: Number) -> Result<Ordering, ArithmeticError>;
}

/// The default engine: exact checked i64 arithmetic, falling back to f64
/// when either operand is a float or when a division is inexact.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultArithmeticEngine;

impl ArithmeticEngine for DefaultArithmeticEngine {
    fn add(&self, a: Number, b: Number) -> Result<Number, ArithmeticError> {
        match (a, b) {
            (Number::Int(a), Number::Int(b)) => a
                .checked_add(b)
                .map(Number::Int)
                .ok_or(ArithmeticError::Overflow { op: "+" }),
            (a, b) => Ok(Number::Float(a.as_f64() + b.as_f64())),
        }
    }

    fn sub(&self, a: Number, b: Number) -> Result<Number, ArithmeticError> {
        match (a, b) {
            (Number::Int(a), Number::Int(b)) => a
                .checked_sub(b)
                .map(Number::Int)
                .ok_or(ArithmeticError::Overflow { op: "-" }),
            (a, b) => Ok(Number::Float(a.as_f64() - b.as_f64())),
        }
    }

    fn mul(&self, a: Number, b: Number) -> Result<Number, ArithmeticError> {
        match (a, b) {
            (Number::Int(a), Number::Int(b)) => a
                .checked_mul(b)
                .map(Number::Int)
                .ok_or(ArithmeticError::Overflow { op: "*" }),
            (a, b) => Ok(Number::Float(a.as_f64() * b.as_f64())),
        }
    }

    fn div(&self, a: Number, b: Number) -> Result<Number, ArithmeticError> {
        match (a, b) {
            (Number::Int(a), Number::Int(b)) => {
                if b == 0 {
                    return Err(ArithmeticError::DivisionByZero);
                }
                // Exact integer division stays an integer; 5/2 is 2.5.
                // checked_rem: i64::MIN % -1 would overflow.
                match a.checked_rem(b) {
                    Some(0) => a
                        .checked_div(b)
                        .map(Number::Int)
                        .ok_or(ArithmeticError::Overflow { op: "/" }),
                    Some(_) => Ok(Number::Float(a as f64 / b as f64)),
                    None => Err(ArithmeticError::Overflow { op: "/" }),
                }
            }
            (a, b) => {
                let divisor = b.as_f64();
                if divisor == 0.0 {
                    return Err(ArithmeticError::DivisionByZero);
                }
                Ok(Number::Float(a.as_f64() / divisor))
            }
        }
    }

    fn rem(&self, a: Number, b: Number) -> Result<Number, ArithmeticError> {
        match (a, b) {
            (Number::Int(a), Number::Int(b)) => {
                if b == 0 {
                    return Err(ArithmeticError::DivisionByZero);
                }
                a.checked_rem(b)
                    .map(Number::Int)
                    .ok_or(ArithmeticError::Overflow { op: "%" })
            }
            (a, b) => {
                let divisor = b.as_f64();
                if divisor == 0.0 {
                    return Err(ArithmeticError::DivisionByZero);
                }
                Ok(Number::Float(a.as_f64() % divisor))
            }
        }
    }

    fn neg(&self, a: Number) -> Result<Number, ArithmeticError> {
        match a {
            Number::Int(n) => n
                .checked_neg()
                .map(Number::Int)
                .ok_or(ArithmeticError::Overflow { op: "-" }),
            Number::Float(f) => Ok(Number::Float(-f)),
        }
    }

    fn compare(&self, a: Number, b: Number) -> Result<Ordering, ArithmeticError> {
        match (a, b) {
            (Number::Int(a), Number::Int(b)) => Ok(a.cmp(&b)),
            (a, b) => a
                .as_f64()
                .partial_cmp(&b.as_f64())
                .ok_or(ArithmeticError::Incomparable),
        }
    }
}
