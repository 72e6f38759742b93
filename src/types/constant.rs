//! Exact values of constant expressions
//!
//! Constant arithmetic happens here at compile time: integers in `i128`
//! (wide enough for every integer type, so overflow is detected instead of
//! wrapping), floats in `f64`. Conversions between constants and types are
//! lossless or rejected.

use std::fmt;

use crate::ast::expression::BinOpKind;

use super::ty::{BasicKind, Type, UntypedKind};

#[derive(Debug, Clone, PartialEq)]
pub enum Constant {
    Int(i128),
    Float(f64),
    Bool(bool),
    String(String),
}

/// Why a constant cannot take on a type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lossy {
    /// A float constant with a fractional part used as an integer.
    Truncated,
    /// The value is outside the range of the target type.
    Overflows,
    /// The constant's kind does not convert to the target at all.
    Incompatible,
}

impl fmt::Display for Lossy {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Lossy::Truncated => f.write_str("truncated"),
            Lossy::Overflows => f.write_str("overflows"),
            Lossy::Incompatible => f.write_str("incompatible"),
        }
    }
}

/// Failures while folding constant operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FoldError {
    DivisionByZero,
    Overflow,
    /// Operator is not defined on the operands.
    Undefined,
}

impl Constant {
    /// Float constants have no negative zero.
    fn float(value: f64) -> Constant {
        Constant::Float(if value == 0.0 { 0.0 } else { value })
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Constant::Int(i) => Some(*i as f64),
            Constant::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn is_zero(&self) -> bool {
        match self {
            Constant::Int(i) => *i == 0,
            Constant::Float(f) => *f == 0.0,
            _ => false,
        }
    }

    /// Convert this constant so that it is representable as `ty`.
    ///
    /// Integer types accept integers in range and integral floats; float
    /// types accept any finite number in range (`float32` values are rounded
    /// to single precision). Untyped targets only change the representation.
    pub fn convert_to(&self, ty: &Type) -> Result<Constant, Lossy> {
        match ty {
            Type::Basic(kind) if kind.is_integer() => {
                let value = self.integral_value()?;
                let (min, max) = kind.int_range().ok_or(Lossy::Incompatible)?;
                if value < min || value > max {
                    return Err(Lossy::Overflows);
                }
                Ok(Constant::Int(value))
            }
            Type::Basic(BasicKind::Float32) => {
                let value = self.as_f64().ok_or(Lossy::Incompatible)?;
                let rounded = value as f32;
                if rounded.is_infinite() {
                    return Err(Lossy::Overflows);
                }
                Ok(Constant::float(rounded as f64))
            }
            Type::Basic(BasicKind::Float64) => {
                let value = self.as_f64().ok_or(Lossy::Incompatible)?;
                if value.is_infinite() {
                    return Err(Lossy::Overflows);
                }
                Ok(Constant::float(value))
            }
            Type::Basic(BasicKind::Bool) | Type::Untyped(UntypedKind::Bool) => match self {
                Constant::Bool(_) => Ok(self.clone()),
                _ => Err(Lossy::Incompatible),
            },
            Type::Basic(BasicKind::String) | Type::Untyped(UntypedKind::String) => match self {
                Constant::String(_) => Ok(self.clone()),
                _ => Err(Lossy::Incompatible),
            },
            Type::Untyped(UntypedKind::Int | UntypedKind::Rune) => {
                self.integral_value().map(Constant::Int)
            }
            Type::Untyped(UntypedKind::Float) => {
                self.as_f64().map(Constant::Float).ok_or(Lossy::Incompatible)
            }
            _ => Err(Lossy::Incompatible),
        }
    }

    fn integral_value(&self) -> Result<i128, Lossy> {
        match self {
            Constant::Int(i) => Ok(*i),
            Constant::Float(f) if f.fract() != 0.0 => Err(Lossy::Truncated),
            Constant::Float(f) if f.abs() >= 2f64.powi(127) => Err(Lossy::Overflows),
            Constant::Float(f) => Ok(*f as i128),
            _ => Err(Lossy::Incompatible),
        }
    }

    /// Fold `lhs op rhs`. Both operands must already share a representation
    /// (see [`Constant::convert_to`]). Integer operands divide with truncation.
    /// A typed `result` must be able to represent the folded value.
    pub fn binary(
        op: BinOpKind,
        lhs: &Constant,
        rhs: &Constant,
        result: &Type,
    ) -> Result<Constant, FoldError> {
        use BinOpKind::*;

        if op.is_comparison() {
            return Self::compare(op, lhs, rhs).map(Constant::Bool);
        }

        let folded = match (lhs, rhs) {
            (Constant::Int(a), Constant::Int(b)) => {
                let value = match op {
                    Add => a.checked_add(*b),
                    Sub => a.checked_sub(*b),
                    Mul => a.checked_mul(*b),
                    Div if *b == 0 => return Err(FoldError::DivisionByZero),
                    Div => a.checked_div(*b),
                    _ => return Err(FoldError::Undefined),
                };
                Constant::Int(value.ok_or(FoldError::Overflow)?)
            }
            (Constant::Float(a), Constant::Float(b)) => {
                let value = match op {
                    Add => a + b,
                    Sub => a - b,
                    Mul => a * b,
                    Div if *b == 0.0 => return Err(FoldError::DivisionByZero),
                    Div => a / b,
                    _ => return Err(FoldError::Undefined),
                };
                if value.is_infinite() {
                    return Err(FoldError::Overflow);
                }
                Constant::float(value)
            }
            (Constant::String(a), Constant::String(b)) if op == Add => {
                Constant::String(format!("{}{}", a, b))
            }
            _ => return Err(FoldError::Undefined),
        };

        // Typed results must stay representable, and float32 keeps rounding.
        match result {
            Type::Basic(_) => folded.convert_to(result).map_err(|_| FoldError::Overflow),
            _ => Ok(folded),
        }
    }

    fn compare(op: BinOpKind, lhs: &Constant, rhs: &Constant) -> Result<bool, FoldError> {
        use std::cmp::Ordering;

        let ordering = match (lhs, rhs) {
            (Constant::Int(a), Constant::Int(b)) => a.partial_cmp(b),
            (Constant::Float(a), Constant::Float(b)) => a.partial_cmp(b),
            (Constant::String(a), Constant::String(b)) => a.partial_cmp(b),
            (Constant::Bool(a), Constant::Bool(b)) => {
                return match op {
                    BinOpKind::Eq => Ok(a == b),
                    BinOpKind::NotEq => Ok(a != b),
                    _ => Err(FoldError::Undefined),
                };
            }
            _ => return Err(FoldError::Undefined),
        };

        // NaN compares unequal to everything
        let Some(ordering) = ordering else {
            return Ok(op == BinOpKind::NotEq);
        };

        Ok(match op {
            BinOpKind::Eq => ordering == Ordering::Equal,
            BinOpKind::NotEq => ordering != Ordering::Equal,
            BinOpKind::Lt => ordering == Ordering::Less,
            BinOpKind::Gt => ordering == Ordering::Greater,
            BinOpKind::LtEq => ordering != Ordering::Greater,
            BinOpKind::GtEq => ordering != Ordering::Less,
            _ => return Err(FoldError::Undefined),
        })
    }

    /// Fold unary negation.
    pub fn negate(&self, result: &Type) -> Result<Constant, FoldError> {
        let negated = match self {
            Constant::Int(i) => Constant::Int(i.checked_neg().ok_or(FoldError::Overflow)?),
            Constant::Float(f) => Constant::float(-f),
            _ => return Err(FoldError::Undefined),
        };
        match result {
            Type::Basic(_) => negated.convert_to(result).map_err(|_| FoldError::Overflow),
            _ => Ok(negated),
        }
    }
}

impl fmt::Display for Constant {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Constant::Int(i) => write!(f, "{}", i),
            Constant::Float(v) => {
                f.write_str(&crate::fmt::float::format_float(*v, crate::fmt::float::FloatWidth::F64))
            }
            Constant::Bool(b) => write!(f, "{}", b),
            Constant::String(s) => write!(f, "{:?}", s),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integral_floats_convert_to_int() {
        assert_eq!(Constant::Float(2.0).convert_to(&Type::INT), Ok(Constant::Int(2)));
        assert_eq!(
            Constant::Float(2.5).convert_to(&Type::INT),
            Err(Lossy::Truncated)
        );
    }

    #[test]
    fn out_of_range_integers_overflow() {
        let uint8 = Type::Basic(BasicKind::Uint8);
        assert_eq!(Constant::Int(255).convert_to(&uint8), Ok(Constant::Int(255)));
        assert_eq!(Constant::Int(300).convert_to(&uint8), Err(Lossy::Overflows));
        assert_eq!(Constant::Int(-1).convert_to(&uint8), Err(Lossy::Overflows));
    }

    #[test]
    fn float32_conversion_rounds() {
        let converted = Constant::Float(0.1).convert_to(&Type::FLOAT32);
        assert_eq!(converted, Ok(Constant::Float(0.1f32 as f64)));
    }

    #[test]
    fn folds_float32_sum() {
        let sum = Constant::binary(
            BinOpKind::Add,
            &Constant::Float(275.0),
            &Constant::Float(27.5),
            &Type::FLOAT32,
        );
        assert_eq!(sum, Ok(Constant::Float(302.5)));
    }

    #[test]
    fn integer_division_truncates_and_rejects_zero() {
        let untyped = Type::Untyped(UntypedKind::Int);
        assert_eq!(
            Constant::binary(BinOpKind::Div, &Constant::Int(7), &Constant::Int(2), &untyped),
            Ok(Constant::Int(3))
        );
        assert_eq!(
            Constant::binary(BinOpKind::Div, &Constant::Int(7), &Constant::Int(0), &untyped),
            Err(FoldError::DivisionByZero)
        );
    }

    #[test]
    fn folding_never_yields_negative_zero() {
        let untyped = Type::Untyped(UntypedKind::Float);
        let negated = Constant::Float(0.0).negate(&untyped);
        assert!(matches!(negated, Ok(Constant::Float(f)) if f.is_sign_positive()));

        let product = Constant::binary(
            BinOpKind::Mul,
            &Constant::Float(-1.0),
            &Constant::Float(0.0),
            &Type::FLOAT64,
        );
        assert!(matches!(product, Ok(Constant::Float(f)) if f == 0.0 && f.is_sign_positive()));
    }

    #[test]
    fn typed_fold_overflow_is_reported() {
        let uint8 = Type::Basic(BasicKind::Uint8);
        assert_eq!(
            Constant::binary(BinOpKind::Add, &Constant::Int(255), &Constant::Int(1), &uint8),
            Err(FoldError::Overflow)
        );
    }

    #[test]
    fn comparisons_yield_bools() {
        let untyped = Type::Untyped(UntypedKind::Bool);
        assert_eq!(
            Constant::binary(
                BinOpKind::Lt,
                &Constant::String("a".into()),
                &Constant::String("b".into()),
                &untyped
            ),
            Ok(Constant::Bool(true))
        );
    }
}
