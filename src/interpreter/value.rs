use std::fmt;

use crate::ast::expression::BinOpKind;
use crate::fmt::{FloatWidth, format_float};
use crate::types::{BasicKind, Constant, Type};

/// Runtime value representation
///
/// Integers of every width share one variant; the value is kept normalized to
/// the range of its kind, so arithmetic wraps like two's complement hardware.
/// `float32` values are stored widened but always hold a single-precision
/// value.
#[derive(Debug, Clone, PartialEq)]
pub enum RValue {
    /// Result of a call that returns nothing
    Unit,
    Int(i128, BasicKind),
    Float(f64, BasicKind),
    Bool(bool),
    String(String),
}

/// Failure of a runtime operation; the interpreter attaches the position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpError {
    DivisionByZero,
    /// Operands the checker should have rejected.
    Unsupported,
}

/// Wrap an integer to the range of `kind`.
fn wrap(value: i128, kind: BasicKind) -> i128 {
    let Some(bits) = kind.bits() else {
        return value;
    };
    let modulus = 1i128 << bits;
    let truncated = value.rem_euclid(modulus);
    if !kind.is_unsigned() && truncated >= modulus / 2 {
        truncated - modulus
    } else {
        truncated
    }
}

fn round(value: f64, kind: BasicKind) -> f64 {
    match kind {
        BasicKind::Float32 => value as f32 as f64,
        _ => value,
    }
}

impl RValue {
    /// Materialize a constant as a value of `ty`. Untyped constants take
    /// their default type.
    pub fn from_constant(constant: &Constant, ty: Type) -> RValue {
        let kind = match ty.default_type() {
            Type::Basic(kind) => kind,
            _ => return RValue::Unit,
        };
        match constant {
            Constant::Int(i) if kind.is_integer() => RValue::Int(wrap(*i, kind), kind),
            Constant::Int(i) => RValue::Float(round(*i as f64, kind), kind),
            Constant::Float(f) if kind.is_integer() => RValue::Int(wrap(*f as i128, kind), kind),
            Constant::Float(f) => RValue::Float(round(*f, kind), kind),
            Constant::Bool(b) => RValue::Bool(*b),
            Constant::String(s) => RValue::String(s.clone()),
        }
    }

    /// The zero value of a type: `0`, `0.0`, `false` or `""`.
    pub fn zero(ty: Type) -> RValue {
        match ty.default_type() {
            Type::Basic(BasicKind::Bool) => RValue::Bool(false),
            Type::Basic(BasicKind::String) => RValue::String(String::new()),
            Type::Basic(kind) if kind.is_integer() => RValue::Int(0, kind),
            Type::Basic(kind) => RValue::Float(0.0, kind),
            _ => RValue::Unit,
        }
    }

    /// Conversion `T(x)` at runtime. Floats convert to integers by
    /// truncation toward zero.
    pub fn convert(self, target: Type) -> Result<RValue, OpError> {
        let Type::Basic(kind) = target else {
            return Err(OpError::Unsupported);
        };
        Ok(match self {
            RValue::Int(i, _) if kind.is_integer() => RValue::Int(wrap(i, kind), kind),
            RValue::Int(i, _) => RValue::Float(round(i as f64, kind), kind),
            RValue::Float(f, _) if kind.is_integer() => {
                RValue::Int(wrap(f.trunc() as i128, kind), kind)
            }
            RValue::Float(f, _) => RValue::Float(round(f, kind), kind),
            same @ (RValue::Bool(_) | RValue::String(_)) => same,
            RValue::Unit => return Err(OpError::Unsupported),
        })
    }

    pub fn binary(op: BinOpKind, lhs: RValue, rhs: RValue) -> Result<RValue, OpError> {
        use BinOpKind::*;

        if op.is_comparison() {
            return Self::compare(op, &lhs, &rhs).map(RValue::Bool);
        }

        match (lhs, rhs) {
            (RValue::Int(a, kind), RValue::Int(b, _)) => {
                let value = match op {
                    Add => a + b,
                    Sub => a - b,
                    Mul => a.wrapping_mul(b),
                    Div if b == 0 => return Err(OpError::DivisionByZero),
                    Div => a / b,
                    _ => return Err(OpError::Unsupported),
                };
                Ok(RValue::Int(wrap(value, kind), kind))
            }
            (RValue::Float(a, kind), RValue::Float(b, _)) => {
                let value = match op {
                    Add => a + b,
                    Sub => a - b,
                    Mul => a * b,
                    Div => a / b,
                    _ => return Err(OpError::Unsupported),
                };
                Ok(RValue::Float(round(value, kind), kind))
            }
            (RValue::String(a), RValue::String(b)) if op == Add => Ok(RValue::String(a + &b)),
            _ => Err(OpError::Unsupported),
        }
    }

    fn compare(op: BinOpKind, lhs: &RValue, rhs: &RValue) -> Result<bool, OpError> {
        use std::cmp::Ordering;

        let ordering = match (lhs, rhs) {
            (RValue::Int(a, _), RValue::Int(b, _)) => a.partial_cmp(b),
            (RValue::Float(a, _), RValue::Float(b, _)) => a.partial_cmp(b),
            (RValue::String(a), RValue::String(b)) => a.partial_cmp(b),
            (RValue::Bool(a), RValue::Bool(b)) => {
                return match op {
                    BinOpKind::Eq => Ok(a == b),
                    BinOpKind::NotEq => Ok(a != b),
                    _ => Err(OpError::Unsupported),
                };
            }
            _ => return Err(OpError::Unsupported),
        };

        let Some(ordering) = ordering else {
            return Ok(op == BinOpKind::NotEq);
        };

        match op {
            BinOpKind::Eq => Ok(ordering == Ordering::Equal),
            BinOpKind::NotEq => Ok(ordering != Ordering::Equal),
            BinOpKind::Lt => Ok(ordering == Ordering::Less),
            BinOpKind::Gt => Ok(ordering == Ordering::Greater),
            BinOpKind::LtEq => Ok(ordering != Ordering::Greater),
            BinOpKind::GtEq => Ok(ordering != Ordering::Less),
            _ => Err(OpError::Unsupported),
        }
    }

    pub fn negate(self) -> Result<RValue, OpError> {
        match self {
            RValue::Int(i, kind) => Ok(RValue::Int(wrap(-i, kind), kind)),
            RValue::Float(f, kind) => Ok(RValue::Float(-f, kind)),
            _ => Err(OpError::Unsupported),
        }
    }

    /// `1` of the same numeric type, for `++` and `--`.
    pub fn one_like(&self) -> Option<RValue> {
        match self {
            RValue::Int(_, kind) => Some(RValue::Int(1, *kind)),
            RValue::Float(_, kind) => Some(RValue::Float(1.0, *kind)),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            RValue::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl fmt::Display for RValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RValue::Unit => Ok(()),
            RValue::Int(i, _) => write!(f, "{}", i),
            RValue::Float(v, kind) => {
                let width = match kind {
                    BasicKind::Float32 => FloatWidth::F32,
                    _ => FloatWidth::F64,
                };
                f.write_str(&format_float(*v, width))
            }
            RValue::Bool(b) => write!(f, "{}", b),
            RValue::String(s) => f.write_str(s),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_arithmetic_wraps_to_width() {
        let max = RValue::Int(i64::MAX as i128, BasicKind::Int);
        let one = RValue::Int(1, BasicKind::Int);
        assert_eq!(
            RValue::binary(BinOpKind::Add, max, one),
            Ok(RValue::Int(i64::MIN as i128, BasicKind::Int))
        );

        let byte = RValue::Int(250, BasicKind::Uint8);
        let ten = RValue::Int(10, BasicKind::Uint8);
        assert_eq!(
            RValue::binary(BinOpKind::Add, byte, ten),
            Ok(RValue::Int(4, BasicKind::Uint8))
        );
    }

    #[test]
    fn integer_division_by_zero_fails() {
        let result = RValue::binary(
            BinOpKind::Div,
            RValue::Int(1, BasicKind::Int),
            RValue::Int(0, BasicKind::Int),
        );
        assert_eq!(result, Err(OpError::DivisionByZero));
    }

    #[test]
    fn float_division_by_zero_is_infinite() {
        let result = RValue::binary(
            BinOpKind::Div,
            RValue::Float(1.0, BasicKind::Float64),
            RValue::Float(0.0, BasicKind::Float64),
        );
        assert_eq!(result.map(|v| v.to_string()), Ok("+Inf".to_string()));
    }

    #[test]
    fn float32_sum_prints_shortest() {
        let sum = RValue::binary(
            BinOpKind::Add,
            RValue::from_constant(&Constant::Float(275.0), Type::FLOAT32),
            RValue::from_constant(&Constant::Float(27.5), Type::FLOAT32),
        );
        assert_eq!(sum.map(|v| v.to_string()), Ok("302.5".to_string()));
    }

    #[test]
    fn conversions_truncate_and_wrap() {
        let value = RValue::Float(-2.7, BasicKind::Float64);
        assert_eq!(value.convert(Type::INT), Ok(RValue::Int(-2, BasicKind::Int)));

        let big = RValue::Int(300, BasicKind::Int);
        assert_eq!(
            big.convert(Type::Basic(BasicKind::Uint8)),
            Ok(RValue::Int(44, BasicKind::Uint8))
        );
    }

    #[test]
    fn zero_values() {
        assert_eq!(RValue::zero(Type::STRING).to_string(), "");
        assert_eq!(RValue::zero(Type::FLOAT32).to_string(), "0");
        assert_eq!(RValue::zero(Type::BOOL).to_string(), "false");
    }
}
