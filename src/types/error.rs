//! # Type Error Definitions
//!
//! Errors produced while checking statements and expressions. Every variant
//! carries the span of the offending code; `Display` renders the message with
//! source context through [`lachs::Span::to_string`] when a source is attached.
//!
//! The central error is [`TypeError::Mismatch`]: a binary operation whose two
//! typed operands have different types. The remaining variants cover the
//! checks around it (lossy constant conversions, undefined names, invalid
//! operators, declaration and assignment rules).
//!
//! Program-level problems, including unused bindings, live in
//! [`crate::types::validate::ValidationError`], which wraps this type.

use std::fmt;

use lachs::Span;

use super::constant::Lossy;
use super::ty::Type;

#[derive(Debug, Clone, PartialEq)]
pub enum TypeError {
    /// `invalid operation: x * y (mismatched types int and float32)`
    Mismatch {
        expr: String,
        left: Type,
        right: Type,
        span: Span,
    },

    /// An operand that cannot be used where a value of `target` is needed,
    /// e.g. `cannot use x (variable of type int) as float32 value in assignment`.
    CannotUse {
        operand: String,
        target: Type,
        context: &'static str,
        reason: Option<Lossy>,
        span: Span,
    },

    /// An untyped constant operand that does not fit the other operand's type,
    /// e.g. `2.5 (untyped float constant) truncated to int`.
    ConstantConversion {
        operand: String,
        target: Type,
        reason: Lossy,
        span: Span,
    },

    /// A folded constant that does not fit its type.
    ConstantOverflow { operand: String, target: Type, span: Span },

    /// Explicit conversion `T(x)` that is not allowed.
    CannotConvert {
        operand: String,
        target: Type,
        reason: Option<Lossy>,
        span: Span,
    },

    /// Reference to a name that is not declared.
    Undefined { name: String, span: Span },

    /// Operator applied to operands it is not defined on.
    InvalidOperation { message: String, span: Span },

    DivisionByZero { span: Span },

    Redeclared { name: String, span: Span },

    NoNewVariables { span: Span },

    /// `assignment mismatch: 2 variables but 1 value`
    AssignmentMismatch {
        variables: usize,
        values: usize,
        span: Span,
    },

    MissingInit { span: Span },

    ExtraInit { span: Span },

    NotConstant { operand: String, span: Span },

    CannotAssign { operand: String, span: Span },

    /// Reading the blank identifier.
    BlankAsValue { span: Span },

    /// A call without a result used as a value.
    NoValue { expr: String, span: Span },

    /// An expression statement that is not a call.
    NotUsed { operand: String, span: Span },

    ArgumentCount {
        func: String,
        expected: usize,
        found: usize,
        span: Span,
    },

    NonBoolCondition { operand: String, span: Span },

    /// A declaration where only simple statements are allowed.
    DeclarationInPost { span: Span },
}

impl TypeError {
    pub fn mismatch(expr: impl Into<String>, left: Type, right: Type, span: Span) -> Self {
        TypeError::Mismatch {
            expr: expr.into(),
            left,
            right,
            span,
        }
    }

    pub fn undefined(name: impl Into<String>, span: Span) -> Self {
        TypeError::Undefined {
            name: name.into(),
            span,
        }
    }

    pub fn invalid_operation(message: impl Into<String>, span: Span) -> Self {
        TypeError::InvalidOperation {
            message: message.into(),
            span,
        }
    }

    pub fn span(&self) -> &Span {
        match self {
            TypeError::Mismatch { span, .. }
            | TypeError::CannotUse { span, .. }
            | TypeError::ConstantConversion { span, .. }
            | TypeError::ConstantOverflow { span, .. }
            | TypeError::CannotConvert { span, .. }
            | TypeError::Undefined { span, .. }
            | TypeError::InvalidOperation { span, .. }
            | TypeError::DivisionByZero { span }
            | TypeError::Redeclared { span, .. }
            | TypeError::NoNewVariables { span }
            | TypeError::AssignmentMismatch { span, .. }
            | TypeError::MissingInit { span }
            | TypeError::ExtraInit { span }
            | TypeError::NotConstant { span, .. }
            | TypeError::CannotAssign { span, .. }
            | TypeError::BlankAsValue { span }
            | TypeError::NoValue { span, .. }
            | TypeError::NotUsed { span, .. }
            | TypeError::ArgumentCount { span, .. }
            | TypeError::NonBoolCondition { span, .. }
            | TypeError::DeclarationInPost { span } => span,
        }
    }

    /// The message without source context.
    pub fn message(&self) -> String {
        match self {
            TypeError::Mismatch {
                expr, left, right, ..
            } => format!(
                "invalid operation: {} (mismatched types {} and {})",
                expr, left, right
            ),
            TypeError::CannotUse {
                operand,
                target,
                context,
                reason,
                ..
            } => {
                let mut msg = format!("cannot use {} as {} value in {}", operand, target, context);
                if let Some(reason) = reason {
                    msg.push_str(&format!(" ({})", reason));
                }
                msg
            }
            TypeError::ConstantConversion {
                operand,
                target,
                reason,
                ..
            } => match reason {
                Lossy::Truncated => format!("{} truncated to {}", operand, target),
                Lossy::Overflows => format!("{} overflows {}", operand, target),
                Lossy::Incompatible => format!("cannot convert {} to type {}", operand, target),
            },
            TypeError::ConstantOverflow {
                operand, target, ..
            } => format!("{} overflows {}", operand, target),
            TypeError::CannotConvert {
                operand,
                target,
                reason,
                ..
            } => {
                let mut msg = format!("cannot convert {} to type {}", operand, target);
                if let Some(reason) = reason {
                    msg.push_str(&format!(" ({})", reason));
                }
                msg
            }
            TypeError::Undefined { name, .. } => format!("undefined: {}", name),
            TypeError::InvalidOperation { message, .. } => {
                format!("invalid operation: {}", message)
            }
            TypeError::DivisionByZero { .. } => "invalid operation: division by zero".to_string(),
            TypeError::Redeclared { name, .. } => format!("{} redeclared in this block", name),
            TypeError::NoNewVariables { .. } => "no new variables on left side of :=".to_string(),
            TypeError::AssignmentMismatch {
                variables, values, ..
            } => format!(
                "assignment mismatch: {} variable{} but {} value{}",
                variables,
                if *variables == 1 { "" } else { "s" },
                values,
                if *values == 1 { "" } else { "s" },
            ),
            TypeError::MissingInit { .. } => {
                "missing init expr for const declaration".to_string()
            }
            TypeError::ExtraInit { .. } => "extra init expr".to_string(),
            TypeError::NotConstant { operand, .. } => format!("{} is not constant", operand),
            TypeError::CannotAssign { operand, .. } => format!("cannot assign to {}", operand),
            TypeError::BlankAsValue { .. } => "cannot use _ as value".to_string(),
            TypeError::NoValue { expr, .. } => format!("{} (no value) used as value", expr),
            TypeError::NotUsed { operand, .. } => format!("{} is not used", operand),
            TypeError::ArgumentCount {
                func,
                expected,
                found,
                ..
            } => {
                let which = if found < expected {
                    "not enough"
                } else {
                    "too many"
                };
                format!(
                    "{} arguments in call to {}\n\thave {}, want {}",
                    which, func, found, expected
                )
            }
            TypeError::NonBoolCondition { operand, .. } => {
                format!("non-boolean condition in for statement: {}", operand)
            }
            TypeError::DeclarationInPost { .. } => {
                "cannot declare in post statement of for loop".to_string()
            }
        }
    }
}

impl fmt::Display for TypeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let msg = self.message();
        let span = self.span();
        if span.source.is_empty() {
            write!(f, "Type error: {}", msg)
        } else {
            write!(f, "{}", span.to_string(&msg))
        }
    }
}

impl std::error::Error for TypeError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mismatch_message_names_both_types() {
        let err = TypeError::mismatch(
            "quantity * (price + tax)",
            Type::INT,
            Type::FLOAT32,
            Span::default(),
        );
        assert_eq!(
            err.to_string(),
            "Type error: invalid operation: quantity * (price + tax) (mismatched types int and float32)"
        );
    }

    #[test]
    fn assignment_mismatch_pluralizes() {
        let err = TypeError::AssignmentMismatch {
            variables: 2,
            values: 1,
            span: Span::default(),
        };
        assert_eq!(err.message(), "assignment mismatch: 2 variables but 1 value");
    }
}
