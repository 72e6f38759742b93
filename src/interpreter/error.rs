use std::fmt;
use std::io;

use lachs::Span;

/// Failures while running a checked program.
///
/// Only `DivisionByZero` is reachable from a well-typed program; the other
/// variants report a broken output sink or a checker bug.
#[derive(Debug)]
pub enum RuntimeError {
    /// Integer division with a divisor that is zero at runtime.
    DivisionByZero { span: Span },
    /// Writing program output failed.
    Output(io::Error),
    /// An operation the checker should have rejected.
    Internal { message: String, span: Span },
}

impl RuntimeError {
    pub fn internal(message: impl Into<String>, span: Span) -> Self {
        RuntimeError::Internal {
            message: message.into(),
            span,
        }
    }

    pub fn span(&self) -> Option<&Span> {
        match self {
            RuntimeError::DivisionByZero { span } | RuntimeError::Internal { span, .. } => {
                Some(span)
            }
            RuntimeError::Output(_) => None,
        }
    }
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            RuntimeError::DivisionByZero { .. } => {
                "panic: runtime error: integer divide by zero".to_string()
            }
            RuntimeError::Output(err) => return write!(f, "cannot write output: {}", err),
            RuntimeError::Internal { message, .. } => format!("internal error: {}", message),
        };

        match self.span() {
            Some(span) if !span.source.is_empty() => write!(f, "{}", span.to_string(&msg)),
            _ => f.write_str(&msg),
        }
    }
}

impl std::error::Error for RuntimeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RuntimeError::Output(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for RuntimeError {
    fn from(err: io::Error) -> Self {
        RuntimeError::Output(err)
    }
}
