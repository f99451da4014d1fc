//! Runtime errors for the interpreter

use super::diagnostic::describe_operands;
use super::value::Value;
use crate::ast::Location;
use std::rc::Rc;
use thiserror::Error;

/// Runtime error during interpretation
#[derive(Debug, Clone, Error)]
#[error("{kind}")]
pub struct RuntimeError {
    pub kind: ErrorKind,
    pub location: Option<Location>,
}

/// Kinds of runtime errors. All of them are type errors from the program's
/// point of view: they abort the current top-level call.
#[derive(Debug, Clone, Error)]
pub enum ErrorKind {
    /// Operator or call applied to operand types it is not defined for.
    /// `None` operands were skipped by short-circuit evaluation.
    #[error("operation \"{operation}\" not defined for {}", describe_operands(.operands))]
    Unsupported {
        operation: &'static str,
        operands: Vec<Option<Value>>,
    },
    /// Division or remainder with a zero divisor
    #[error(
        "operation \"{operation}\" not defined for {} (division by zero)",
        describe_operands(.operands)
    )]
    DivisionByZero {
        operation: &'static str,
        operands: Vec<Option<Value>>,
    },
    #[error("local variable \"{0}\" is read before it is written")]
    UninitializedVariable(Rc<str>),
    #[error("undefined function \"{0}\"")]
    UndefinedFunction(Rc<str>),
    #[error("function \"{name}\" expects {expected} argument(s), got {got}")]
    ArityMismatch {
        name: Rc<str>,
        expected: usize,
        got: usize,
    },
    #[error("stack overflow: too deep recursion")]
    StackOverflow,
    /// Break or continue reached a function body; the builder rejects this
    #[error("{statement} escaped function \"{function}\"")]
    InvalidControlFlow {
        statement: &'static str,
        function: Rc<str>,
    },
    /// Source passed to `defineFunction` failed to compile
    #[error("{0}")]
    Definition(String),
    #[error("IO error: {0}")]
    Io(String),
}

impl PartialEq for ErrorKind {
    fn eq(&self, other: &Self) -> bool {
        // Kind comparison only; payloads are checked through messages
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}

impl RuntimeError {
    pub fn new(kind: ErrorKind) -> Self {
        RuntimeError {
            kind,
            location: None,
        }
    }

    /// Attach a location unless the error already has a more precise one
    pub fn at(mut self, location: Location) -> Self {
        self.location.get_or_insert(location);
        self
    }

    pub fn unsupported(operation: &'static str, operands: Vec<Option<Value>>) -> Self {
        Self::new(ErrorKind::Unsupported {
            operation,
            operands,
        })
    }

    pub fn division_by_zero(operation: &'static str, dividend: Value, divisor: Value) -> Self {
        Self::new(ErrorKind::DivisionByZero {
            operation,
            operands: vec![Some(dividend), Some(divisor)],
        })
    }

    pub fn uninitialized_variable(name: &Rc<str>) -> Self {
        Self::new(ErrorKind::UninitializedVariable(Rc::clone(name)))
    }

    pub fn undefined_function(name: &Rc<str>) -> Self {
        Self::new(ErrorKind::UndefinedFunction(Rc::clone(name)))
    }

    pub fn arity_mismatch(name: &str, expected: usize, got: usize) -> Self {
        Self::new(ErrorKind::ArityMismatch {
            name: Rc::from(name),
            expected,
            got,
        })
    }

    pub fn stack_overflow() -> Self {
        Self::new(ErrorKind::StackOverflow)
    }

    pub fn invalid_control_flow(statement: &'static str, function: &str) -> Self {
        Self::new(ErrorKind::InvalidControlFlow {
            statement,
            function: Rc::from(function),
        })
    }

    pub fn definition(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Definition(message.into()))
    }

    pub fn io_error(err: std::io::Error) -> Self {
        Self::new(ErrorKind::Io(err.to_string()))
    }
}

/// Result type for interpreter operations
pub type InterpResult<T> = Result<T, RuntimeError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{SourceId, Span};

    #[test]
    fn test_unsupported_message() {
        let operands = vec![Some(Value::int(1)), Some(Value::string("a"))];
        let err = RuntimeError::unsupported("+", operands);
        assert_eq!(
            err.to_string(),
            "operation \"+\" not defined for Number 1, String \"a\""
        );
    }

    #[test]
    fn test_unsupported_skipped_operand() {
        let err = RuntimeError::unsupported("&&", vec![Some(Value::int(0)), None]);
        assert_eq!(err.to_string(), "operation \"&&\" not defined for Number 0, ANY");
    }

    #[test]
    fn test_arity_mismatch_message() {
        let err = RuntimeError::arity_mismatch("add", 2, 1);
        assert_eq!(err.to_string(), "function \"add\" expects 2 argument(s), got 1");
        assert_eq!(err.kind, ErrorKind::ArityMismatch { name: Rc::from("x"), expected: 0, got: 0 });
    }

    #[test]
    fn test_uninitialized_variable_names_variable() {
        let err = RuntimeError::uninitialized_variable(&Rc::from("count"));
        assert!(err.to_string().contains("\"count\""));
    }

    #[test]
    fn test_at_keeps_innermost_location() {
        let inner = Location::new(SourceId(0), Span::new(5, 6));
        let outer = Location::new(SourceId(0), Span::new(0, 20));
        let err = RuntimeError::stack_overflow().at(inner).at(outer);
        assert_eq!(err.location, Some(inner));
    }

    #[test]
    fn test_error_kind_eq_by_discriminant() {
        assert_eq!(ErrorKind::StackOverflow, ErrorKind::StackOverflow);
        assert_ne!(ErrorKind::StackOverflow, ErrorKind::Io(String::new()));
    }

    #[test]
    fn test_error_is_std_error() {
        let err = RuntimeError::division_by_zero("%", Value::int(3), Value::int(0));
        assert_eq!(
            err.to_string(),
            "operation \"%\" not defined for Number 3, Number 0 (division by zero)"
        );
        let std_err: &dyn std::error::Error = &err;
        assert!(std_err.source().is_none());
    }
}
