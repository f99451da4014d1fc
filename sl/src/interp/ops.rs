//! Operator semantics
//!
//! Each operator accepts a fixed set of operand types. Anything else is an
//! unsupported operation reporting both operands.

use super::error::{InterpResult, RuntimeError};
use super::number::Number;
use super::value::Value;
use crate::ast::BinOp;

/// Apply a strict (non short-circuit) binary operator
pub fn binary(op: BinOp, left: Value, right: Value) -> InterpResult<Value> {
    match op {
        BinOp::Add => add(left, right),
        BinOp::Sub => arithmetic(op, left, right, |a, b| Some(a.sub(b))),
        BinOp::Mul => arithmetic(op, left, right, |a, b| Some(a.mul(b))),
        BinOp::Div => arithmetic(op, left, right, |a, b| a.div(b)),
        BinOp::Mod => arithmetic(op, left, right, |a, b| a.rem(b)),
        BinOp::Lt => compare(op, left, right, |o| o.is_lt()),
        BinOp::Le => compare(op, left, right, |o| o.is_le()),
        BinOp::Gt => compare(op, left, right, |o| o.is_gt()),
        BinOp::Ge => compare(op, left, right, |o| o.is_ge()),
        BinOp::Eq => Ok(Value::Bool(left == right)),
        BinOp::Ne => Ok(Value::Bool(left != right)),
        BinOp::And | BinOp::Or => logical(op, left, right),
    }
}

fn add(left: Value, right: Value) -> InterpResult<Value> {
    match (&left, &right) {
        (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a.add(b))),
        (Value::Str(a), Value::Str(b)) => {
            let mut joined = String::with_capacity(a.len() + b.len());
            joined.push_str(a);
            joined.push_str(b);
            Ok(Value::string(joined))
        }
        _ => Err(unsupported(BinOp::Add, left, right)),
    }
}

fn arithmetic(
    op: BinOp,
    left: Value,
    right: Value,
    f: fn(&Number, &Number) -> Option<Number>,
) -> InterpResult<Value> {
    let result = match (&left, &right) {
        (Value::Number(a), Value::Number(b)) => f(a, b),
        _ => return Err(unsupported(op, left, right)),
    };
    match result {
        Some(n) => Ok(Value::Number(n)),
        None => Err(RuntimeError::division_by_zero(op.symbol(), left, right)),
    }
}

fn compare(
    op: BinOp,
    left: Value,
    right: Value,
    f: fn(std::cmp::Ordering) -> bool,
) -> InterpResult<Value> {
    match (&left, &right) {
        (Value::Number(a), Value::Number(b)) => Ok(Value::Bool(f(a.cmp(b)))),
        _ => Err(unsupported(op, left, right)),
    }
}

/// Both operands already evaluated; used once the left one did not decide
fn logical(op: BinOp, left: Value, right: Value) -> InterpResult<Value> {
    match (&left, &right) {
        (Value::Bool(a), Value::Bool(b)) => Ok(Value::Bool(if op == BinOp::And {
            *a && *b
        } else {
            *a || *b
        })),
        _ => Err(unsupported(op, left, right)),
    }
}

fn unsupported(op: BinOp, left: Value, right: Value) -> RuntimeError {
    RuntimeError::unsupported(op.symbol(), vec![Some(left), Some(right)])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interp::error::ErrorKind;

    fn int(n: i64) -> Value {
        Value::int(n)
    }

    #[test]
    fn test_arithmetic() {
        assert_eq!(binary(BinOp::Add, int(1), int(2)).unwrap(), int(3));
        assert_eq!(binary(BinOp::Sub, int(1), int(2)).unwrap(), int(-1));
        assert_eq!(binary(BinOp::Mul, int(6), int(7)).unwrap(), int(42));
        assert_eq!(binary(BinOp::Div, int(7), int(2)).unwrap(), int(3));
        assert_eq!(binary(BinOp::Mod, int(7), int(4)).unwrap(), int(3));
    }

    #[test]
    fn test_add_overflow_is_exact() {
        let sum = binary(BinOp::Add, int(i64::MAX), int(i64::MAX)).unwrap();
        assert_eq!(sum.to_string(), "18446744073709551614");
        assert!(matches!(sum, Value::Number(ref n) if n.is_big()));
    }

    #[test]
    fn test_string_concat() {
        let joined = binary(BinOp::Add, Value::string("ab"), Value::string("cd")).unwrap();
        assert_eq!(joined, Value::string("abcd"));
    }

    #[test]
    fn test_mixed_add_is_type_error() {
        let err = binary(BinOp::Add, int(1), Value::string("a")).unwrap_err();
        assert_eq!(
            err.to_string(),
            "operation \"+\" not defined for Number 1, String \"a\""
        );
    }

    #[test]
    fn test_sub_strings_is_type_error() {
        let err = binary(BinOp::Sub, Value::string("4"), Value::string("2")).unwrap_err();
        assert!(matches!(err.kind, ErrorKind::Unsupported { operation: "-", .. }));
    }

    #[test]
    fn test_division_by_zero() {
        let err = binary(BinOp::Div, int(7), int(0)).unwrap_err();
        assert!(matches!(err.kind, ErrorKind::DivisionByZero { operation: "/", .. }));
        assert_eq!(
            err.to_string(),
            "operation \"/\" not defined for Number 7, Number 0 (division by zero)"
        );
        let err = binary(BinOp::Mod, int(1), int(0)).unwrap_err();
        assert!(err.to_string().starts_with("operation \"%\" not defined for Number 1, Number 0"));
    }

    #[test]
    fn test_comparisons() {
        assert_eq!(binary(BinOp::Lt, int(1), int(2)).unwrap(), Value::Bool(true));
        assert_eq!(binary(BinOp::Le, int(2), int(2)).unwrap(), Value::Bool(true));
        assert_eq!(binary(BinOp::Gt, int(1), int(2)).unwrap(), Value::Bool(false));
        assert_eq!(binary(BinOp::Ge, int(3), int(2)).unwrap(), Value::Bool(true));
    }

    #[test]
    fn test_compare_strings_is_type_error() {
        let err = binary(BinOp::Lt, Value::string("a"), Value::string("b")).unwrap_err();
        assert!(matches!(err.kind, ErrorKind::Unsupported { operation: "<", .. }));
    }

    #[test]
    fn test_equality_never_fails() {
        assert_eq!(binary(BinOp::Eq, int(1), Value::string("1")).unwrap(), Value::Bool(false));
        assert_eq!(binary(BinOp::Ne, Value::Null, Value::Bool(false)).unwrap(), Value::Bool(true));
        assert_eq!(binary(BinOp::Eq, Value::Null, Value::Null).unwrap(), Value::Bool(true));
    }

    #[test]
    fn test_logical_requires_booleans() {
        assert_eq!(
            binary(BinOp::And, Value::Bool(true), Value::Bool(false)).unwrap(),
            Value::Bool(false)
        );
        assert_eq!(
            binary(BinOp::Or, Value::Bool(false), Value::Bool(true)).unwrap(),
            Value::Bool(true)
        );
        assert!(binary(BinOp::Or, Value::Bool(false), int(1)).is_err());
    }
}
