//! User-facing rendering of runtime errors
//!
//! SL is strongly typed: an operation applied to values it does not accept
//! stops the current run. The message names the operation, the source
//! position and every operand that was supplied to it.

use super::error::RuntimeError;
use super::value::Value;
use crate::ast::SourceMap;

/// Render one operand the way type errors show it
pub fn describe(value: Option<&Value>) -> String {
    match value {
        Some(Value::Number(n)) => format!("Number {n}"),
        Some(Value::Bool(b)) => format!("Boolean {b}"),
        Some(Value::Str(s)) => format!("String \"{s}\""),
        Some(Value::Function(f)) => format!("Function {}", f.name()),
        Some(Value::Null) => "NULL".to_string(),
        Some(array @ Value::Array(_)) => array.to_string(),
        // Not evaluated because of short-circuit evaluation
        None => "ANY".to_string(),
    }
}

pub fn describe_operands(operands: &[Option<Value>]) -> String {
    operands
        .iter()
        .map(|operand| describe(operand.as_ref()))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Full message for an error that aborted a top-level call
pub fn format_runtime_error(error: &RuntimeError, sources: &SourceMap) -> String {
    let mut message = String::from("Type error");
    if let Some(resolved) = error.location.and_then(|loc| sources.resolve(loc)) {
        message.push_str(&format!(" at {resolved}"));
    }
    message.push_str(&format!(": {}", error.kind));
    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Location, Source, Span};
    use crate::interp::number::Number;
    use num_bigint::BigInt;

    #[test]
    fn test_describe_each_type() {
        assert_eq!(describe(Some(&Value::int(-4))), "Number -4");
        assert_eq!(
            describe(Some(&Value::Number(Number::big(BigInt::from(10).pow(20))))),
            "Number 100000000000000000000"
        );
        assert_eq!(describe(Some(&Value::Bool(false))), "Boolean false");
        assert_eq!(describe(Some(&Value::string("a b"))), "String \"a b\"");
        assert_eq!(describe(Some(&Value::Null)), "NULL");
        assert_eq!(
            describe(Some(&Value::array(vec![Value::int(1), Value::int(2)]))),
            "[1, 2]"
        );
        assert_eq!(describe(None), "ANY");
    }

    #[test]
    fn test_format_with_location() {
        let mut sources = SourceMap::new();
        let id = sources.add(Source::new("test.sl", "function main() {\n  return 1 + \"a\";\n}"));
        let operands = vec![Some(Value::int(1)), Some(Value::string("a"))];
        let err = RuntimeError::unsupported("+", operands).at(Location::new(id, Span::new(27, 34)));
        insta::assert_snapshot!(
            format_runtime_error(&err, &sources),
            @r#"Type error at test.sl line 2 col 10: operation "+" not defined for Number 1, String "a""#
        );
    }

    #[test]
    fn test_format_without_location() {
        let sources = SourceMap::new();
        let err = RuntimeError::stack_overflow();
        assert_eq!(
            format_runtime_error(&err, &sources),
            "Type error: stack overflow: too deep recursion"
        );
    }
}
