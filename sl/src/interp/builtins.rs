//! Built-in functions
//!
//! Built-ins live in the same registry as user functions, so a program can
//! redefine them with `defineFunction` like any other function.

use super::error::{InterpResult, RuntimeError};
use super::function::{Builtin, CallTarget, FunctionRegistry};
use super::value::Value;
use super::Interpreter;
use crate::error::format_compile_error;

/// Source name used for code passed to `defineFunction`
pub const DEFINE_FUNCTION_SOURCE: &str = "[defineFunction]";

const BUILTINS: &[(&str, Builtin)] = &[
    (
        "readln",
        Builtin {
            params: &[],
            func: builtin_readln,
        },
    ),
    (
        "println",
        Builtin {
            params: &["value"],
            func: builtin_println,
        },
    ),
    (
        "nanoTime",
        Builtin {
            params: &[],
            func: builtin_nano_time,
        },
    ),
    (
        "defineFunction",
        Builtin {
            params: &["code"],
            func: builtin_define_function,
        },
    ),
];

/// Register every built-in
pub fn install(registry: &mut FunctionRegistry) {
    for (name, builtin) in BUILTINS {
        registry.register(name, CallTarget::Native(*builtin));
    }
}

/// Next input line without its terminator; "" at end of input
fn builtin_readln(interp: &mut Interpreter, _args: Vec<Value>) -> InterpResult<Value> {
    let line = interp.read_line()?.unwrap_or_default();
    Ok(Value::string(line))
}

fn builtin_println(interp: &mut Interpreter, args: Vec<Value>) -> InterpResult<Value> {
    let text = args.first().map(Value::to_string).unwrap_or_default();
    interp.write_line(&text)?;
    Ok(Value::Null)
}

/// Nanoseconds since the interpreter started
fn builtin_nano_time(interp: &mut Interpreter, _args: Vec<Value>) -> InterpResult<Value> {
    let nanos = i64::try_from(interp.uptime().as_nanos()).unwrap_or(i64::MAX);
    Ok(Value::int(nanos))
}

/// Parse `code` and register (or redefine) every function in it
fn builtin_define_function(interp: &mut Interpreter, args: Vec<Value>) -> InterpResult<Value> {
    let code = match args.into_iter().next() {
        Some(Value::Str(code)) => code,
        other => return Err(RuntimeError::unsupported("defineFunction", vec![other])),
    };
    let id = interp.add_source(DEFINE_FUNCTION_SOURCE, &*code);
    if let Err(err) = interp.load_source(id) {
        let message = match interp.discard_source(id) {
            Some(source) => format_compile_error(&err, &source),
            None => err.to_string(),
        };
        return Err(RuntimeError::definition(message));
    }
    Ok(Value::Null)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::SourceId;
    use crate::interp::error::ErrorKind;
    use crate::interp::io::SharedOutput;
    use std::io::{self, Cursor};

    #[test]
    fn test_install_registers_all() {
        let mut registry = FunctionRegistry::new();
        install(&mut registry);
        for name in ["readln", "println", "nanoTime", "defineFunction"] {
            let function = registry.lookup(name).unwrap();
            assert!(function.is_builtin());
        }
        assert_eq!(registry.lookup("println").unwrap().arity(), 1);
    }

    #[test]
    fn test_println_writes_line() {
        let output = SharedOutput::new();
        let mut interp = Interpreter::with_io(io::empty(), output.clone());
        let result = interp
            .call_function_with_args("println", vec![Value::int(5)])
            .unwrap();
        assert_eq!(result, Value::Null);
        interp
            .call_function_with_args("println", vec![Value::string("hi")])
            .unwrap();
        assert_eq!(output.contents(), "5\nhi\n");
    }

    #[test]
    fn test_readln_until_eof() {
        let mut interp = Interpreter::with_io(Cursor::new("abc\n"), io::sink());
        let first = interp.call_function_with_args("readln", Vec::new()).unwrap();
        assert_eq!(first, Value::string("abc"));
        let eof = interp.call_function_with_args("readln", Vec::new()).unwrap();
        assert_eq!(eof, Value::string(""));
    }

    #[test]
    fn test_nano_time_is_monotonic() {
        let mut interp = Interpreter::with_io(io::empty(), io::sink());
        let a = interp.call_function_with_args("nanoTime", Vec::new()).unwrap();
        let b = interp.call_function_with_args("nanoTime", Vec::new()).unwrap();
        let (Value::Number(a), Value::Number(b)) = (a, b) else {
            panic!("nanoTime returns numbers");
        };
        assert!(a <= b);
        assert!(!a.is_big());
    }

    #[test]
    fn test_define_function_registers() {
        let mut interp = Interpreter::with_io(io::empty(), io::sink());
        interp
            .call_function_with_args(
                "defineFunction",
                vec![Value::string("function two() { return 2; }")],
            )
            .unwrap();
        let result = interp.call_function_with_args("two", Vec::new()).unwrap();
        assert_eq!(result, Value::int(2));
    }

    #[test]
    fn test_define_function_syntax_error() {
        let mut interp = Interpreter::with_io(io::empty(), io::sink());
        let err = interp
            .call_function_with_args("defineFunction", vec![Value::string("function (")])
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Definition(String::new()));
        assert!(err.to_string().starts_with("Syntax error at [defineFunction] line 1 col 10"));
    }

    #[test]
    fn test_failed_definition_leaves_no_source() {
        let mut interp = Interpreter::with_io(io::empty(), io::sink());
        for _ in 0..3 {
            let code = Value::string("function broken( {}");
            assert!(interp.call_function_with_args("defineFunction", vec![code]).is_err());
        }
        assert!(interp.sources().get(SourceId(0)).is_none());
        let code = Value::string("function ok() { return 1; }");
        interp.call_function_with_args("defineFunction", vec![code]).unwrap();
        let ok = interp.registry().lookup("ok").unwrap();
        let CallTarget::Body(body) = ok.target() else {
            panic!("expected user function");
        };
        assert_eq!(body.source, SourceId(0));
    }

    #[test]
    fn test_define_function_requires_string() {
        let mut interp = Interpreter::with_io(io::empty(), io::sink());
        let err = interp
            .call_function_with_args("defineFunction", vec![Value::int(1)])
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "operation \"defineFunction\" not defined for Number 1"
        );
    }
}
