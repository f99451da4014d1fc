//! Tree-walking interpreter for SL

mod builtins;
mod cache;
mod diagnostic;
mod error;
mod eval;
mod frame;
mod function;
mod io;
mod number;
mod ops;
mod value;

pub use builtins::DEFINE_FUNCTION_SOURCE;
pub use cache::{INLINE_CACHE_SIZE, InlineCache};
pub use diagnostic::{describe, format_runtime_error};
pub use error::{ErrorKind, InterpResult, RuntimeError};
pub use eval::{Control, Interpreter, MAX_RECURSION_DEPTH};
pub use frame::Frame;
pub use function::{Builtin, BuiltinFn, CallTarget, Function, FunctionRegistry};
pub use io::SharedOutput;
pub use number::Number;
pub use value::{ArrayRef, Value};
