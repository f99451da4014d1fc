//! Functions and the function registry
//!
//! A [`Function`] is created once per name and never replaced. Defining a
//! function that already exists swaps its [`CallTarget`] in place, so every
//! `Rc<Function>` held by values, frames and call-site caches observes the
//! new definition on its next invocation.

use super::error::InterpResult;
use super::value::Value;
use super::Interpreter;
use crate::ast::FunctionBody;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// Native implementation of a built-in function
pub type BuiltinFn = fn(&mut Interpreter, Vec<Value>) -> InterpResult<Value>;

/// A built-in: declared parameters plus its native implementation
#[derive(Debug, Clone, Copy)]
pub struct Builtin {
    pub params: &'static [&'static str],
    pub func: BuiltinFn,
}

/// What runs when a function is called
#[derive(Debug, Clone)]
pub enum CallTarget {
    /// User-defined function parsed from source
    Body(Rc<FunctionBody>),
    /// Built-in with a native implementation
    Native(Builtin),
}

impl CallTarget {
    pub fn arity(&self) -> usize {
        match self {
            CallTarget::Body(body) => body.arity(),
            CallTarget::Native(builtin) => builtin.params.len(),
        }
    }
}

/// Identity-stable function record
pub struct Function {
    name: Rc<str>,
    target: RefCell<CallTarget>,
}

impl Function {
    pub fn new(name: impl Into<Rc<str>>, target: CallTarget) -> Rc<Self> {
        Rc::new(Function {
            name: name.into(),
            target: RefCell::new(target),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Snapshot of the current call target
    pub fn target(&self) -> CallTarget {
        self.target.borrow().clone()
    }

    pub fn arity(&self) -> usize {
        self.target.borrow().arity()
    }

    pub fn is_builtin(&self) -> bool {
        matches!(&*self.target.borrow(), CallTarget::Native(_))
    }

    /// Replace the call target, keeping this function's identity
    pub fn redefine(&self, target: CallTarget) {
        *self.target.borrow_mut() = target;
    }

    pub fn to_value(self: &Rc<Self>) -> Value {
        Value::Function(Rc::clone(self))
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Function")
            .field("name", &self.name)
            .field("arity", &self.arity())
            .field("builtin", &self.is_builtin())
            .finish()
    }
}

/// Name to function mapping owned by one interpreter
#[derive(Debug, Default)]
pub struct FunctionRegistry {
    functions: HashMap<Rc<str>, Rc<Function>>,
}

impl FunctionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a function, or redefine the existing one in place
    pub fn register(&mut self, name: &str, target: CallTarget) -> Rc<Function> {
        if let Some(existing) = self.functions.get(name) {
            tracing::debug!(function = name, "redefining function");
            existing.redefine(target);
            return Rc::clone(existing);
        }
        tracing::debug!(function = name, "registering function");
        let name: Rc<str> = Rc::from(name);
        let function = Function::new(Rc::clone(&name), target);
        self.functions.insert(name, Rc::clone(&function));
        function
    }

    pub fn register_body(&mut self, body: FunctionBody) -> Rc<Function> {
        let name = Rc::clone(&body.name.node);
        self.register(&name, CallTarget::Body(Rc::new(body)))
    }

    /// Register every function of one parsed source
    pub fn register_all(&mut self, bodies: Vec<FunctionBody>) {
        for body in bodies {
            self.register_body(body);
        }
    }

    pub fn lookup(&self, name: &str) -> Option<Rc<Function>> {
        self.functions.get(name).cloned()
    }
}
