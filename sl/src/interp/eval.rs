//! Tree-walking evaluator
//!
//! Statements produce a [`Control`] signal that tells the enclosing
//! construct how to continue; expressions produce a [`Value`]. Runtime
//! failures travel up as [`RuntimeError`] and carry the location of the
//! innermost node that could not be evaluated.

use super::builtins;
use super::cache::InlineCache;
use super::error::{InterpResult, RuntimeError};
use super::frame::Frame;
use super::function::{CallTarget, Function, FunctionRegistry};
use super::ops;
use super::value::Value;
use crate::ast::{
    BinOp, Block, Expr, FunctionBody, Source, SourceId, SourceMap, Span, Spanned, Stmt,
};
use crate::error::CompileError;
use crate::parser::parse_source;
use std::cell::RefCell;
use std::io::{self, BufRead, Write};
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Default maximum depth of nested user function calls
pub const MAX_RECURSION_DEPTH: usize = 100000;

/// Stack growth parameters for deep recursion
const STACK_RED_ZONE: usize = 128 * 1024; // 128KB remaining triggers growth
const STACK_GROW_SIZE: usize = 4 * 1024 * 1024; // Grow by 4MB each time

/// Outcome of executing a statement
#[derive(Debug, Clone, PartialEq)]
pub enum Control {
    /// Continue with the next statement
    Normal,
    /// Leave the innermost loop
    Break,
    /// Start the next iteration of the innermost loop
    Continue,
    /// Leave the function with a value
    Return(Value),
}

/// The interpreter: function registry, loaded sources and program I/O
pub struct Interpreter {
    registry: FunctionRegistry,
    sources: SourceMap,
    input: Box<dyn BufRead>,
    output: Box<dyn Write>,
    started: Instant,
    /// Current depth of nested user function calls
    depth: usize,
    max_depth: usize,
}

impl Interpreter {
    /// Interpreter on stdin/stdout with the built-ins installed
    pub fn new() -> Self {
        Self::with_io(io::stdin().lock(), io::stdout())
    }

    /// Interpreter on the given streams with the built-ins installed
    pub fn with_io(input: impl BufRead + 'static, output: impl Write + 'static) -> Self {
        let mut interp = Self::bare(input, output);
        builtins::install(&mut interp.registry);
        interp
    }

    /// Interpreter with an empty registry
    pub fn bare(input: impl BufRead + 'static, output: impl Write + 'static) -> Self {
        Interpreter {
            registry: FunctionRegistry::new(),
            sources: SourceMap::new(),
            input: Box::new(input),
            output: Box::new(output),
            started: Instant::now(),
            depth: 0,
            max_depth: MAX_RECURSION_DEPTH,
        }
    }

    pub fn registry(&self) -> &FunctionRegistry {
        &self.registry
    }

    pub fn sources(&self) -> &SourceMap {
        &self.sources
    }

    /// Limit nested user function calls; deeper calls fail with a stack
    /// overflow error
    pub fn set_max_depth(&mut self, max_depth: usize) {
        self.max_depth = max_depth;
    }

    /// Time since this interpreter was created
    pub fn uptime(&self) -> Duration {
        self.started.elapsed()
    }

    // ============ Loading ============

    pub fn add_source(&mut self, name: impl Into<String>, text: impl Into<String>) -> SourceId {
        self.sources.add(Source::new(name, text))
    }

    /// Parse a source already in the source map and register its functions.
    /// Nothing is registered unless the whole source parses.
    pub fn load_source(&mut self, id: SourceId) -> Result<usize, CompileError> {
        let source = self
            .sources
            .get(id)
            .cloned()
            .ok_or_else(|| CompileError::io_error(format!("unknown source {}", id.0)))?;
        let functions = parse_source(id, source.text())?;
        let count = functions.len();
        tracing::debug!(source = source.name(), functions = count, "loaded source");
        self.registry.register_all(functions);
        Ok(count)
    }

    /// Drop the newest source after it failed to load
    pub fn discard_source(&mut self, id: SourceId) -> Option<Rc<Source>> {
        self.sources.discard(id)
    }

    /// Add and load a source; a source that fails to parse is not kept
    pub fn load(
        &mut self,
        name: impl Into<String>,
        text: impl Into<String>,
    ) -> Result<SourceId, CompileError> {
        let id = self.add_source(name, text);
        if let Err(err) = self.load_source(id) {
            self.discard_source(id);
            return Err(err);
        }
        Ok(id)
    }

    // ============ Calls ============

    /// Call a registered function by name
    pub fn call_function_with_args(&mut self, name: &str, args: Vec<Value>) -> InterpResult<Value> {
        let function = self
            .registry
            .lookup(name)
            .ok_or_else(|| RuntimeError::undefined_function(&Rc::from(name)))?;
        self.call(&function, args)
    }

    /// Invoke the current call target of `function`
    pub fn call(&mut self, function: &Rc<Function>, args: Vec<Value>) -> InterpResult<Value> {
        let target = function.target();
        if target.arity() != args.len() {
            return Err(RuntimeError::arity_mismatch(
                function.name(),
                target.arity(),
                args.len(),
            ));
        }
        match target {
            CallTarget::Native(builtin) => (builtin.func)(self, args),
            CallTarget::Body(body) => self.call_body(&body, args),
        }
    }

    /// Run a user function body with automatic stack growth
    fn call_body(&mut self, body: &FunctionBody, args: Vec<Value>) -> InterpResult<Value> {
        stacker::maybe_grow(STACK_RED_ZONE, STACK_GROW_SIZE, || {
            self.execute_body(body, args)
        })
    }

    #[tracing::instrument(level = "debug", skip_all, fields(function = %body.name.node))]
    fn execute_body(&mut self, body: &FunctionBody, args: Vec<Value>) -> InterpResult<Value> {
        self.depth += 1;
        if self.depth > self.max_depth {
            self.depth -= 1;
            return Err(RuntimeError::stack_overflow());
        }

        let mut frame = Frame::with_args(body.frame_size(), body.source, args);
        let result = self.exec_block(&body.body, &mut frame);
        self.depth -= 1;

        match result? {
            Control::Normal => Ok(Value::Null),
            Control::Return(value) => Ok(value),
            Control::Break => Err(RuntimeError::invalid_control_flow("break", &body.name.node)),
            Control::Continue => {
                Err(RuntimeError::invalid_control_flow("continue", &body.name.node))
            }
        }
    }

    // ============ Statements ============

    fn exec_block(&mut self, block: &Block, frame: &mut Frame) -> InterpResult<Control> {
        for stmt in &block.stmts {
            match self.exec(stmt, frame)? {
                Control::Normal => {}
                signal => return Ok(signal),
            }
        }
        Ok(Control::Normal)
    }

    fn exec(&mut self, stmt: &Spanned<Stmt>, frame: &mut Frame) -> InterpResult<Control> {
        match &stmt.node {
            Stmt::Block(block) => self.exec_block(block, frame),

            Stmt::If {
                cond,
                then_block,
                else_block,
            } => {
                if self.eval_condition(cond, frame, "if")? {
                    self.exec_block(then_block, frame)
                } else if let Some(else_block) = else_block {
                    self.exec_block(else_block, frame)
                } else {
                    Ok(Control::Normal)
                }
            }

            Stmt::While { cond, body } => {
                while self.eval_condition(cond, frame, "while")? {
                    match self.exec_block(body, frame)? {
                        Control::Normal | Control::Continue => {}
                        Control::Break => break,
                        ret @ Control::Return(_) => return Ok(ret),
                    }
                }
                Ok(Control::Normal)
            }

            Stmt::Break => Ok(Control::Break),
            Stmt::Continue => Ok(Control::Continue),

            Stmt::Return(value) => {
                let value = match value {
                    Some(expr) => self.eval(expr, frame)?,
                    None => Value::Null,
                };
                Ok(Control::Return(value))
            }

            Stmt::Expr(expr) => {
                self.eval(expr, frame)?;
                Ok(Control::Normal)
            }
        }
    }

    /// Conditions must be Boolean; anything else is a type error on the
    /// statement keyword
    fn eval_condition(
        &mut self,
        cond: &Spanned<Expr>,
        frame: &mut Frame,
        statement: &'static str,
    ) -> InterpResult<bool> {
        match self.eval(cond, frame)? {
            Value::Bool(b) => Ok(b),
            other => Err(RuntimeError::unsupported(statement, vec![Some(other)])
                .at(frame.locate(cond.span))),
        }
    }

    // ============ Expressions ============

    fn eval(&mut self, expr: &Spanned<Expr>, frame: &mut Frame) -> InterpResult<Value> {
        stacker::maybe_grow(STACK_RED_ZONE, STACK_GROW_SIZE, || self.eval_inner(expr, frame))
    }

    fn eval_inner(&mut self, expr: &Spanned<Expr>, frame: &mut Frame) -> InterpResult<Value> {
        match &expr.node {
            Expr::Number(n) => Ok(Value::Number(n.clone())),
            Expr::Str(s) => Ok(Value::Str(Rc::clone(s))),

            Expr::Array(elements) => {
                let mut values = Vec::with_capacity(elements.len());
                for element in elements {
                    values.push(self.eval(element, frame)?);
                }
                Ok(Value::array(values))
            }

            Expr::Function(name) => self
                .registry
                .lookup(name)
                .map(|function| function.to_value())
                .ok_or_else(|| {
                    RuntimeError::undefined_function(name).at(frame.locate(expr.span))
                }),

            Expr::Local { name, slot } => frame.read(*slot).cloned().ok_or_else(|| {
                RuntimeError::uninitialized_variable(name).at(frame.locate(expr.span))
            }),

            Expr::Assign { slot, value, .. } => {
                let value = self.eval(value, frame)?;
                frame.write(*slot, value.clone());
                Ok(value)
            }

            Expr::Binary { left, op, right } => {
                self.eval_binary(*op, left, right, expr.span, frame)
            }

            Expr::Call {
                callee,
                args,
                cache,
            } => self.eval_call(callee, args, cache, expr.span, frame),

            Expr::Property { receiver, name } => {
                let receiver = self.eval(receiver, frame)?;
                Err(RuntimeError::unsupported(
                    ".",
                    vec![Some(receiver), Some(Value::Str(Rc::clone(&name.node)))],
                )
                .at(frame.locate(expr.span)))
            }

            Expr::SetProperty {
                receiver,
                name,
                value,
            } => {
                let receiver = self.eval(receiver, frame)?;
                let value = self.eval(value, frame)?;
                Err(RuntimeError::unsupported(
                    ".",
                    vec![
                        Some(receiver),
                        Some(Value::Str(Rc::clone(&name.node))),
                        Some(value),
                    ],
                )
                .at(frame.locate(expr.span)))
            }
        }
    }

    fn eval_binary(
        &mut self,
        op: BinOp,
        left: &Spanned<Expr>,
        right: &Spanned<Expr>,
        span: Span,
        frame: &mut Frame,
    ) -> InterpResult<Value> {
        let left = self.eval(left, frame)?;

        if op.is_short_circuit() {
            match left {
                Value::Bool(b) if (op == BinOp::And) != b => return Ok(Value::Bool(b)),
                Value::Bool(_) => {}
                other => {
                    return Err(RuntimeError::unsupported(op.symbol(), vec![Some(other), None])
                        .at(frame.locate(span)));
                }
            }
        }

        let right = self.eval(right, frame)?;
        ops::binary(op, left, right).map_err(|e| e.at(frame.locate(span)))
    }

    fn eval_call(
        &mut self,
        callee: &Spanned<Expr>,
        args: &[Spanned<Expr>],
        cache: &RefCell<InlineCache>,
        span: Span,
        frame: &mut Frame,
    ) -> InterpResult<Value> {
        let function = match self.eval(callee, frame)? {
            Value::Function(function) => function,
            other => {
                return Err(RuntimeError::unsupported("call", vec![Some(other)])
                    .at(frame.locate(span)));
            }
        };

        let mut values = Vec::with_capacity(args.len());
        for arg in args {
            values.push(self.eval(arg, frame)?);
        }

        // The cache borrow ends here; recursive calls re-enter this site
        let dispatch = cache.borrow_mut().dispatch(&function);
        tracing::trace!(callee = function.name(), ?dispatch, "call");

        self.call(&function, values).map_err(|e| e.at(frame.locate(span)))
    }

    // ============ Program I/O ============

    /// Write one line to the output sink
    pub fn write_line(&mut self, text: &str) -> InterpResult<()> {
        writeln!(self.output, "{text}").map_err(RuntimeError::io_error)?;
        self.output.flush().map_err(RuntimeError::io_error)
    }

    /// Read one line without its line terminator; `None` at end of input
    pub fn read_line(&mut self) -> InterpResult<Option<String>> {
        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .map_err(RuntimeError::io_error)?;
        if read == 0 {
            return Ok(None);
        }
        if line.ends_with('\n') {
            line.pop();
            if line.ends_with('\r') {
                line.pop();
            }
        }
        Ok(Some(line))
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}
