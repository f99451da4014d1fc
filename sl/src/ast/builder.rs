//! Node construction interface used by the parser
//!
//! The parser recognizes productions and hands the pieces to a
//! [`NodeBuilder`], which resolves local variables to frame slots and
//! rejects constructs that are well-formed but meaningless, such as a
//! `break` outside of any loop.
//!
//! A name is local to a function when the function assigns it anywhere in
//! its body. Reads that precede the first write in source order are built
//! as function literals and patched to slot reads in
//! [`NodeBuilder::finish_function`].

use super::{BinOp, Block, Expr, FunctionBody, SourceId, Span, Spanned, Stmt};
use crate::error::{CompileError, Result};
use crate::interp::{InlineCache, Number};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Builds the functions of one source, one function at a time
#[derive(Debug)]
pub struct NodeBuilder {
    source: SourceId,
    functions: Vec<FunctionBody>,
    scope: FunctionScope,
}

/// State of the function currently being built
#[derive(Debug)]
struct FunctionScope {
    name: Spanned<Rc<str>>,
    params: Vec<Rc<str>>,
    locals: Vec<Rc<str>>,
    slots: HashMap<Rc<str>, usize>,
    loop_depth: usize,
    block_depth: usize,
}

impl Default for FunctionScope {
    fn default() -> Self {
        FunctionScope {
            name: Spanned::new(Rc::from(""), Span::default()),
            params: Vec::new(),
            locals: Vec::new(),
            slots: HashMap::new(),
            loop_depth: 0,
            block_depth: 0,
        }
    }
}

impl FunctionScope {
    fn slot(&self, name: &str) -> Option<usize> {
        self.slots.get(name).copied()
    }

    /// Slot for `name`, allocating a new one on first write
    fn slot_or_insert(&mut self, name: &Rc<str>) -> usize {
        if let Some(slot) = self.slot(name) {
            return slot;
        }
        let slot = self.locals.len();
        self.locals.push(Rc::clone(name));
        self.slots.insert(Rc::clone(name), slot);
        slot
    }
}

impl NodeBuilder {
    pub fn new(source: SourceId) -> Self {
        NodeBuilder {
            source,
            functions: Vec::new(),
            scope: FunctionScope::default(),
        }
    }

    // ============ Functions ============

    pub fn start_function(&mut self, name: &str, span: Span) {
        self.scope = FunctionScope {
            name: Spanned::new(Rc::from(name), span),
            ..FunctionScope::default()
        };
    }

    pub fn add_formal_parameter(&mut self, name: &str, span: Span) -> Result<()> {
        if self.scope.slot(name).is_some() {
            return Err(CompileError::semantic(
                format!("duplicate parameter \"{name}\""),
                span,
            ));
        }
        let name: Rc<str> = Rc::from(name);
        self.scope.slot_or_insert(&name);
        self.scope.params.push(name);
        Ok(())
    }

    pub fn finish_function(&mut self, mut body: Block) {
        let scope = std::mem::take(&mut self.scope);
        debug_assert_eq!(scope.block_depth, 0);
        resolve_late_locals(&mut body, &scope.slots);
        let span = scope.name.span.merge(body.span);
        self.functions.push(FunctionBody {
            name: scope.name,
            params: scope.params,
            locals: scope.locals,
            body,
            source: self.source,
            span,
        });
    }

    /// Functions finished so far, in source order
    pub fn finish(self) -> Vec<FunctionBody> {
        self.functions
    }

    // ============ Statements ============

    pub fn start_block(&mut self) {
        self.scope.block_depth += 1;
    }

    pub fn finish_block(&mut self, stmts: Vec<Spanned<Stmt>>, span: Span) -> Block {
        self.scope.block_depth = self.scope.block_depth.saturating_sub(1);
        Block::new(stmts, span)
    }

    /// Called before the body of a loop is parsed
    pub fn start_loop(&mut self) {
        self.scope.loop_depth += 1;
    }

    pub fn create_while(&mut self, cond: Spanned<Expr>, body: Block, span: Span) -> Spanned<Stmt> {
        self.scope.loop_depth = self.scope.loop_depth.saturating_sub(1);
        Spanned::new(Stmt::While { cond, body }, span)
    }

    pub fn create_if(
        &mut self,
        cond: Spanned<Expr>,
        then_block: Block,
        else_block: Option<Block>,
        span: Span,
    ) -> Spanned<Stmt> {
        Spanned::new(
            Stmt::If {
                cond,
                then_block,
                else_block,
            },
            span,
        )
    }

    pub fn create_break(&mut self, span: Span) -> Result<Spanned<Stmt>> {
        self.check_in_loop("break", span)?;
        Ok(Spanned::new(Stmt::Break, span))
    }

    pub fn create_continue(&mut self, span: Span) -> Result<Spanned<Stmt>> {
        self.check_in_loop("continue", span)?;
        Ok(Spanned::new(Stmt::Continue, span))
    }

    fn check_in_loop(&self, keyword: &str, span: Span) -> Result<()> {
        if self.scope.loop_depth == 0 {
            return Err(CompileError::semantic(
                format!("{keyword} used outside of loop"),
                span,
            ));
        }
        Ok(())
    }

    pub fn create_return(&mut self, value: Option<Spanned<Expr>>, span: Span) -> Spanned<Stmt> {
        Spanned::new(Stmt::Return(value), span)
    }

    pub fn create_expression_statement(&mut self, expr: Spanned<Expr>) -> Spanned<Stmt> {
        let span = expr.span;
        Spanned::new(Stmt::Expr(expr), span)
    }

    pub fn create_block_statement(&mut self, block: Block) -> Spanned<Stmt> {
        let span = block.span;
        Spanned::new(Stmt::Block(block), span)
    }

    // ============ Expressions ============

    pub fn create_binary(
        &mut self,
        op: BinOp,
        left: Spanned<Expr>,
        right: Spanned<Expr>,
    ) -> Spanned<Expr> {
        let span = left.span.merge(right.span);
        Spanned::new(
            Expr::Binary {
                left: Box::new(left),
                op,
                right: Box::new(right),
            },
            span,
        )
    }

    /// Identifier in expression position: a local if this function has
    /// written it before, otherwise a function literal until the function
    /// is finished
    pub fn create_read(&mut self, name: &str, span: Span) -> Spanned<Expr> {
        let name: Rc<str> = Rc::from(name);
        let expr = match self.scope.slot(&name) {
            Some(slot) => Expr::Local { name, slot },
            None => Expr::Function(name),
        };
        Spanned::new(expr, span)
    }

    pub fn create_write(&mut self, name: &str, value: Spanned<Expr>, span: Span) -> Spanned<Expr> {
        let name: Rc<str> = Rc::from(name);
        let slot = self.scope.slot_or_insert(&name);
        Spanned::new(
            Expr::Assign {
                name,
                slot,
                value: Box::new(value),
            },
            span,
        )
    }

    /// `target = value` where target was already built as a read
    pub fn create_assignment(
        &mut self,
        target: Spanned<Expr>,
        value: Spanned<Expr>,
    ) -> Result<Spanned<Expr>> {
        let span = target.span.merge(value.span);
        match target.node {
            Expr::Local { name, .. } | Expr::Function(name) => {
                Ok(self.create_write(&name, value, span))
            }
            Expr::Property { receiver, name } => {
                Ok(self.create_write_property(*receiver, name, value))
            }
            _ => Err(CompileError::semantic("invalid assignment target", target.span)),
        }
    }

    pub fn create_read_property(
        &mut self,
        receiver: Spanned<Expr>,
        name: Spanned<Rc<str>>,
    ) -> Spanned<Expr> {
        let span = receiver.span.merge(name.span);
        Spanned::new(
            Expr::Property {
                receiver: Box::new(receiver),
                name,
            },
            span,
        )
    }

    pub fn create_write_property(
        &mut self,
        receiver: Spanned<Expr>,
        name: Spanned<Rc<str>>,
        value: Spanned<Expr>,
    ) -> Spanned<Expr> {
        let span = receiver.span.merge(value.span);
        Spanned::new(
            Expr::SetProperty {
                receiver: Box::new(receiver),
                name,
                value: Box::new(value),
            },
            span,
        )
    }

    pub fn create_call(
        &mut self,
        callee: Spanned<Expr>,
        args: Vec<Spanned<Expr>>,
        span: Span,
    ) -> Spanned<Expr> {
        let span = callee.span.merge(span);
        Spanned::new(
            Expr::Call {
                callee: Box::new(callee),
                args,
                cache: RefCell::new(InlineCache::new()),
            },
            span,
        )
    }

    pub fn create_string_literal(&mut self, text: &str, span: Span) -> Spanned<Expr> {
        Spanned::new(Expr::Str(Rc::from(text)), span)
    }

    /// Decimal digits; literals beyond 64 bits become arbitrary precision
    pub fn create_numeric_literal(&mut self, digits: &str, span: Span) -> Result<Spanned<Expr>> {
        let number = Number::parse_literal(digits).ok_or_else(|| {
            CompileError::semantic(format!("invalid numeric literal \"{digits}\""), span)
        })?;
        Ok(Spanned::new(Expr::Number(number), span))
    }

    pub fn create_array_literal(
        &mut self,
        elements: Vec<Spanned<Expr>>,
        span: Span,
    ) -> Spanned<Expr> {
        Spanned::new(Expr::Array(elements), span)
    }
}

/// Rewrite function literals naming a slot of the finished function into
/// slot reads. Walks with explicit work lists so expression depth is not
/// bounded by the native stack.
fn resolve_late_locals(body: &mut Block, slots: &HashMap<Rc<str>, usize>) {
    let mut stmts: Vec<&mut Spanned<Stmt>> = body.stmts.iter_mut().collect();
    let mut exprs: Vec<&mut Spanned<Expr>> = Vec::new();

    while let Some(stmt) = stmts.pop() {
        match &mut stmt.node {
            Stmt::Block(block) => stmts.extend(block.stmts.iter_mut()),
            Stmt::If {
                cond,
                then_block,
                else_block,
            } => {
                exprs.push(cond);
                stmts.extend(then_block.stmts.iter_mut());
                if let Some(block) = else_block {
                    stmts.extend(block.stmts.iter_mut());
                }
            }
            Stmt::While { cond, body } => {
                exprs.push(cond);
                stmts.extend(body.stmts.iter_mut());
            }
            Stmt::Return(Some(value)) | Stmt::Expr(value) => exprs.push(value),
            Stmt::Return(None) | Stmt::Break | Stmt::Continue => {}
        }
    }

    while let Some(expr) = exprs.pop() {
        let local = match &expr.node {
            Expr::Function(name) => slots.get(name).map(|&slot| Expr::Local {
                name: Rc::clone(name),
                slot,
            }),
            _ => None,
        };
        if let Some(local) = local {
            expr.node = local;
            continue;
        }
        match &mut expr.node {
            Expr::Array(elements) => exprs.extend(elements.iter_mut()),
            Expr::Assign { value, .. } => exprs.push(&mut **value),
            Expr::Binary { left, right, .. } => {
                exprs.push(&mut **left);
                exprs.push(&mut **right);
            }
            Expr::Call { callee, args, .. } => {
                exprs.push(&mut **callee);
                exprs.extend(args.iter_mut());
            }
            Expr::Property { receiver, .. } => exprs.push(&mut **receiver),
            Expr::SetProperty {
                receiver, value, ..
            } => {
                exprs.push(&mut **receiver);
                exprs.push(&mut **value);
            }
            Expr::Number(_) | Expr::Str(_) | Expr::Function(_) | Expr::Local { .. } => {}
        }
    }
}
