//! Abstract Syntax Tree definitions

pub mod builder;
mod expr;
mod source;
mod span;
mod stmt;

pub use builder::NodeBuilder;
pub use expr::*;
pub use source::*;
pub use span::*;
pub use stmt::*;

use std::rc::Rc;

/// A parsed user function, ready to be bound to a registry entry
#[derive(Debug)]
pub struct FunctionBody {
    pub name: Spanned<Rc<str>>,
    /// Parameter names; parameters occupy the first frame slots
    pub params: Vec<Rc<str>>,
    /// Name of every frame slot, parameters first
    pub locals: Vec<Rc<str>>,
    pub body: Block,
    pub source: SourceId,
    pub span: Span,
}

impl FunctionBody {
    pub fn arity(&self) -> usize {
        self.params.len()
    }

    pub fn frame_size(&self) -> usize {
        self.locals.len()
    }
}

impl Drop for FunctionBody {
    /// Tear the tree down with work lists; long operator chains nest
    /// deeper than the native stack allows for recursive drop.
    fn drop(&mut self) {
        let mut stmts: Vec<Stmt> = std::mem::take(&mut self.body.stmts)
            .into_iter()
            .map(|stmt| stmt.node)
            .collect();
        let mut exprs: Vec<Expr> = Vec::new();

        loop {
            if let Some(stmt) = stmts.pop() {
                match stmt {
                    Stmt::Block(block) => stmts.extend(block.stmts.into_iter().map(|s| s.node)),
                    Stmt::If {
                        cond,
                        then_block,
                        else_block,
                    } => {
                        exprs.push(cond.node);
                        stmts.extend(then_block.stmts.into_iter().map(|s| s.node));
                        if let Some(block) = else_block {
                            stmts.extend(block.stmts.into_iter().map(|s| s.node));
                        }
                    }
                    Stmt::While { cond, body } => {
                        exprs.push(cond.node);
                        stmts.extend(body.stmts.into_iter().map(|s| s.node));
                    }
                    Stmt::Return(Some(value)) | Stmt::Expr(value) => exprs.push(value.node),
                    Stmt::Return(None) | Stmt::Break | Stmt::Continue => {}
                }
            } else if let Some(expr) = exprs.pop() {
                match expr {
                    Expr::Array(elements) => exprs.extend(elements.into_iter().map(|e| e.node)),
                    Expr::Assign { value, .. } => exprs.push(value.node),
                    Expr::Binary { left, right, .. } => {
                        exprs.push(left.node);
                        exprs.push(right.node);
                    }
                    Expr::Call { callee, args, .. } => {
                        exprs.push(callee.node);
                        exprs.extend(args.into_iter().map(|e| e.node));
                    }
                    Expr::Property { receiver, .. } => exprs.push(receiver.node),
                    Expr::SetProperty {
                        receiver, value, ..
                    } => {
                        exprs.push(receiver.node);
                        exprs.push(value.node);
                    }
                    Expr::Number(_) | Expr::Str(_) | Expr::Function(_) | Expr::Local { .. } => {}
                }
            } else {
                break;
            }
        }
    }
}
