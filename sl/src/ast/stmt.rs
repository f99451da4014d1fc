//! Statement AST nodes

use super::{Expr, Span, Spanned};

/// Statement
#[derive(Debug)]
pub enum Stmt {
    /// Nested block
    Block(Block),
    /// if (cond) { ... } else { ... }
    If {
        cond: Spanned<Expr>,
        then_block: Block,
        else_block: Option<Block>,
    },
    /// while (cond) { ... }
    While { cond: Spanned<Expr>, body: Block },
    Break,
    Continue,
    /// return [value];
    Return(Option<Spanned<Expr>>),
    /// Expression evaluated for its effect
    Expr(Spanned<Expr>),
}

/// Brace-delimited statement sequence
#[derive(Debug)]
pub struct Block {
    pub stmts: Vec<Spanned<Stmt>>,
    pub span: Span,
}

impl Block {
    pub fn new(stmts: Vec<Spanned<Stmt>>, span: Span) -> Self {
        Block { stmts, span }
    }
}
