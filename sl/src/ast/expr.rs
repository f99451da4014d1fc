//! Expression AST nodes

use super::Spanned;
use crate::interp::{InlineCache, Number};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Expression
#[derive(Debug)]
pub enum Expr {
    /// Numeric literal, already promoted if it does not fit 64 bits
    Number(Number),
    /// String literal
    Str(Rc<str>),
    /// Array literal: [e, e, ...]
    Array(Vec<Spanned<Expr>>),

    /// Identifier that is not a local of the enclosing function.
    /// Resolved through the function registry at evaluation time.
    Function(Rc<str>),

    /// Local variable read
    Local { name: Rc<str>, slot: usize },

    /// Local variable write; evaluates to the written value
    Assign {
        name: Rc<str>,
        slot: usize,
        value: Box<Spanned<Expr>>,
    },

    /// Binary operation, including the short-circuit `&&` and `||`
    Binary {
        left: Box<Spanned<Expr>>,
        op: BinOp,
        right: Box<Spanned<Expr>>,
    },

    /// Function call with its per call-site dispatch cache
    Call {
        callee: Box<Spanned<Expr>>,
        args: Vec<Spanned<Expr>>,
        cache: RefCell<InlineCache>,
    },

    /// Property read: receiver.name
    Property {
        receiver: Box<Spanned<Expr>>,
        name: Spanned<Rc<str>>,
    },

    /// Property write: receiver.name = value
    SetProperty {
        receiver: Box<Spanned<Expr>>,
        name: Spanned<Rc<str>>,
        value: Box<Spanned<Expr>>,
    },
}

/// Binary operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,
    And,
    Or,
}

impl BinOp {
    /// Operator as written in source; also the operation name in type errors
    pub fn symbol(self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Mod => "%",
            BinOp::Lt => "<",
            BinOp::Le => "<=",
            BinOp::Gt => ">",
            BinOp::Ge => ">=",
            BinOp::Eq => "==",
            BinOp::Ne => "!=",
            BinOp::And => "&&",
            BinOp::Or => "||",
        }
    }

    pub fn is_short_circuit(self) -> bool {
        matches!(self, BinOp::And | BinOp::Or)
    }
}

impl fmt::Display for BinOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binop_symbols() {
        let ops = [
            (BinOp::Add, "+"),
            (BinOp::Mod, "%"),
            (BinOp::Le, "<="),
            (BinOp::Ne, "!="),
            (BinOp::Or, "||"),
        ];
        for (op, symbol) in ops {
            assert_eq!(op.to_string(), symbol);
        }
    }

    #[test]
    fn test_short_circuit_ops() {
        assert!(BinOp::And.is_short_circuit());
        assert!(BinOp::Or.is_short_circuit());
        assert!(!BinOp::Eq.is_short_circuit());
    }
}
