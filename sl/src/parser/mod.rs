//! Recursive-descent parser driving the node builder
//!
//! ```text
//! program     = function { function } EOF
//! function    = "function" IDENT "(" [ IDENT { "," IDENT } ] ")" block
//! block       = "{" { statement } "}"
//! statement   = while | if | block | "break" ";" | "continue" ";"
//!             | "return" [ expression ] ";" | expression ";"
//! expression  = logic_term { "||" logic_term }
//! logic_term  = logic_factor { "&&" logic_factor }
//! logic_factor= arithmetic [ ("<" | "<=" | ">" | ">=" | "==" | "!=") arithmetic ]
//! arithmetic  = term { ("+" | "-") term }
//! term        = factor { ("*" | "/" | "%") factor }
//! factor      = IDENT { member } | STRING | NUMBER | "(" expression ")"
//!             | "[" [ expression { "," expression } ] "]"
//! member      = "(" [ expression { "," expression } ] ")" | "." IDENT | "=" expression
//! ```

use crate::ast::{BinOp, Block, Expr, FunctionBody, NodeBuilder, SourceId, Span, Spanned, Stmt};
use crate::error::{CompileError, Result};
use crate::lexer::{Token, tokenize};
use std::rc::Rc;


/// Stack growth for deeply parenthesized input
const STACK_RED_ZONE: usize = 64 * 1024;
const STACK_GROW_SIZE: usize = 1024 * 1024;

/// Tokenize and parse one source text
pub fn parse_source(source: SourceId, text: &str) -> Result<Vec<FunctionBody>> {
    let tokens = tokenize(text)?;
    parse(source, tokens, text.len())
}

/// Parse tokens into the functions they define
pub fn parse(
    source: SourceId,
    tokens: Vec<(Token, Span)>,
    source_len: usize,
) -> Result<Vec<FunctionBody>> {
    let mut parser = Parser {
        tokens,
        pos: 0,
        eof: Span::new(source_len, source_len),
        builder: NodeBuilder::new(source),
    };
    parser.program()?;
    Ok(parser.builder.finish())
}

struct Parser {
    tokens: Vec<(Token, Span)>,
    pos: usize,
    eof: Span,
    builder: NodeBuilder,
}

impl Parser {
    // ============ Token access ============

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|(token, _)| token)
    }

    fn peek_span(&self) -> Span {
        self.tokens
            .get(self.pos)
            .map_or(self.eof, |(_, span)| *span)
    }

    fn advance(&mut self) -> Option<(Token, Span)> {
        let next = self.tokens.get(self.pos).cloned();
        if next.is_some() {
            self.pos += 1;
        }
        next
    }

    fn at(&self, token: &Token) -> bool {
        self.peek() == Some(token)
    }

    fn eat(&mut self, token: &Token) -> Option<Span> {
        if self.at(token) {
            self.advance().map(|(_, span)| span)
        } else {
            None
        }
    }

    fn expect(&mut self, token: &Token) -> Result<Span> {
        match self.eat(token) {
            Some(span) => Ok(span),
            None => Err(self.unexpected(&format!("'{token}'"))),
        }
    }

    fn expect_ident(&mut self) -> Result<Spanned<String>> {
        match self.peek() {
            Some(Token::Ident(_)) => match self.advance() {
                Some((Token::Ident(name), span)) => Ok(Spanned::new(name, span)),
                _ => Err(self.unexpected("identifier")),
            },
            _ => Err(self.unexpected("identifier")),
        }
    }

    fn unexpected(&self, expected: &str) -> CompileError {
        let span = self.peek_span();
        match self.peek() {
            Some(found) => {
                CompileError::parser(format!("expected {expected}, found '{found}'"), span)
            }
            None => CompileError::parser(format!("expected {expected}, found end of input"), span),
        }
    }

    // ============ Declarations ============

    fn program(&mut self) -> Result<()> {
        self.function()?;
        while self.peek().is_some() {
            self.function()?;
        }
        Ok(())
    }

    fn function(&mut self) -> Result<()> {
        self.expect(&Token::Function)?;
        let name = self.expect_ident()?;
        self.builder.start_function(&name.node, name.span);

        self.expect(&Token::LParen)?;
        if !self.at(&Token::RParen) {
            loop {
                let param = self.expect_ident()?;
                self.builder.add_formal_parameter(&param.node, param.span)?;
                if self.eat(&Token::Comma).is_none() {
                    break;
                }
            }
        }
        self.expect(&Token::RParen)?;

        let body = self.block()?;
        self.builder.finish_function(body);
        Ok(())
    }

    // ============ Statements ============

    fn block(&mut self) -> Result<Block> {
        let open = self.expect(&Token::LBrace)?;
        self.builder.start_block();
        let mut stmts = Vec::new();
        while !self.at(&Token::RBrace) {
            if self.peek().is_none() {
                return Err(self.unexpected("'}'"));
            }
            stmts.push(self.statement()?);
        }
        let close = self.expect(&Token::RBrace)?;
        Ok(self.builder.finish_block(stmts, open.merge(close)))
    }

    fn statement(&mut self) -> Result<Spanned<Stmt>> {
        let start = self.peek_span();
        match self.peek() {
            Some(Token::While) => self.while_statement(),
            Some(Token::If) => self.if_statement(),
            Some(Token::LBrace) => {
                let block = self.block()?;
                Ok(self.builder.create_block_statement(block))
            }
            Some(Token::Break) => {
                self.advance();
                let stmt = self.builder.create_break(start)?;
                self.expect(&Token::Semi)?;
                Ok(stmt)
            }
            Some(Token::Continue) => {
                self.advance();
                let stmt = self.builder.create_continue(start)?;
                self.expect(&Token::Semi)?;
                Ok(stmt)
            }
            Some(Token::Return) => {
                self.advance();
                let value = if self.at(&Token::Semi) {
                    None
                } else {
                    Some(self.expression()?)
                };
                let end = self.expect(&Token::Semi)?;
                Ok(self.builder.create_return(value, start.merge(end)))
            }
            _ => {
                let expr = self.expression()?;
                self.expect(&Token::Semi)?;
                Ok(self.builder.create_expression_statement(expr))
            }
        }
    }

    fn while_statement(&mut self) -> Result<Spanned<Stmt>> {
        let start = self.expect(&Token::While)?;
        self.expect(&Token::LParen)?;
        let cond = self.expression()?;
        self.expect(&Token::RParen)?;
        self.builder.start_loop();
        let body = self.block()?;
        let span = start.merge(body.span);
        Ok(self.builder.create_while(cond, body, span))
    }

    fn if_statement(&mut self) -> Result<Spanned<Stmt>> {
        let start = self.expect(&Token::If)?;
        self.expect(&Token::LParen)?;
        let cond = self.expression()?;
        self.expect(&Token::RParen)?;
        let then_block = self.block()?;
        let else_block = if self.eat(&Token::Else).is_some() {
            Some(self.block()?)
        } else {
            None
        };
        let end = else_block.as_ref().map_or(then_block.span, |b| b.span);
        Ok(self
            .builder
            .create_if(cond, then_block, else_block, start.merge(end)))
    }

    // ============ Expressions ============

    fn expression(&mut self) -> Result<Spanned<Expr>> {
        stacker::maybe_grow(STACK_RED_ZONE, STACK_GROW_SIZE, || self.logic_expression())
    }

    fn logic_expression(&mut self) -> Result<Spanned<Expr>> {
        let mut left = self.logic_term()?;
        while self.eat(&Token::PipePipe).is_some() {
            let right = self.logic_term()?;
            left = self.builder.create_binary(BinOp::Or, left, right);
        }
        Ok(left)
    }

    fn logic_term(&mut self) -> Result<Spanned<Expr>> {
        let mut left = self.logic_factor()?;
        while self.eat(&Token::AmpAmp).is_some() {
            let right = self.logic_factor()?;
            left = self.builder.create_binary(BinOp::And, left, right);
        }
        Ok(left)
    }

    /// Comparisons do not chain: `a < b < c` is a syntax error
    fn logic_factor(&mut self) -> Result<Spanned<Expr>> {
        let left = self.arithmetic()?;
        let op = match self.peek() {
            Some(Token::Lt) => BinOp::Lt,
            Some(Token::LtEq) => BinOp::Le,
            Some(Token::Gt) => BinOp::Gt,
            Some(Token::GtEq) => BinOp::Ge,
            Some(Token::EqEq) => BinOp::Eq,
            Some(Token::NotEq) => BinOp::Ne,
            _ => return Ok(left),
        };
        self.advance();
        let right = self.arithmetic()?;
        Ok(self.builder.create_binary(op, left, right))
    }

    fn arithmetic(&mut self) -> Result<Spanned<Expr>> {
        let mut left = self.term()?;
        loop {
            let op = match self.peek() {
                Some(Token::Plus) => BinOp::Add,
                Some(Token::Minus) => BinOp::Sub,
                _ => return Ok(left),
            };
            self.advance();
            let right = self.term()?;
            left = self.builder.create_binary(op, left, right);
        }
    }

    fn term(&mut self) -> Result<Spanned<Expr>> {
        let mut left = self.factor()?;
        loop {
            let op = match self.peek() {
                Some(Token::Star) => BinOp::Mul,
                Some(Token::Slash) => BinOp::Div,
                Some(Token::Percent) => BinOp::Mod,
                _ => return Ok(left),
            };
            self.advance();
            let right = self.factor()?;
            left = self.builder.create_binary(op, left, right);
        }
    }

    fn factor(&mut self) -> Result<Spanned<Expr>> {
        let Some((token, span)) = self.advance() else {
            return Err(self.unexpected("expression"));
        };
        match token {
            Token::Ident(name) => {
                let read = self.builder.create_read(&name, span);
                self.member_chain(read)
            }
            Token::StringLit(text) => Ok(self.builder.create_string_literal(&text, span)),
            Token::NumericLit(digits) => self.builder.create_numeric_literal(&digits, span),
            Token::LParen => {
                let expr = self.expression()?;
                let close = self.expect(&Token::RParen)?;
                Ok(Spanned::new(expr.node, span.merge(close)))
            }
            Token::LBracket => {
                let elements = self.comma_list(&Token::RBracket)?;
                let close = self.expect(&Token::RBracket)?;
                Ok(self.builder.create_array_literal(elements, span.merge(close)))
            }
            found => Err(CompileError::parser(
                format!("expected expression, found '{found}'"),
                span,
            )),
        }
    }

    /// Calls and property accesses after an identifier. An assignment ends
    /// the chain since its right-hand side takes the rest of the expression.
    fn member_chain(&mut self, mut expr: Spanned<Expr>) -> Result<Spanned<Expr>> {
        loop {
            match self.peek() {
                Some(Token::LParen) => {
                    self.advance();
                    let args = self.comma_list(&Token::RParen)?;
                    let close = self.expect(&Token::RParen)?;
                    expr = self.builder.create_call(expr, args, close);
                }
                Some(Token::Dot) => {
                    self.advance();
                    let name = self.expect_ident()?;
                    let name = Spanned::new(Rc::from(name.node), name.span);
                    expr = self.builder.create_read_property(expr, name);
                }
                Some(Token::Eq) => {
                    self.advance();
                    let value = self.expression()?;
                    return self.builder.create_assignment(expr, value);
                }
                _ => return Ok(expr),
            }
        }
    }

    /// Comma-separated expressions up to (not including) `close`
    fn comma_list(&mut self, close: &Token) -> Result<Vec<Spanned<Expr>>> {
        let mut items = Vec::new();
        if self.at(close) {
            return Ok(items);
        }
        loop {
            items.push(self.expression()?);
            if self.eat(&Token::Comma).is_none() {
                return Ok(items);
            }
        }
    }
}
