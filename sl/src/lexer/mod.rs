//! Lexer implementation using logos

mod token;

pub use token::Token;

use crate::ast::Span;
use crate::error::{CompileError, Result};
use logos::Logos;

/// Tokenize source code
pub fn tokenize(source: &str) -> Result<Vec<(Token, Span)>> {
    let mut tokens = Vec::new();
    let mut lexer = Token::lexer(source);

    while let Some(result) = lexer.next() {
        let span = Span::new(lexer.span().start, lexer.span().end);
        match result {
            Ok(token) => tokens.push((token, span)),
            Err(_) => {
                return Err(CompileError::lexer(
                    format!("unexpected character: {:?}", lexer.slice()),
                    span,
                ));
            }
        }
    }

    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<Token> {
        tokenize(source)
            .unwrap()
            .into_iter()
            .map(|(t, _)| t)
            .collect()
    }

    #[test]
    fn test_tokenize_empty() {
        assert!(tokenize("").unwrap().is_empty());
        assert!(tokenize("  \t\n\r\n ").unwrap().is_empty());
    }

    #[test]
    fn test_tokenize_keywords() {
        assert_eq!(
            kinds("function if else while break continue return"),
            vec![
                Token::Function,
                Token::If,
                Token::Else,
                Token::While,
                Token::Break,
                Token::Continue,
                Token::Return,
            ]
        );
    }

    #[test]
    fn test_tokenize_numeric_literal_keeps_digits() {
        let big = "123456789012345678901234567890";
        assert_eq!(kinds(big), vec![Token::NumericLit(big.to_string())]);
    }

    #[test]
    fn test_tokenize_negative_number_is_minus_then_literal() {
        assert_eq!(
            kinds("-42"),
            vec![Token::Minus, Token::NumericLit("42".to_string())]
        );
    }

    #[test]
    fn test_tokenize_string_literal_strips_quotes() {
        assert_eq!(
            kinds(r#""hello world""#),
            vec![Token::StringLit("hello world".to_string())]
        );
        assert_eq!(kinds(r#""""#), vec![Token::StringLit(String::new())]);
    }

    #[test]
    fn test_tokenize_unterminated_string_fails() {
        assert!(tokenize("\"abc").is_err());
    }

    #[test]
    fn test_tokenize_operators() {
        assert_eq!(
            kinds("|| && < <= > >= == != + - * / % ="),
            vec![
                Token::PipePipe,
                Token::AmpAmp,
                Token::Lt,
                Token::LtEq,
                Token::Gt,
                Token::GtEq,
                Token::EqEq,
                Token::NotEq,
                Token::Plus,
                Token::Minus,
                Token::Star,
                Token::Slash,
                Token::Percent,
                Token::Eq,
            ]
        );
    }

    #[test]
    fn test_tokenize_delimiters() {
        assert_eq!(
            kinds("( ) { } [ ] , ; ."),
            vec![
                Token::LParen,
                Token::RParen,
                Token::LBrace,
                Token::RBrace,
                Token::LBracket,
                Token::RBracket,
                Token::Comma,
                Token::Semi,
                Token::Dot,
            ]
        );
    }

    #[test]
    fn test_tokenize_identifiers() {
        assert_eq!(
            kinds("foo bar_baz x123 $tmp"),
            vec![
                Token::Ident("foo".to_string()),
                Token::Ident("bar_baz".to_string()),
                Token::Ident("x123".to_string()),
                Token::Ident("$tmp".to_string()),
            ]
        );
    }

    #[test]
    fn test_tokenize_skips_comments() {
        assert_eq!(
            kinds("function // line comment\n/* block\n * comment */ main"),
            vec![Token::Function, Token::Ident("main".to_string())]
        );
    }

    #[test]
    fn test_tokenize_spans() {
        let tokens = tokenize("function main").unwrap();
        assert_eq!(tokens[0].1, Span::new(0, 8));
        assert_eq!(tokens[1].1, Span::new(9, 13));
    }

    #[test]
    fn test_tokenize_unexpected_character() {
        let err = tokenize("function main() { # }").unwrap_err();
        assert!(err.message().contains("unexpected character"));
        assert_eq!(err.span(), Some(Span::new(18, 19)));
    }
}
