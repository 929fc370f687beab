// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Tokenizer for calc statement blocks, built on logos.

use logos::Logos;

use crate::engine::RaisedFault;

#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r\n]+")]
pub enum Token {
    // Names, possibly qualified: `x`, `std::cout`, `std::invalid_argument`.
    #[regex(r"[A-Za-z_][A-Za-z0-9_]*(::[A-Za-z_][A-Za-z0-9_]*)*", |lex| lex.slice().to_string())]
    Ident(String),

    #[regex(r"[0-9]+\.[0-9]*([eE][+-]?[0-9]+)?", |lex| lex.slice().parse::<f64>().ok())]
    #[regex(r"[0-9]+[eE][+-]?[0-9]+", |lex| lex.slice().parse::<f64>().ok())]
    Float(f64),

    #[regex(r"[0-9]+", |lex| lex.slice().parse::<i64>().ok())]
    Int(i64),

    #[regex(r#""([^"\\\n]|\\.)*""#, |lex| unescape(lex.slice()))]
    Str(String),

    #[regex(r"//[^\n]*", logos::skip)]
    Comment,

    #[token("<<")]
    Shl,
    #[token("+=")]
    PlusEq,
    #[token("-=")]
    MinusEq,
    #[token("*=")]
    StarEq,
    #[token("/=")]
    SlashEq,
    #[token("==")]
    EqEq,
    #[token("!=")]
    BangEq,
    #[token("<=")]
    LtEq,
    #[token(">=")]
    GtEq,
    #[token("&&")]
    AmpAmp,
    #[token("||")]
    PipePipe,

    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("=")]
    Eq,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token("!")]
    Bang,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token(",")]
    Comma,
    #[token(";")]
    Semi,
}

/// Strip the quotes of a string literal and resolve its escapes.
fn unescape(literal: &str) -> String {
    let inner = &literal[1..literal.len() - 1];
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some(other) => out.push(other),
            None => {}
        }
    }
    out
}

/// Tokenize a whole block.
pub fn tokenize(source: &str) -> Result<Vec<Token>, RaisedFault> {
    let mut lexer = Token::lexer(source);
    let mut tokens = Vec::new();
    while let Some(result) = lexer.next() {
        match result {
            Ok(token) => tokens.push(token),
            Err(()) => {
                let ch = source[lexer.span().start..].chars().next().unwrap_or('?');
                return Err(RaisedFault::Other(format!("error: unexpected character '{}'", ch)));
            }
        }
    }
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stream_statement() {
        let tokens = tokenize("std::cout << std::setprecision(6);").unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::Ident("std::cout".to_string()),
                Token::Shl,
                Token::Ident("std::setprecision".to_string()),
                Token::LParen,
                Token::Int(6),
                Token::RParen,
                Token::Semi,
            ]
        );
    }

    #[test]
    fn numbers_strings_and_comments() {
        let tokens = tokenize("2.5 1e3 7 \"a\\n\\\"b\" // ignored\n<=").unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::Float(2.5),
                Token::Float(1000.0),
                Token::Int(7),
                Token::Str("a\n\"b".to_string()),
                Token::LtEq,
            ]
        );
    }

    #[test]
    fn stray_character() {
        assert_eq!(
            tokenize("x # y"),
            Err(RaisedFault::Other("error: unexpected character '#'".to_string()))
        );
    }
}
