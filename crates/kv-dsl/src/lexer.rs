use std::fmt;

use kv_core::CmpOp;
use logos::Logos;

/// Token type for the condition language.
///
/// Keywords (`and`, `skill`, `has_tag`, ...) are all `Token::Word`; the
/// parser decides what a word means from its position.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Left parenthesis `(`.
    LParen,
    /// Right parenthesis `)`.
    RParen,
    /// Comparison operator.
    Op(CmpOp),
    /// Double-quoted string literal.
    Str(String),
    /// Integer literal. Keeps the source text for messages.
    Integer(i64, String),
    /// Bare word (identifier or keyword).
    Word(String),
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::LParen => write!(f, "("),
            Token::RParen => write!(f, ")"),
            Token::Op(op) => write!(f, "{op}"),
            Token::Str(s) => write!(f, "\"{s}\""),
            Token::Integer(_, s) => write!(f, "{s}"),
            Token::Word(w) => write!(f, "{w}"),
        }
    }
}

/// Internal logos token. Converted to owned `Token` after lexing.
#[derive(Logos, Debug)]
#[logos(skip r"[ \t\r\n]+")]
enum RawToken {
    #[token("(")]
    LParen,

    #[token(")")]
    RParen,

    #[token("==")]
    #[token("=")]
    Eq,

    #[token("!=")]
    Ne,

    #[token(">=")]
    Ge,

    #[token("<=")]
    Le,

    #[token(">")]
    Gt,

    #[token("<")]
    Lt,

    #[regex(r#""([^"\\\n]|\\.)*""#)]
    Str,

    #[regex(r"-?[0-9]+")]
    Integer,

    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*")]
    Word,
}

/// A lexer error with source location.
#[derive(Debug, Clone)]
pub struct LexError {
    /// Byte range of the erroneous input in the source.
    pub span: std::ops::Range<usize>,
    /// Human-readable description of the lexer error.
    pub message: String,
}

/// Lex a condition into `(Token, Span)` pairs.
///
/// Lexing continues past errors so every bad character is reported.
pub fn lex(source: &str) -> (Vec<(Token, std::ops::Range<usize>)>, Vec<LexError>) {
    let mut tokens = Vec::new();
    let mut errors = Vec::new();
    let mut lexer = RawToken::lexer(source);

    while let Some(result) = lexer.next() {
        let span = lexer.span();
        let token = match result {
            Ok(RawToken::LParen) => Token::LParen,
            Ok(RawToken::RParen) => Token::RParen,
            Ok(RawToken::Eq) => Token::Op(CmpOp::Eq),
            Ok(RawToken::Ne) => Token::Op(CmpOp::Ne),
            Ok(RawToken::Ge) => Token::Op(CmpOp::Ge),
            Ok(RawToken::Le) => Token::Op(CmpOp::Le),
            Ok(RawToken::Gt) => Token::Op(CmpOp::Gt),
            Ok(RawToken::Lt) => Token::Op(CmpOp::Lt),
            Ok(RawToken::Str) => {
                let slice = lexer.slice();
                Token::Str(unescape(&slice[1..slice.len() - 1]))
            }
            Ok(RawToken::Integer) => {
                let raw = lexer.slice().to_string();
                match raw.parse::<i64>() {
                    Ok(n) => Token::Integer(n, raw),
                    Err(_) => {
                        errors.push(LexError {
                            span,
                            message: format!("invalid integer literal: {raw}"),
                        });
                        continue;
                    }
                }
            }
            Ok(RawToken::Word) => Token::Word(lexer.slice().to_string()),
            Err(()) => {
                errors.push(LexError {
                    span: span.clone(),
                    message: format!("unexpected character: {:?}", &source[span]),
                });
                continue;
            }
        };
        tokens.push((token, span));
    }

    (tokens, errors)
}

/// Process `\\` and `\"` escapes. Unknown sequences are kept as-is.
fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some('\\') => out.push('\\'),
                Some('"') => out.push('"'),
                Some(other) => {
                    out.push('\\');
                    out.push(other);
                }
                None => out.push('\\'),
            }
        } else {
            out.push(c);
        }
    }
    out
}
