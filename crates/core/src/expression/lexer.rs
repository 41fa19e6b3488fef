//! Tokenizer for report expressions.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;

use super::error::ExpressionError;

/// Kind of a lexical token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    /// Numeric literal.
    Number(Decimal),
    /// Variable identifier.
    Ident(String),
    /// `@N` row reference.
    OrderRef(i32),
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Star,
    /// `/`
    Slash,
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// End of input.
    Eof,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Ident(name) => f.write_str(name),
            Self::OrderRef(order) => write!(f, "@{order}"),
            Self::Plus => f.write_str("+"),
            Self::Minus => f.write_str("-"),
            Self::Star => f.write_str("*"),
            Self::Slash => f.write_str("/"),
            Self::LParen => f.write_str("("),
            Self::RParen => f.write_str(")"),
            Self::Eof => f.write_str("<end>"),
        }
    }
}

/// A token with its byte offset in the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Token kind.
    pub kind: TokenKind,
    /// Byte offset of the first character.
    pub offset: usize,
}

/// Splits `source` into tokens, always ending with [`TokenKind::Eof`].
pub fn tokenize(source: &str) -> Result<Vec<Token>, ExpressionError> {
    let bytes = source.as_bytes();
    let mut tokens = Vec::new();
    let mut pos = 0;

    while pos < bytes.len() {
        let c = bytes[pos];
        let start = pos;
        let kind = match c {
            b' ' | b'\t' | b'\n' | b'\r' => {
                pos += 1;
                continue;
            }
            b'+' => TokenKind::Plus,
            b'-' => TokenKind::Minus,
            b'*' => TokenKind::Star,
            b'/' => TokenKind::Slash,
            b'(' => TokenKind::LParen,
            b')' => TokenKind::RParen,
            b'0'..=b'9' => {
                pos = scan_while(bytes, pos, |b| b.is_ascii_digit());
                if bytes.get(pos) == Some(&b'.') {
                    let frac_end = scan_while(bytes, pos + 1, |b| b.is_ascii_digit());
                    if frac_end == pos + 1 {
                        return Err(ExpressionError::InvalidNumber {
                            token: source[start..=pos].to_string(),
                            offset: start,
                        });
                    }
                    pos = frac_end;
                }
                let text = &source[start..pos];
                let value = Decimal::from_str(text).map_err(|_| ExpressionError::InvalidNumber {
                    token: text.to_string(),
                    offset: start,
                })?;
                tokens.push(Token {
                    kind: TokenKind::Number(value),
                    offset: start,
                });
                continue;
            }
            b'@' => {
                let digits_end = scan_while(bytes, pos + 1, |b| b.is_ascii_digit());
                let word_end = scan_while(bytes, digits_end, is_ident_byte);
                let text = &source[start..word_end];
                if digits_end == pos + 1 || word_end != digits_end {
                    return Err(ExpressionError::InvalidOrderRef {
                        token: text.to_string(),
                        offset: start,
                    });
                }
                let order = source[pos + 1..digits_end].parse::<i32>().map_err(|_| {
                    ExpressionError::InvalidOrderRef {
                        token: text.to_string(),
                        offset: start,
                    }
                })?;
                pos = digits_end;
                tokens.push(Token {
                    kind: TokenKind::OrderRef(order),
                    offset: start,
                });
                continue;
            }
            b if b.is_ascii_alphabetic() || b == b'_' => {
                pos = scan_while(bytes, pos, is_ident_byte);
                tokens.push(Token {
                    kind: TokenKind::Ident(source[start..pos].to_string()),
                    offset: start,
                });
                continue;
            }
            _ => {
                let character = source[start..].chars().next().unwrap_or('?');
                return Err(ExpressionError::UnexpectedCharacter {
                    character,
                    offset: start,
                });
            }
        };
        tokens.push(Token { kind, offset: start });
        pos += 1;
    }

    tokens.push(Token {
        kind: TokenKind::Eof,
        offset: source.len(),
    });
    Ok(tokens)
}

const fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

fn scan_while(bytes: &[u8], mut pos: usize, pred: impl Fn(u8) -> bool) -> usize {
    while pos < bytes.len() && pred(bytes[pos]) {
        pos += 1;
    }
    pos
}
