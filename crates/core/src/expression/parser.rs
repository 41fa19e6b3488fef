//! Recursive-descent parser for report expressions.

use super::ast::{BinaryOp, Expr};
use super::error::ExpressionError;
use super::lexer::{Token, TokenKind, tokenize};

/// Deepest nesting accepted, counting parentheses, unary minus and each
/// operator in a chain.
pub const MAX_DEPTH: usize = 256;

/// Parses an expression string into an [`Expr`].
///
/// # Errors
///
/// Returns the first syntax error with the offending token and its offset,
/// or `TooDeep` once nesting passes [`MAX_DEPTH`].
pub fn parse(source: &str) -> Result<Expr, ExpressionError> {
    if source.trim().is_empty() {
        return Err(ExpressionError::Empty);
    }
    let tokens = tokenize(source)?;
    let mut parser = Parser {
        tokens,
        pos: 0,
        depth: 0,
    };
    let expr = parser.expr()?;
    match parser.peek() {
        Token {
            kind: TokenKind::Eof,
            ..
        } => Ok(expr),
        token => Err(unexpected(token)),
    }
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> &Token {
        // tokenize always appends Eof, and the parser never advances past it
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if token.kind != TokenKind::Eof {
            self.pos += 1;
        }
        token
    }

    fn descend(&mut self, offset: usize) -> Result<(), ExpressionError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(ExpressionError::TooDeep { offset });
        }
        Ok(())
    }

    fn expr(&mut self) -> Result<Expr, ExpressionError> {
        let base = self.depth;
        let mut lhs = self.term()?;
        loop {
            let op = match self.peek().kind {
                TokenKind::Plus => BinaryOp::Add,
                TokenKind::Minus => BinaryOp::Sub,
                _ => {
                    self.depth = base;
                    return Ok(lhs);
                }
            };
            let token = self.advance();
            self.descend(token.offset)?;
            let rhs = self.term()?;
            lhs = Expr::binary(op, lhs, rhs);
        }
    }

    fn term(&mut self) -> Result<Expr, ExpressionError> {
        let base = self.depth;
        let mut lhs = self.factor()?;
        loop {
            let op = match self.peek().kind {
                TokenKind::Star => BinaryOp::Mul,
                TokenKind::Slash => BinaryOp::Div,
                _ => {
                    self.depth = base;
                    return Ok(lhs);
                }
            };
            let token = self.advance();
            self.descend(token.offset)?;
            let rhs = self.factor()?;
            lhs = Expr::binary(op, lhs, rhs);
        }
    }

    fn factor(&mut self) -> Result<Expr, ExpressionError> {
        let token = self.advance();
        match token.kind {
            TokenKind::Number(value) => Ok(Expr::Number(value)),
            TokenKind::Ident(name) => Ok(Expr::Variable(name)),
            TokenKind::OrderRef(order) => Ok(Expr::OrderRef(order)),
            TokenKind::Minus => {
                self.descend(token.offset)?;
                let operand = self.factor()?;
                self.depth -= 1;
                Ok(Expr::Neg(Box::new(operand)))
            }
            TokenKind::LParen => {
                self.descend(token.offset)?;
                let inner = self.expr()?;
                self.depth -= 1;
                let close = self.advance();
                if close.kind == TokenKind::RParen {
                    Ok(inner)
                } else {
                    Err(unexpected(&close))
                }
            }
            _ => Err(unexpected(&token)),
        }
    }
}

fn unexpected(token: &Token) -> ExpressionError {
    if token.kind == TokenKind::Eof {
        ExpressionError::UnexpectedEnd {
            offset: token.offset,
        }
    } else {
        ExpressionError::UnexpectedToken {
            token: token.kind.to_string(),
            offset: token.offset,
        }
    }
}
