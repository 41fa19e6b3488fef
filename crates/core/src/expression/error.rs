//! Expression error types.

use thiserror::Error;

/// Errors raised while parsing or evaluating an expression.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExpressionError {
    /// Expression text is blank.
    #[error("Expression is empty")]
    Empty,

    /// A character that starts no token.
    #[error("Unexpected character '{character}' at offset {offset}")]
    UnexpectedCharacter {
        /// Offending character.
        character: char,
        /// Byte offset in the expression.
        offset: usize,
    },

    /// A token that does not fit the grammar at this point.
    #[error("Unexpected token '{token}' at offset {offset}")]
    UnexpectedToken {
        /// Offending token text.
        token: String,
        /// Byte offset in the expression.
        offset: usize,
    },

    /// Input ended where more was required.
    #[error("Unexpected end of expression at offset {offset}")]
    UnexpectedEnd {
        /// Byte offset of the end of input.
        offset: usize,
    },

    /// `@` not followed by a row order number.
    #[error("Invalid row reference '{token}' at offset {offset}")]
    InvalidOrderRef {
        /// Offending token text.
        token: String,
        /// Byte offset in the expression.
        offset: usize,
    },

    /// Numeric literal out of range.
    #[error("Invalid number '{token}' at offset {offset}")]
    InvalidNumber {
        /// Offending token text.
        token: String,
        /// Byte offset in the expression.
        offset: usize,
    },

    /// Nesting past [`MAX_DEPTH`](super::MAX_DEPTH) levels.
    #[error("Expression nests too deeply at offset {offset}")]
    TooDeep {
        /// Byte offset of the token that exceeded the limit.
        offset: usize,
    },

    /// Identifier with no resolved variable value.
    #[error("Unknown variable '{0}'")]
    UnknownVariable(String),

    /// `@N` with no computed row value.
    #[error("Row @{0} has no value")]
    UnresolvedOrder(i32),

    /// Intermediate result exceeded the decimal range.
    #[error("Arithmetic overflow")]
    Overflow,
}

impl ExpressionError {
    /// Byte offset of a syntax error, `None` for evaluation errors.
    #[must_use]
    pub const fn offset(&self) -> Option<usize> {
        match self {
            Self::UnexpectedCharacter { offset, .. }
            | Self::UnexpectedToken { offset, .. }
            | Self::UnexpectedEnd { offset }
            | Self::InvalidOrderRef { offset, .. }
            | Self::InvalidNumber { offset, .. }
            | Self::TooDeep { offset } => Some(*offset),
            Self::Empty => Some(0),
            Self::UnknownVariable(_) | Self::UnresolvedOrder(_) | Self::Overflow => None,
        }
    }
}
