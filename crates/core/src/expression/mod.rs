//! Arithmetic expressions over report variables and layout rows.
//!
//! Grammar:
//!
//! ```text
//! expr   := term (('+' | '-') term)*
//! term   := factor (('*' | '/') factor)*
//! factor := number | identifier | '@' int | '(' expr ')' | '-' factor
//! ```
//!
//! Expressions are parsed once into an [`Expr`] tree and evaluated per
//! comparison side. Division by zero evaluates to zero so sparse data never
//! aborts a render. Nesting is capped at [`MAX_DEPTH`] levels.

pub mod ast;
pub mod error;
pub mod eval;
pub mod lexer;
pub mod parser;

pub use ast::{BinaryOp, Expr};
pub use error::ExpressionError;
pub use eval::ValueSource;
pub use parser::{MAX_DEPTH, parse};
