//! Expression syntax tree.

use std::collections::BTreeSet;
use std::fmt;

use rust_decimal::Decimal;

/// Binary arithmetic operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    /// Addition.
    Add,
    /// Subtraction.
    Sub,
    /// Multiplication.
    Mul,
    /// Division (zero divisor yields zero).
    Div,
}

impl BinaryOp {
    const fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
        }
    }
}

/// Parsed expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    /// Numeric literal.
    Number(Decimal),
    /// Reference to a resolved variable.
    Variable(String),
    /// Reference to the value of the layout row with this order.
    OrderRef(i32),
    /// Binary operation.
    Binary {
        /// Operator.
        op: BinaryOp,
        /// Left operand.
        lhs: Box<Expr>,
        /// Right operand.
        rhs: Box<Expr>,
    },
    /// Unary negation.
    Neg(Box<Expr>),
}

impl Expr {
    /// Builds a binary node.
    #[must_use]
    pub fn binary(op: BinaryOp, lhs: Self, rhs: Self) -> Self {
        Self::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    /// Every variable identifier referenced, deduplicated and sorted.
    #[must_use]
    pub fn variable_refs(&self) -> BTreeSet<&str> {
        let mut refs = BTreeSet::new();
        self.walk(&mut |node| {
            if let Self::Variable(name) = node {
                refs.insert(name.as_str());
            }
        });
        refs
    }

    /// Every `@N` row reference, deduplicated and sorted.
    #[must_use]
    pub fn order_refs(&self) -> BTreeSet<i32> {
        let mut refs = BTreeSet::new();
        self.walk(&mut |node| {
            if let Self::OrderRef(order) = node {
                refs.insert(*order);
            }
        });
        refs
    }

    fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Self)) {
        visit(self);
        match self {
            Self::Binary { lhs, rhs, .. } => {
                lhs.walk(visit);
                rhs.walk(visit);
            }
            Self::Neg(inner) => inner.walk(visit),
            Self::Number(_) | Self::Variable(_) | Self::OrderRef(_) => {}
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Variable(name) => f.write_str(name),
            Self::OrderRef(order) => write!(f, "@{order}"),
            Self::Binary { op, lhs, rhs } => write!(f, "({lhs} {} {rhs})", op.symbol()),
            Self::Neg(inner) => write!(f, "-{inner}"),
        }
    }
}
