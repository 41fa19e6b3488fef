//! Expression evaluation.

use rust_decimal::Decimal;

use super::ast::{BinaryOp, Expr};
use super::error::ExpressionError;

/// Supplies values for identifiers and `@N` references.
pub trait ValueSource {
    /// Resolved value of a variable, `None` if unknown.
    fn variable(&self, name: &str) -> Option<Decimal>;

    /// Rendered value of the layout row with `order`, `None` if not computed.
    fn order_value(&self, order: i32) -> Option<Decimal>;
}

impl Expr {
    /// Evaluates the expression against `source`.
    ///
    /// Division by zero yields zero.
    ///
    /// # Errors
    ///
    /// Returns an error for unresolved references or decimal overflow.
    pub fn evaluate<S: ValueSource + ?Sized>(&self, source: &S) -> Result<Decimal, ExpressionError> {
        match self {
            Self::Number(value) => Ok(*value),
            Self::Variable(name) => source
                .variable(name)
                .ok_or_else(|| ExpressionError::UnknownVariable(name.clone())),
            Self::OrderRef(order) => source
                .order_value(*order)
                .ok_or(ExpressionError::UnresolvedOrder(*order)),
            Self::Neg(inner) => Ok(-inner.evaluate(source)?),
            Self::Binary { op, lhs, rhs } => {
                let lhs = lhs.evaluate(source)?;
                let rhs = rhs.evaluate(source)?;
                apply(*op, lhs, rhs)
            }
        }
    }
}

fn apply(op: BinaryOp, lhs: Decimal, rhs: Decimal) -> Result<Decimal, ExpressionError> {
    let result = match op {
        BinaryOp::Add => lhs.checked_add(rhs),
        BinaryOp::Sub => lhs.checked_sub(rhs),
        BinaryOp::Mul => lhs.checked_mul(rhs),
        BinaryOp::Div if rhs.is_zero() => return Ok(Decimal::ZERO),
        BinaryOp::Div => lhs.checked_div(rhs),
    };
    result.ok_or(ExpressionError::Overflow)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression::parse;
    use rust_decimal_macros::dec;
    use std::collections::BTreeMap;

    struct Fixture {
        variables: BTreeMap<&'static str, Decimal>,
        rows: BTreeMap<i32, Decimal>,
    }

    impl ValueSource for Fixture {
        fn variable(&self, name: &str) -> Option<Decimal> {
            self.variables.get(name).copied()
        }

        fn order_value(&self, order: i32) -> Option<Decimal> {
            self.rows.get(&order).copied()
        }
    }

    fn fixture() -> Fixture {
        Fixture {
            variables: BTreeMap::from([("revenue", dec!(150)), ("cogs", dec!(-60))]),
            rows: BTreeMap::from([(100, dec!(90)), (200, dec!(0))]),
        }
    }

    fn eval(source: &str) -> Result<Decimal, ExpressionError> {
        parse(source).unwrap().evaluate(&fixture())
    }

    #[test]
    fn test_gross_profit() {
        assert_eq!(eval("revenue + cogs"), Ok(dec!(90)));
    }

    #[test]
    fn test_margin_with_row_reference() {
        assert_eq!(eval("@100 / revenue * 100"), Ok(dec!(60)));
    }

    #[test]
    fn test_division_by_zero_is_zero() {
        assert_eq!(eval("revenue / @200"), Ok(Decimal::ZERO));
        assert_eq!(eval("revenue / (cogs - cogs)"), Ok(Decimal::ZERO));
    }

    #[test]
    fn test_negation() {
        assert_eq!(eval("-cogs"), Ok(dec!(60)));
        assert_eq!(eval("--revenue"), Ok(dec!(150)));
    }

    #[test]
    fn test_unknown_references() {
        assert_eq!(
            eval("opex + 1"),
            Err(ExpressionError::UnknownVariable("opex".into()))
        );
        assert_eq!(eval("@300"), Err(ExpressionError::UnresolvedOrder(300)));
    }

    #[test]
    fn test_overflow_is_an_error() {
        assert_eq!(
            eval("79228162514264337593543950335 * 10"),
            Err(ExpressionError::Overflow)
        );
    }
}
