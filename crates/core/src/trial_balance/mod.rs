//! Trial balance input: one row per account movement per fiscal period.

pub mod row;

use rust_decimal::Decimal;

pub use row::{FieldValue, LedgerRow, MAX_HIERARCHY_DEPTH};

/// Sums amounts, `None` if the total leaves the decimal range.
pub fn checked_sum<I>(amounts: I) -> Option<Decimal>
where
    I: IntoIterator<Item = Decimal>,
{
    amounts
        .into_iter()
        .try_fold(Decimal::ZERO, Decimal::checked_add)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_checked_sum() {
        assert_eq!(checked_sum([dec!(1.5), dec!(-0.5), dec!(2)]), Some(dec!(3)));
        assert_eq!(checked_sum(std::iter::empty()), Some(Decimal::ZERO));
        assert_eq!(checked_sum([Decimal::MAX, Decimal::ONE]), None);
    }
}
