//! Period-over-period variance calculations.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::period::BySide;

/// Difference between the current and prior side of a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variance {
    /// `current - prior`.
    pub amount: Decimal,
    /// `amount / |prior| * 100`, rounded to two places; zero when prior is zero.
    pub percent: Decimal,
}

impl Variance {
    /// Calculates the variance of `current` against `prior`.
    ///
    /// The percent divides by the absolute prior value so that an improvement
    /// from a negative baseline reads as a positive change. Returns `None` when
    /// either figure leaves the decimal range.
    #[must_use]
    pub fn calculate(current: Decimal, prior: Decimal) -> Option<Self> {
        let amount = current.checked_sub(prior)?;
        let percent = if prior.is_zero() {
            Decimal::ZERO
        } else {
            amount
                .checked_div(prior.abs())?
                .checked_mul(Decimal::ONE_HUNDRED)?
                .round_dp(2)
        };
        Some(Self { amount, percent })
    }

    /// Variance between two sides, `None` unless both produced a value and
    /// the difference is representable.
    #[must_use]
    pub fn between(amounts: &BySide<Option<Decimal>>) -> Option<Self> {
        match (amounts.prior, amounts.current) {
            (Some(prior), Some(current)) => Self::calculate(current, prior),
            _ => None,
        }
    }
}
