//! Fiscal period primitives.
//!
//! Periods are numbered 1-12 within a fiscal year. Month arithmetic works on
//! a flat `i64` month index (`year * 12 + period - 1`) so windows can cross
//! year boundaries without special cases.

use serde::{Deserialize, Serialize};

/// Number of periods in a fiscal year.
pub const PERIODS_PER_YEAR: i32 = 12;

/// A single fiscal period.
///
/// Ordering is by year, then period.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct FiscalPeriod {
    /// Fiscal year.
    pub year: i32,
    /// Period number within the year (1-12).
    pub period: i32,
}

impl FiscalPeriod {
    /// Creates a new fiscal period.
    #[must_use]
    pub const fn new(year: i32, period: i32) -> Self {
        Self { year, period }
    }

    /// Returns true if the period number is within 1-12 and the year is positive.
    #[must_use]
    pub const fn is_valid(self) -> bool {
        self.year > 0 && self.period >= 1 && self.period <= PERIODS_PER_YEAR
    }

    /// Flat month index used for window arithmetic.
    #[must_use]
    pub fn month_index(self) -> i64 {
        i64::from(self.year) * i64::from(PERIODS_PER_YEAR) + i64::from(self.period) - 1
    }

    /// Inverse of [`FiscalPeriod::month_index`], `None` when the year does
    /// not fit an `i32`.
    #[must_use]
    pub fn from_month_index(index: i64) -> Option<Self> {
        let per_year = i64::from(PERIODS_PER_YEAR);
        Some(Self {
            year: i32::try_from(index.div_euclid(per_year)).ok()?,
            period: i32::try_from(index.rem_euclid(per_year) + 1).ok()?,
        })
    }

    /// Returns the period `months` months earlier, `None` past the `i32` year range.
    #[must_use]
    pub fn months_back(self, months: i32) -> Option<Self> {
        Self::from_month_index(self.month_index() - i64::from(months))
    }
}

impl std::fmt::Display for FiscalPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} P{}", self.year, self.period)
    }
}

/// An inclusive range of periods within one fiscal year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodRange {
    /// Fiscal year.
    pub year: i32,
    /// First period (inclusive).
    pub start_period: i32,
    /// Last period (inclusive).
    pub end_period: i32,
}

impl PeriodRange {
    /// Creates a new range.
    #[must_use]
    pub const fn new(year: i32, start_period: i32, end_period: i32) -> Self {
        Self {
            year,
            start_period,
            end_period,
        }
    }

    /// Number of months covered, zero for an inverted range.
    #[must_use]
    pub const fn months(&self) -> i32 {
        if self.end_period < self.start_period {
            0
        } else {
            self.end_period
                .saturating_sub(self.start_period)
                .saturating_add(1)
        }
    }

    /// Returns true if the given year/period falls inside the range.
    #[must_use]
    pub const fn contains(&self, year: i32, period: i32) -> bool {
        year == self.year && period >= self.start_period && period <= self.end_period
    }

    /// First period of the range.
    #[must_use]
    pub const fn start(&self) -> FiscalPeriod {
        FiscalPeriod::new(self.year, self.start_period)
    }

    /// Last period of the range.
    #[must_use]
    pub const fn end(&self) -> FiscalPeriod {
        FiscalPeriod::new(self.year, self.end_period)
    }
}
