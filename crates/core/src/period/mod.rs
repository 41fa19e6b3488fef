//! Comparison periods.
//!
//! Every statement compares two sides, `prior` and `current`. Each side is a
//! [`PeriodWindow`] deciding which ledger rows fall inside it.

use serde::{Deserialize, Serialize};

use finstate_shared::types::{FiscalPeriod, PeriodRange};

use crate::ltm;
use crate::trial_balance::LedgerRow;

/// One side of a comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// The comparison baseline.
    Prior,
    /// The period being reported.
    Current,
}

impl Side {
    /// Both sides, prior first.
    pub const BOTH: [Self; 2] = [Self::Prior, Self::Current];
}

/// A value per comparison side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BySide<T> {
    /// Prior-side value.
    pub prior: T,
    /// Current-side value.
    pub current: T,
}

impl<T> BySide<T> {
    /// Creates a pair from its two sides.
    pub const fn new(prior: T, current: T) -> Self {
        Self { prior, current }
    }

    /// Builds a pair by calling `f` for each side.
    pub fn from_fn(mut f: impl FnMut(Side) -> T) -> Self {
        Self {
            prior: f(Side::Prior),
            current: f(Side::Current),
        }
    }

    /// Returns the value for `side`.
    pub const fn get(&self, side: Side) -> &T {
        match side {
            Side::Prior => &self.prior,
            Side::Current => &self.current,
        }
    }

    /// Returns a mutable reference to the value for `side`.
    pub fn get_mut(&mut self, side: Side) -> &mut T {
        match side {
            Side::Prior => &mut self.prior,
            Side::Current => &mut self.current,
        }
    }

    /// Maps both sides.
    pub fn map<U>(self, mut f: impl FnMut(T) -> U) -> BySide<U> {
        BySide {
            prior: f(self.prior),
            current: f(self.current),
        }
    }
}

/// The period bounds of one comparison side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum PeriodWindow {
    /// Union of inclusive per-year period ranges.
    Ranges {
        /// Ranges, oldest first.
        ranges: Vec<PeriodRange>,
    },
    /// Every movement up to and including a period (balance positions).
    Through {
        /// Fiscal year of the last included period.
        year: i32,
        /// Last included period.
        period: i32,
    },
}

impl PeriodWindow {
    /// A single period.
    #[must_use]
    pub fn month(year: i32, period: i32) -> Self {
        Self::Ranges {
            ranges: vec![PeriodRange::new(year, period, period)],
        }
    }

    /// Periods 1 through `period` of `year`.
    #[must_use]
    pub fn year_to_date(year: i32, period: i32) -> Self {
        Self::Ranges {
            ranges: vec![PeriodRange::new(year, 1, period)],
        }
    }

    /// All twelve periods of `year`.
    #[must_use]
    pub fn full_year(year: i32) -> Self {
        Self::year_to_date(year, 12)
    }

    /// A window spanning LTM ranges.
    #[must_use]
    pub fn from_ltm(ranges: Vec<PeriodRange>) -> Self {
        Self::Ranges { ranges }
    }

    /// Cumulative window ending at `year`/`period`.
    #[must_use]
    pub const fn through(year: i32, period: i32) -> Self {
        Self::Through { year, period }
    }

    /// Returns true if the given period falls inside the window.
    #[must_use]
    pub fn contains(&self, year: i32, period: i32) -> bool {
        match self {
            Self::Ranges { ranges } => ranges.iter().any(|r| r.contains(year, period)),
            Self::Through {
                year: end_year,
                period: end_period,
            } => FiscalPeriod::new(year, period) <= FiscalPeriod::new(*end_year, *end_period),
        }
    }

    /// Returns true if the row's period falls inside the window.
    #[must_use]
    pub fn contains_row(&self, row: &LedgerRow) -> bool {
        self.contains(row.year, row.period)
    }

    /// Stable textual key identifying the window, used for cache keys.
    #[must_use]
    pub fn signature(&self) -> String {
        match self {
            Self::Ranges { ranges } => {
                let parts: Vec<String> = ranges
                    .iter()
                    .map(|r| format!("{}:{}-{}", r.year, r.start_period, r.end_period))
                    .collect();
                format!("ranges[{}]", parts.join(","))
            }
            Self::Through { year, period } => format!("through[{year}:{period}]"),
        }
    }

    /// Human-readable column label.
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Self::Ranges { ranges } if ranges.len() > 1 => ltm::generate_ltm_label(ranges),
            Self::Ranges { ranges } => match ranges.first() {
                Some(r) if r.start_period == r.end_period => format!("{} P{}", r.year, r.end_period),
                Some(r) if r.start_period == 1 && r.end_period == 12 => format!("FY {}", r.year),
                Some(r) => format!("{} P{}-P{}", r.year, r.start_period, r.end_period),
                None => "No periods".to_string(),
            },
            Self::Through { year, period } => format!("As of {year} P{period}"),
        }
    }
}

/// The pair of windows a statement compares.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonContext {
    /// Baseline window.
    pub prior: PeriodWindow,
    /// Reporting window.
    pub current: PeriodWindow,
}

impl ComparisonContext {
    /// Creates a context from explicit windows.
    #[must_use]
    pub const fn new(prior: PeriodWindow, current: PeriodWindow) -> Self {
        Self { prior, current }
    }

    /// Single period against the same period one year earlier.
    #[must_use]
    pub fn month_over_year(year: i32, period: i32) -> Self {
        Self::new(
            PeriodWindow::month(year.saturating_sub(1), period),
            PeriodWindow::month(year, period),
        )
    }

    /// Year-to-date against the prior year's year-to-date.
    #[must_use]
    pub fn year_to_date(year: i32, period: i32) -> Self {
        Self::new(
            PeriodWindow::year_to_date(year.saturating_sub(1), period),
            PeriodWindow::year_to_date(year, period),
        )
    }

    /// Trailing window ending at `year`/`period` against the one ending a year earlier.
    #[must_use]
    pub fn ltm(year: i32, period: i32, window_length: i32) -> Self {
        Self::new(
            PeriodWindow::from_ltm(ltm::calculate_ltm_range(
                year.saturating_sub(1),
                period,
                window_length,
            )),
            PeriodWindow::from_ltm(ltm::calculate_ltm_range(year, period, window_length)),
        )
    }

    /// Cumulative positions at `year`/`period` against the same point a year earlier.
    #[must_use]
    pub const fn balance_positions(year: i32, period: i32) -> Self {
        Self::new(
            PeriodWindow::through(year.saturating_sub(1), period),
            PeriodWindow::through(year, period),
        )
    }

    /// Window for `side`.
    #[must_use]
    pub const fn window(&self, side: Side) -> &PeriodWindow {
        match side {
            Side::Prior => &self.prior,
            Side::Current => &self.current,
        }
    }

    /// Which sides have at least one ledger row inside their window.
    #[must_use]
    pub fn available_sides(&self, rows: &[LedgerRow]) -> BySide<bool> {
        BySide::from_fn(|side| {
            let window = self.window(side);
            rows.iter().any(|row| window.contains_row(row))
        })
    }

    /// Column labels for both sides.
    #[must_use]
    pub fn labels(&self) -> BySide<String> {
        BySide::from_fn(|side| self.window(side).label())
    }
}
