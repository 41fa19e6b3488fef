//! Trailing-twelve-month windows.
//!
//! An LTM window ends at a given period and reaches back across the year
//! boundary, so it is expressed as one [`PeriodRange`] per fiscal year.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use finstate_shared::types::{FiscalPeriod, PERIODS_PER_YEAR, PeriodRange};

use crate::trial_balance::LedgerRow;

/// Default number of months in an LTM window.
pub const DEFAULT_LTM_WINDOW: i32 = 12;

/// A per-year slice of an LTM window.
pub type LtmRange = PeriodRange;

/// Latest period present in `rows`, `(0, 0)` when there are none.
#[must_use]
pub fn latest_available_period(rows: &[LedgerRow]) -> FiscalPeriod {
    rows.iter()
        .map(LedgerRow::fiscal_period)
        .max()
        .unwrap_or_default()
}

/// Distinct fiscal years present in `rows`.
#[must_use]
pub fn available_years(rows: &[LedgerRow]) -> BTreeSet<i32> {
    rows.iter().map(|row| row.year).collect()
}

/// Longest window accepted, in months.
pub const MAX_LTM_WINDOW: i32 = 1200;

/// Ranges covering the `window_length` months ending at `year`/`period`,
/// oldest first, one per fiscal year.
///
/// Returns an empty vector for a non-positive year, period or window length,
/// for periods past 12, for windows longer than [`MAX_LTM_WINDOW`] and for
/// windows reaching back before year 1.
#[must_use]
pub fn calculate_ltm_range(year: i32, period: i32, window_length: i32) -> Vec<LtmRange> {
    let end = FiscalPeriod::new(year, period);
    if !end.is_valid() || !(1..=MAX_LTM_WINDOW).contains(&window_length) {
        return Vec::new();
    }
    let Some(start) = end.months_back(window_length - 1).filter(|start| start.is_valid()) else {
        return Vec::new();
    };

    (start.year..=end.year)
        .map(|range_year| {
            let first = if range_year == start.year { start.period } else { 1 };
            let last = if range_year == end.year {
                end.period
            } else {
                PERIODS_PER_YEAR
            };
            PeriodRange::new(range_year, first, last)
        })
        .collect()
}

/// Rows whose period falls inside any of `ranges`.
#[must_use]
pub fn filter_movements_for_ltm<'a>(rows: &'a [LedgerRow], ranges: &[LtmRange]) -> Vec<&'a LedgerRow> {
    rows.iter()
        .filter(|row| ranges.iter().any(|r| r.contains(row.year, row.period)))
        .collect()
}

/// Column label such as `LTM (2024 P7 - 2025 P6)`.
#[must_use]
pub fn generate_ltm_label(ranges: &[LtmRange]) -> String {
    match (ranges.first(), ranges.last()) {
        (Some(first), Some(last)) => format!("LTM ({} - {})", first.start(), last.end()),
        _ => "LTM (No Data)".to_string(),
    }
}

/// Whether the ledger covers an LTM window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LtmCompleteness {
    /// True when every month of the window is covered.
    pub complete: bool,
    /// Months of the window whose year has data.
    pub actual_months: i32,
    /// Human-readable explanation.
    pub message: String,
}

/// Checks that every year the window touches has data and that the window
/// spans exactly `window_length` months.
#[must_use]
pub fn has_complete_data(
    ranges: &[LtmRange],
    available_years: &BTreeSet<i32>,
    window_length: i32,
) -> LtmCompleteness {
    if ranges.is_empty() {
        return LtmCompleteness {
            complete: false,
            actual_months: 0,
            message: "no LTM range".to_string(),
        };
    }

    let missing: Vec<String> = ranges
        .iter()
        .filter(|r| !available_years.contains(&r.year))
        .map(|r| r.year.to_string())
        .collect();
    let actual_months: i32 = ranges
        .iter()
        .filter(|r| available_years.contains(&r.year))
        .fold(0, |total, range| total.saturating_add(range.months()));

    let (complete, message) = if !missing.is_empty() {
        (false, format!("missing year(s): {}", missing.join(", ")))
    } else if actual_months < window_length {
        (
            false,
            format!("only {actual_months} months available (need {window_length})"),
        )
    } else if actual_months > window_length {
        (
            false,
            format!("{actual_months} months exceed the {window_length} month window"),
        )
    } else {
        (true, format!("complete ({window_length} months)"))
    };

    LtmCompleteness {
        complete,
        actual_months,
        message,
    }
}
