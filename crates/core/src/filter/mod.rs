//! Declarative row filtering.
//!
//! A [`FilterSpec`] maps ledger field names to matchers. Fields AND together,
//! array matchers OR their values, and range matchers AND their bounds. The
//! empty spec matches every row.

pub mod error;
pub mod spec;

pub use error::FilterSpecError;
pub use spec::{FilterMatcher, FilterScalar, FilterSpec, RangeOp};

use crate::period::PeriodWindow;
use crate::trial_balance::LedgerRow;

/// Returns the rows matching `spec`, preserving input order.
#[must_use]
pub fn apply_filter<'a>(rows: &'a [LedgerRow], spec: &FilterSpec) -> Vec<&'a LedgerRow> {
    if spec.is_empty() {
        return rows.iter().collect();
    }
    rows.iter().filter(|row| spec.matches(row)).collect()
}

/// Returns the rows matching `spec` that also fall inside `window`.
#[must_use]
pub fn apply_filter_in_window<'a>(
    rows: &'a [LedgerRow],
    spec: &FilterSpec,
    window: &PeriodWindow,
) -> Vec<&'a LedgerRow> {
    rows.iter()
        .filter(|row| window.contains_row(row) && spec.matches(row))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use finstate_shared::types::StatementType;
    use rust_decimal_macros::dec;

    fn rows() -> Vec<LedgerRow> {
        vec![
            LedgerRow::new(2024, 6, StatementType::Income, "4", "5001", dec!(100))
                .with_level(1, "500", "Revenue"),
            LedgerRow::new(2024, 6, StatementType::Income, "4", "5101", dec!(-40))
                .with_level(1, "510", "Cost of sales"),
            LedgerRow::new(2025, 6, StatementType::Income, "4", "5002", dec!(150))
                .with_level(1, "500", "Revenue"),
            LedgerRow::new(2025, 6, StatementType::Balance, "1", "1000", dec!(75)),
        ]
    }

    fn spec(json: &str) -> FilterSpec {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_empty_spec_returns_all_rows() {
        let data = rows();
        let result = apply_filter(&data, &FilterSpec::default());
        assert_eq!(result.len(), data.len());
        assert!(result.iter().zip(&data).all(|(a, b)| *a == b));
    }

    #[test]
    fn test_exact_match_on_code() {
        let data = rows();
        let result = apply_filter(&data, &spec(r#"{"code1": "500"}"#));
        assert_eq!(result.len(), 2);
        assert!(result.iter().all(|r| r.code(1) == Some("500")));
    }

    #[test]
    fn test_code_match_is_case_sensitive() {
        let data = vec![
            LedgerRow::new(2025, 1, StatementType::Income, "4", "abc", dec!(1)),
            LedgerRow::new(2025, 1, StatementType::Income, "4", "ABC", dec!(1)),
        ];
        let result = apply_filter(&data, &spec(r#"{"accountCode": "abc"}"#));
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].account_code, "abc");
    }

    #[test]
    fn test_array_matcher_is_or() {
        let data = rows();
        let result = apply_filter(&data, &spec(r#"{"code1": ["500", "510"]}"#));
        assert_eq!(result.len(), 3);
    }

    #[test]
    fn test_fields_and_together() {
        let data = rows();
        let result = apply_filter(&data, &spec(r#"{"code1": "500", "year": 2025}"#));
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].account_code, "5002");
    }

    #[test]
    fn test_range_matcher_numeric() {
        let data = rows();
        let result = apply_filter(&data, &spec(r#"{"movementAmount": {"gt": 0, "lte": 100}}"#));
        let codes: Vec<_> = result.iter().map(|r| r.account_code.as_str()).collect();
        assert_eq!(codes, vec!["5001", "1000"]);
    }

    #[test]
    fn test_range_matcher_on_codes() {
        let data = rows();
        let result = apply_filter(&data, &spec(r#"{"code1": {"gte": "500", "lt": "510"}}"#));
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn test_numeric_field_matches_string_scalar() {
        let data = rows();
        let result = apply_filter(&data, &spec(r#"{"year": "2024"}"#));
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn test_missing_optional_field_never_matches() {
        let data = rows();
        let result = apply_filter(&data, &spec(r#"{"code2": {"gte": ""}}"#));
        assert!(result.is_empty());
    }

    #[test]
    fn test_malformed_spec_matches_nothing() {
        let data = rows();
        assert!(apply_filter(&data, &spec(r#"{"colour": "red"}"#)).is_empty());
        assert!(apply_filter(&data, &spec(r#"{"year": {"after": 2020}}"#)).is_empty());
        assert!(apply_filter(&data, &spec(r#"{"year": {}}"#)).is_empty());
    }

    #[test]
    fn test_window_restricts_rows() {
        let data = rows();
        let window = PeriodWindow::month(2025, 6);
        let result = apply_filter_in_window(&data, &spec(r#"{"code1": "500"}"#), &window);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].movement_amount, dec!(150));
    }
}
