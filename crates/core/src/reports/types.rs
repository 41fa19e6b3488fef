//! Report definition data types.
//!
//! Definitions are loaded from camelCase JSON:
//!
//! ```json
//! {
//!   "reportId": "income-statement", "name": "Income Statement",
//!   "version": "1.0.0", "statementType": "income",
//!   "variables": [{"id": "revenue", "filter": {"code1": "500"}, "aggregate": "sum"}],
//!   "layout": [{"order": 100, "type": "variable", "label": "Revenue", "variable": "revenue"}]
//! }
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use finstate_shared::types::StatementType;

use crate::filter::FilterSpec;
use crate::trial_balance::{LedgerRow, checked_sum};

/// A configurable financial statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportDefinition {
    /// Unique slug.
    pub report_id: String,
    /// Display name.
    pub name: String,
    /// Semantic version of the definition.
    pub version: String,
    /// Statement the report renders.
    pub statement_type: StatementType,
    /// Named aggregates over ledger rows.
    #[serde(default)]
    pub variables: Vec<VariableDefinition>,
    /// Rows in display order.
    #[serde(default)]
    pub layout: Vec<LayoutItem>,
}

impl ReportDefinition {
    /// Looks up a variable by id.
    #[must_use]
    pub fn variable(&self, id: &str) -> Option<&VariableDefinition> {
        self.variables.iter().find(|v| v.id == id)
    }

    /// Layout items sorted by ascending order.
    #[must_use]
    pub fn ordered_layout(&self) -> Vec<&LayoutItem> {
        let mut items: Vec<&LayoutItem> = self.layout.iter().collect();
        items.sort_by_key(|item| item.order);
        items
    }
}

/// A named aggregate over filtered ledger rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableDefinition {
    /// Identifier used in expressions and variable rows.
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Row selection.
    #[serde(default)]
    pub filter: FilterSpec,
    /// Aggregate applied to the movement amounts.
    pub aggregate: Aggregate,
    /// Free-text description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Variable whose selection this one narrows.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extends: Option<String>,
}

/// Aggregate function over movement amounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Aggregate {
    /// Total.
    Sum,
    /// Arithmetic mean.
    Avg,
    /// Number of rows.
    Count,
    /// Smallest amount.
    Min,
    /// Largest amount.
    Max,
    /// Amount of the earliest row by period.
    First,
    /// Amount of the latest row by period.
    Last,
}

impl Aggregate {
    /// Applies the aggregate. Every aggregate of an empty selection is zero.
    ///
    /// Returns `None` when a sum leaves the decimal range.
    #[must_use]
    pub fn apply(self, rows: &[&LedgerRow]) -> Option<Decimal> {
        if rows.is_empty() {
            return Some(Decimal::ZERO);
        }
        let amounts = rows.iter().map(|row| row.movement_amount);
        match self {
            Self::Sum => checked_sum(amounts),
            Self::Avg => checked_sum(amounts)?.checked_div(Decimal::from(rows.len())),
            Self::Count => Some(Decimal::from(rows.len())),
            Self::Min => amounts.min(),
            Self::Max => amounts.max(),
            // min_by_key keeps the first of equal keys, max_by_key the last
            Self::First => rows
                .iter()
                .min_by_key(|row| row.fiscal_period())
                .map(|row| row.movement_amount),
            Self::Last => rows
                .iter()
                .max_by_key(|row| row.fiscal_period())
                .map(|row| row.movement_amount),
        }
    }
}

/// One row of a report layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutItem {
    /// Unique position; rows render in ascending order.
    pub order: i32,
    /// Display label.
    #[serde(default)]
    pub label: String,
    /// Kind-specific payload.
    #[serde(flatten)]
    pub kind: LayoutKind,
    /// Number format.
    #[serde(default)]
    pub format: FormatSpec,
    /// Visual weight.
    #[serde(default)]
    pub style: RowStyle,
    /// Indentation level (0-3).
    #[serde(default)]
    pub indent: u8,
}

/// Kind of a layout row and its payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum LayoutKind {
    /// Value of a named variable.
    Variable {
        /// Variable id.
        variable: String,
    },
    /// Arithmetic over variables and earlier rows.
    Calculated {
        /// Expression source.
        expression: String,
    },
    /// Sum of ledger rows matching a filter.
    Category {
        /// Row selection.
        #[serde(default)]
        filter: FilterSpec,
    },
    /// Sum of the rows whose order lies in `from..=to`.
    Subtotal {
        /// First order included.
        from: i32,
        /// Last order included.
        to: i32,
    },
    /// Blank separator.
    Spacer,
}

/// Wire name of a layout row kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutItemType {
    /// Variable row.
    Variable,
    /// Calculated row.
    Calculated,
    /// Category row.
    Category,
    /// Subtotal row.
    Subtotal,
    /// Spacer row.
    Spacer,
}

impl LayoutKind {
    /// Wire name of the kind.
    #[must_use]
    pub const fn item_type(&self) -> LayoutItemType {
        match self {
            Self::Variable { .. } => LayoutItemType::Variable,
            Self::Calculated { .. } => LayoutItemType::Calculated,
            Self::Category { .. } => LayoutItemType::Category,
            Self::Subtotal { .. } => LayoutItemType::Subtotal,
            Self::Spacer => LayoutItemType::Spacer,
        }
    }
}

/// Number formatting for a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatSpec {
    /// Value kind.
    #[serde(rename = "type", default)]
    pub kind: FormatKind,
    /// Digits after the decimal point.
    #[serde(default)]
    pub decimals: u32,
}

impl FormatSpec {
    /// Creates a format.
    #[must_use]
    pub const fn new(kind: FormatKind, decimals: u32) -> Self {
        Self { kind, decimals }
    }
}

impl Default for FormatSpec {
    fn default() -> Self {
        Self::new(FormatKind::Currency, 0)
    }
}

/// Kind of formatted value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormatKind {
    /// Currency symbol and thousands separators.
    #[default]
    Currency,
    /// Trailing percent sign.
    Percent,
    /// Whole number with thousands separators.
    Integer,
    /// Plain number with thousands separators.
    Decimal,
}

/// Visual weight of a row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RowStyle {
    /// Detail row.
    #[default]
    Normal,
    /// Ratio or KPI row.
    Metric,
    /// Intermediate total.
    Subtotal,
    /// Statement total.
    Total,
    /// Separator.
    Spacer,
}

impl RowStyle {
    /// Returns true for subtotal and total styles.
    #[must_use]
    pub const fn is_total(self) -> bool {
        matches!(self, Self::Subtotal | Self::Total)
    }

    /// Returns true for rows kept by summary rendering.
    #[must_use]
    pub const fn is_summary(self) -> bool {
        matches!(self, Self::Subtotal | Self::Total | Self::Metric)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn rows() -> Vec<LedgerRow> {
        vec![
            LedgerRow::new(2025, 3, StatementType::Income, "4", "a", dec!(30)),
            LedgerRow::new(2025, 1, StatementType::Income, "4", "b", dec!(10)),
            LedgerRow::new(2025, 2, StatementType::Income, "4", "c", dec!(-5)),
            LedgerRow::new(2025, 3, StatementType::Income, "4", "d", dec!(7)),
        ]
    }

    #[test]
    fn test_aggregates() {
        let data = rows();
        let refs: Vec<&LedgerRow> = data.iter().collect();
        assert_eq!(Aggregate::Sum.apply(&refs), Some(dec!(42)));
        assert_eq!(Aggregate::Avg.apply(&refs), Some(dec!(10.5)));
        assert_eq!(Aggregate::Count.apply(&refs), Some(dec!(4)));
        assert_eq!(Aggregate::Min.apply(&refs), Some(dec!(-5)));
        assert_eq!(Aggregate::Max.apply(&refs), Some(dec!(30)));
        assert_eq!(Aggregate::First.apply(&refs), Some(dec!(10)));
        assert_eq!(Aggregate::Last.apply(&refs), Some(dec!(7)));
    }

    #[test]
    fn test_aggregates_of_empty_selection_are_zero() {
        for aggregate in [
            Aggregate::Sum,
            Aggregate::Avg,
            Aggregate::Count,
            Aggregate::Min,
            Aggregate::Max,
            Aggregate::First,
            Aggregate::Last,
        ] {
            assert_eq!(aggregate.apply(&[]), Some(Decimal::ZERO));
        }
    }

    #[test]
    fn test_sum_out_of_range_is_none() {
        let data = vec![
            LedgerRow::new(2025, 1, StatementType::Income, "4", "a", Decimal::MAX),
            LedgerRow::new(2025, 2, StatementType::Income, "4", "b", Decimal::MAX),
        ];
        let refs: Vec<&LedgerRow> = data.iter().collect();
        assert_eq!(Aggregate::Sum.apply(&refs), None);
        assert_eq!(Aggregate::Avg.apply(&refs), None);
        assert_eq!(Aggregate::Max.apply(&refs), Some(Decimal::MAX));
        assert_eq!(Aggregate::Count.apply(&refs), Some(dec!(2)));
    }

    #[test]
    fn test_layout_item_wire_format() {
        let json = r#"[
            {"order": 100, "type": "variable", "label": "Revenue", "variable": "revenue"},
            {"order": 300, "type": "calculated", "label": "Gross Profit",
             "expression": "revenue + cogs", "style": "subtotal",
             "format": {"type": "currency", "decimals": 2}},
            {"order": 400, "type": "category", "label": "Other", "filter": {"code1": "590"}, "indent": 1},
            {"order": 500, "type": "subtotal", "label": "Total", "from": 100, "to": 400},
            {"order": 600, "type": "spacer"}
        ]"#;
        let items: Vec<LayoutItem> = serde_json::from_str(json).unwrap();
        assert_eq!(items.len(), 5);
        assert!(matches!(&items[0].kind, LayoutKind::Variable { variable } if variable == "revenue"));
        assert_eq!(items[1].style, RowStyle::Subtotal);
        assert_eq!(items[1].format, FormatSpec::new(FormatKind::Currency, 2));
        assert_eq!(items[2].indent, 1);
        assert_eq!(items[3].kind, LayoutKind::Subtotal { from: 100, to: 400 });
        assert_eq!(items[4].kind.item_type(), LayoutItemType::Spacer);
        assert_eq!(items[4].label, "");
    }

    #[test]
    fn test_unknown_layout_type_is_rejected() {
        let json = r#"{"order": 1, "type": "chart", "label": "x"}"#;
        assert!(serde_json::from_str::<LayoutItem>(json).is_err());
    }

    #[test]
    fn test_ordered_layout() {
        let definition: ReportDefinition = serde_json::from_str(
            r#"{"reportId": "r", "name": "R", "version": "1.0.0", "statementType": "income",
                "layout": [{"order": 20, "type": "spacer"}, {"order": 10, "type": "spacer"}]}"#,
        )
        .unwrap();
        let orders: Vec<i32> = definition.ordered_layout().iter().map(|i| i.order).collect();
        assert_eq!(orders, vec![10, 20]);
        assert!(definition.variables.is_empty());
    }
}
