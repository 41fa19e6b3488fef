//! Layout rendering.
//!
//! Items are processed in ascending order. Each produces a value per
//! comparison side; later calculated and subtotal rows read the values of
//! earlier rows. An expression failure marks only its own row.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

use finstate_shared::config::RenderConfig;
use finstate_shared::types::{DetailLevel, VarianceMode};

use super::compiled::CompiledReport;
use super::error::ReportError;
use super::format::{ERROR_MARKER, format_optional};
use super::types::{FormatKind, FormatSpec, LayoutItem, LayoutItemType, LayoutKind, RowStyle};
use super::variables::ResolvedVariables;
use crate::expression::{ExpressionError, ValueSource};
use crate::filter::apply_filter_in_window;
use crate::period::{BySide, ComparisonContext, Side};
use crate::trial_balance::{LedgerRow, checked_sum};
use crate::variance::Variance;

/// Format applied to variance percentages.
const VARIANCE_PERCENT_FORMAT: FormatSpec = FormatSpec::new(FormatKind::Percent, 1);

/// Presentation options for a render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderOptions {
    /// Which rows survive post-render filtering.
    pub detail_level: DetailLevel,
    /// Which variance fields are exposed.
    pub variance_mode: VarianceMode,
    /// Symbol for currency-formatted values.
    pub currency_symbol: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self::from(&RenderConfig::default())
    }
}

impl From<&RenderConfig> for RenderOptions {
    fn from(config: &RenderConfig) -> Self {
        Self {
            detail_level: config.detail_level,
            variance_mode: config.variance_mode,
            currency_symbol: config.currency_symbol.clone(),
        }
    }
}

/// Display strings for a row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormattedValues {
    /// Prior-side value.
    pub prior: String,
    /// Current-side value.
    pub current: String,
    /// Variance amount.
    pub variance_amount: String,
    /// Variance percent.
    pub variance_percent: String,
}

/// One rendered row, agnostic of how it is painted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedRow {
    /// Layout order.
    pub order: i32,
    /// Display label.
    pub label: String,
    /// Layout item kind.
    #[serde(rename = "type")]
    pub item_type: LayoutItemType,
    /// Visual weight.
    pub style: RowStyle,
    /// Indentation level.
    pub indent: u8,
    /// Raw value per side; `None` when the side has no data or the row errored.
    pub amounts: BySide<Option<Decimal>>,
    /// `current - prior`, when exposed and both sides have values.
    pub variance_amount: Option<Decimal>,
    /// Variance relative to `|prior|`, when exposed and both sides have values.
    pub variance_percent: Option<Decimal>,
    /// Display strings.
    pub formatted: FormattedValues,
    /// Must stay displayed regardless of collapse state.
    pub always_visible: bool,
    /// Layout rows are never collapsible groups.
    pub is_group: bool,
    /// Row value comes from an expression.
    pub is_calculated: bool,
    /// Error message when the row could not be computed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RenderedRow {
    /// Returns true if the row carries an error marker.
    #[must_use]
    pub const fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// Renders compiled layouts into rows.
pub struct ReportRenderer;

impl ReportRenderer {
    /// Renders every layout item of `report` in ascending order.
    ///
    /// Sides missing from `variables` yield no values. Per-row failures are
    /// recorded on the row; this function does not fail.
    #[must_use]
    pub fn render(
        report: &CompiledReport,
        ledger: &[LedgerRow],
        comparison: &ComparisonContext,
        variables: &ResolvedVariables,
        options: &RenderOptions,
    ) -> Vec<RenderedRow> {
        let mut values: BTreeMap<i32, BySide<Option<Decimal>>> = BTreeMap::new();
        let mut rows = Vec::with_capacity(report.definition().layout.len());

        for item in report.definition().ordered_layout() {
            if item.kind == LayoutKind::Spacer {
                rows.push(base_row(item));
                continue;
            }

            let renderer = ItemRenderer {
                report,
                ledger,
                comparison,
                variables,
                values: &values,
            };
            let row = match renderer.compute(item) {
                Ok(amounts) => {
                    values.insert(item.order, amounts);
                    value_row(item, amounts, options)
                }
                Err(err) => {
                    warn!(
                        report_id = report.report_id(),
                        order = item.order,
                        error = %err,
                        "layout row failed, marking as errored"
                    );
                    values.insert(item.order, BySide::default());
                    error_row(item, &err)
                }
            };
            rows.push(row);
        }

        if options.detail_level == DetailLevel::Summary {
            rows.retain(|row| row.style.is_summary());
        }
        rows
    }
}

struct ItemRenderer<'r> {
    report: &'r CompiledReport,
    ledger: &'r [LedgerRow],
    comparison: &'r ComparisonContext,
    variables: &'r ResolvedVariables,
    values: &'r BTreeMap<i32, BySide<Option<Decimal>>>,
}

impl ItemRenderer<'_> {
    fn compute(&self, item: &LayoutItem) -> Result<BySide<Option<Decimal>>, ReportError> {
        let mut amounts = BySide::default();
        for side in Side::BOTH {
            if !self.variables.is_available(side) {
                continue;
            }
            *amounts.get_mut(side) = Some(self.compute_side(item, side)?);
        }
        Ok(amounts)
    }

    fn compute_side(&self, item: &LayoutItem, side: Side) -> Result<Decimal, ReportError> {
        match &item.kind {
            LayoutKind::Variable { variable } => self
                .variables
                .get(side, variable)
                .ok_or_else(|| ReportError::UnknownVariable(variable.clone())),
            LayoutKind::Calculated { .. } => {
                let expr = match self.report.expression(item.order) {
                    Some(Ok(expr)) => expr,
                    Some(Err(err)) => return Err(err.clone().into()),
                    None => return Err(ExpressionError::Empty.into()),
                };
                let source = SideSource {
                    variables: self.variables.side(side),
                    values: self.values,
                    side,
                };
                Ok(expr.evaluate(&source)?)
            }
            LayoutKind::Category { filter } => {
                let window = self.comparison.window(side);
                checked_sum(
                    apply_filter_in_window(self.ledger, filter, window)
                        .iter()
                        .map(|row| row.movement_amount),
                )
                .ok_or(ReportError::Expression(ExpressionError::Overflow))
            }
            LayoutKind::Subtotal { from, to } => {
                if from > to {
                    return Err(ReportError::InvalidDefinition {
                        report_id: self.report.report_id().to_string(),
                        errors: vec![format!(
                            "subtotal at order {} has from {from} greater than to {to}",
                            item.order
                        )],
                    });
                }
                checked_sum(
                    self.values
                        .range(*from..=*to)
                        .filter(|(order, _)| **order != item.order)
                        .filter_map(|(_, amounts)| *amounts.get(side)),
                )
                .ok_or(ReportError::Expression(ExpressionError::Overflow))
            }
            LayoutKind::Spacer => Ok(Decimal::ZERO),
        }
    }
}

struct SideSource<'a> {
    variables: Option<&'a BTreeMap<String, Decimal>>,
    values: &'a BTreeMap<i32, BySide<Option<Decimal>>>,
    side: Side,
}

impl ValueSource for SideSource<'_> {
    fn variable(&self, name: &str) -> Option<Decimal> {
        self.variables.and_then(|values| values.get(name).copied())
    }

    fn order_value(&self, order: i32) -> Option<Decimal> {
        self.values
            .get(&order)
            .and_then(|amounts| *amounts.get(self.side))
    }
}

fn base_row(item: &LayoutItem) -> RenderedRow {
    let is_calculated = item.kind.item_type() == LayoutItemType::Calculated;
    RenderedRow {
        order: item.order,
        label: item.label.clone(),
        item_type: item.kind.item_type(),
        style: item.style,
        indent: item.indent,
        amounts: BySide::default(),
        variance_amount: None,
        variance_percent: None,
        formatted: FormattedValues::default(),
        always_visible: item.style.is_total() || is_calculated,
        is_group: false,
        is_calculated,
        error: None,
    }
}

fn value_row(
    item: &LayoutItem,
    amounts: BySide<Option<Decimal>>,
    options: &RenderOptions,
) -> RenderedRow {
    let symbol = options.currency_symbol.as_str();
    let variance = Variance::between(&amounts);
    let variance_amount = variance
        .map(|v| v.amount)
        .filter(|_| options.variance_mode.shows_amount());
    let variance_percent = variance
        .map(|v| v.percent)
        .filter(|_| options.variance_mode.shows_percent());

    let mut row = base_row(item);
    row.amounts = amounts;
    row.variance_amount = variance_amount;
    row.variance_percent = variance_percent;
    row.formatted = FormattedValues {
        prior: format_optional(amounts.prior, &item.format, symbol),
        current: format_optional(amounts.current, &item.format, symbol),
        variance_amount: format_optional(variance_amount, &item.format, symbol),
        variance_percent: format_optional(variance_percent, &VARIANCE_PERCENT_FORMAT, symbol),
    };
    row
}

fn error_row(item: &LayoutItem, err: &ReportError) -> RenderedRow {
    let mut row = base_row(item);
    row.formatted = FormattedValues {
        prior: ERROR_MARKER.to_string(),
        current: ERROR_MARKER.to_string(),
        variance_amount: String::new(),
        variance_percent: String::new(),
    };
    row.error = Some(err.to_string());
    row
}
