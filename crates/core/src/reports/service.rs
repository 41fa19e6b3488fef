//! Report rendering service.

use std::borrow::Cow;
use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use finstate_shared::types::StatementType;

use super::compiled::CompiledReport;
use super::error::ReportError;
use super::render::{RenderOptions, RenderedRow, ReportRenderer};
use super::types::ReportDefinition;
use super::variables::{ResolvedVariables, VariableCache, VariableResolver};
use crate::period::{BySide, ComparisonContext, Side};
use crate::trial_balance::LedgerRow;

/// A fully rendered statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedReport {
    /// Report id.
    pub report_id: String,
    /// Display name.
    pub name: String,
    /// Definition version.
    pub version: String,
    /// Statement type.
    pub statement_type: StatementType,
    /// Column labels.
    pub labels: BySide<String>,
    /// Rendered rows in display order.
    pub rows: Vec<RenderedRow>,
}

impl RenderedReport {
    /// Row with the given layout order.
    #[must_use]
    pub fn row(&self, order: i32) -> Option<&RenderedRow> {
        self.rows.iter().find(|row| row.order == order)
    }

    /// Rows that failed to compute.
    pub fn errored_rows(&self) -> impl Iterator<Item = &RenderedRow> {
        self.rows.iter().filter(|row| row.is_error())
    }
}

/// Rows of `statement_type`, borrowed as-is when nothing needs dropping.
fn statement_rows(ledger: &[LedgerRow], statement_type: StatementType) -> Cow<'_, [LedgerRow]> {
    if ledger.iter().all(|row| row.statement_type == statement_type) {
        Cow::Borrowed(ledger)
    } else {
        Cow::Owned(
            ledger
                .iter()
                .filter(|row| row.statement_type == statement_type)
                .cloned()
                .collect(),
        )
    }
}

/// Service for rendering configured reports.
pub struct ReportEngine;

impl ReportEngine {
    /// Resolves every variable of `definition` for each available side.
    ///
    /// Only rows of the definition's statement type are considered. A side
    /// with no such rows in its window resolves to `None`.
    ///
    /// # Errors
    ///
    /// Returns configuration errors (unknown variables, `extends` cycles).
    pub fn resolve_variables(
        definition: &ReportDefinition,
        ledger: &[LedgerRow],
        comparison: &ComparisonContext,
        cache: &mut VariableCache,
    ) -> Result<ResolvedVariables, ReportError> {
        let ledger = statement_rows(ledger, definition.statement_type);
        let available = comparison.available_sides(&ledger);
        let mut sides: BySide<Option<BTreeMap<String, Decimal>>> = BySide::default();
        let mut resolver = VariableResolver::new(definition, &ledger, cache);

        for side in Side::BOTH {
            if !*available.get(side) {
                debug!(side = ?side, "no ledger rows in window, skipping side");
                continue;
            }
            let ids = definition.variables.iter().map(|v| v.id.as_str());
            *sides.get_mut(side) = Some(resolver.resolve_all(ids, comparison.window(side))?);
        }
        Ok(ResolvedVariables::new(sides))
    }

    /// Renders `report` against the rows of `ledger` that belong to the
    /// report's statement type.
    ///
    /// Configuration and data errors abort the render. Expression failures
    /// only mark their own row.
    ///
    /// # Errors
    ///
    /// Returns `DataUnavailable` when the ledger is empty, holds no rows of
    /// the statement type, or the current window has none, and configuration
    /// errors from variable resolution.
    pub fn render(
        report: &CompiledReport,
        ledger: &[LedgerRow],
        comparison: &ComparisonContext,
        options: &RenderOptions,
    ) -> Result<RenderedReport, ReportError> {
        if ledger.is_empty() {
            return Err(ReportError::DataUnavailable(
                "no ledger data loaded".to_string(),
            ));
        }
        let definition = report.definition();
        let ledger = statement_rows(ledger, definition.statement_type);
        if ledger.is_empty() {
            return Err(ReportError::DataUnavailable(format!(
                "no {} ledger rows loaded",
                definition.statement_type
            )));
        }
        if !comparison.available_sides(&ledger).current {
            return Err(ReportError::DataUnavailable(format!(
                "no {} ledger rows in {}",
                definition.statement_type,
                comparison.current.label()
            )));
        }

        let mut cache = VariableCache::new();
        let variables = Self::resolve_variables(definition, &ledger, comparison, &mut cache)?;
        let rows = ReportRenderer::render(report, &ledger, comparison, &variables, options);

        info!(
            report_id = %definition.report_id,
            rows = rows.len(),
            errored = rows.iter().filter(|row| row.is_error()).count(),
            cached_variables = cache.len(),
            "rendered report"
        );

        Ok(RenderedReport {
            report_id: definition.report_id.clone(),
            name: definition.name.clone(),
            version: definition.version.clone(),
            statement_type: definition.statement_type,
            labels: comparison.labels(),
            rows,
        })
    }
}
