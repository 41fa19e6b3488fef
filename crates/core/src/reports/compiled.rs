//! Definitions with their expressions parsed ahead of rendering.

use std::collections::BTreeMap;

use super::types::{LayoutKind, ReportDefinition};
use crate::expression::{self, Expr, ExpressionError};

/// A report definition plus the parsed expression of every calculated row.
///
/// Parse failures are kept per row so a render can mark that row as errored
/// and carry on with the rest of the report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledReport {
    definition: ReportDefinition,
    expressions: BTreeMap<i32, Result<Expr, ExpressionError>>,
}

impl CompiledReport {
    /// Parses every calculated row of `definition`.
    #[must_use]
    pub fn compile(definition: ReportDefinition) -> Self {
        let expressions = definition
            .layout
            .iter()
            .filter_map(|item| match &item.kind {
                LayoutKind::Calculated { expression } => {
                    Some((item.order, expression::parse(expression)))
                }
                _ => None,
            })
            .collect();
        Self {
            definition,
            expressions,
        }
    }

    /// The underlying definition.
    #[must_use]
    pub const fn definition(&self) -> &ReportDefinition {
        &self.definition
    }

    /// Report id shortcut.
    #[must_use]
    pub fn report_id(&self) -> &str {
        &self.definition.report_id
    }

    /// Parsed expression of the calculated row at `order`.
    #[must_use]
    pub fn expression(&self, order: i32) -> Option<&Result<Expr, ExpressionError>> {
        self.expressions.get(&order)
    }

    /// Consumes the compiled report, returning the definition.
    #[must_use]
    pub fn into_definition(self) -> ReportDefinition {
        self.definition
    }
}
