//! Report error types.

use thiserror::Error;

use finstate_shared::AppError;
use finstate_shared::types::StatementType;

use crate::expression::ExpressionError;
use crate::filter::FilterSpecError;

/// Errors that can occur while registering or rendering a report.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReportError {
    // ========== Configuration Errors ==========
    /// Definition failed validation.
    #[error("Report '{report_id}' is invalid: {}", errors.join("; "))]
    InvalidDefinition {
        /// Report id.
        report_id: String,
        /// Every validation error message.
        errors: Vec<String>,
    },

    /// Variables extend each other in a cycle.
    #[error("Circular variable dependency: {}", cycle.join(" -> "))]
    CircularDependency {
        /// Variable ids along the cycle, first id repeated at the end.
        cycle: Vec<String>,
    },

    /// Reference to a variable the report does not define.
    #[error("Unknown variable: {0}")]
    UnknownVariable(String),

    /// Malformed filter.
    #[error("Invalid filter: {0}")]
    FilterSpec(#[from] FilterSpecError),

    // ========== Expression Errors ==========
    /// Expression failed to parse or evaluate.
    #[error("Expression error: {0}")]
    Expression(#[from] ExpressionError),

    // ========== Data Errors ==========
    /// Ledger data required for the render is missing.
    #[error("Data unavailable: {0}")]
    DataUnavailable(String),

    /// Aggregating a variable's rows left the decimal range.
    #[error("Variable '{0}' exceeds the decimal range")]
    AggregateOverflow(String),

    // ========== Registry Errors ==========
    /// A report with this id is already registered.
    #[error("Report already registered: {0}")]
    DuplicateId(String),

    /// No report with this id is registered.
    #[error("Report not found: {0}")]
    NotFound(String),

    /// Default report belongs to another statement type.
    #[error("Report '{report_id}' is a {actual} report, not {expected}")]
    StatementTypeMismatch {
        /// Report id.
        report_id: String,
        /// Statement type the default was requested for.
        expected: StatementType,
        /// Statement type of the report.
        actual: StatementType,
    },
}

impl ReportError {
    /// Returns true for errors caused by the report definition itself.
    ///
    /// The caller must fall back to another report or refuse to render.
    #[must_use]
    pub const fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidDefinition { .. }
                | Self::CircularDependency { .. }
                | Self::UnknownVariable(_)
                | Self::FilterSpec(_)
        )
    }
}

impl From<ReportError> for AppError {
    fn from(err: ReportError) -> Self {
        let message = err.to_string();
        match err {
            ReportError::InvalidDefinition { .. } => Self::Validation(message),
            ReportError::CircularDependency { .. }
            | ReportError::UnknownVariable(_)
            | ReportError::FilterSpec(_)
            | ReportError::Expression(_)
            | ReportError::StatementTypeMismatch { .. } => Self::Configuration(message),
            ReportError::DataUnavailable(_) | ReportError::AggregateOverflow(_) => {
                Self::DataUnavailable(message)
            }
            ReportError::DuplicateId(_) => Self::Conflict(message),
            ReportError::NotFound(_) => Self::NotFound(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_display() {
        let err = ReportError::CircularDependency {
            cycle: vec!["a".into(), "b".into(), "a".into()],
        };
        assert_eq!(err.to_string(), "Circular variable dependency: a -> b -> a");
        assert!(err.is_configuration_error());
    }

    #[test]
    fn test_conversion_to_app_error() {
        let app: AppError = ReportError::DuplicateId("pnl".into()).into();
        assert_eq!(app.error_code(), "CONFLICT");

        let app: AppError = ReportError::DataUnavailable("empty ledger".into()).into();
        assert_eq!(app.error_code(), "DATA_UNAVAILABLE");

        let app: AppError = ReportError::InvalidDefinition {
            report_id: "pnl".into(),
            errors: vec!["bad".into()],
        }
        .into();
        assert_eq!(app.exit_code(), 1);
        assert!(!ReportError::NotFound("x".into()).is_configuration_error());
    }
}
