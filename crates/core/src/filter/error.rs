//! Filter specification errors.

use thiserror::Error;

/// A malformed filter specification.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterSpecError {
    /// Field name is not a ledger field.
    #[error("Unknown filter field '{0}'")]
    UnknownField(String),

    /// Range object uses an operator other than gte/lte/gt/lt.
    #[error("Unknown range operator '{operator}' on field '{field}'")]
    UnknownOperator {
        /// Filtered field.
        field: String,
        /// Offending operator key.
        operator: String,
    },

    /// Array matcher without values.
    #[error("Filter on field '{0}' has an empty value list")]
    EmptyValueList(String),

    /// Range object without bounds.
    #[error("Range filter on field '{0}' has no bounds")]
    EmptyRange(String),
}
