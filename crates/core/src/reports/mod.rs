//! Configurable report rendering.
//!
//! A report definition declares variables (filtered aggregates over ledger
//! rows) and a layout of rows. Definitions are validated, compiled and kept
//! in a [`ReportRegistry`]; [`ReportEngine::render`] turns a compiled report
//! and a ledger snapshot into rendered rows for a comparison period pair.

pub mod compiled;
pub mod error;
pub mod format;
pub mod generation;
pub mod registry;
pub mod render;
pub mod service;
pub mod types;
pub mod validation;
pub mod variables;


pub use compiled::CompiledReport;
pub use error::ReportError;
pub use format::{ERROR_MARKER, format_optional, format_value};
pub use generation::{GenerationTicket, RenderGeneration};
pub use registry::{RegistryState, ReportRegistry};
pub use render::{FormattedValues, RenderOptions, RenderedRow, ReportRenderer};
pub use service::{RenderedReport, ReportEngine};
pub use types::{
    Aggregate, FormatKind, FormatSpec, LayoutItem, LayoutItemType, LayoutKind, ReportDefinition,
    RowStyle, VariableDefinition,
};
pub use validation::{ReportValidator, ValidationIssue, ValidationResult};
pub use variables::{ResolvedVariables, VariableCache, VariableResolver};
