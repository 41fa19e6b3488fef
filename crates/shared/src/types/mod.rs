//! Common types used across the application.

pub mod display;
pub mod period;
pub mod statement;

pub use display::{DetailLevel, VarianceMode};
pub use period::{FiscalPeriod, PERIODS_PER_YEAR, PeriodRange};
pub use statement::StatementType;
