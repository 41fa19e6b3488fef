//! Core logic for finstate.
//!
//! Pure, synchronous financial statement rendering with no I/O. Everything
//! here works on in-memory ledger snapshots.
//!
//! # Modules
//!
//! - `trial_balance` - Ledger row model
//! - `filter` - Declarative row filters
//! - `expression` - Arithmetic over variables and layout rows
//! - `period` - Comparison windows
//! - `ltm` - Trailing-twelve-month ranges
//! - `variance` - Period-over-period variance
//! - `reports` - Report definitions, validation, registry and rendering
//! - `hierarchy` - Coded statement trees

pub mod expression;
pub mod filter;
pub mod hierarchy;
pub mod ltm;
pub mod period;
pub mod reports;
pub mod trial_balance;
pub mod variance;
