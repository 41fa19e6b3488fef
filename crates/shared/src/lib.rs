//! Shared types, errors, and configuration for Finstate.
//!
//! This crate provides common types used across all other crates:
//! - Statement types and fiscal period primitives
//! - Display options shared by the engine and its hosts
//! - Application-wide error types
//! - Configuration management

pub mod config;
pub mod error;
pub mod types;

pub use config::EngineConfig;
pub use error::{AppError, AppResult};
