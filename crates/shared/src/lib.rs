//! Shared identifiers and configuration for Emanet Defteri.
//!
//! This crate provides common types used across all other crates:
//! - Typed IDs for type-safe entity references
//! - Configuration management

pub mod config;
pub mod types;

pub use config::{AppConfig, DatabaseConfig, DisplayConfig, LedgerConfig};
pub use types::{CustomerId, DepositId, LoanId, TrashEntryId, UserId, ValueTypeId};
