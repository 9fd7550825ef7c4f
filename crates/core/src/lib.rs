//! Core business logic for Emanet Defteri.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `registry` - Value types and the units they are measured in
//! - `ledger` - Customers, deposit and loan logs, ingestion and validation
//! - `balance` - Running totals and net positions
//! - `format` - Display formatting for amounts
//! - `trash` - Soft delete with time-boxed retention
//! - `book` - Per-user snapshot and the mutation boundary
//! - `backup` - Full-book export and import

pub mod backup;
pub mod balance;
pub mod book;
pub mod format;
pub mod ledger;
pub mod registry;
pub mod trash;

pub use backup::Backup;
pub use balance::BalanceEngine;
pub use book::{Applied, Book, BookPolicy, Collection, Documents, Loaded, Touched};
pub use ledger::LedgerError;
pub use registry::Lookup;
pub use trash::TrashError;
