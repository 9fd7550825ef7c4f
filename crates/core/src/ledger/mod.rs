//! Customers and the two transaction logs.
//!
//! This module holds the record types of the book and the rules applied when
//! they change:
//! - Customers, deposits (emanet) and loans (borç)
//! - Closed direction sets with legacy label aliases
//! - Ingestion of loosely shaped persisted records
//! - Input validation for mutations
//! - Error types for book operations

pub mod error;
pub mod ingest;
pub mod types;
pub mod validation;

#[cfg(test)]
mod validation_props;

pub use error::LedgerError;
pub use ingest::{
    Ingested, IngestError, RawTransaction, Rejected, ingest_deposits, ingest_loans,
    ingest_records, parse_amount, parse_timestamp,
};
pub use types::{
    Customer, CustomerUpdate, DepositDirection, DepositTransaction, LoanDirection,
    LoanTransaction, Movement, NewCustomer, NewDeposit, NewLoan, NewTransaction,
    TransactionUpdate, name_key,
};
