//! Balance and net-position engine.
//!
//! Pure folds over the transaction logs: per-customer totals, net positions
//! and whole-book aggregates keyed by value type. Nothing here validates or
//! mutates; see [`crate::book`] for the mutation boundary.

pub mod engine;
pub mod types;


pub use engine::{BalanceEngine, TypeTotals};
pub use types::{BalanceKind, BalanceLine, BookSummary, Debtor, NetStatus, PositionKind};
