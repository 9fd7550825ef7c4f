//! The per-user book: the in-memory snapshot every mutation goes through.
//!
//! A [`Book`] holds the five collections of one user. Mutations validate
//! their input first and only then change the snapshot; each returns an
//! [`Applied`] naming the collections that changed so the sync layer can
//! replace exactly those in the store. Reads go through the
//! [`BalanceEngine`](crate::balance::BalanceEngine) over the snapshot.

pub mod collection;
pub mod customers;
pub mod documents;
pub mod transactions;
pub mod trash_ops;
pub mod value_types;

#[cfg(test)]
mod tests;

use std::collections::BTreeMap;

use emanet_shared::{CustomerId, DepositId, LedgerConfig, LoanId, ValueTypeId};
use rust_decimal::Decimal;
use serde_json::Value;

use crate::ledger::{Customer, DepositTransaction, LoanTransaction};
use crate::registry::{Lookup, Registry, ValueType};
use crate::trash::{RetentionPolicy, TrashBin};

pub use collection::{Applied, Collection, Touched};
pub use documents::{Documents, Loaded};

/// Policy knobs applied by book mutations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookPolicy {
    /// Trash retention.
    pub retention: RetentionPolicy,
    /// Slack allowed when comparing a withdrawal or repayment against the
    /// available balance.
    pub balance_tolerance: Decimal,
}

impl Default for BookPolicy {
    fn default() -> Self {
        Self::from(&LedgerConfig::default())
    }
}

impl From<&LedgerConfig> for BookPolicy {
    fn from(config: &LedgerConfig) -> Self {
        Self {
            retention: RetentionPolicy::from(config),
            balance_tolerance: config.balance_tolerance,
        }
    }
}

/// One user's customers, transaction logs, value types and trash.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Book {
    customers: BTreeMap<CustomerId, Customer>,
    deposits: BTreeMap<DepositId, DepositTransaction>,
    loans: BTreeMap<LoanId, LoanTransaction>,
    value_types: Registry,
    trash: TrashBin,
    /// Stored records that could not be read, by collection and key. They are
    /// written back as found so a whole-collection replace never drops them.
    unreadable: BTreeMap<Collection, BTreeMap<String, Value>>,
    policy: BookPolicy,
}

impl Book {
    /// Creates an empty book.
    #[must_use]
    pub fn new(policy: BookPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    /// Policy in effect.
    #[must_use]
    pub const fn policy(&self) -> &BookPolicy {
        &self.policy
    }

    /// Active customers in id order.
    pub fn customers(&self) -> impl Iterator<Item = &Customer> {
        self.customers.values()
    }

    /// All deposits.
    pub fn deposits(&self) -> impl Iterator<Item = &DepositTransaction> {
        self.deposits.values()
    }

    /// All loans.
    pub fn loans(&self) -> impl Iterator<Item = &LoanTransaction> {
        self.loans.values()
    }

    /// The value type registry.
    #[must_use]
    pub const fn value_types(&self) -> &Registry {
        &self.value_types
    }

    /// The trash bin.
    #[must_use]
    pub const fn trash(&self) -> &TrashBin {
        &self.trash
    }

    /// Resolves a customer id.
    #[must_use]
    pub fn customer(&self, id: &CustomerId) -> Lookup<&Customer> {
        Lookup::from_option(self.customers.get(id))
    }

    /// Resolves a value type id.
    #[must_use]
    pub fn value_type(&self, id: &ValueTypeId) -> Lookup<&ValueType> {
        self.value_types.lookup(id)
    }

    /// Looks up a deposit by id.
    #[must_use]
    pub fn deposit(&self, id: &DepositId) -> Option<&DepositTransaction> {
        self.deposits.get(id)
    }

    /// Looks up a loan by id.
    #[must_use]
    pub fn loan(&self, id: &LoanId) -> Option<&LoanTransaction> {
        self.loans.get(id)
    }

    /// Deposits of one customer, oldest first.
    #[must_use]
    pub fn customer_deposits(&self, customer_id: &CustomerId) -> Vec<&DepositTransaction> {
        let mut items: Vec<_> = self
            .deposits
            .values()
            .filter(|d| &d.customer_id == customer_id)
            .collect();
        items.sort_by_key(|d| d.timestamp);
        items
    }

    /// Loans of one customer, oldest first.
    #[must_use]
    pub fn customer_loans(&self, customer_id: &CustomerId) -> Vec<&LoanTransaction> {
        let mut items: Vec<_> = self
            .loans
            .values()
            .filter(|l| &l.customer_id == customer_id)
            .collect();
        items.sort_by_key(|l| l.timestamp);
        items
    }

    /// Customers ordered by ledger page number, then name.
    #[must_use]
    pub fn customers_by_sequence(&self) -> Vec<&Customer> {
        let mut items: Vec<_> = self.customers.values().collect();
        items.sort_by(|a, b| {
            a.sequence_number
                .cmp(&b.sequence_number)
                .then_with(|| a.full_name().cmp(&b.full_name()))
        });
        items
    }

    /// True if any deposit or loan references the value type.
    #[must_use]
    pub fn references_value_type(&self, id: &ValueTypeId) -> bool {
        self.deposits.values().any(|d| &d.value_type_id == id)
            || self.loans.values().any(|l| &l.value_type_id == id)
    }
}
