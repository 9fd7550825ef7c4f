//! Trash entry types.

use chrono::{DateTime, Duration, Utc};
use emanet_shared::{LedgerConfig, TrashEntryId};
use serde::{Deserialize, Serialize};

use crate::ledger::{Customer, DepositTransaction, LoanTransaction};
use crate::registry::ValueType;

/// Kind of record held by a trash entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EntityKind {
    /// A customer.
    Customer,
    /// A deposit transaction.
    Deposit,
    /// A loan transaction.
    Loan,
    /// A value type.
    ValueType,
}

/// The trashed record, tagged by kind.
///
/// Persisted as `{"type": ..., "data": ...}`. Older trash entries used
/// `emanet`, `debt` and `emanetType` as type labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum TrashPayload {
    /// A customer.
    #[serde(rename = "customer")]
    Customer(Customer),
    /// A deposit transaction.
    #[serde(rename = "deposit", alias = "emanet")]
    Deposit(DepositTransaction),
    /// A loan transaction.
    #[serde(rename = "loan", alias = "debt")]
    Loan(LoanTransaction),
    /// A value type.
    #[serde(rename = "valueType", alias = "emanetType")]
    ValueType(ValueType),
}

impl TrashPayload {
    /// Kind of the held record.
    #[must_use]
    pub const fn kind(&self) -> EntityKind {
        match self {
            Self::Customer(_) => EntityKind::Customer,
            Self::Deposit(_) => EntityKind::Deposit,
            Self::Loan(_) => EntityKind::Loan,
            Self::ValueType(_) => EntityKind::ValueType,
        }
    }

    /// Id of the held record in its origin collection.
    #[must_use]
    pub fn original_id(&self) -> &str {
        match self {
            Self::Customer(c) => c.id.as_str(),
            Self::Deposit(d) => d.id.as_str(),
            Self::Loan(l) => l.id.as_str(),
            Self::ValueType(t) => t.id.as_str(),
        }
    }
}

/// A soft-deleted record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrashEntry {
    /// Trash-local id, never the record's own id.
    pub id: TrashEntryId,
    /// Id of the record in its origin collection.
    pub original_id: String,
    /// The record itself.
    #[serde(flatten)]
    pub payload: TrashPayload,
    /// When the record was deleted.
    pub deleted_at: DateTime<Utc>,
    /// When the entry stops being restorable.
    pub expires_at: DateTime<Utc>,
}

impl TrashEntry {
    /// Kind of the held record.
    #[must_use]
    pub const fn kind(&self) -> EntityKind {
        self.payload.kind()
    }

    /// True once `now` is past the expiry time.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at < now
    }

    /// Time left before expiry, zero once expired.
    #[must_use]
    pub fn remaining(&self, now: DateTime<Utc>) -> Duration {
        (self.expires_at - now).max(Duration::zero())
    }

    /// Whole days left before expiry, rounded up.
    #[must_use]
    pub fn days_remaining(&self, now: DateTime<Utc>) -> i64 {
        let remaining = self.remaining(now);
        let days = remaining.num_days();
        if remaining > Duration::days(days) {
            days + 1
        } else {
            days
        }
    }
}

/// How long trashed records stay restorable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetentionPolicy {
    retention: Duration,
}

impl RetentionPolicy {
    /// Default retention in days.
    pub const DEFAULT_DAYS: u32 = 30;

    /// Retention of the given number of days.
    #[must_use]
    pub fn from_days(days: u32) -> Self {
        Self {
            retention: Duration::days(i64::from(days)),
        }
    }

    /// Expiry time for a record deleted at `deleted_at`.
    #[must_use]
    pub fn expires_at(&self, deleted_at: DateTime<Utc>) -> DateTime<Utc> {
        deleted_at + self.retention
    }

    /// Retention window.
    #[must_use]
    pub const fn retention(&self) -> Duration {
        self.retention
    }
}

impl Default for RetentionPolicy {
    fn default() -> Self {
        Self::from_days(Self::DEFAULT_DAYS)
    }
}

impl From<&LedgerConfig> for RetentionPolicy {
    fn from(config: &LedgerConfig) -> Self {
        Self::from_days(config.trash_retention_days)
    }
}
