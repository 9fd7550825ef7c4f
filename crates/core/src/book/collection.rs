//! Names of the persisted collections.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One of the five per-user collections, each replaced wholesale on write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Collection {
    /// Customers.
    Customers,
    /// Deposit (emanet) transactions.
    Deposits,
    /// Loan (borç) transactions.
    Loans,
    /// Value type registry.
    ValueTypes,
    /// Trash entries.
    Trash,
}

impl Collection {
    /// Every collection, in load order.
    pub const ALL: [Self; 5] = [
        Self::Customers,
        Self::Deposits,
        Self::Loans,
        Self::ValueTypes,
        Self::Trash,
    ];

    /// Storage name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Customers => "customers",
            Self::Deposits => "deposits",
            Self::Loans => "loans",
            Self::ValueTypes => "valueTypes",
            Self::Trash => "trash",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Collection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "customers" => Ok(Self::Customers),
            "deposits" | "emanets" => Ok(Self::Deposits),
            "loans" | "debts" => Ok(Self::Loans),
            "valueTypes" | "emanetTypes" => Ok(Self::ValueTypes),
            "trash" => Ok(Self::Trash),
            other => Err(format!("unknown collection: {other}")),
        }
    }
}

/// Collections changed by a mutation.
pub type Touched = BTreeSet<Collection>;

/// Result of a successful mutation: the produced value and the collections
/// that must be written back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Applied<T> {
    /// Value produced by the mutation.
    pub value: T,
    /// Collections to persist.
    pub touched: Touched,
}

impl<T> Applied<T> {
    /// Wraps a value with its touched collections.
    pub fn new(value: T, touched: impl IntoIterator<Item = Collection>) -> Self {
        Self {
            value,
            touched: touched.into_iter().collect(),
        }
    }

    /// Maps the value, keeping the touched set.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Applied<U> {
        Applied {
            value: f(self.value),
            touched: self.touched,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_roundtrip() {
        for collection in Collection::ALL {
            assert_eq!(collection.name().parse::<Collection>(), Ok(collection));
        }
        assert_eq!("emanetTypes".parse::<Collection>(), Ok(Collection::ValueTypes));
        assert!("settings".parse::<Collection>().is_err());
    }

    #[test]
    fn test_serde_uses_storage_names() {
        assert_eq!(serde_json::to_string(&Collection::ValueTypes).unwrap(), "\"valueTypes\"");
    }
}
