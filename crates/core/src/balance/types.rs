//! Balance engine result types.

use emanet_shared::CustomerId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Which side of the book a net position falls on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PositionKind {
    /// The shop owes the customer (alacaklı).
    Credit,
    /// The customer owes the shop (borçlu).
    Debt,
}

/// Net position with the sign stripped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetStatus {
    /// Side of the book.
    pub kind: PositionKind,
    /// Absolute amount, always positive.
    pub amount: Decimal,
}

impl NetStatus {
    /// Classifies a signed net amount. Returns `None` for zero.
    #[must_use]
    pub fn from_net(net: Decimal) -> Option<Self> {
        match net.cmp(&Decimal::ZERO) {
            std::cmp::Ordering::Greater => Some(Self {
                kind: PositionKind::Credit,
                amount: net,
            }),
            std::cmp::Ordering::Less => Some(Self {
                kind: PositionKind::Debt,
                amount: net.abs(),
            }),
            std::cmp::Ordering::Equal => None,
        }
    }
}

/// Log a customer balance line comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BalanceKind {
    /// Deposit held for the customer.
    Deposit,
    /// Loan owed by the customer.
    Loan,
}

/// One value type on a customer's balance card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceLine {
    /// Source log.
    pub kind: BalanceKind,
    /// Floored total.
    pub amount: Decimal,
}

/// A customer owing a given value type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Debtor {
    /// Customer id.
    pub customer_id: CustomerId,
    /// `"First Last"`.
    pub full_name: String,
    /// Ledger page number.
    pub sequence_number: u32,
    /// Outstanding amount, always positive.
    pub amount: Decimal,
}

/// Headline counts for the whole book.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookSummary {
    /// Number of active customers.
    pub customer_count: usize,
    /// Value types with a positive aggregate deposit total.
    pub deposit_type_count: usize,
    /// Value types with a positive aggregate loan total.
    pub loan_type_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_net_status_classification() {
        assert_eq!(
            NetStatus::from_net(dec!(30)),
            Some(NetStatus {
                kind: PositionKind::Credit,
                amount: dec!(30)
            })
        );
        assert_eq!(
            NetStatus::from_net(dec!(-12.5)),
            Some(NetStatus {
                kind: PositionKind::Debt,
                amount: dec!(12.5)
            })
        );
        assert_eq!(NetStatus::from_net(Decimal::ZERO), None);
    }
}
