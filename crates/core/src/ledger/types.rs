//! Transaction log domain types.
//!
//! Two parallel logs exist: deposits (emanet), items or money the shop holds
//! for a customer, and loans (borç), value the customer owes the shop. Each
//! entry carries a direction from a closed set; see [`DepositDirection`] and
//! [`LoanDirection`].

use std::str::FromStr;

use chrono::{DateTime, Utc};
use emanet_shared::{CustomerId, DepositId, LoanId, ValueTypeId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::ingest::IngestError;

/// A customer of the shop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    /// Customer ID.
    pub id: CustomerId,
    /// First name.
    #[serde(alias = "ad")]
    pub first_name: String,
    /// Last name.
    #[serde(alias = "soyad")]
    pub last_name: String,
    /// Optional phone number.
    #[serde(default, alias = "telefon")]
    pub phone: Option<String>,
    /// Optional free-form note.
    #[serde(default, alias = "not")]
    pub note: Option<String>,
    /// Ledger page number shown next to the name.
    #[serde(default, alias = "sira")]
    pub sequence_number: u32,
    /// Creation timestamp.
    #[serde(default)]
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    #[serde(default)]
    pub updated_at: DateTime<Utc>,
}

impl Customer {
    /// `"First Last"`.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Key used for the duplicate-name rule: trimmed, lowercased names.
    #[must_use]
    pub fn name_key(&self) -> (String, String) {
        name_key(&self.first_name, &self.last_name)
    }
}

/// Trimmed, lowercased `(first, last)` pair.
#[must_use]
pub fn name_key(first_name: &str, last_name: &str) -> (String, String) {
    (
        first_name.trim().to_lowercase(),
        last_name.trim().to_lowercase(),
    )
}

/// Input for creating a customer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewCustomer {
    /// Preset id, e.g. when restoring from a backup.
    pub id: Option<CustomerId>,
    /// First name.
    pub first_name: String,
    /// Last name.
    pub last_name: String,
    /// Optional phone number.
    pub phone: Option<String>,
    /// Optional note.
    pub note: Option<String>,
    /// Explicit sequence number; defaults to the next free one.
    pub sequence_number: Option<u32>,
}

/// Partial customer update. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CustomerUpdate {
    /// New first name.
    pub first_name: Option<String>,
    /// New last name.
    pub last_name: Option<String>,
    /// New phone number.
    pub phone: Option<String>,
    /// New note.
    pub note: Option<String>,
    /// New sequence number.
    pub sequence_number: Option<u32>,
}

/// Direction of a deposit transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DepositDirection {
    /// Customer leaves an item or money with the shop.
    #[serde(rename = "deposit-in", alias = "emanet-birak")]
    In,
    /// Customer takes back part of the deposit.
    #[serde(rename = "deposit-out", alias = "emanet-al")]
    Out,
}

impl DepositDirection {
    /// Sign applied to the amount when folding: in adds, out subtracts.
    #[must_use]
    pub const fn sign(self) -> Decimal {
        match self {
            Self::In => Decimal::ONE,
            Self::Out => Decimal::NEGATIVE_ONE,
        }
    }

    /// Canonical wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::In => "deposit-in",
            Self::Out => "deposit-out",
        }
    }
}

impl FromStr for DepositDirection {
    type Err = IngestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "deposit-in" | "emanet-birak" => Ok(Self::In),
            "deposit-out" | "emanet-al" => Ok(Self::Out),
            other => Err(IngestError::UnknownDirection(other.to_string())),
        }
    }
}

/// Direction of a loan transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LoanDirection {
    /// The shop lends value to the customer.
    #[serde(rename = "loan-out", alias = "borc-ver")]
    Out,
    /// The customer repays part of the loan.
    #[serde(rename = "loan-repay", alias = "borc-ode")]
    Repay,
}

impl LoanDirection {
    /// Sign applied to the amount when folding: out adds, repay subtracts.
    #[must_use]
    pub const fn sign(self) -> Decimal {
        match self {
            Self::Out => Decimal::ONE,
            Self::Repay => Decimal::NEGATIVE_ONE,
        }
    }

    /// Canonical wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Out => "loan-out",
            Self::Repay => "loan-repay",
        }
    }
}

impl FromStr for LoanDirection {
    type Err = IngestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "loan-out" | "borc-ver" => Ok(Self::Out),
            "loan-repay" | "borc-ode" => Ok(Self::Repay),
            other => Err(IngestError::UnknownDirection(other.to_string())),
        }
    }
}

/// A deposit (emanet) movement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepositTransaction {
    /// Transaction ID.
    pub id: DepositId,
    /// Owning customer.
    #[serde(alias = "musteriId")]
    pub customer_id: CustomerId,
    /// Value type moved.
    #[serde(alias = "turId")]
    pub value_type_id: ValueTypeId,
    /// Direction.
    #[serde(alias = "islemTipi")]
    pub direction: DepositDirection,
    /// Amount, strictly positive for records created through the book.
    #[serde(alias = "miktar")]
    pub amount: Decimal,
    /// Optional description.
    #[serde(default, alias = "aciklama")]
    pub description: Option<String>,
    /// When the movement happened.
    #[serde(alias = "tarih")]
    pub timestamp: DateTime<Utc>,
    /// Creation timestamp.
    #[serde(default)]
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    #[serde(default)]
    pub updated_at: DateTime<Utc>,
}

/// A loan (borç) movement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanTransaction {
    /// Transaction ID.
    pub id: LoanId,
    /// Owning customer.
    #[serde(alias = "musteriId")]
    pub customer_id: CustomerId,
    /// Value type moved.
    #[serde(alias = "turId")]
    pub value_type_id: ValueTypeId,
    /// Direction.
    #[serde(alias = "islemTipi")]
    pub direction: LoanDirection,
    /// Amount, strictly positive for records created through the book.
    #[serde(alias = "miktar")]
    pub amount: Decimal,
    /// Optional description.
    #[serde(default, alias = "aciklama")]
    pub description: Option<String>,
    /// When the movement happened.
    #[serde(alias = "tarih")]
    pub timestamp: DateTime<Utc>,
    /// Creation timestamp.
    #[serde(default)]
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    #[serde(default)]
    pub updated_at: DateTime<Utc>,
}

/// A signed contribution to a per-type running total.
pub trait Movement {
    /// Owning customer.
    fn customer_id(&self) -> &CustomerId;
    /// Value type moved.
    fn value_type_id(&self) -> &ValueTypeId;
    /// Amount with the direction's sign applied.
    fn signed_amount(&self) -> Decimal;
}

impl Movement for DepositTransaction {
    fn customer_id(&self) -> &CustomerId {
        &self.customer_id
    }

    fn value_type_id(&self) -> &ValueTypeId {
        &self.value_type_id
    }

    fn signed_amount(&self) -> Decimal {
        self.amount * self.direction.sign()
    }
}

impl Movement for LoanTransaction {
    fn customer_id(&self) -> &CustomerId {
        &self.customer_id
    }

    fn value_type_id(&self) -> &ValueTypeId {
        &self.value_type_id
    }

    fn signed_amount(&self) -> Decimal {
        self.amount * self.direction.sign()
    }
}

/// Input for recording a deposit or loan, shaped like the entry form: any
/// required field may still be missing and is checked by the book.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTransaction<D> {
    /// Owning customer.
    pub customer_id: Option<CustomerId>,
    /// Value type moved.
    pub value_type_id: Option<ValueTypeId>,
    /// Direction.
    pub direction: D,
    /// Amount; must be positive.
    pub amount: Option<Decimal>,
    /// Optional description.
    pub description: Option<String>,
    /// When the movement happened; defaults to now.
    pub timestamp: Option<DateTime<Utc>>,
}

impl<D> NewTransaction<D> {
    /// A complete draft.
    #[must_use]
    pub fn new(
        customer_id: CustomerId,
        value_type_id: ValueTypeId,
        direction: D,
        amount: Decimal,
    ) -> Self {
        Self {
            customer_id: Some(customer_id),
            value_type_id: Some(value_type_id),
            direction,
            amount: Some(amount),
            description: None,
            timestamp: None,
        }
    }

    /// Attaches a description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Deposit draft.
pub type NewDeposit = NewTransaction<DepositDirection>;
/// Loan draft.
pub type NewLoan = NewTransaction<LoanDirection>;

/// Edit of an existing deposit or loan. Direction and customer are fixed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransactionUpdate {
    /// New value type.
    pub value_type_id: Option<ValueTypeId>,
    /// New amount; must be positive.
    pub amount: Option<Decimal>,
    /// New description.
    pub description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_direction_signs() {
        assert_eq!(DepositDirection::In.sign(), dec!(1));
        assert_eq!(DepositDirection::Out.sign(), dec!(-1));
        assert_eq!(LoanDirection::Out.sign(), dec!(1));
        assert_eq!(LoanDirection::Repay.sign(), dec!(-1));
    }

    #[test]
    fn test_direction_parsing_accepts_legacy_names() {
        assert_eq!("emanet-birak".parse::<DepositDirection>().unwrap(), DepositDirection::In);
        assert_eq!("deposit-out".parse::<DepositDirection>().unwrap(), DepositDirection::Out);
        assert_eq!("borc-ver".parse::<LoanDirection>().unwrap(), LoanDirection::Out);
        assert_eq!("loan-repay".parse::<LoanDirection>().unwrap(), LoanDirection::Repay);
    }

    #[test]
    fn test_direction_parsing_rejects_unknown() {
        assert!(matches!(
            "emanet-ver".parse::<DepositDirection>(),
            Err(IngestError::UnknownDirection(d)) if d == "emanet-ver"
        ));
        assert!("loan-out".parse::<DepositDirection>().is_err());
    }

    #[test]
    fn test_customer_name_key_is_trimmed_and_lowercased() {
        assert_eq!(
            name_key("  Ahmet ", "YILMAZ"),
            ("ahmet".to_string(), "yilmaz".to_string())
        );
    }

    #[test]
    fn test_customer_reads_legacy_record() {
        let json = r#"{"id":"demo-musteri-1","ad":"Ahmet","soyad":"Yılmaz","telefon":"0532 123 4567","sira":1}"#;
        let customer: Customer = serde_json::from_str(json).unwrap();
        assert_eq!(customer.full_name(), "Ahmet Yılmaz");
        assert_eq!(customer.sequence_number, 1);
        assert_eq!(customer.phone.as_deref(), Some("0532 123 4567"));
        assert!(customer.note.is_none());
    }
}
