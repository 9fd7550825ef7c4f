//! Ledger error types for validation and lookup failures.

use emanet_shared::{CustomerId, ValueTypeId};
use rust_decimal::Decimal;
use thiserror::Error;

use crate::trash::TrashError;

/// Errors that can occur during book mutations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    // ========== Validation Errors ==========
    /// Amount must be strictly positive.
    #[error("Amount must be greater than zero")]
    NonPositiveAmount,

    /// A required input field is absent or blank.
    #[error("Required field missing: {0}")]
    MissingField(&'static str),

    /// Withdrawal or repayment exceeds the available balance.
    #[error("Requested {requested} exceeds available balance {available}")]
    InsufficientBalance {
        /// Amount requested.
        requested: Decimal,
        /// Balance available for the customer and value type.
        available: Decimal,
    },

    /// Another customer already has this name.
    #[error("A customer named {0} already exists")]
    DuplicateCustomer(String),

    /// The unit of a value type cannot change once transactions reference it.
    #[error("Unit of value type {0} cannot change while transactions reference it")]
    UnitLocked(ValueTypeId),

    // ========== Lookup Errors ==========
    /// Customer not found.
    #[error("Customer not found: {0}")]
    CustomerNotFound(CustomerId),

    /// Value type not found.
    #[error("Value type not found: {0}")]
    ValueTypeNotFound(ValueTypeId),

    /// Deposit or loan not found.
    #[error("Transaction not found: {0}")]
    TransactionNotFound(String),

    // ========== Trash Errors ==========
    /// Trash lifecycle failure.
    #[error(transparent)]
    Trash(#[from] TrashError),
}

impl LedgerError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NonPositiveAmount => "NON_POSITIVE_AMOUNT",
            Self::MissingField(_) => "MISSING_FIELD",
            Self::InsufficientBalance { .. } => "INSUFFICIENT_BALANCE",
            Self::DuplicateCustomer(_) => "DUPLICATE_CUSTOMER",
            Self::UnitLocked(_) => "UNIT_LOCKED",
            Self::CustomerNotFound(_) => "CUSTOMER_NOT_FOUND",
            Self::ValueTypeNotFound(_) => "VALUE_TYPE_NOT_FOUND",
            Self::TransactionNotFound(_) => "TRANSACTION_NOT_FOUND",
            Self::Trash(err) => err.error_code(),
        }
    }

    /// Returns true for errors caused by the input itself; the caller should
    /// show the message and let the user correct the form.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::NonPositiveAmount
                | Self::MissingField(_)
                | Self::InsufficientBalance { .. }
                | Self::DuplicateCustomer(_)
                | Self::UnitLocked(_)
        ) || matches!(self, Self::Trash(TrashError::RestoreConflict { .. }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use emanet_shared::TrashEntryId;
    use rust_decimal_macros::dec;

    #[test]
    fn test_error_codes() {
        assert_eq!(LedgerError::NonPositiveAmount.error_code(), "NON_POSITIVE_AMOUNT");
        assert_eq!(
            LedgerError::InsufficientBalance {
                requested: dec!(80),
                available: dec!(50)
            }
            .error_code(),
            "INSUFFICIENT_BALANCE"
        );
        assert_eq!(
            LedgerError::from(TrashError::NotFound(TrashEntryId::from_key("t"))).error_code(),
            "TRASH_ENTRY_NOT_FOUND"
        );
    }

    #[test]
    fn test_validation_classification() {
        assert!(LedgerError::MissingField("customerId").is_validation());
        assert!(LedgerError::DuplicateCustomer("Ahmet Yılmaz".into()).is_validation());
        assert!(!LedgerError::CustomerNotFound(CustomerId::from_key("x")).is_validation());
        assert!(!LedgerError::from(TrashError::NotFound(TrashEntryId::from_key("t"))).is_validation());
    }

    #[test]
    fn test_insufficient_balance_message() {
        let err = LedgerError::InsufficientBalance {
            requested: dec!(80),
            available: dec!(50),
        };
        assert_eq!(err.to_string(), "Requested 80 exceeds available balance 50");
    }
}
