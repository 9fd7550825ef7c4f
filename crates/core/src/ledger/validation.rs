//! Business rule validation for book mutations.

use emanet_shared::CustomerId;
use rust_decimal::Decimal;

use super::error::LedgerError;
use super::types::{Customer, name_key};

/// Unwraps a required input field.
///
/// # Errors
///
/// Returns `MissingField` when the value is absent.
pub fn require<T>(value: Option<T>, field: &'static str) -> Result<T, LedgerError> {
    value.ok_or(LedgerError::MissingField(field))
}

/// Checks that an amount was given and is strictly positive.
///
/// # Errors
///
/// Returns `MissingField` for a missing amount, `NonPositiveAmount` for zero
/// or negative values.
pub fn validate_amount(amount: Option<Decimal>) -> Result<Decimal, LedgerError> {
    let amount = require(amount, "amount")?;
    if amount <= Decimal::ZERO {
        return Err(LedgerError::NonPositiveAmount);
    }
    Ok(amount)
}

/// Checks a withdrawal or repayment against the available balance.
///
/// `tolerance` absorbs rounding in amounts typed by hand.
///
/// # Errors
///
/// Returns `InsufficientBalance` if `requested > available + tolerance`.
pub fn ensure_within_balance(
    requested: Decimal,
    available: Decimal,
    tolerance: Decimal,
) -> Result<(), LedgerError> {
    if requested > available + tolerance {
        return Err(LedgerError::InsufficientBalance {
            requested,
            available,
        });
    }
    Ok(())
}

/// Trims a required name field.
///
/// # Errors
///
/// Returns `MissingField` if the value is blank.
pub fn normalize_name(value: &str, field: &'static str) -> Result<String, LedgerError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(LedgerError::MissingField(field));
    }
    Ok(trimmed.to_string())
}

/// Trims optional text, mapping blank input to `None`.
#[must_use]
pub fn normalize_optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Rejects a name already used by another customer (trimmed, case-insensitive).
///
/// `except` skips the customer being renamed.
///
/// # Errors
///
/// Returns `DuplicateCustomer` on a clash.
pub fn ensure_unique_customer_name<'a>(
    customers: impl IntoIterator<Item = &'a Customer>,
    first_name: &str,
    last_name: &str,
    except: Option<&CustomerId>,
) -> Result<(), LedgerError> {
    let key = name_key(first_name, last_name);
    let clash = customers
        .into_iter()
        .filter(|c| Some(&c.id) != except)
        .any(|c| c.name_key() == key);
    if clash {
        return Err(LedgerError::DuplicateCustomer(format!(
            "{} {}",
            first_name.trim(),
            last_name.trim()
        )));
    }
    Ok(())
}
