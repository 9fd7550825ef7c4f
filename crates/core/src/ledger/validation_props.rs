//! Property-based tests for amount and balance validation rules.

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::error::LedgerError;
use super::validation::{ensure_within_balance, validate_amount};

/// Strategy to generate a valid positive amount (> 0).
fn positive_amount() -> impl Strategy<Value = Decimal> {
    // 0.01 to 1,000,000.00
    (1i64..100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy to generate a zero or negative amount.
fn non_positive_amount() -> impl Strategy<Value = Decimal> {
    (0i64..100_000_000i64).prop_map(|cents| Decimal::new(-cents, 2))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Every positive amount passes unchanged.
    #[test]
    fn prop_positive_amount_accepted(amount in positive_amount()) {
        prop_assert_eq!(validate_amount(Some(amount)), Ok(amount));
    }

    /// Zero and negative amounts are rejected.
    #[test]
    fn prop_non_positive_amount_rejected(amount in non_positive_amount()) {
        prop_assert_eq!(validate_amount(Some(amount)), Err(LedgerError::NonPositiveAmount));
    }

    /// Anything up to the balance plus tolerance is allowed; beyond it is not.
    #[test]
    fn prop_balance_check_matches_tolerance(
        requested in positive_amount(),
        available in positive_amount(),
    ) {
        let tolerance = Decimal::new(1, 2);
        let result = ensure_within_balance(requested, available, tolerance);
        if requested <= available + tolerance {
            prop_assert!(result.is_ok());
        } else {
            let is_insufficient = matches!(result, Err(LedgerError::InsufficientBalance { .. }));
            prop_assert!(is_insufficient);
        }
    }
}
