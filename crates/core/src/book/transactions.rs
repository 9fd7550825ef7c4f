//! Deposit and loan mutations.

use chrono::{DateTime, Utc};
use emanet_shared::{CustomerId, DepositId, LoanId, ValueTypeId};
use rust_decimal::Decimal;

use super::{Applied, Book, Collection};
use crate::balance::BalanceEngine;
use crate::ledger::validation::{
    ensure_within_balance, normalize_optional_text, require, validate_amount,
};
use crate::ledger::{
    DepositDirection, DepositTransaction, LedgerError, LoanDirection, LoanTransaction, NewDeposit,
    NewLoan, TransactionUpdate,
};
use crate::trash::{TrashEntry, TrashPayload};

/// Fields of a draft that passed the shared checks.
struct Checked {
    customer_id: CustomerId,
    value_type_id: ValueTypeId,
    amount: Decimal,
}

impl Book {
    /// Checks presence, amount and references of a draft, in that order.
    fn check_draft(
        &self,
        customer_id: Option<CustomerId>,
        value_type_id: Option<ValueTypeId>,
        amount: Option<Decimal>,
    ) -> Result<Checked, LedgerError> {
        let customer_id = require(customer_id, "customerId")?;
        let value_type_id = require(value_type_id, "valueTypeId")?;
        let amount = validate_amount(amount)?;
        if !self.customers.contains_key(&customer_id) {
            return Err(LedgerError::CustomerNotFound(customer_id));
        }
        if !self.value_types.contains(&value_type_id) {
            return Err(LedgerError::ValueTypeNotFound(value_type_id));
        }
        Ok(Checked {
            customer_id,
            value_type_id,
            amount,
        })
    }

    /// Records a deposit movement.
    ///
    /// A `deposit-out` may not exceed the customer's deposit balance for the
    /// value type by more than the configured tolerance.
    ///
    /// # Errors
    ///
    /// Returns a validation error or `CustomerNotFound` / `ValueTypeNotFound`.
    pub fn record_deposit(
        &mut self,
        draft: NewDeposit,
        now: DateTime<Utc>,
    ) -> Result<Applied<DepositTransaction>, LedgerError> {
        let checked = self.check_draft(draft.customer_id, draft.value_type_id, draft.amount)?;
        if draft.direction == DepositDirection::Out {
            let available = BalanceEngine::available_deposit(
                self.deposits.values(),
                &checked.customer_id,
                &checked.value_type_id,
            );
            ensure_within_balance(checked.amount, available, self.policy.balance_tolerance)?;
        }

        let deposit = DepositTransaction {
            id: DepositId::new(),
            customer_id: checked.customer_id,
            value_type_id: checked.value_type_id,
            direction: draft.direction,
            amount: checked.amount,
            description: normalize_optional_text(draft.description),
            timestamp: draft.timestamp.unwrap_or(now),
            created_at: now,
            updated_at: now,
        };
        tracing::debug!(
            deposit_id = %deposit.id,
            customer_id = %deposit.customer_id,
            direction = deposit.direction.as_str(),
            "deposit recorded"
        );
        self.deposits.insert(deposit.id.clone(), deposit.clone());
        Ok(Applied::new(deposit, [Collection::Deposits]))
    }

    /// Records a loan movement.
    ///
    /// A `loan-repay` may not exceed the outstanding loan for the value type
    /// by more than the configured tolerance.
    ///
    /// # Errors
    ///
    /// Returns a validation error or `CustomerNotFound` / `ValueTypeNotFound`.
    pub fn record_loan(
        &mut self,
        draft: NewLoan,
        now: DateTime<Utc>,
    ) -> Result<Applied<LoanTransaction>, LedgerError> {
        let checked = self.check_draft(draft.customer_id, draft.value_type_id, draft.amount)?;
        if draft.direction == LoanDirection::Repay {
            let outstanding = BalanceEngine::outstanding_loan(
                self.loans.values(),
                &checked.customer_id,
                &checked.value_type_id,
            );
            ensure_within_balance(checked.amount, outstanding, self.policy.balance_tolerance)?;
        }

        let loan = LoanTransaction {
            id: LoanId::new(),
            customer_id: checked.customer_id,
            value_type_id: checked.value_type_id,
            direction: draft.direction,
            amount: checked.amount,
            description: normalize_optional_text(draft.description),
            timestamp: draft.timestamp.unwrap_or(now),
            created_at: now,
            updated_at: now,
        };
        tracing::debug!(
            loan_id = %loan.id,
            customer_id = %loan.customer_id,
            direction = loan.direction.as_str(),
            "loan recorded"
        );
        self.loans.insert(loan.id.clone(), loan.clone());
        Ok(Applied::new(loan, [Collection::Loans]))
    }

    /// Edits a deposit's value type, amount or description.
    ///
    /// An edited `deposit-out` is checked again against the balance left by
    /// the other deposits.
    ///
    /// # Errors
    ///
    /// Returns `TransactionNotFound`, `ValueTypeNotFound` or a validation
    /// error.
    pub fn update_deposit(
        &mut self,
        id: &DepositId,
        update: TransactionUpdate,
        now: DateTime<Utc>,
    ) -> Result<Applied<DepositTransaction>, LedgerError> {
        let mut deposit = self
            .deposits
            .get(id)
            .cloned()
            .ok_or_else(|| LedgerError::TransactionNotFound(id.to_string()))?;
        self.apply_update(
            &mut deposit.value_type_id,
            &mut deposit.amount,
            &mut deposit.description,
            update,
        )?;
        if deposit.direction == DepositDirection::Out {
            let available = BalanceEngine::available_deposit(
                self.deposits.values().filter(|d| &d.id != id),
                &deposit.customer_id,
                &deposit.value_type_id,
            );
            ensure_within_balance(deposit.amount, available, self.policy.balance_tolerance)?;
        }
        deposit.updated_at = now;
        self.deposits.insert(id.clone(), deposit.clone());
        Ok(Applied::new(deposit, [Collection::Deposits]))
    }

    /// Edits a loan's value type, amount or description.
    ///
    /// An edited `loan-repay` is checked again against the loan left by the
    /// other movements.
    ///
    /// # Errors
    ///
    /// Returns `TransactionNotFound`, `ValueTypeNotFound` or a validation
    /// error.
    pub fn update_loan(
        &mut self,
        id: &LoanId,
        update: TransactionUpdate,
        now: DateTime<Utc>,
    ) -> Result<Applied<LoanTransaction>, LedgerError> {
        let mut loan = self
            .loans
            .get(id)
            .cloned()
            .ok_or_else(|| LedgerError::TransactionNotFound(id.to_string()))?;
        self.apply_update(
            &mut loan.value_type_id,
            &mut loan.amount,
            &mut loan.description,
            update,
        )?;
        if loan.direction == LoanDirection::Repay {
            let outstanding = BalanceEngine::outstanding_loan(
                self.loans.values().filter(|l| &l.id != id),
                &loan.customer_id,
                &loan.value_type_id,
            );
            ensure_within_balance(loan.amount, outstanding, self.policy.balance_tolerance)?;
        }
        loan.updated_at = now;
        self.loans.insert(id.clone(), loan.clone());
        Ok(Applied::new(loan, [Collection::Loans]))
    }

    fn apply_update(
        &self,
        value_type_id: &mut ValueTypeId,
        amount: &mut Decimal,
        description: &mut Option<String>,
        update: TransactionUpdate,
    ) -> Result<(), LedgerError> {
        if let Some(new_type) = update.value_type_id {
            if !self.value_types.contains(&new_type) {
                return Err(LedgerError::ValueTypeNotFound(new_type));
            }
            *value_type_id = new_type;
        }
        if update.amount.is_some() {
            *amount = validate_amount(update.amount)?;
        }
        if update.description.is_some() {
            *description = normalize_optional_text(update.description);
        }
        Ok(())
    }

    /// Moves a deposit to the trash.
    ///
    /// # Errors
    ///
    /// Returns `TransactionNotFound` if the id is unknown.
    pub fn delete_deposit(
        &mut self,
        id: &DepositId,
        now: DateTime<Utc>,
    ) -> Result<Applied<TrashEntry>, LedgerError> {
        let deposit = self
            .deposits
            .remove(id)
            .ok_or_else(|| LedgerError::TransactionNotFound(id.to_string()))?;
        let entry = self
            .trash
            .move_to_trash(TrashPayload::Deposit(deposit), self.policy.retention, now);
        Ok(Applied::new(entry, [Collection::Deposits, Collection::Trash]))
    }

    /// Moves a loan to the trash.
    ///
    /// # Errors
    ///
    /// Returns `TransactionNotFound` if the id is unknown.
    pub fn delete_loan(
        &mut self,
        id: &LoanId,
        now: DateTime<Utc>,
    ) -> Result<Applied<TrashEntry>, LedgerError> {
        let loan = self
            .loans
            .remove(id)
            .ok_or_else(|| LedgerError::TransactionNotFound(id.to_string()))?;
        let entry = self
            .trash
            .move_to_trash(TrashPayload::Loan(loan), self.policy.retention, now);
        Ok(Applied::new(entry, [Collection::Loans, Collection::Trash]))
    }
}
