//! Customer mutations.

use chrono::{DateTime, Utc};
use emanet_shared::CustomerId;

use super::{Applied, Book, Collection};
use crate::ledger::validation::{
    ensure_unique_customer_name, normalize_name, normalize_optional_text,
};
use crate::ledger::{Customer, CustomerUpdate, LedgerError, NewCustomer};
use crate::trash::{TrashEntry, TrashPayload};

impl Book {
    /// Next free ledger page number.
    fn next_sequence_number(&self) -> u32 {
        self.customers
            .values()
            .map(|c| c.sequence_number)
            .max()
            .unwrap_or(0)
            .saturating_add(1)
    }

    /// Adds a customer.
    ///
    /// # Errors
    ///
    /// Returns `MissingField` for a blank name and `DuplicateCustomer` if an
    /// active customer already has the same name.
    pub fn add_customer(
        &mut self,
        input: NewCustomer,
        now: DateTime<Utc>,
    ) -> Result<Applied<Customer>, LedgerError> {
        let first_name = normalize_name(&input.first_name, "firstName")?;
        let last_name = normalize_name(&input.last_name, "lastName")?;
        ensure_unique_customer_name(self.customers.values(), &first_name, &last_name, None)?;

        let customer = Customer {
            id: input.id.unwrap_or_default(),
            first_name,
            last_name,
            phone: normalize_optional_text(input.phone),
            note: normalize_optional_text(input.note),
            sequence_number: input
                .sequence_number
                .unwrap_or_else(|| self.next_sequence_number()),
            created_at: now,
            updated_at: now,
        };
        tracing::debug!(customer_id = %customer.id, "customer added");
        self.customers.insert(customer.id.clone(), customer.clone());
        Ok(Applied::new(customer, [Collection::Customers]))
    }

    /// Edits a customer.
    ///
    /// # Errors
    ///
    /// Returns `CustomerNotFound`, `MissingField` for a blanked name, or
    /// `DuplicateCustomer` if the new name clashes with another customer.
    pub fn update_customer(
        &mut self,
        id: &CustomerId,
        update: CustomerUpdate,
        now: DateTime<Utc>,
    ) -> Result<Applied<Customer>, LedgerError> {
        let current = self
            .customers
            .get(id)
            .ok_or_else(|| LedgerError::CustomerNotFound(id.clone()))?;

        let first_name = match update.first_name {
            Some(name) => normalize_name(&name, "firstName")?,
            None => current.first_name.clone(),
        };
        let last_name = match update.last_name {
            Some(name) => normalize_name(&name, "lastName")?,
            None => current.last_name.clone(),
        };
        ensure_unique_customer_name(self.customers.values(), &first_name, &last_name, Some(id))?;

        let mut customer = current.clone();
        customer.first_name = first_name;
        customer.last_name = last_name;
        if update.phone.is_some() {
            customer.phone = normalize_optional_text(update.phone);
        }
        if update.note.is_some() {
            customer.note = normalize_optional_text(update.note);
        }
        if let Some(sequence_number) = update.sequence_number {
            customer.sequence_number = sequence_number;
        }
        customer.updated_at = now;

        self.customers.insert(id.clone(), customer.clone());
        Ok(Applied::new(customer, [Collection::Customers]))
    }

    /// Deletes a customer together with all of its deposits and loans.
    ///
    /// Each record becomes its own trash entry; restoring the customer later
    /// does not bring the transactions back.
    ///
    /// # Errors
    ///
    /// Returns `CustomerNotFound` if the id is unknown.
    pub fn delete_customer(
        &mut self,
        id: &CustomerId,
        now: DateTime<Utc>,
    ) -> Result<Applied<Vec<TrashEntry>>, LedgerError> {
        let customer = self
            .customers
            .remove(id)
            .ok_or_else(|| LedgerError::CustomerNotFound(id.clone()))?;
        let retention = self.policy.retention;

        let mut entries = vec![self.trash.move_to_trash(
            TrashPayload::Customer(customer),
            retention,
            now,
        )];

        let deposit_ids: Vec<_> = self
            .deposits
            .values()
            .filter(|d| &d.customer_id == id)
            .map(|d| d.id.clone())
            .collect();
        for deposit_id in deposit_ids {
            if let Some(deposit) = self.deposits.remove(&deposit_id) {
                entries.push(
                    self.trash
                        .move_to_trash(TrashPayload::Deposit(deposit), retention, now),
                );
            }
        }

        let loan_ids: Vec<_> = self
            .loans
            .values()
            .filter(|l| &l.customer_id == id)
            .map(|l| l.id.clone())
            .collect();
        for loan_id in loan_ids {
            if let Some(loan) = self.loans.remove(&loan_id) {
                entries.push(
                    self.trash
                        .move_to_trash(TrashPayload::Loan(loan), retention, now),
                );
            }
        }

        tracing::info!(customer_id = %id, trashed = entries.len(), "customer deleted");
        Ok(Applied::new(
            entries,
            [
                Collection::Customers,
                Collection::Deposits,
                Collection::Loans,
                Collection::Trash,
            ],
        ))
    }
}
