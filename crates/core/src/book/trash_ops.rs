//! Restore, permanent delete and expiry of trashed records.

use chrono::{DateTime, Utc};
use emanet_shared::TrashEntryId;

use super::{Applied, Book, Collection};
use crate::ledger::LedgerError;
use crate::ledger::validation::ensure_unique_customer_name;
use crate::trash::{EntityKind, TrashEntry, TrashError, TrashPayload};

impl EntityKind {
    /// Collection the record lives in while active.
    #[must_use]
    pub const fn collection(self) -> Collection {
        match self {
            Self::Customer => Collection::Customers,
            Self::Deposit => Collection::Deposits,
            Self::Loan => Collection::Loans,
            Self::ValueType => Collection::ValueTypes,
        }
    }
}

impl Book {
    /// Puts a trashed record back into its origin collection with its
    /// original id, and removes the trash entry.
    ///
    /// A record already present under the same id is replaced. A customer is
    /// refused if another active customer took its name meanwhile; the entry
    /// then stays in the trash. Restoring a customer does not restore the
    /// deposits and loans trashed with it.
    ///
    /// # Errors
    ///
    /// Returns `TrashError::NotFound` or `TrashError::RestoreConflict`.
    pub fn restore_from_trash(
        &mut self,
        id: &TrashEntryId,
    ) -> Result<Applied<TrashEntry>, LedgerError> {
        let entry = self.trash.get(id)?;

        if let TrashPayload::Customer(customer) = &entry.payload {
            ensure_unique_customer_name(
                self.customers.values(),
                &customer.first_name,
                &customer.last_name,
                Some(&customer.id),
            )
            .map_err(|err| TrashError::RestoreConflict {
                entry: id.clone(),
                reason: err.to_string(),
            })?;
        }

        let entry = self.trash.permanently_delete(id)?;
        match entry.payload.clone() {
            TrashPayload::Customer(c) => {
                self.customers.insert(c.id.clone(), c);
            }
            TrashPayload::Deposit(d) => {
                self.deposits.insert(d.id.clone(), d);
            }
            TrashPayload::Loan(l) => {
                self.loans.insert(l.id.clone(), l);
            }
            TrashPayload::ValueType(t) => {
                self.value_types.insert(t);
            }
        }
        tracing::info!(
            trash_id = %entry.id,
            original_id = %entry.original_id,
            kind = ?entry.kind(),
            "record restored from trash"
        );
        let origin = entry.kind().collection();
        Ok(Applied::new(entry, [origin, Collection::Trash]))
    }

    /// Deletes a trash entry for good. The origin collection is untouched.
    ///
    /// # Errors
    ///
    /// Returns `TrashError::NotFound` if the id is unknown.
    pub fn permanently_delete(
        &mut self,
        id: &TrashEntryId,
    ) -> Result<Applied<TrashEntry>, LedgerError> {
        let entry = self.trash.permanently_delete(id)?;
        Ok(Applied::new(entry, [Collection::Trash]))
    }

    /// Removes every trash entry that expired before `now`.
    ///
    /// Touches nothing when no entry expired, so a redundant sweep causes no
    /// write.
    pub fn sweep_expired(&mut self, now: DateTime<Utc>) -> Applied<usize> {
        let removed = self.trash.sweep_expired(now);
        let touched = (removed > 0).then_some(Collection::Trash);
        Applied::new(removed, touched)
    }

    /// Deletes every trash entry.
    pub fn empty_trash(&mut self) -> Applied<usize> {
        let removed = self.trash.empty();
        let touched = (removed > 0).then_some(Collection::Trash);
        Applied::new(removed, touched)
    }
}
