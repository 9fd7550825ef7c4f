//! Session lifecycle and write-through of book mutations.
//!
//! A [`SyncManager`] is connected to at most one user at a time. It holds that
//! user's [`Book`] snapshot, runs every mutation against a copy of it, writes
//! each touched collection back to the [`DocumentStore`] in full, and only
//! then swaps the copy in and announces the change on a broadcast channel.
//!
//! Writes are whole-collection replacements without version checks: two
//! sessions editing the same collection overwrite each other, last write wins.
//! When a write fails the previous snapshot stays in place; earlier
//! collections of the same mutation may already be stored, so the caller
//! should [`refresh`](SyncManager::refresh) before retrying.

use chrono::Utc;
use emanet_core::backup::Backup;
use emanet_core::ledger::{
    Customer, CustomerUpdate, DepositTransaction, LoanTransaction, NewCustomer, NewDeposit,
    NewLoan, Rejected, TransactionUpdate,
};
use emanet_core::registry::{NewValueType, ValueType, ValueTypeUpdate};
use emanet_core::trash::TrashEntry;
use emanet_core::{Applied, Book, BookPolicy, Collection, Documents, LedgerError, Loaded};
use emanet_shared::{CustomerId, DepositId, LoanId, TrashEntryId, UserId, ValueTypeId};
use tokio::sync::broadcast;

use crate::error::SyncError;
use crate::store::DocumentStore;

/// Capacity of the change channel before slow receivers start lagging.
const CHANGE_CHANNEL_CAPACITY: usize = 64;

/// Records skipped while loading, by collection.
pub type Skipped = Vec<(Collection, Rejected)>;

#[derive(Debug)]
struct Session {
    user: UserId,
    book: Book,
}

/// Owns the connected user's book and keeps the store in step with it.
#[derive(Debug)]
pub struct SyncManager<S> {
    store: S,
    policy: BookPolicy,
    session: Option<Session>,
    changes: broadcast::Sender<Collection>,
}

impl<S: DocumentStore> SyncManager<S> {
    /// Creates a disconnected manager.
    #[must_use]
    pub fn new(store: S, policy: BookPolicy) -> Self {
        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Self {
            store,
            policy,
            session: None,
            changes,
        }
    }

    /// The underlying store.
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Loads every collection of `user` and makes it the current session.
    ///
    /// Expired trash entries are swept right after loading; the trash is
    /// written back only when something was removed. If that write fails the
    /// manager stays disconnected. Returns the records that could not be read;
    /// they stay in the book and are written back unchanged.
    pub async fn connect(&mut self, user: UserId) -> Result<Skipped, SyncError> {
        let Loaded { book, rejected } = self.load(&user).await?;
        tracing::info!(
            user_id = %user,
            customers = book.customers().count(),
            deposits = book.deposits().count(),
            loans = book.loans().count(),
            trash = book.trash().len(),
            skipped = rejected.len(),
            "user connected"
        );
        self.session = Some(Session { user, book });

        let now = Utc::now();
        let swept = match self.commit(|book| Ok(book.sweep_expired(now))).await {
            Ok(swept) => swept,
            Err(err) => {
                self.session = None;
                return Err(err);
            }
        };
        if swept > 0 {
            tracing::info!(removed = swept, "expired trash entries removed on connect");
        }
        Ok(rejected)
    }

    /// Drops the current session. Returns the user that was connected.
    pub fn disconnect(&mut self) -> Option<UserId> {
        let session = self.session.take()?;
        tracing::info!(user_id = %session.user, "user disconnected");
        Some(session.user)
    }

    /// True while a user is connected.
    pub const fn is_connected(&self) -> bool {
        self.session.is_some()
    }

    /// The connected user.
    pub fn user(&self) -> Option<&UserId> {
        self.session.as_ref().map(|s| &s.user)
    }

    /// The current snapshot.
    pub fn book(&self) -> Result<&Book, SyncError> {
        self.session
            .as_ref()
            .map(|s| &s.book)
            .ok_or(SyncError::NotConnected)
    }

    /// Subscribes to change notifications. Each message names a collection
    /// whose stored document was just replaced.
    pub fn subscribe(&self) -> broadcast::Receiver<Collection> {
        self.changes.subscribe()
    }

    /// Re-reads every collection of the connected user.
    pub async fn refresh(&mut self) -> Result<Skipped, SyncError> {
        let user = self.user().cloned().ok_or(SyncError::NotConnected)?;
        let Loaded { book, rejected } = self.load(&user).await?;
        if let Some(session) = self.session.as_mut() {
            session.book = book;
        }
        tracing::debug!(user_id = %user, skipped = rejected.len(), "book refreshed");
        Ok(rejected)
    }

    /// Re-reads one collection after another session changed it.
    pub async fn reload_collection(
        &mut self,
        collection: Collection,
    ) -> Result<Vec<Rejected>, SyncError> {
        let user = self.user().cloned().ok_or(SyncError::NotConnected)?;
        let document = self.store.read(&user, collection).await?;
        let session = self.session.as_mut().ok_or(SyncError::NotConnected)?;
        let rejected = session.book.replace_collection(collection, document.as_ref());
        tracing::debug!(user_id = %user, collection = %collection, "collection reloaded");
        Ok(rejected)
    }

    /// Takes a backup of the current snapshot.
    pub fn export_backup(&self) -> Result<Backup, SyncError> {
        Ok(Backup::from_book(self.book()?, Utc::now())?)
    }

    /// Replaces the active collections with a backup and stores them.
    pub async fn restore_backup(&mut self, backup: &Backup) -> Result<Skipped, SyncError> {
        self.commit(|book| Ok(backup.restore_into(book))).await
    }

    /// Adds a customer.
    pub async fn add_customer(&mut self, input: NewCustomer) -> Result<Customer, SyncError> {
        let now = Utc::now();
        self.commit(|book| book.add_customer(input, now)).await
    }

    /// Edits a customer.
    pub async fn update_customer(
        &mut self,
        id: &CustomerId,
        update: CustomerUpdate,
    ) -> Result<Customer, SyncError> {
        let now = Utc::now();
        self.commit(|book| book.update_customer(id, update, now))
            .await
    }

    /// Moves a customer and their transactions to the trash.
    pub async fn delete_customer(&mut self, id: &CustomerId) -> Result<Vec<TrashEntry>, SyncError> {
        let now = Utc::now();
        self.commit(|book| book.delete_customer(id, now)).await
    }

    /// Registers a value type.
    pub async fn add_value_type(&mut self, input: NewValueType) -> Result<ValueType, SyncError> {
        let now = Utc::now();
        self.commit(|book| book.add_value_type(input, now)).await
    }

    /// Edits a value type.
    pub async fn update_value_type(
        &mut self,
        id: &ValueTypeId,
        update: ValueTypeUpdate,
    ) -> Result<ValueType, SyncError> {
        let now = Utc::now();
        self.commit(|book| book.update_value_type(id, update, now))
            .await
    }

    /// Moves a value type to the trash.
    pub async fn delete_value_type(&mut self, id: &ValueTypeId) -> Result<TrashEntry, SyncError> {
        let now = Utc::now();
        self.commit(|book| book.delete_value_type(id, now)).await
    }

    /// Records a deposit movement.
    pub async fn record_deposit(
        &mut self,
        draft: NewDeposit,
    ) -> Result<DepositTransaction, SyncError> {
        let now = Utc::now();
        self.commit(|book| book.record_deposit(draft, now)).await
    }

    /// Records a loan movement.
    pub async fn record_loan(&mut self, draft: NewLoan) -> Result<LoanTransaction, SyncError> {
        let now = Utc::now();
        self.commit(|book| book.record_loan(draft, now)).await
    }

    /// Edits a deposit movement.
    pub async fn update_deposit(
        &mut self,
        id: &DepositId,
        update: TransactionUpdate,
    ) -> Result<DepositTransaction, SyncError> {
        let now = Utc::now();
        self.commit(|book| book.update_deposit(id, update, now))
            .await
    }

    /// Edits a loan movement.
    pub async fn update_loan(
        &mut self,
        id: &LoanId,
        update: TransactionUpdate,
    ) -> Result<LoanTransaction, SyncError> {
        let now = Utc::now();
        self.commit(|book| book.update_loan(id, update, now)).await
    }

    /// Moves a deposit movement to the trash.
    pub async fn delete_deposit(&mut self, id: &DepositId) -> Result<TrashEntry, SyncError> {
        let now = Utc::now();
        self.commit(|book| book.delete_deposit(id, now)).await
    }

    /// Moves a loan movement to the trash.
    pub async fn delete_loan(&mut self, id: &LoanId) -> Result<TrashEntry, SyncError> {
        let now = Utc::now();
        self.commit(|book| book.delete_loan(id, now)).await
    }

    /// Puts a trashed record back.
    pub async fn restore_from_trash(&mut self, id: &TrashEntryId) -> Result<TrashEntry, SyncError> {
        self.commit(|book| book.restore_from_trash(id)).await
    }

    /// Deletes a trash entry for good.
    pub async fn permanently_delete(&mut self, id: &TrashEntryId) -> Result<TrashEntry, SyncError> {
        self.commit(|book| book.permanently_delete(id)).await
    }

    /// Removes expired trash entries. Writes nothing when none expired.
    pub async fn sweep_expired(&mut self) -> Result<usize, SyncError> {
        let now = Utc::now();
        self.commit(|book| Ok(book.sweep_expired(now))).await
    }

    /// Deletes every trash entry.
    pub async fn empty_trash(&mut self) -> Result<usize, SyncError> {
        self.commit(|book| Ok(book.empty_trash())).await
    }

    async fn load(&self, user: &UserId) -> Result<Loaded, SyncError> {
        let mut documents = Documents::new();
        for collection in Collection::ALL {
            if let Some(document) = self.store.read(user, collection).await? {
                documents.insert(collection, document);
            }
        }
        Ok(Book::from_documents(&documents, self.policy))
    }

    /// Applies `mutate` to a copy of the snapshot, stores the touched
    /// collections, then commits the copy and notifies subscribers.
    async fn commit<T, F>(&mut self, mutate: F) -> Result<T, SyncError>
    where
        F: FnOnce(&mut Book) -> Result<Applied<T>, LedgerError>,
    {
        let session = self.session.as_ref().ok_or(SyncError::NotConnected)?;
        let mut book = session.book.clone();
        let Applied { value, touched } = mutate(&mut book)?;
        if touched.is_empty() {
            return Ok(value);
        }

        let documents = book.to_documents(&touched)?;
        for (collection, document) in documents {
            if let Err(err) = self.store.replace(&session.user, collection, document).await {
                tracing::warn!(
                    user_id = %session.user,
                    collection = %collection,
                    error = %err,
                    "collection write failed, keeping previous snapshot"
                );
                return Err(err);
            }
        }
        tracing::debug!(user_id = %session.user, touched = ?touched, "mutation stored");

        if let Some(session) = self.session.as_mut() {
            session.book = book;
        }
        for collection in touched {
            // No receivers is fine.
            let _ = self.changes.send(collection);
        }
        Ok(value)
    }
}
