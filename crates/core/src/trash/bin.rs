//! The trash collection.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use emanet_shared::TrashEntryId;
use serde::{Deserialize, Serialize};

use super::error::TrashError;
use super::types::{EntityKind, RetentionPolicy, TrashEntry, TrashPayload};

/// Trash entries keyed by their trash-local id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrashBin {
    entries: BTreeMap<TrashEntryId, TrashEntry>,
}

impl TrashBin {
    /// Creates an empty bin.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a deleted record and returns its new entry.
    ///
    /// The entry gets a fresh id, so the same record can be trashed again
    /// later without colliding with an older entry.
    pub fn move_to_trash(
        &mut self,
        payload: TrashPayload,
        policy: RetentionPolicy,
        now: DateTime<Utc>,
    ) -> TrashEntry {
        let entry = TrashEntry {
            id: TrashEntryId::new(),
            original_id: payload.original_id().to_string(),
            payload,
            deleted_at: now,
            expires_at: policy.expires_at(now),
        };
        tracing::debug!(
            trash_id = %entry.id,
            original_id = %entry.original_id,
            kind = ?entry.kind(),
            "record moved to trash"
        );
        self.entries.insert(entry.id.clone(), entry.clone());
        entry
    }

    /// Looks up an entry.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the id is unknown.
    pub fn get(&self, id: &TrashEntryId) -> Result<&TrashEntry, TrashError> {
        self.entries
            .get(id)
            .ok_or_else(|| TrashError::NotFound(id.clone()))
    }

    /// Removes an entry without touching the origin collection.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the id is unknown.
    pub fn permanently_delete(&mut self, id: &TrashEntryId) -> Result<TrashEntry, TrashError> {
        self.entries
            .remove(id)
            .ok_or_else(|| TrashError::NotFound(id.clone()))
    }

    /// Removes every entry whose expiry time is before `now`. Returns how many
    /// were removed.
    pub fn sweep_expired(&mut self, now: DateTime<Utc>) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired(now));
        let removed = before - self.entries.len();
        if removed > 0 {
            tracing::info!(removed, "expired trash entries swept");
        }
        removed
    }

    /// Removes every entry. Returns how many were removed.
    pub fn empty(&mut self) -> usize {
        let removed = self.entries.len();
        self.entries.clear();
        removed
    }

    /// Inserts an already built entry, e.g. one read back from the store.
    pub fn insert(&mut self, entry: TrashEntry) -> Option<TrashEntry> {
        self.entries.insert(entry.id.clone(), entry)
    }

    /// Iterates entries in id order.
    pub fn iter(&self) -> impl Iterator<Item = &TrashEntry> {
        self.entries.values()
    }

    /// Entries still restorable at `now`.
    pub fn active(&self, now: DateTime<Utc>) -> impl Iterator<Item = &TrashEntry> {
        self.entries.values().filter(move |e| !e.is_expired(now))
    }

    /// Entries past their expiry at `now`, awaiting permanent deletion.
    pub fn expired(&self, now: DateTime<Utc>) -> impl Iterator<Item = &TrashEntry> {
        self.entries.values().filter(move |e| e.is_expired(now))
    }

    /// Entries holding records of the given kind.
    pub fn of_kind(&self, kind: EntityKind) -> impl Iterator<Item = &TrashEntry> {
        self.entries.values().filter(move |e| e.kind() == kind)
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the bin is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<TrashEntry> for TrashBin {
    fn from_iter<I: IntoIterator<Item = TrashEntry>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|e| (e.id.clone(), e)).collect(),
        }
    }
}
