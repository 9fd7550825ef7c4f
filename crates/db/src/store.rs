//! The document store seam used by [`SyncManager`](crate::SyncManager).

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use emanet_core::Collection;
use emanet_shared::UserId;
use serde_json::Value;
use tokio::sync::RwLock;

use crate::error::SyncError;

/// Whole-collection read and replace, keyed by user.
///
/// There is no per-record patch and no version check: the last `replace`
/// for a collection wins.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Reads one collection document. `None` when it was never written.
    async fn read(&self, user: &UserId, collection: Collection)
    -> Result<Option<Value>, SyncError>;

    /// Replaces one collection document.
    async fn replace(
        &self,
        user: &UserId,
        collection: Collection,
        document: Value,
    ) -> Result<(), SyncError>;
}

/// Process-local store for tests and demo mode.
///
/// Clones share the same documents, so two managers built from clones of one
/// store behave like two sessions against the same backend.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    documents: Arc<RwLock<BTreeMap<(UserId, Collection), Value>>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored documents across all users.
    pub async fn len(&self) -> usize {
        self.documents.read().await.len()
    }

    /// True when nothing was written yet.
    pub async fn is_empty(&self) -> bool {
        self.documents.read().await.is_empty()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn read(
        &self,
        user: &UserId,
        collection: Collection,
    ) -> Result<Option<Value>, SyncError> {
        let documents = self.documents.read().await;
        Ok(documents.get(&(user.clone(), collection)).cloned())
    }

    async fn replace(
        &self,
        user: &UserId,
        collection: Collection,
        document: Value,
    ) -> Result<(), SyncError> {
        self.documents
            .write()
            .await
            .insert((user.clone(), collection), document);
        Ok(())
    }
}
