//! Collection repository for database operations.

use async_trait::async_trait;
use chrono::Utc;
use emanet_core::Collection;
use emanet_shared::UserId;
use sea_orm::sea_query::OnConflict;
use sea_orm::{DatabaseConnection, DbErr, EntityTrait, Set};
use serde_json::Value;

use crate::entities::collections;
use crate::error::SyncError;
use crate::store::DocumentStore;

/// Repository for per-user collection documents.
#[derive(Debug, Clone)]
pub struct CollectionRepository {
    db: DatabaseConnection,
}

impl CollectionRepository {
    /// Creates a new collection repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds the stored row for a user's collection.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find(
        &self,
        user: &UserId,
        collection: Collection,
    ) -> Result<Option<collections::Model>, DbErr> {
        collections::Entity::find_by_id((user.to_string(), collection.name().to_string()))
            .one(&self.db)
            .await
    }

    /// Inserts or overwrites a user's collection document.
    ///
    /// # Errors
    ///
    /// Returns an error if the database write fails.
    pub async fn upsert(
        &self,
        user: &UserId,
        collection: Collection,
        document: String,
    ) -> Result<(), DbErr> {
        let row = collections::ActiveModel {
            user_id: Set(user.to_string()),
            name: Set(collection.name().to_string()),
            document: Set(document),
            updated_at: Set(Utc::now()),
        };

        collections::Entity::insert(row)
            .on_conflict(
                OnConflict::columns([collections::Column::UserId, collections::Column::Name])
                    .update_columns([
                        collections::Column::Document,
                        collections::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for CollectionRepository {
    async fn read(
        &self,
        user: &UserId,
        collection: Collection,
    ) -> Result<Option<Value>, SyncError> {
        let Some(row) = self.find(user, collection).await? else {
            return Ok(None);
        };
        Ok(Some(serde_json::from_str(&row.document)?))
    }

    async fn replace(
        &self,
        user: &UserId,
        collection: Collection,
        document: Value,
    ) -> Result<(), SyncError> {
        let text = serde_json::to_string(&document)?;
        self.upsert(user, collection, text).await?;
        tracing::debug!(user_id = %user, collection = %collection, "collection replaced");
        Ok(())
    }
}
