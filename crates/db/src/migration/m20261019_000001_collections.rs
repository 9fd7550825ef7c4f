//! Collections migration.
//!
//! Creates the per-user document table backing every ledger collection.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(COLLECTIONS_SQL).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared("DROP TABLE IF EXISTS collections;")
            .await?;
        Ok(())
    }
}

const COLLECTIONS_SQL: &str = r"
-- One JSON document (id -> record) per user and collection
CREATE TABLE IF NOT EXISTS collections (
    user_id TEXT NOT NULL,
    name TEXT NOT NULL CHECK (name IN ('customers', 'deposits', 'loans', 'valueTypes', 'trash')),
    document TEXT NOT NULL DEFAULT '{}',
    updated_at TEXT NOT NULL,
    PRIMARY KEY (user_id, name)
);
";
