//! Persistence layer for the emanet ledger.
//!
//! This crate provides:
//! - The `collections` table holding one JSON document per user and collection
//! - The [`DocumentStore`] seam with SQLite and in-memory implementations
//! - [`SyncManager`], which owns the in-memory book of the connected user
//! - Database migrations

pub mod entities;
pub mod error;
pub mod migration;
pub mod repositories;
pub mod store;
pub mod sync;

pub use error::SyncError;
pub use repositories::CollectionRepository;
pub use store::{DocumentStore, MemoryStore};
pub use sync::SyncManager;

use std::time::Duration;

use emanet_shared::DatabaseConfig;
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use sea_orm_migration::MigratorTrait;

/// Establishes a pooled connection to the configured database.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(config: &DatabaseConfig) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(config.url.clone());
    options
        .max_connections(config.max_connections)
        .connect_timeout(Duration::from_secs(10))
        .sqlx_logging(false);
    Database::connect(options).await
}

/// Applies every pending migration.
///
/// # Errors
///
/// Returns an error if a migration fails.
pub async fn migrate(db: &DatabaseConnection) -> Result<(), DbErr> {
    migration::Migrator::up(db, None).await
}
