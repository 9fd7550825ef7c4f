//! Sync errors.

use emanet_core::LedgerError;
use sea_orm::DbErr;
use thiserror::Error;

/// Errors raised by the sync layer.
#[derive(Debug, Error)]
pub enum SyncError {
    /// No user is connected.
    #[error("No user is connected")]
    NotConnected,

    /// The store rejected a read or write.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    /// A document could not be encoded or decoded.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The mutation was refused before any write.
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

impl SyncError {
    /// Returns the error code for client responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NotConnected => "NOT_CONNECTED",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Serialization(_) => "SERIALIZATION_ERROR",
            Self::Ledger(err) => err.error_code(),
        }
    }

    /// True when the caller can fix the input and retry. Nothing was written.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Ledger(err) if err.is_validation())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use emanet_core::TrashError;
    use emanet_shared::TrashEntryId;

    #[test]
    fn test_error_codes() {
        assert_eq!(SyncError::NotConnected.error_code(), "NOT_CONNECTED");
        assert_eq!(
            SyncError::Database(DbErr::Custom("down".into())).error_code(),
            "DATABASE_ERROR"
        );
        let missing = SyncError::from(LedgerError::from(TrashError::NotFound(
            TrashEntryId::from("t1"),
        )));
        assert_eq!(missing.error_code(), "TRASH_ENTRY_NOT_FOUND");
    }

    #[test]
    fn test_validation_only_for_ledger_input() {
        assert!(SyncError::Ledger(LedgerError::NonPositiveAmount).is_validation());
        assert!(!SyncError::NotConnected.is_validation());
        assert!(!SyncError::Database(DbErr::Custom("down".into())).is_validation());
    }
}
