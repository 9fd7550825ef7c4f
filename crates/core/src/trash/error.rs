//! Trash lifecycle errors.

use emanet_shared::TrashEntryId;
use thiserror::Error;

/// Errors from trash operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrashError {
    /// No trash entry with this id.
    #[error("Trash entry not found: {0}")]
    NotFound(TrashEntryId),

    /// The payload cannot go back into its collection; the entry is kept.
    #[error("Cannot restore trash entry {entry}: {reason}")]
    RestoreConflict {
        /// Trash entry id.
        entry: TrashEntryId,
        /// Why the origin collection refused the record.
        reason: String,
    },
}

impl TrashError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "TRASH_ENTRY_NOT_FOUND",
            Self::RestoreConflict { .. } => "RESTORE_CONFLICT",
        }
    }
}
