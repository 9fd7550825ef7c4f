//! Soft-delete store with time-boxed retention.
//!
//! Deleting a record moves it here as a [`TrashEntry`] carrying the full
//! record. An entry stays restorable until it expires
//! ([`RetentionPolicy`], 30 days by default) and is then removed by an
//! explicit permanent delete or by the opportunistic expiry sweep. There is
//! no background scheduler.

pub mod bin;
pub mod error;
pub mod types;


pub use bin::TrashBin;
pub use error::TrashError;
pub use types::{EntityKind, RetentionPolicy, TrashEntry, TrashPayload};
