//! Typed IDs for type-safe entity references.
//!
//! Using typed IDs prevents accidentally passing a `CustomerId` where a `ValueTypeId` is expected.
//!
//! IDs are string-backed: freshly generated ones are UUID v7 text, but records written by
//! older clients carry arbitrary keys (`"1712345678901"`, `"demo-musteri-1"`) and must load
//! unchanged.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Macro to generate typed ID wrappers.
macro_rules! typed_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Creates a new random ID using UUID v7 (time-ordered).
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::now_v7().to_string())
            }

            /// Wraps an existing key without validation.
            #[must_use]
            pub fn from_key(key: impl Into<String>) -> Self {
                Self(key.into())
            }

            /// Returns the key as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Returns the inner key.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(key: &str) -> Self {
                Self(key.to_string())
            }
        }

        impl From<String> for $name {
            fn from(key: String) -> Self {
                Self(key)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

typed_id!(UserId, "Identifier of the authenticated principal owning a book.");
typed_id!(CustomerId, "Unique identifier for a customer.");
typed_id!(ValueTypeId, "Unique identifier for a trackable value type.");
typed_id!(DepositId, "Unique identifier for a deposit (emanet) transaction.");
typed_id!(LoanId, "Unique identifier for a loan (borç) transaction.");
typed_id!(TrashEntryId, "Unique identifier for a trash entry, distinct from the trashed entity's id.");
