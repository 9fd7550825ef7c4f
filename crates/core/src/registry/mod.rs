//! Unit/Type registry.
//!
//! Defines the trackable value types (a gold alloy, silver, cash, ...) and the
//! unit each one is measured in. The `id` of a [`ValueType`] is the join key
//! every transaction uses; resolving it goes through [`Registry::lookup`],
//! which returns a [`Lookup`] so that callers handle orphaned references
//! explicitly.

pub mod lookup;
pub mod types;

pub use lookup::Lookup;
pub use types::{NewValueType, Registry, Unit, ValueType, ValueTypeUpdate};
