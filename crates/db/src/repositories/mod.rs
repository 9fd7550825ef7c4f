//! Repository layer for database operations.

mod collection;

pub use collection::CollectionRepository;
