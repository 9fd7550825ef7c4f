//! `SeaORM` entities.

pub mod collections;
