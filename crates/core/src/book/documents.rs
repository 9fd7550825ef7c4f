//! Conversion between a [`Book`] and its stored collection documents.
//!
//! Each collection is stored as one JSON object mapping record id to record.

use std::collections::BTreeMap;

use serde_json::Value;

use super::{Book, BookPolicy, Collection, Touched};
use crate::ledger::{Customer, Rejected, ingest_deposits, ingest_loans, ingest_records};
use crate::registry::ValueType;
use crate::trash::TrashEntry;

/// Stored documents keyed by collection. A missing key is an empty collection.
pub type Documents = BTreeMap<Collection, Value>;

/// A book rebuilt from documents, with the records that were skipped.
#[derive(Debug, Clone)]
pub struct Loaded {
    /// The rebuilt book.
    pub book: Book,
    /// Skipped records per collection.
    pub rejected: Vec<(Collection, Rejected)>,
}

impl Book {
    /// Rebuilds a book from stored documents.
    #[must_use]
    pub fn from_documents(documents: &Documents, policy: BookPolicy) -> Loaded {
        let mut book = Self::new(policy);
        let mut rejected = Vec::new();
        for collection in Collection::ALL {
            let skipped = book.replace_collection(collection, documents.get(&collection));
            rejected.extend(skipped.into_iter().map(|r| (collection, r)));
        }
        Loaded { book, rejected }
    }

    /// Replaces one collection with the contents of a stored document.
    ///
    /// Used when a change notification delivers a fresh copy of a single
    /// collection. Returns the skipped records. Skipped records stay in the
    /// book as unreadable and are written back unchanged by
    /// [`to_document`](Self::to_document).
    pub fn replace_collection(
        &mut self,
        collection: Collection,
        document: Option<&Value>,
    ) -> Vec<Rejected> {
        let rejected = self.replace_records(collection, document);
        let unreadable: BTreeMap<String, Value> = rejected
            .iter()
            .map(|r| (r.key.clone(), r.raw.clone()))
            .collect();
        if unreadable.is_empty() {
            self.unreadable.remove(&collection);
        } else {
            self.unreadable.insert(collection, unreadable);
        }
        rejected
    }

    /// Stored records of a collection that could not be read, by key.
    pub fn unreadable(&self, collection: Collection) -> impl Iterator<Item = (&str, &Value)> {
        self.unreadable
            .get(&collection)
            .into_iter()
            .flatten()
            .map(|(key, raw)| (key.as_str(), raw))
    }

    fn replace_records(&mut self, collection: Collection, document: Option<&Value>) -> Vec<Rejected> {
        let name = collection.name();
        match collection {
            Collection::Customers => {
                let ingested = ingest_records::<Customer>(document, name);
                self.customers = ingested
                    .records
                    .into_iter()
                    .map(|c| (c.id.clone(), c))
                    .collect();
                ingested.rejected
            }
            Collection::Deposits => {
                let ingested = ingest_deposits(document);
                self.deposits = ingested
                    .records
                    .into_iter()
                    .map(|d| (d.id.clone(), d))
                    .collect();
                ingested.rejected
            }
            Collection::Loans => {
                let ingested = ingest_loans(document);
                self.loans = ingested
                    .records
                    .into_iter()
                    .map(|l| (l.id.clone(), l))
                    .collect();
                ingested.rejected
            }
            Collection::ValueTypes => {
                let ingested = ingest_records::<ValueType>(document, name);
                self.value_types = ingested.records.into_iter().collect();
                ingested.rejected
            }
            Collection::Trash => {
                let ingested = ingest_records::<TrashEntry>(document, name);
                self.trash = ingested.records.into_iter().collect();
                ingested.rejected
            }
        }
    }

    /// Serializes one collection as its stored document, unreadable records
    /// included. A readable record wins over an unreadable one with the same key.
    ///
    /// # Errors
    ///
    /// Returns an error if a record fails to serialize.
    pub fn to_document(&self, collection: Collection) -> Result<Value, serde_json::Error> {
        let mut document = match collection {
            Collection::Customers => serde_json::to_value(&self.customers),
            Collection::Deposits => serde_json::to_value(&self.deposits),
            Collection::Loans => serde_json::to_value(&self.loans),
            Collection::ValueTypes => serde_json::to_value(&self.value_types),
            Collection::Trash => serde_json::to_value(&self.trash),
        }?;
        if let (Value::Object(map), Some(unreadable)) =
            (&mut document, self.unreadable.get(&collection))
        {
            for (key, raw) in unreadable {
                map.entry(key.clone()).or_insert_with(|| raw.clone());
            }
        }
        Ok(document)
    }

    /// Serializes the touched collections.
    ///
    /// # Errors
    ///
    /// Returns an error if a record fails to serialize.
    pub fn to_documents(&self, touched: &Touched) -> Result<Documents, serde_json::Error> {
        touched
            .iter()
            .map(|&collection| Ok((collection, self.to_document(collection)?)))
            .collect()
    }
}
