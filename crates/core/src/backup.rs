//! Full-book backup export and import.
//!
//! A backup is a single JSON file holding the four active collections as
//! arrays. The trash is not part of it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::book::{Applied, Book, Collection};
use crate::ledger::Rejected;

/// Backup file format version written by this crate.
pub const BACKUP_VERSION: &str = "2.0";

/// Collections carried by a backup.
const BACKED_UP: [Collection; 4] = [
    Collection::Customers,
    Collection::Deposits,
    Collection::Loans,
    Collection::ValueTypes,
];

/// Collection payload of a backup. Each field is an array of records; a
/// collection missing from the file is left alone on restore.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupData {
    /// Customers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customers: Option<Value>,
    /// Deposits.
    #[serde(default, alias = "emanets", skip_serializing_if = "Option::is_none")]
    pub deposits: Option<Value>,
    /// Loans.
    #[serde(default, alias = "debts", skip_serializing_if = "Option::is_none")]
    pub loans: Option<Value>,
    /// Value types.
    #[serde(default, alias = "emanetTypes", skip_serializing_if = "Option::is_none")]
    pub value_types: Option<Value>,
}

impl BackupData {
    fn get(&self, collection: Collection) -> Option<&Value> {
        match collection {
            Collection::Customers => self.customers.as_ref(),
            Collection::Deposits => self.deposits.as_ref(),
            Collection::Loans => self.loans.as_ref(),
            Collection::ValueTypes => self.value_types.as_ref(),
            Collection::Trash => None,
        }
    }
}

/// A backup file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Backup {
    /// Format version.
    pub version: String,
    /// When the backup was taken.
    #[serde(alias = "backupDate")]
    pub backup_date: DateTime<Utc>,
    /// The collections.
    pub data: BackupData,
}

impl Backup {
    /// Takes a backup of the active collections.
    ///
    /// # Errors
    ///
    /// Returns an error if a record fails to serialize.
    pub fn from_book(book: &Book, now: DateTime<Utc>) -> Result<Self, serde_json::Error> {
        let array = |value: Value| match value {
            Value::Object(map) => Value::Array(map.into_iter().map(|(_, v)| v).collect()),
            other => other,
        };
        Ok(Self {
            version: BACKUP_VERSION.to_string(),
            backup_date: now,
            data: BackupData {
                customers: Some(array(book.to_document(Collection::Customers)?)),
                deposits: Some(array(book.to_document(Collection::Deposits)?)),
                loans: Some(array(book.to_document(Collection::Loans)?)),
                value_types: Some(array(book.to_document(Collection::ValueTypes)?)),
            },
        })
    }

    /// Parses a backup file.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a backup document.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Renders the backup as indented JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Replaces the book's active collections with the backup contents.
    ///
    /// Only collections present in the file are replaced and reported as
    /// touched. The trash is left alone. Records that fail ingestion are
    /// returned and kept as unreadable.
    pub fn restore_into(&self, book: &mut Book) -> Applied<Vec<(Collection, Rejected)>> {
        if self.version != BACKUP_VERSION {
            tracing::warn!(version = %self.version, "restoring backup of a different format version");
        }
        let mut rejected = Vec::new();
        let mut restored = Vec::new();
        for collection in BACKED_UP {
            let Some(document) = self.data.get(collection) else {
                continue;
            };
            let skipped = book.replace_collection(collection, Some(document));
            rejected.extend(skipped.into_iter().map(|r| (collection, r)));
            restored.push(collection);
        }
        tracing::info!(
            backup_date = %self.backup_date,
            collections = restored.len(),
            rejected = rejected.len(),
            "backup restored"
        );
        Applied::new(rejected, restored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::book::BookPolicy;
    use crate::ledger::{DepositDirection, LoanDirection, NewCustomer, NewDeposit, NewLoan};
    use crate::registry::{NewValueType, Unit};
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 2, 1, 0, 0, 0).single().unwrap_or_default()
    }

    fn sample_book() -> Book {
        let mut book = Book::new(BookPolicy::default());
        let gold = book
            .add_value_type(
                NewValueType {
                    id: None,
                    name: "Gram Altın".to_string(),
                    symbol: "GA".to_string(),
                    unit: Unit::Weight,
                    color: None,
                    description: None,
                },
                now(),
            )
            .unwrap()
            .value
            .id;
        let customer = book
            .add_customer(
                NewCustomer {
                    first_name: "Mehmet".to_string(),
                    last_name: "Kaya".to_string(),
                    ..NewCustomer::default()
                },
                now(),
            )
            .unwrap()
            .value
            .id;
        book.record_deposit(
            NewDeposit::new(customer, gold, DepositDirection::In, dec!(3.5)),
            now(),
        )
        .unwrap();
        book
    }

    #[test]
    fn test_backup_shape() {
        let backup = Backup::from_book(&sample_book(), now()).unwrap();
        let value = serde_json::to_value(&backup).unwrap();
        assert_eq!(value["version"], "2.0");
        assert!(value["backup_date"].is_string());
        assert_eq!(value["data"]["customers"].as_array().map(Vec::len), Some(1));
        assert_eq!(value["data"]["valueTypes"].as_array().map(Vec::len), Some(1));
    }

    #[test]
    fn test_backup_restores_into_empty_book() {
        let original = sample_book();
        let text = Backup::from_book(&original, now())
            .unwrap()
            .to_json_pretty()
            .unwrap();

        let mut restored = Book::new(BookPolicy::default());
        let applied = Backup::from_json(&text).unwrap().restore_into(&mut restored);
        assert!(applied.value.is_empty());
        assert!(!applied.touched.contains(&Collection::Trash));
        assert_eq!(restored, original);
    }

    #[test]
    fn test_restore_keeps_trash() {
        let mut book = sample_book();
        let customer = book.customers().next().map(|c| c.id.clone()).unwrap();
        let backup = Backup::from_book(&book, now()).unwrap();
        book.delete_customer(&customer, now()).unwrap();
        assert_eq!(book.trash().len(), 2);

        backup.restore_into(&mut book);
        assert!(book.customer(&customer).is_found());
        assert_eq!(book.trash().len(), 2);
    }

    #[test]
    fn test_reads_legacy_backup_keys() {
        let text = r#"{
            "version": "2.0",
            "backup_date": "2025-01-20T10:00:00.000Z",
            "data": {
                "customers": [{"id": "m1", "ad": "Ali", "soyad": "Veli"}],
                "emanets": [{"id": "e1", "musteriId": "m1", "turId": "t1", "miktar": "2", "islemTipi": "emanet-birak"}],
                "debts": [],
                "emanetTypes": [{"id": "t1", "ad": "Çeyrek", "takipSekli": "adet"}],
                "settings": {}
            }
        }"#;
        let mut book = Book::new(BookPolicy::default());
        let applied = Backup::from_json(text).unwrap().restore_into(&mut book);
        assert!(applied.value.is_empty());
        assert_eq!(book.customers().count(), 1);
        assert_eq!(book.deposits().count(), 1);
        assert_eq!(book.value_types().by_unit(Unit::Count).count(), 1);
    }

    #[test]
    fn test_partial_backup_leaves_missing_collections_alone() {
        let mut book = sample_book();
        let customer = book.customers().next().map(|c| c.id.clone()).unwrap();
        let gold = book.value_types().iter().next().map(|t| t.id.clone()).unwrap();
        book.record_loan(
            NewLoan::new(customer, gold, LoanDirection::Out, dec!(1)),
            now(),
        )
        .unwrap();

        let text = r#"{
            "version": "2.0",
            "backup_date": "2025-01-20T10:00:00Z",
            "data": {"customers": [{"id": "m9", "ad": "Ayşe", "soyad": "Çelik"}]}
        }"#;
        let applied = Backup::from_json(text).unwrap().restore_into(&mut book);

        assert_eq!(
            applied.touched.into_iter().collect::<Vec<_>>(),
            [Collection::Customers]
        );
        assert_eq!(book.customers().count(), 1);
        assert_eq!(book.loans().count(), 1);
        assert_eq!(book.deposits().count(), 1);
    }
}
