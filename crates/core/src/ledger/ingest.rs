//! Ingestion of persisted collection documents into typed records.
//!
//! The store holds each collection as a JSON object mapping id to record, and
//! older clients wrote loosely shaped records: Turkish field names, numeric
//! ids, amounts as strings, free-form direction labels. This boundary is where
//! that looseness ends:
//!
//! - records without an id, customer or value type are rejected;
//! - unknown direction labels are rejected rather than folded as a no-op;
//! - an amount that is missing or not a number is read as `0` and kept.
//!
//! Rejections are reported alongside the accepted records, never as a failure
//! of the whole collection.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use super::types::{DepositDirection, DepositTransaction, LoanDirection, LoanTransaction};

/// Why a raw record was not accepted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IngestError {
    /// Direction label outside the closed set.
    #[error("Unknown direction: {0}")]
    UnknownDirection(String),

    /// A required field is absent or empty.
    #[error("Missing field: {0}")]
    MissingField(&'static str),

    /// The record does not have the expected shape.
    #[error("Malformed record: {0}")]
    Malformed(String),
}

impl IngestError {
    /// Returns the error code for diagnostics.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownDirection(_) => "UNKNOWN_DIRECTION",
            Self::MissingField(_) => "MISSING_FIELD",
            Self::Malformed(_) => "MALFORMED_RECORD",
        }
    }
}

/// A record that was skipped during ingestion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejected {
    /// Key of the record in its collection.
    pub key: String,
    /// Reason.
    pub error: IngestError,
    /// The record as stored, kept so it can be written back untouched.
    pub raw: Value,
}

/// Accepted records plus the ones that were skipped.
#[derive(Debug, Clone)]
pub struct Ingested<T> {
    /// Records that passed the boundary.
    pub records: Vec<T>,
    /// Records that were skipped.
    pub rejected: Vec<Rejected>,
}

impl<T> Default for Ingested<T> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            rejected: Vec::new(),
        }
    }
}

/// A deposit or loan as found in the store, before any validation.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTransaction {
    /// Record id (string or number).
    #[serde(default)]
    pub id: Option<Value>,
    /// Owning customer id.
    #[serde(default, alias = "musteriId")]
    pub customer_id: Option<Value>,
    /// Value type id.
    #[serde(default, alias = "turId")]
    pub value_type_id: Option<Value>,
    /// Direction label.
    #[serde(default, alias = "islemTipi")]
    pub direction: Option<String>,
    /// Amount as number or string.
    #[serde(default, alias = "miktar")]
    pub amount: Option<Value>,
    /// Description.
    #[serde(default, alias = "aciklama")]
    pub description: Option<String>,
    /// Movement time as RFC 3339 text or epoch milliseconds.
    #[serde(default, alias = "tarih")]
    pub timestamp: Option<Value>,
    /// Creation time.
    #[serde(default)]
    pub created_at: Option<Value>,
    /// Last update time.
    #[serde(default)]
    pub updated_at: Option<Value>,
}

/// Fields shared by both transaction kinds after decoding.
struct Decoded<D> {
    id: String,
    customer_id: String,
    value_type_id: String,
    direction: D,
    amount: Decimal,
    description: Option<String>,
    timestamp: DateTime<Utc>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Reads a decimal from a JSON number or numeric string.
///
/// Returns `None` for anything else; callers decide what a missing amount
/// means.
#[must_use]
pub fn parse_amount(value: Option<&Value>) -> Option<Decimal> {
    match value? {
        Value::Number(n) => {
            let text = n.to_string();
            Decimal::from_str(&text)
                .or_else(|_| Decimal::from_scientific(&text))
                .ok()
        }
        Value::String(s) => {
            let trimmed = s.trim();
            Decimal::from_str(trimmed)
                .or_else(|_| Decimal::from_str(&trimmed.replace(',', ".")))
                .ok()
        }
        _ => None,
    }
}

/// Reads a timestamp from RFC 3339 text or epoch milliseconds.
#[must_use]
pub fn parse_timestamp(value: Option<&Value>) -> Option<DateTime<Utc>> {
    match value? {
        Value::String(s) => DateTime::parse_from_rfc3339(s.trim())
            .ok()
            .map(|dt| dt.with_timezone(&Utc)),
        Value::Number(n) => n.as_i64().and_then(DateTime::from_timestamp_millis),
        _ => None,
    }
}

fn value_as_key(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Iterates `(key, record)` pairs of a collection document.
///
/// Accepts the persisted object form as well as plain arrays (backups, older
/// exports). `null` or an absent document is an empty collection.
fn entries(document: Option<&Value>) -> Vec<(String, &Value)> {
    match document {
        Some(Value::Object(map)) => map.iter().map(|(k, v)| (k.clone(), v)).collect(),
        Some(Value::Array(items)) => items
            .iter()
            .enumerate()
            .map(|(i, v)| {
                let key = value_as_key(v.get("id")).unwrap_or_else(|| i.to_string());
                (key, v)
            })
            .collect(),
        _ => Vec::new(),
    }
}

fn decode<D>(key: &str, record: &Value) -> Result<Decoded<D>, IngestError>
where
    D: FromStr<Err = IngestError>,
{
    let raw = RawTransaction::deserialize(record)
        .map_err(|err| IngestError::Malformed(err.to_string()))?;

    let id = value_as_key(raw.id.as_ref()).unwrap_or_else(|| key.to_string());
    let customer_id =
        value_as_key(raw.customer_id.as_ref()).ok_or(IngestError::MissingField("customerId"))?;
    let value_type_id = value_as_key(raw.value_type_id.as_ref())
        .ok_or(IngestError::MissingField("valueTypeId"))?;
    let direction = raw
        .direction
        .as_deref()
        .ok_or(IngestError::MissingField("direction"))?
        .parse::<D>()?;

    let amount = parse_amount(raw.amount.as_ref()).unwrap_or_else(|| {
        tracing::warn!(key, "non-numeric amount read as zero");
        Decimal::ZERO
    });

    let created_at = parse_timestamp(raw.created_at.as_ref());
    let timestamp = parse_timestamp(raw.timestamp.as_ref())
        .or(created_at)
        .unwrap_or_default();
    let created_at = created_at.unwrap_or(timestamp);
    let updated_at = parse_timestamp(raw.updated_at.as_ref()).unwrap_or(created_at);

    Ok(Decoded {
        id,
        customer_id,
        value_type_id,
        direction,
        amount,
        description: raw.description.filter(|d| !d.trim().is_empty()),
        timestamp,
        created_at,
        updated_at,
    })
}

fn ingest_with<D, T, F>(document: Option<&Value>, collection: &str, build: F) -> Ingested<T>
where
    D: FromStr<Err = IngestError>,
    F: Fn(Decoded<D>) -> T,
{
    let mut out = Ingested::default();
    for (key, record) in entries(document) {
        match decode::<D>(&key, record) {
            Ok(decoded) => out.records.push(build(decoded)),
            Err(error) => {
                tracing::warn!(collection, key = %key, %error, "skipping malformed record");
                out.rejected.push(Rejected {
                    key,
                    error,
                    raw: record.clone(),
                });
            }
        }
    }
    tracing::debug!(
        collection,
        accepted = out.records.len(),
        rejected = out.rejected.len(),
        "collection ingested"
    );
    out
}

/// Decodes the deposits collection.
#[must_use]
pub fn ingest_deposits(document: Option<&Value>) -> Ingested<DepositTransaction> {
    ingest_with::<DepositDirection, _, _>(document, "deposits", |d| DepositTransaction {
        id: d.id.into(),
        customer_id: d.customer_id.into(),
        value_type_id: d.value_type_id.into(),
        direction: d.direction,
        amount: d.amount,
        description: d.description,
        timestamp: d.timestamp,
        created_at: d.created_at,
        updated_at: d.updated_at,
    })
}

/// Decodes the loans collection.
#[must_use]
pub fn ingest_loans(document: Option<&Value>) -> Ingested<LoanTransaction> {
    ingest_with::<LoanDirection, _, _>(document, "loans", |d| LoanTransaction {
        id: d.id.into(),
        customer_id: d.customer_id.into(),
        value_type_id: d.value_type_id.into(),
        direction: d.direction,
        amount: d.amount,
        description: d.description,
        timestamp: d.timestamp,
        created_at: d.created_at,
        updated_at: d.updated_at,
    })
}

/// Decodes a collection of strictly shaped records (customers, value types,
/// trash entries). A record missing its `id` takes the map key.
#[must_use]
pub fn ingest_records<T: DeserializeOwned>(
    document: Option<&Value>,
    collection: &str,
) -> Ingested<T> {
    let mut out = Ingested::default();
    for (key, raw) in entries(document) {
        let mut record = raw.clone();
        if let Value::Object(map) = &mut record
            && !map.contains_key("id")
        {
            map.insert("id".to_string(), Value::String(key.clone()));
        }
        match serde_json::from_value::<T>(record) {
            Ok(value) => out.records.push(value),
            Err(err) => {
                let error = IngestError::Malformed(err.to_string());
                tracing::warn!(collection, key = %key, %error, "skipping malformed record");
                out.rejected.push(Rejected {
                    key,
                    error,
                    raw: raw.clone(),
                });
            }
        }
    }
    out
}
