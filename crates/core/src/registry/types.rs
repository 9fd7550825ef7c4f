//! Value type records and the registry holding them.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use emanet_shared::ValueTypeId;
use serde::{Deserialize, Serialize};

use super::lookup::Lookup;

/// Unit of measure for a value type.
///
/// Older records store the Turkish labels (`gram`, `adet`, `TL`); both
/// spellings are accepted on read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    /// Weight in grams.
    #[serde(alias = "gram")]
    Weight,
    /// Item count.
    #[serde(alias = "adet")]
    Count,
    /// Money in the configured currency.
    #[serde(alias = "TL", alias = "tl")]
    Currency,
}

impl Unit {
    /// Display suffix for amounts of this unit.
    #[must_use]
    pub fn suffix<'a>(&self, currency_code: &'a str) -> &'a str {
        match self {
            Self::Weight => "gram",
            Self::Count => "adet",
            Self::Currency => currency_code,
        }
    }
}

/// A trackable value type (e.g. 22 carat gold, quarter coins, cash).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueType {
    /// Join key referenced by transactions.
    pub id: ValueTypeId,
    /// Display name.
    #[serde(alias = "ad")]
    pub name: String,
    /// Short symbol.
    #[serde(default)]
    pub symbol: String,
    /// Unit of measure. Immutable once transactions reference the type.
    #[serde(alias = "takipSekli", alias = "birim")]
    pub unit: Unit,
    /// Display color.
    #[serde(default, alias = "renk")]
    pub color: Option<String>,
    /// Free-form description.
    #[serde(default, alias = "aciklama")]
    pub description: Option<String>,
    /// Creation timestamp.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// Last update timestamp.
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Input for registering a value type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewValueType {
    /// Preset id, e.g. when restoring from a backup.
    pub id: Option<ValueTypeId>,
    /// Display name.
    pub name: String,
    /// Short symbol.
    pub symbol: String,
    /// Unit of measure.
    pub unit: Unit,
    /// Display color.
    pub color: Option<String>,
    /// Free-form description.
    pub description: Option<String>,
}

/// Display-field changes for a value type. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValueTypeUpdate {
    /// New display name.
    pub name: Option<String>,
    /// New symbol.
    pub symbol: Option<String>,
    /// New unit; rejected when the type is already referenced.
    pub unit: Option<Unit>,
    /// New color.
    pub color: Option<String>,
    /// New description.
    pub description: Option<String>,
}

/// The set of registered value types, keyed by id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Registry {
    types: BTreeMap<ValueTypeId, ValueType>,
}

impl Registry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves a value type id.
    #[must_use]
    pub fn lookup(&self, id: &ValueTypeId) -> Lookup<&ValueType> {
        Lookup::from_option(self.types.get(id))
    }

    /// Returns true if the id is registered.
    #[must_use]
    pub fn contains(&self, id: &ValueTypeId) -> bool {
        self.types.contains_key(id)
    }

    /// Inserts or replaces a value type, returning the previous record.
    pub fn insert(&mut self, value_type: ValueType) -> Option<ValueType> {
        self.types.insert(value_type.id.clone(), value_type)
    }

    /// Removes a value type.
    pub fn remove(&mut self, id: &ValueTypeId) -> Option<ValueType> {
        self.types.remove(id)
    }

    /// Mutable access for display-field edits.
    pub fn get_mut(&mut self, id: &ValueTypeId) -> Option<&mut ValueType> {
        self.types.get_mut(id)
    }

    /// Iterates value types in id order.
    pub fn iter(&self) -> impl Iterator<Item = &ValueType> {
        self.types.values()
    }

    /// Value types measured in the given unit.
    pub fn by_unit(&self, unit: Unit) -> impl Iterator<Item = &ValueType> {
        self.types.values().filter(move |t| t.unit == unit)
    }

    /// Number of registered types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Returns true if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl FromIterator<ValueType> for Registry {
    fn from_iter<I: IntoIterator<Item = ValueType>>(iter: I) -> Self {
        Self {
            types: iter.into_iter().map(|t| (t.id.clone(), t)).collect(),
        }
    }
}
