//! Value type mutations.

use chrono::{DateTime, Utc};
use emanet_shared::ValueTypeId;

use super::{Applied, Book, Collection};
use crate::ledger::LedgerError;
use crate::ledger::validation::{normalize_name, normalize_optional_text};
use crate::registry::{NewValueType, ValueType, ValueTypeUpdate};
use crate::trash::{TrashEntry, TrashPayload};

impl Book {
    /// Registers a value type.
    ///
    /// # Errors
    ///
    /// Returns `MissingField` for a blank name.
    pub fn add_value_type(
        &mut self,
        input: NewValueType,
        now: DateTime<Utc>,
    ) -> Result<Applied<ValueType>, LedgerError> {
        let value_type = ValueType {
            id: input.id.unwrap_or_default(),
            name: normalize_name(&input.name, "name")?,
            symbol: input.symbol.trim().to_string(),
            unit: input.unit,
            color: normalize_optional_text(input.color),
            description: normalize_optional_text(input.description),
            created_at: Some(now),
            updated_at: Some(now),
        };
        self.value_types.insert(value_type.clone());
        Ok(Applied::new(value_type, [Collection::ValueTypes]))
    }

    /// Edits a value type.
    ///
    /// Display fields can always change. The unit can only change while no
    /// deposit or loan references the type.
    ///
    /// # Errors
    ///
    /// Returns `ValueTypeNotFound`, `MissingField` for a blanked name, or
    /// `UnitLocked`.
    pub fn update_value_type(
        &mut self,
        id: &ValueTypeId,
        update: ValueTypeUpdate,
        now: DateTime<Utc>,
    ) -> Result<Applied<ValueType>, LedgerError> {
        let name = update
            .name
            .as_deref()
            .map(|n| normalize_name(n, "name"))
            .transpose()?;
        let referenced = self.references_value_type(id);
        let current = self
            .value_types
            .get_mut(id)
            .ok_or_else(|| LedgerError::ValueTypeNotFound(id.clone()))?;

        if let Some(unit) = update.unit
            && unit != current.unit
        {
            if referenced {
                return Err(LedgerError::UnitLocked(id.clone()));
            }
            current.unit = unit;
        }
        if let Some(name) = name {
            current.name = name;
        }
        if let Some(symbol) = update.symbol {
            current.symbol = symbol.trim().to_string();
        }
        if update.color.is_some() {
            current.color = normalize_optional_text(update.color);
        }
        if update.description.is_some() {
            current.description = normalize_optional_text(update.description);
        }
        current.updated_at = Some(now);
        Ok(Applied::new(current.clone(), [Collection::ValueTypes]))
    }

    /// Moves a value type to the trash.
    ///
    /// Transactions referencing it stay in place and resolve to an unknown
    /// type until it is restored.
    ///
    /// # Errors
    ///
    /// Returns `ValueTypeNotFound` if the id is unknown.
    pub fn delete_value_type(
        &mut self,
        id: &ValueTypeId,
        now: DateTime<Utc>,
    ) -> Result<Applied<TrashEntry>, LedgerError> {
        let value_type = self
            .value_types
            .remove(id)
            .ok_or_else(|| LedgerError::ValueTypeNotFound(id.clone()))?;
        let entry = self.trash.move_to_trash(
            TrashPayload::ValueType(value_type),
            self.policy.retention,
            now,
        );
        Ok(Applied::new(entry, [Collection::ValueTypes, Collection::Trash]))
    }
}
