//! Entity descriptors: the per-type facts the generic record store needs.
//!
//! A descriptor is a plain value (table, columns, conflict label, slug
//! source). Built-in descriptors are `const` on each [`Record`] impl; the
//! `[entities.<kind>]` config sections replace the label or slug source for
//! a single entity type before the store is constructed.

use std::borrow::Cow;

use kotoba_config::EntitiesConfig;
use kotoba_core::enums::EntityKind;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::DatabaseError;

/// Column/value pairs used both as insert/update payloads and as filters.
pub type Fields = Map<String, Value>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityDescriptor {
    pub kind: EntityKind,
    pub table: &'static str,
    /// Every column in SELECT order, `id` first, timestamps last.
    pub columns: &'static [&'static str],
    /// Display template for unique-constraint failures, e.g. "Такой урок".
    pub conflict_label: Cow<'static, str>,
    /// Column a missing slug is derived from.
    pub slug_source: Option<Cow<'static, str>>,
    /// Column holding the record's own human-readable label.
    pub label_field: Option<&'static str>,
}

impl EntityDescriptor {
    #[must_use]
    pub fn has_column(&self, column: &str) -> bool {
        self.columns.contains(&column)
    }

    /// # Errors
    ///
    /// Returns `DatabaseError::UnknownColumn` if `column` is not in the table.
    pub fn check_column(&self, column: &str) -> Result<(), DatabaseError> {
        if self.has_column(column) {
            Ok(())
        } else {
            Err(DatabaseError::UnknownColumn {
                table: self.table.to_string(),
                column: column.to_string(),
            })
        }
    }

    #[must_use]
    pub fn select_cols(&self) -> String {
        self.columns.join(", ")
    }

    /// Apply the `[entities.<kind>]` override for this kind, if any.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::UnknownColumn` if the override names a slug
    /// source the table does not have.
    pub fn with_overrides(mut self, config: &EntitiesConfig) -> Result<Self, DatabaseError> {
        let Some(entry) = config.get(self.kind) else {
            return Ok(self);
        };
        if let Some(label) = &entry.conflict_label {
            self.conflict_label = Cow::Owned(label.clone());
        }
        if let Some(source) = &entry.slug_source {
            self.check_column(source)?;
            self.slug_source = Some(Cow::Owned(source.clone()));
        }
        Ok(self)
    }
}

/// A row type the generic store can read.
pub trait Record: Sized + Send {
    const DESCRIPTOR: EntityDescriptor;

    fn id(&self) -> i64;

    /// Parse a row selected with [`EntityDescriptor::select_cols`].
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if a column is missing or malformed.
    fn from_row(row: &libsql::Row) -> Result<Self, DatabaseError>;
}

/// Serialize an insert payload into fields.
///
/// # Errors
///
/// Returns `DatabaseError::Validation` if `value` does not serialize to a
/// JSON object.
pub fn to_fields<T: Serialize>(value: &T) -> Result<Fields, DatabaseError> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        other => Err(DatabaseError::Validation(format!(
            "expected a field map, got {other}"
        ))),
    }
}

/// Build fields from literal pairs: `fields([("name", json!("N1"))])`.
pub fn fields<I, K>(pairs: I) -> Fields
where
    I: IntoIterator<Item = (K, Value)>,
    K: Into<String>,
{
    pairs.into_iter().map(|(k, v)| (k.into(), v)).collect()
}
