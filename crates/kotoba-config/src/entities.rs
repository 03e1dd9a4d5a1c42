//! Per-entity overrides for the record store.
//!
//! Each entity type has a built-in conflict label (used in `AlreadyExists`
//! messages) and an optional slug source column. A `[entities.<kind>]`
//! section replaces either one for that entity type only.

use std::collections::BTreeMap;

use kotoba_core::enums::EntityKind;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct EntityOverride {
    /// Human-readable name used when a unique constraint rejects an insert.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conflict_label: Option<String>,

    /// Column the slug is derived from when none is supplied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug_source: Option<String>,
}

/// Overrides keyed by entity kind (`user`, `textbook`, `useful_link`, ...).
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(transparent)]
pub struct EntitiesConfig(BTreeMap<String, EntityOverride>);

impl EntitiesConfig {
    #[must_use]
    pub fn get(&self, kind: EntityKind) -> Option<&EntityOverride> {
        self.0.get(kind.as_str())
    }

    pub fn set(&mut self, kind: EntityKind, entry: EntityOverride) {
        self.0.insert(kind.as_str().to_string(), entry);
    }

    /// Keys that do not name any entity kind (likely typos in config files).
    pub fn unknown_keys(&self) -> Vec<&str> {
        self.0
            .keys()
            .map(String::as_str)
            .filter(|key| !EntityKind::ALL.iter().any(|k| k.as_str() == *key))
            .collect()
    }
}
