//! Pure join rows between a class and the material studied in it.
//!
//! Each pair is unique and every row is deleted together with either side.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ClassWord {
    pub id: i64,
    pub class_id: i64,
    pub word_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ClassGrammar {
    pub id: i64,
    pub class_id: i64,
    pub grammar_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ClassTopic {
    pub id: i64,
    pub class_id: i64,
    pub topic_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ClassUserLesson {
    pub id: i64,
    pub class_id: i64,
    pub user_lesson_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for any class join row: the class plus the id of the other side.
///
/// The column the `target_id` lands in depends on the join table, so this
/// payload is turned into fields by the store that owns the table.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct NewClassLink {
    pub class_id: i64,
    pub target_id: i64,
}
