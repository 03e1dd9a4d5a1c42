use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Enrollment of a user in a textbook. `(user_id, textbook_id)` is unique.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct UserTextbook {
    pub id: i64,
    pub user_id: i64,
    pub textbook_id: i64,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct NewUserTextbook {
    pub user_id: i64,
    pub textbook_id: i64,
    pub completed: bool,
}

/// Per-lesson progress row, scoped under the owning `UserTextbook`.
/// `(user_id, lesson_id)` is unique.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct UserLesson {
    pub id: i64,
    pub user_id: i64,
    pub lesson_id: i64,
    pub user_textbook_id: i64,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct NewUserLesson {
    pub user_id: i64,
    pub lesson_id: i64,
    pub user_textbook_id: i64,
    pub completed: bool,
}
