use chrono::{DateTime, NaiveDate, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One in-class study session of a user. `(class_date, user_id)` is unique.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Class {
    pub id: i64,
    pub class_date: NaiveDate,
    pub name: String,
    pub slug: Option<String>,
    pub plan: Option<String>,
    pub homework: Option<String>,
    pub questions: Option<String>,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct NewClass {
    pub class_date: NaiveDate,
    pub name: String,
    pub slug: Option<String>,
    pub plan: Option<String>,
    pub homework: Option<String>,
    pub questions: Option<String>,
    pub user_id: i64,
}

impl NewClass {
    #[must_use]
    pub fn new(user_id: i64, class_date: NaiveDate, name: impl Into<String>) -> Self {
        Self {
            class_date,
            name: name.into(),
            slug: None,
            plan: None,
            homework: None,
            questions: None,
            user_id,
        }
    }
}
