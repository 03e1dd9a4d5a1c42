use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;
use crate::validate::check_email;

/// A registered learner. Owns classes; enrolled in textbooks via `UserTextbook`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub slug: Option<String>,
    /// Globally unique.
    pub email: String,
    #[serde(skip_serializing, default)]
    pub hashed_password: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
    pub slug: Option<String>,
    pub email: String,
    pub hashed_password: Option<String>,
}

impl NewUser {
    /// Build a user payload, checking the email shape.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` for a malformed email.
    pub fn new(
        name: impl Into<String>,
        slug: Option<String>,
        email: impl Into<String>,
        hashed_password: Option<String>,
    ) -> Result<Self, CoreError> {
        let email = email.into();
        check_email(&email)?;
        Ok(Self {
            name: name.into(),
            slug: slug.filter(|s| !s.is_empty()),
            email,
            hashed_password,
        })
    }
}
