//! Database error types for kotoba-db.
//!
//! Storage-engine errors never escape this crate raw: `From<libsql::Error>`
//! classifies constraint failures by the message SQLite reports, and the
//! record store then attaches its entity's conflict label.

use kotoba_auth::AuthError;
use kotoba_core::errors::CoreError;
use thiserror::Error;

/// Errors from database operations.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// A single-target operation matched zero rows, or more than one.
    #[error("{entity} not found ({detail})")]
    NotFound { entity: String, detail: String },

    /// `get_one_matching` matched more than one row.
    #[error("more than one {entity} matches {filter}")]
    AmbiguousResult { entity: String, filter: String },

    /// A unique constraint rejected the write.
    #[error("{label} уже существует{}", record_suffix(.record))]
    AlreadyExists { label: String, record: Option<String> },

    /// A foreign key points at a row that does not exist.
    #[error("dangling reference: {0}")]
    DanglingReference(String),

    /// Any other constraint failure (CHECK, NOT NULL, ...).
    #[error("integrity violation: {0}")]
    IntegrityViolation(String),

    /// The user is already enrolled in the textbook.
    #[error("user {user_id} is already enrolled in textbook {textbook_id}")]
    AlreadyEnrolled { user_id: i64, textbook_id: i64 },

    /// Input failed a structural rule.
    #[error("validation error: {0}")]
    Validation(String),

    /// Credential or token failure from the credential service.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// A store operation did not finish within the configured bound.
    #[error("{operation} timed out after {after_ms} ms")]
    Timeout { operation: String, after_ms: u128 },

    /// Schema migration failed.
    #[error("Migration failed: {0}")]
    Migration(String),

    /// A filter or field map names a column the table does not have.
    #[error("table '{table}' has no column '{column}'")]
    UnknownColumn { table: String, column: String },

    /// Any other storage-engine failure.
    #[error("storage error: {0}")]
    Storage(String),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

fn record_suffix(record: &Option<String>) -> String {
    record.as_ref().map(|r| format!(": {r}")).unwrap_or_default()
}

impl DatabaseError {
    /// Whether this is one of the constraint-violation variants.
    #[must_use]
    pub const fn is_conflict(&self) -> bool {
        matches!(
            self,
            Self::AlreadyExists { .. } | Self::DanglingReference(_) | Self::IntegrityViolation(_)
        )
    }
}

impl From<libsql::Error> for DatabaseError {
    fn from(error: libsql::Error) -> Self {
        classify(&error.to_string())
    }
}

impl From<CoreError> for DatabaseError {
    fn from(error: CoreError) -> Self {
        match error {
            CoreError::Validation(message) => Self::Validation(message),
            CoreError::NotFound { entity_type, id } => Self::NotFound {
                entity: entity_type,
                detail: format!("id = {id}"),
            },
            CoreError::Other(error) => Self::Other(error),
        }
    }
}

impl From<serde_json::Error> for DatabaseError {
    fn from(error: serde_json::Error) -> Self {
        Self::Other(error.into())
    }
}

/// Messages SQLite reports when the busy handler gives up on a lock.
const LOCK_MARKERS: [&str; 4] = [
    "database is locked",
    "database table is locked",
    "SQLITE_BUSY",
    "SQLITE_LOCKED",
];

/// Map a storage-engine message onto the error taxonomy.
///
/// Lock waits become `Timeout` with the engine's message as the operation;
/// the record store relabels them with its own operation and bound.
fn classify(message: &str) -> DatabaseError {
    if LOCK_MARKERS.iter().any(|marker| message.contains(marker)) {
        DatabaseError::Timeout {
            operation: strip_engine_prefix(message),
            after_ms: 0,
        }
    } else if let Some(columns) = constraint_detail(message, "UNIQUE constraint failed") {
        DatabaseError::AlreadyExists {
            label: columns,
            record: None,
        }
    } else if message.contains("FOREIGN KEY constraint failed") {
        DatabaseError::DanglingReference(strip_engine_prefix(message))
    } else if message.contains("constraint failed") {
        DatabaseError::IntegrityViolation(strip_engine_prefix(message))
    } else {
        DatabaseError::Storage(strip_engine_prefix(message))
    }
}

/// The text after `marker: `, e.g. `textbooks.name`.
fn constraint_detail(message: &str, marker: &str) -> Option<String> {
    let start = message.find(marker)?;
    let rest = &message[start + marker.len()..];
    let detail = rest
        .trim_start_matches(':')
        .trim()
        .trim_end_matches('`')
        .trim();
    Some(detail.to_string())
}

fn strip_engine_prefix(message: &str) -> String {
    message
        .trim_start_matches("SQLite failure:")
        .trim()
        .trim_matches('`')
        .to_string()
}
