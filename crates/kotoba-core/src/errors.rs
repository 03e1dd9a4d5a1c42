//! Cross-cutting error types for Kotoba.
//!
//! Domain-specific errors (`DatabaseError`, `AuthError`, `ConfigError`) are
//! defined in their respective crates. The CLI converges them through `anyhow`.

use thiserror::Error;

/// Errors that can be raised by any Kotoba crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Entity lookup returned no result.
    #[error("Entity not found: {entity_type} {id}")]
    NotFound { entity_type: String, id: String },

    /// Input failed a structural rule (script, format, exclusive references).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
