//! bcrypt password hashing.
//!
//! bcrypt is CPU-bound, so both operations run on tokio's blocking pool and
//! never stall the async runtime.

use crate::error::AuthError;

/// Hash `password` with the given bcrypt work factor.
///
/// # Errors
///
/// Returns `AuthError::Hashing` if bcrypt fails or the blocking task panics.
pub async fn hash_password(password: &str, cost: u32) -> Result<String, AuthError> {
    let password = password.to_string();
    tokio::task::spawn_blocking(move || {
        bcrypt::hash(password, cost).map_err(|e| AuthError::Hashing(e.to_string()))
    })
    .await
    .map_err(|e| AuthError::Hashing(format!("task join error: {e}")))?
}

/// Check `password` against a stored bcrypt hash.
///
/// A malformed hash is an error, a mismatch is `Ok(false)`.
///
/// # Errors
///
/// Returns `AuthError::Hashing` if the hash cannot be parsed.
pub async fn verify_password(password: &str, hash: &str) -> Result<bool, AuthError> {
    let password = password.to_string();
    let hash = hash.to_string();
    tokio::task::spawn_blocking(move || {
        bcrypt::verify(password, &hash).map_err(|e| AuthError::Hashing(e.to_string()))
    })
    .await
    .map_err(|e| AuthError::Hashing(format!("task join error: {e}")))?
}
