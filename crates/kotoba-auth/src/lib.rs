//! # kotoba-auth
//!
//! The credential service for Kotoba: bcrypt password hashing, HS256 signed
//! access tokens, and a local token store for the CLI session.

pub mod claims;
pub mod credentials;
pub mod error;
pub mod password;
pub mod token_store;

pub use claims::Claims;
pub use credentials::CredentialService;
pub use error::AuthError;

/// Resolve the stored access token, if any.
///
/// Does NOT validate the token (use [`CredentialService::decode_token`]).
#[must_use]
pub fn resolve_token() -> Option<String> {
    token_store::load()
}

/// Resolve the stored token and decode it.
///
/// # Errors
///
/// Returns `AuthError::NotAuthenticated` when no token is stored, or the
/// decoding error otherwise.
pub fn resolve_and_validate(service: &CredentialService) -> Result<(String, Claims), AuthError> {
    let token = resolve_token().ok_or(AuthError::NotAuthenticated)?;
    let claims = service.decode_token(&token)?;
    Ok((token, claims))
}

/// Clear stored credentials.
///
/// # Errors
///
/// Returns `AuthError::TokenStore` if the credentials file cannot be removed.
pub fn logout() -> Result<(), AuthError> {
    token_store::delete()
}
