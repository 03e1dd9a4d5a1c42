//! The credential service consumed by the database layer.
//!
//! Four operations: `hash`, `verify`, `issue_token`, `decode_token`. Tokens
//! are HS256 JWTs signed with the configured secret.

use chrono::{TimeDelta, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};

use crate::claims::Claims;
use crate::error::AuthError;
use crate::password;

#[derive(Clone)]
pub struct CredentialService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    token_ttl: TimeDelta,
    bcrypt_cost: u32,
}

impl std::fmt::Debug for CredentialService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialService")
            .field("token_ttl", &self.token_ttl)
            .field("bcrypt_cost", &self.bcrypt_cost)
            .finish_non_exhaustive()
    }
}

impl CredentialService {
    #[must_use]
    pub fn new(secret_key: &str, token_ttl_minutes: i64, bcrypt_cost: u32) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret_key.as_bytes()),
            decoding: DecodingKey::from_secret(secret_key.as_bytes()),
            token_ttl: TimeDelta::minutes(token_ttl_minutes),
            bcrypt_cost,
        }
    }

    /// # Errors
    ///
    /// Returns `AuthError::Hashing` if bcrypt fails.
    pub async fn hash(&self, password: &str) -> Result<String, AuthError> {
        password::hash_password(password, self.bcrypt_cost).await
    }

    /// # Errors
    ///
    /// Returns `AuthError::Hashing` if the stored hash is malformed.
    pub async fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
        password::verify_password(password, hash).await
    }

    /// Sign a fresh token for `subject`.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidToken` if encoding fails.
    pub fn issue_token(&self, subject: &str) -> Result<(String, Claims), AuthError> {
        let claims = Claims::new(subject, Utc::now(), self.token_ttl);
        let token = jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)?;
        tracing::debug!(sub = subject, exp = claims.exp, "issued access token");
        Ok((token, claims))
    }

    /// Verify signature and expiry, returning the claims.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::TokenExpired` past `exp`, `AuthError::InvalidToken`
    /// for a bad signature or malformed token.
    pub fn decode_token(&self, token: &str) -> Result<Claims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding, &validation)?;
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn service() -> CredentialService {
        CredentialService::new("test-secret", 240, 4)
    }

    #[test]
    fn issued_token_decodes_to_same_claims() {
        let service = service();
        let (token, claims) = service.issue_token("student@example.com").unwrap();
        let decoded = service.decode_token(&token).unwrap();
        assert_eq!(decoded, claims);
        assert_eq!(decoded.sub, "student@example.com");
    }

    #[test]
    fn wrong_secret_is_invalid() {
        let (token, _) = service().issue_token("a@b.co").unwrap();
        let other = CredentialService::new("other-secret", 240, 4);
        let err = other.decode_token(&token).unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken(_)), "{err:?}");
    }

    #[test]
    fn expired_token_is_reported_as_expired() {
        let expired = CredentialService::new("test-secret", -10, 4);
        let (token, _) = expired.issue_token("a@b.co").unwrap();
        let err = service().decode_token(&token).unwrap_err();
        assert!(matches!(err, AuthError::TokenExpired), "{err:?}");
    }

    #[test]
    fn garbage_is_invalid() {
        let err = service().decode_token("not.a.jwt").unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken(_)));
    }

    #[tokio::test]
    async fn hash_and_verify_round() {
        let service = service();
        let hash = service.hash("hunter22").await.unwrap();
        assert!(service.verify("hunter22", &hash).await.unwrap());
        assert!(!service.verify("hunter23", &hash).await.unwrap());
    }
}
