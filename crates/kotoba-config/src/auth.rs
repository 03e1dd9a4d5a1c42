//! Credential service configuration.

use serde::{Deserialize, Serialize};

/// Token lifetime in minutes.
const fn default_token_ttl_minutes() -> i64 {
    240
}

/// bcrypt work factor (bcrypt's own default).
const fn default_bcrypt_cost() -> u32 {
    12
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    /// HMAC secret used to sign access tokens.
    #[serde(default)]
    pub secret_key: String,

    #[serde(default = "default_token_ttl_minutes")]
    pub token_ttl_minutes: i64,

    #[serde(default = "default_bcrypt_cost")]
    pub bcrypt_cost: u32,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            secret_key: String::new(),
            token_ttl_minutes: default_token_ttl_minutes(),
            bcrypt_cost: default_bcrypt_cost(),
        }
    }
}

impl AuthConfig {
    /// Check if a signing secret is available.
    pub fn is_configured(&self) -> bool {
        !self.secret_key.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_not_configured() {
        let config = AuthConfig::default();
        assert!(!config.is_configured());
        assert_eq!(config.token_ttl_minutes, 240);
        assert_eq!(config.bcrypt_cost, 12);
    }

    #[test]
    fn configured_when_secret_set() {
        let config = AuthConfig {
            secret_key: "s3cret".into(),
            ..Default::default()
        };
        assert!(config.is_configured());
    }
}
