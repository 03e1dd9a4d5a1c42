//! # kotoba-config
//!
//! Layered configuration loading for Kotoba using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`KOTOBA_*` prefix, `__` as separator)
//! 2. Project-level `.kotoba/config.toml`
//! 3. User-level `~/.config/kotoba/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `KOTOBA_DATABASE__PATH` -> `database.path`,
//! `KOTOBA_AUTH__SECRET_KEY` -> `auth.secret_key`,
//! `KOTOBA_ENTITIES__TEXTBOOK__CONFLICT_LABEL` -> `entities.textbook.conflict_label`.
//! The `__` (double underscore) separates nested config sections.
//!
//! # Usage
//!
//! ```no_run
//! use kotoba_config::KotobaConfig;
//!
//! let config = KotobaConfig::load_with_dotenv().expect("config");
//! println!("database: {}", config.database.path);
//! ```

mod auth;
mod database;
mod entities;
mod error;
mod general;

pub use auth::AuthConfig;
pub use database::DatabaseConfig;
pub use entities::{EntitiesConfig, EntityOverride};
pub use error::ConfigError;
pub use general::GeneralConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct KotobaConfig {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub entities: EntitiesConfig,
    #[serde(default)]
    pub general: GeneralConfig,
}

impl KotobaConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy` -- use [`Self::load_with_dotenv`] if you need
    /// `.env` file loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a source cannot be parsed or a value fails
    /// [`Self::validate`].
    pub fn load() -> Result<Self, ConfigError> {
        let config: Self = Self::figment().extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration with `.env` file support.
    ///
    /// # Errors
    ///
    /// Same as [`Self::load`].
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        Self::load_dotenv_from_workspace();
        Self::load()
    }

    /// Build the figment provider chain.
    ///
    /// This is public so tests can inspect the figment directly or add
    /// additional providers on top.
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(global_path));
        }

        // Layer 2: Project-local config
        let local_path = PathBuf::from(".kotoba/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // Layer 3: Environment variables (highest priority)
        figment.merge(Env::prefixed("KOTOBA_").split("__"))
    }

    /// Reject values that parse but cannot work.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` naming the offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(key) = self.entities.unknown_keys().first() {
            return Err(ConfigError::InvalidValue {
                field: format!("entities.{key}"),
                reason: "not an entity kind".into(),
            });
        }
        if !(4..=31).contains(&self.auth.bcrypt_cost) {
            return Err(ConfigError::InvalidValue {
                field: "auth.bcrypt_cost".into(),
                reason: format!("{} is outside 4..=31", self.auth.bcrypt_cost),
            });
        }
        if self.auth.token_ttl_minutes <= 0 {
            return Err(ConfigError::InvalidValue {
                field: "auth.token_ttl_minutes".into(),
                reason: "must be positive".into(),
            });
        }
        if self.database.operation_timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "database.operation_timeout_ms".into(),
                reason: "must be positive".into(),
            });
        }
        Ok(())
    }

    /// The auth section, if a signing secret is configured.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotConfigured` when `auth.secret_key` is empty.
    pub fn require_auth(&self) -> Result<&AuthConfig, ConfigError> {
        if self.auth.is_configured() {
            Ok(&self.auth)
        } else {
            Err(ConfigError::NotConfigured {
                section: "auth".into(),
            })
        }
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("kotoba").join("config.toml"))
    }

    /// Load `.env` from the workspace root.
    ///
    /// Walks up from `CARGO_MANIFEST_DIR` (if available) or current dir looking
    /// for a `.env` file. Silently does nothing if no `.env` is found.
    fn load_dotenv_from_workspace() {
        if let Ok(manifest_dir) = std::env::var("CARGO_MANIFEST_DIR") {
            let mut dir = PathBuf::from(manifest_dir);
            // Walk up at most 3 levels (crate -> crates/ -> workspace)
            for _ in 0..3 {
                let env_path = dir.join(".env");
                if env_path.exists() {
                    let _ = dotenvy::from_path(&env_path);
                    return;
                }
                if !dir.pop() {
                    break;
                }
            }
        }

        let _ = dotenvy::dotenv();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_loads() {
        let config = KotobaConfig::default();
        assert!(!config.auth.is_configured());
        assert_eq!(config.database.path, ".kotoba/kotoba.db");
        assert_eq!(config.general.default_limit, 50);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn figment_builds_without_files() {
        let figment = KotobaConfig::figment();
        let config: KotobaConfig = figment.extract().expect("should extract defaults");
        assert_eq!(config.auth.token_ttl_minutes, 240);
    }

    #[test]
    fn require_auth_reports_missing_section() {
        let config = KotobaConfig::default();
        let err = config.require_auth().unwrap_err();
        assert!(err.to_string().contains("'auth'"));
    }

    #[test]
    fn validate_rejects_bad_bcrypt_cost() {
        let mut config = KotobaConfig::default();
        config.auth.bcrypt_cost = 2;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("auth.bcrypt_cost"));
    }
}
