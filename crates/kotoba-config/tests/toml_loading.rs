//! Integration tests for TOML configuration loading.
//!
//! Uses figment::Jail for safe, sandboxed env var manipulation.

use figment::{
    Figment, Jail,
    providers::{Env, Format, Serialized, Toml},
};
use kotoba_config::KotobaConfig;
use kotoba_core::enums::EntityKind;
use pretty_assertions::assert_eq;

fn base() -> Figment {
    Figment::from(Serialized::defaults(KotobaConfig::default()))
}

#[test]
fn loads_database_config_from_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[database]
path = "/tmp/school.db"
busy_timeout_ms = 250
operation_timeout_ms = 1500
"#,
        )?;

        let config: KotobaConfig = base().merge(Toml::file("config.toml")).extract()?;

        assert_eq!(config.database.path, "/tmp/school.db");
        assert_eq!(config.database.busy_timeout_ms, 250);
        assert_eq!(config.database.operation_timeout_ms, 1500);
        Ok(())
    });
}

#[test]
fn loads_auth_config_from_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[auth]
secret_key = "toml-secret"
token_ttl_minutes = 30
"#,
        )?;

        let config: KotobaConfig = base().merge(Toml::file("config.toml")).extract()?;

        assert!(config.auth.is_configured());
        assert_eq!(config.auth.secret_key, "toml-secret");
        assert_eq!(config.auth.token_ttl_minutes, 30);
        // Untouched field keeps its default.
        assert_eq!(config.auth.bcrypt_cost, 12);
        Ok(())
    });
}

#[test]
fn loads_entity_overrides_from_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[entities.textbook]
conflict_label = "Такой учебник"

[entities.word]
slug_source = "translation"
"#,
        )?;

        let config: KotobaConfig = base().merge(Toml::file("config.toml")).extract()?;

        let textbook = config.entities.get(EntityKind::Textbook).expect("textbook override");
        assert_eq!(textbook.conflict_label.as_deref(), Some("Такой учебник"));
        assert_eq!(textbook.slug_source, None);

        let word = config.entities.get(EntityKind::Word).expect("word override");
        assert_eq!(word.slug_source.as_deref(), Some("translation"));
        assert!(config.validate().is_ok());
        Ok(())
    });
}

#[test]
fn unknown_entity_section_fails_validation() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[entities.textbok]
conflict_label = "typo"
"#,
        )?;

        let config: KotobaConfig = base().merge(Toml::file("config.toml")).extract()?;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("entities.textbok"));
        Ok(())
    });
}

#[test]
fn project_config_is_picked_up_by_figment() {
    Jail::expect_with(|jail| {
        jail.create_dir(".kotoba")?;
        jail.create_file(
            ".kotoba/config.toml",
            r#"
[general]
default_limit = 7
"#,
        )?;

        let config: KotobaConfig = KotobaConfig::figment().extract()?;
        assert_eq!(config.general.default_limit, 7);
        Ok(())
    });
}

#[test]
fn env_var_overrides_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[database]
path = "from-toml.db"
"#,
        )?;
        jail.set_env("KOTOBA_DATABASE__PATH", "from-env.db");

        let config: KotobaConfig = base()
            .merge(Toml::file("config.toml"))
            .merge(Env::prefixed("KOTOBA_").split("__"))
            .extract()?;

        assert_eq!(config.database.path, "from-env.db");
        Ok(())
    });
}
