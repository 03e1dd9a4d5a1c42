use figment::Jail;
use kotoba_config::KotobaConfig;
use kotoba_core::enums::EntityKind;

#[test]
fn env_fills_auth_secret() {
    Jail::expect_with(|jail| {
        jail.set_env("KOTOBA_AUTH__SECRET_KEY", "env-secret");

        let config = KotobaConfig::load().expect("config loads");
        assert_eq!(config.auth.secret_key, "env-secret");
        assert!(config.require_auth().is_ok());
        Ok(())
    });
}

#[test]
fn env_sets_nested_entity_override() {
    Jail::expect_with(|jail| {
        jail.set_env("KOTOBA_ENTITIES__LESSON__CONFLICT_LABEL", "Такой урок");

        let config = KotobaConfig::load().expect("config loads");
        let lesson = config.entities.get(EntityKind::Lesson).expect("override present");
        assert_eq!(lesson.conflict_label.as_deref(), Some("Такой урок"));
        Ok(())
    });
}

#[test]
fn typo_env_var_silently_ignored() {
    Jail::expect_with(|jail| {
        jail.set_env("KOTOBA_DATABASE__PATHH", "typo.db");

        let config = KotobaConfig::load().expect("config loads");
        assert_eq!(config.database.path, ".kotoba/kotoba.db");
        Ok(())
    });
}

#[test]
fn invalid_env_value_is_rejected_by_load() {
    Jail::expect_with(|jail| {
        jail.set_env("KOTOBA_AUTH__TOKEN_TTL_MINUTES", "0");

        let err = KotobaConfig::load().unwrap_err();
        assert!(err.to_string().contains("auth.token_ttl_minutes"));
        Ok(())
    });
}

#[test]
fn non_numeric_env_value_is_a_figment_error() {
    Jail::expect_with(|jail| {
        jail.set_env("KOTOBA_GENERAL__DEFAULT_LIMIT", "lots");

        let err = KotobaConfig::load().unwrap_err();
        assert!(err.to_string().starts_with("Configuration error"));
        Ok(())
    });
}
