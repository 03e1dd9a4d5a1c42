use kotoba_config::KotobaConfig;

/// Emit warnings for likely mistyped env var keys that silently fell back to defaults.
pub fn warn_unconfigured(config: &KotobaConfig) {
    for warning in collect_unconfigured_warnings(config, std::env::vars()) {
        tracing::warn!("{warning}");
    }
}

fn collect_unconfigured_warnings<I>(config: &KotobaConfig, env: I) -> Vec<String>
where
    I: IntoIterator<Item = (String, String)>,
{
    let env_keys = env.into_iter().map(|(key, _)| key).collect::<Vec<_>>();

    let mut warnings = Vec::new();

    if !config.auth.is_configured()
        && env_keys
            .iter()
            .any(|key| key.starts_with("KOTOBA_AUTH") && key != "KOTOBA_AUTH__TOKEN")
    {
        warnings.push(
            "Auth config appears default while KOTOBA_AUTH* env vars exist. Use double underscores (example: KOTOBA_AUTH__SECRET_KEY)."
                .to_string(),
        );
    }

    if config.database.path == kotoba_config::DatabaseConfig::default().path
        && has_env_prefix(&env_keys, "KOTOBA_DATABASE")
    {
        warnings.push(
            "Database path appears default while KOTOBA_DATABASE* env vars exist. Use double underscores (example: KOTOBA_DATABASE__PATH)."
                .to_string(),
        );
    }

    if !config.auth.is_configured() && !config.database.is_in_memory() {
        warnings.push(
            "auth.secret_key is not set: login and token checks are unavailable (set KOTOBA_AUTH__SECRET_KEY)."
                .to_string(),
        );
    }

    warnings
}

fn has_env_prefix(keys: &[String], prefix: &str) -> bool {
    keys.iter().any(|key| key.starts_with(prefix))
}
