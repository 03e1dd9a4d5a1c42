use kotoba_config::KotobaConfig;

use crate::cli::GlobalFlags;

/// Load layered configuration, then apply command-line overrides.
pub fn load_config(flags: &GlobalFlags) -> anyhow::Result<KotobaConfig> {
    let config = KotobaConfig::load_with_dotenv()?;
    Ok(apply_overrides(config, flags))
}

fn apply_overrides(mut config: KotobaConfig, flags: &GlobalFlags) -> KotobaConfig {
    if let Some(db) = &flags.db {
        tracing::debug!(path = %db, "database path overridden by --db");
        config.database.path.clone_from(db);
    }
    config
}
