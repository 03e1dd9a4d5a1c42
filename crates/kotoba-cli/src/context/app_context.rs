use anyhow::Context;
use kotoba_config::KotobaConfig;
use kotoba_core::entities::User;
use kotoba_db::KotobaService;

/// Shared application resources initialized once at startup.
pub struct AppContext {
    pub service: KotobaService,
    pub config: KotobaConfig,
    /// Stored access token, not yet validated.
    pub auth_token: Option<String>,
}

impl AppContext {
    /// Open the configured database and pick up the stored token.
    pub async fn init(config: KotobaConfig) -> anyhow::Result<Self> {
        let service = KotobaService::open(&config)
            .await
            .with_context(|| format!("failed to open database at {}", config.database.path))?;
        let auth_token = kotoba_auth::resolve_token();
        if auth_token.is_some() {
            tracing::debug!(
                source = kotoba_auth::token_store::detect_token_source(),
                "access token found"
            );
        }

        Ok(Self {
            service,
            config,
            auth_token,
        })
    }

    /// The user behind the stored token.
    pub async fn current_user(&self) -> anyhow::Result<User> {
        let token = self
            .auth_token
            .as_deref()
            .context("not logged in (run `kotoba user login` or set KOTOBA_AUTH__TOKEN)")?;
        Ok(self.service.current_user(token).await?)
    }

    /// An explicit user ID, or the logged-in user's.
    pub async fn user_id(&self, explicit: Option<i64>) -> anyhow::Result<i64> {
        match explicit {
            Some(id) => Ok(id),
            None => Ok(self.current_user().await?.id),
        }
    }
}
