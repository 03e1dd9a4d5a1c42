use anyhow::Context;

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

pub async fn run(
    email: &str,
    password: &str,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let login = ctx.service.authenticate(email, password).await?;
    kotoba_auth::token_store::store(&login.access_token)
        .context("logged in, but the token could not be stored")?;
    tracing::info!(user_id = login.user_id, "access token stored");
    output(&login, flags.format)
}
