mod delete;
mod login;
mod register;

use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::UserCommands;
use crate::commands::shared::limit::{effective_limit, truncate};
use crate::context::AppContext;
use crate::output::output;

/// Handle `kotoba user`.
pub async fn handle(
    action: &UserCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        UserCommands::Register(args) => register::run(args, ctx, flags).await,
        UserCommands::Login { email, password } => login::run(email, password, ctx, flags).await,
        UserCommands::Logout => logout(flags),
        UserCommands::Me => output(&ctx.current_user().await?, flags.format),
        UserCommands::List => {
            let mut users = ctx.service.list_users().await?;
            truncate(
                &mut users,
                effective_limit(None, flags.limit, ctx.config.general.default_limit),
            );
            output(&users, flags.format)
        }
        UserCommands::Get { id } => output(&ctx.service.get_user(*id).await?, flags.format),
        UserCommands::Delete { name } => delete::by_name(name, ctx, flags).await,
        UserCommands::DeleteMany { emails, names, ids } => {
            delete::many(emails, names, ids, ctx, flags).await
        }
    }
}

#[derive(Serialize)]
struct LogoutResponse {
    cleared: bool,
}

/// Handle `kotoba user logout`; needs no database.
pub fn logout(flags: &GlobalFlags) -> anyhow::Result<()> {
    kotoba_auth::logout()?;
    output(&LogoutResponse { cleared: true }, flags.format)
}
