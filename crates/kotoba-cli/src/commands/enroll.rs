use crate::cli::GlobalFlags;
use crate::cli::root_commands::EnrollArgs;
use crate::context::AppContext;
use crate::output::output;

/// Handle `kotoba enroll`.
pub async fn handle(
    args: &EnrollArgs,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let user_id = ctx.user_id(args.user).await?;
    let response = ctx.service.enroll(user_id, args.textbook).await?;
    output(&response, flags.format)
}
