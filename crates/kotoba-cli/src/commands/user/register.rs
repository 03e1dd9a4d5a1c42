use crate::cli::GlobalFlags;
use crate::cli::subcommands::UserRegisterArgs;
use crate::context::AppContext;
use crate::output::output;

pub async fn run(
    args: &UserRegisterArgs,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let user = ctx
        .service
        .register_user(&args.name, args.slug.clone(), &args.email, &args.password)
        .await?;
    output(&user, flags.format)
}
