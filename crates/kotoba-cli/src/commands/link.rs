use kotoba_core::entities::NewUsefulLink;
use kotoba_core::enums::LinkTarget;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::{LinkCommands, LinkTargetArgs};
use crate::commands::shared::limit::{effective_limit, truncate};
use crate::context::AppContext;
use crate::output::output;

/// Handle `kotoba link`.
pub async fn handle(
    action: &LinkCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        LinkCommands::Add {
            url,
            description,
            target,
        } => {
            let link = match resolve(*target)? {
                (LinkTarget::Grammar, id) => NewUsefulLink::for_grammar(url.clone(), description.clone(), id),
                (LinkTarget::Topic, id) => NewUsefulLink::for_topic(url.clone(), description.clone(), id),
            };
            output(&ctx.service.add_useful_link(link).await?, flags.format)
        }
        LinkCommands::List { target } => {
            let (kind, id) = resolve(*target)?;
            let mut links = ctx.service.links_for(kind, id).await?;
            truncate(
                &mut links,
                effective_limit(None, flags.limit, ctx.config.general.default_limit),
            );
            output(&links, flags.format)
        }
    }
}

fn resolve(target: LinkTargetArgs) -> anyhow::Result<(LinkTarget, i64)> {
    target
        .resolve()
        .ok_or_else(|| anyhow::anyhow!("give exactly one of --grammar, --topic"))
}
