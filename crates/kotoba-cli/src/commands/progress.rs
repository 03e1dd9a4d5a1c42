use crate::cli::GlobalFlags;
use crate::cli::subcommands::ProgressCommands;
use crate::context::AppContext;
use crate::output::output;

/// Handle `kotoba progress`.
pub async fn handle(
    action: &ProgressCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        ProgressCommands::Show { user } => {
            let user_id = ctx.user_id(*user).await?;
            output(&ctx.service.user_progress(user_id).await?, flags.format)
        }
        ProgressCommands::Lesson { id, undo } => {
            let row = ctx.service.set_lesson_completed(*id, !undo).await?;
            output(&row, flags.format)
        }
        ProgressCommands::Textbook { id, undo } => {
            let row = ctx.service.set_textbook_completed(*id, !undo).await?;
            output(&row, flags.format)
        }
    }
}
