use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::commands;
use crate::context::AppContext;

/// Dispatch a parsed command to the corresponding handler module.
pub async fn dispatch(
    command: Commands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match command {
        Commands::User { action } => commands::user::handle(&action, ctx, flags).await,
        Commands::Textbook { action } => commands::textbook::handle(&action, ctx, flags).await,
        Commands::Lesson { action } => commands::textbook::handle_lesson(&action, ctx, flags).await,
        Commands::Enroll(args) => commands::enroll::handle(&args, ctx, flags).await,
        Commands::Progress { action } => commands::progress::handle(&action, ctx, flags).await,
        Commands::Class { action } => commands::class::handle(&action, ctx, flags).await,
        Commands::Word { action } => commands::content::handle_word(&action, ctx, flags).await,
        Commands::Grammar { action } => commands::content::handle_grammar(&action, ctx, flags).await,
        Commands::Topic { action } => commands::content::handle_topic(&action, ctx, flags).await,
        Commands::Link { action } => commands::link::handle(&action, ctx, flags).await,
        Commands::Schema(_) => {
            unreachable!("schema is pre-dispatched in main")
        }
    }
}
