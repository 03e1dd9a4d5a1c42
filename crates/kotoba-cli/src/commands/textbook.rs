use kotoba_core::entities::{NewLesson, NewTextbook};

use crate::cli::GlobalFlags;
use crate::cli::subcommands::{LessonCommands, TextbookCommands};
use crate::commands::shared::limit::{effective_limit, truncate};
use crate::context::AppContext;
use crate::output::output;

/// Handle `kotoba textbook`.
pub async fn handle(
    action: &TextbookCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        TextbookCommands::Create { name, slug } => {
            let textbook = ctx
                .service
                .create_textbook(NewTextbook {
                    name: name.clone(),
                    slug: slug.clone(),
                })
                .await?;
            output(&textbook, flags.format)
        }
        TextbookCommands::List => {
            let mut textbooks = ctx.service.list_textbooks().await?;
            truncate(
                &mut textbooks,
                effective_limit(None, flags.limit, ctx.config.general.default_limit),
            );
            output(&textbooks, flags.format)
        }
    }
}

/// Handle `kotoba lesson`.
pub async fn handle_lesson(
    action: &LessonCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        LessonCommands::Create {
            textbook,
            name,
            slug,
        } => {
            let lesson = ctx
                .service
                .create_lesson(NewLesson {
                    name: name.clone(),
                    slug: slug.clone(),
                    textbook_id: *textbook,
                })
                .await?;
            output(&lesson, flags.format)
        }
        LessonCommands::CreateMany { textbook, names } => {
            let batch = names
                .iter()
                .map(|name| NewLesson {
                    name: name.clone(),
                    slug: None,
                    textbook_id: *textbook,
                })
                .collect();
            let lessons = ctx.service.create_lessons(batch).await?;
            output(&lessons, flags.format)
        }
        LessonCommands::List { textbook } => {
            let mut lessons = ctx.service.lessons_of(*textbook).await?;
            truncate(
                &mut lessons,
                effective_limit(None, flags.limit, ctx.config.general.default_limit),
            );
            output(&lessons, flags.format)
        }
    }
}
