use anyhow::Context;
use kotoba_core::entities::{NewGrammar, NewTopic, NewWord};

use crate::cli::GlobalFlags;
use crate::cli::subcommands::{GrammarCommands, TopicCommands, WordCommands};
use crate::context::AppContext;
use crate::output::output;

/// Handle `kotoba word`.
pub async fn handle_word(
    action: &WordCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        WordCommands::Add {
            kana,
            translation,
            kanji,
            example,
            lesson,
        } => {
            let mut word = NewWord::new(kana.clone(), translation.clone())?;
            if let Some(kanji) = kanji {
                word = word.with_kanji(kanji.clone())?;
            }
            if let Some(example) = example {
                word = word.with_example(example.clone());
            }
            if let Some(lesson) = lesson {
                word = word.with_lesson(*lesson);
            }
            output(&ctx.service.create_word(word).await?, flags.format)
        }
        WordCommands::Search { kana, translation } => {
            let word = ctx
                .service
                .search_word(kana, translation)
                .await?
                .with_context(|| format!("no word '{kana}' with a translation containing '{translation}'"))?;
            output(&word, flags.format)
        }
        WordCommands::Get { id } => output(&ctx.service.get_word(*id).await?, flags.format),
    }
}

/// Handle `kotoba grammar`.
pub async fn handle_grammar(
    action: &GrammarCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        GrammarCommands::Create {
            russian,
            japanese,
            lesson,
        } => {
            let grammar = ctx
                .service
                .create_grammar(NewGrammar {
                    name_russian: russian.clone(),
                    name_japanese: japanese.clone(),
                    lesson_id: *lesson,
                })
                .await?;
            output(&grammar, flags.format)
        }
    }
}

/// Handle `kotoba topic`.
pub async fn handle_topic(
    action: &TopicCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        TopicCommands::Create {
            russian,
            japanese,
            lesson,
        } => {
            let topic = ctx
                .service
                .create_topic(NewTopic {
                    name_russian: russian.clone(),
                    name_japanese: japanese.clone(),
                    lesson_id: *lesson,
                })
                .await?;
            output(&topic, flags.format)
        }
    }
}
