use kotoba_core::entities::{NewClass, NewClassLink};
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::{ClassCommands, Material, MaterialArgs};
use crate::commands::shared::limit::{effective_limit, truncate};
use crate::context::AppContext;
use crate::output::output;

/// Handle `kotoba class`.
pub async fn handle(
    action: &ClassCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        ClassCommands::Create {
            date,
            name,
            plan,
            homework,
            questions,
            user,
        } => {
            let user_id = ctx.user_id(*user).await?;
            let mut class = NewClass::new(user_id, *date, name.clone());
            class.plan.clone_from(plan);
            class.homework.clone_from(homework);
            class.questions.clone_from(questions);
            output(&ctx.service.create_class(user_id, class).await?, flags.format)
        }
        ClassCommands::List { user } => {
            let user_id = ctx.user_id(*user).await?;
            let mut classes = ctx.service.user_classes(user_id).await?;
            truncate(
                &mut classes,
                effective_limit(None, flags.limit, ctx.config.general.default_limit),
            );
            output(&classes, flags.format)
        }
        ClassCommands::Get { id } => output(&ctx.service.get_class(*id).await?, flags.format),
        ClassCommands::Attach { class, material } => attach(*class, *material, ctx, flags).await,
        ClassCommands::Detach { class, material } => detach(*class, *material, ctx, flags).await,
    }
}

async fn attach(
    class_id: i64,
    material: MaterialArgs,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let service = &ctx.service;
    match resolve(material)? {
        Material::Word(id) => output(&service.attach_word(link(class_id, id)).await?, flags.format),
        Material::Grammar(id) => output(&service.attach_grammar(link(class_id, id)).await?, flags.format),
        Material::Topic(id) => output(&service.attach_topic(link(class_id, id)).await?, flags.format),
        Material::UserLesson(id) => {
            output(&service.attach_user_lesson(link(class_id, id)).await?, flags.format)
        }
    }
}

#[derive(Serialize)]
struct DetachResponse {
    class_id: i64,
    detached: &'static str,
    target_id: i64,
}

async fn detach(
    class_id: i64,
    material: MaterialArgs,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let service = &ctx.service;
    let material = resolve(material)?;
    let (detached, target_id) = match material {
        Material::Word(id) => {
            service.detach_word(link(class_id, id)).await?;
            ("word", id)
        }
        Material::Grammar(id) => {
            service.detach_grammar(link(class_id, id)).await?;
            ("grammar", id)
        }
        Material::Topic(id) => {
            service.detach_topic(link(class_id, id)).await?;
            ("topic", id)
        }
        Material::UserLesson(id) => {
            service.detach_user_lesson(link(class_id, id)).await?;
            ("user_lesson", id)
        }
    };
    output(
        &DetachResponse {
            class_id,
            detached,
            target_id,
        },
        flags.format,
    )
}

fn resolve(material: MaterialArgs) -> anyhow::Result<Material> {
    material
        .resolve()
        .ok_or_else(|| anyhow::anyhow!("give exactly one of --word, --grammar, --topic, --user-lesson"))
}

const fn link(class_id: i64, target_id: i64) -> NewClassLink {
    NewClassLink { class_id, target_id }
}
