use kotoba_core::entities::{
    Class, ClassGrammar, ClassTopic, ClassUserLesson, ClassWord, Grammar, Lesson, Textbook, Topic,
    UsefulLink, User, UserLesson, UserTextbook, Word,
};
use kotoba_core::enums::EntityKind;
use schemars::{Schema, schema_for};

use crate::cli::GlobalFlags;
use crate::cli::root_commands::SchemaArgs;
use crate::commands::shared::parse::parse_enum;
use crate::output::output;

/// Handle `kotoba schema`.
pub fn handle(args: &SchemaArgs, flags: &GlobalFlags) -> anyhow::Result<()> {
    let kind = parse_enum::<EntityKind>(&args.entity, "entity").map_err(|error| {
        let known = EntityKind::ALL.map(EntityKind::as_str).join(", ");
        error.context(format!("known entities: {known}"))
    })?;
    output(&schema_of(kind), flags.format)
}

fn schema_of(kind: EntityKind) -> Schema {
    match kind {
        EntityKind::User => schema_for!(User),
        EntityKind::Textbook => schema_for!(Textbook),
        EntityKind::Lesson => schema_for!(Lesson),
        EntityKind::Class => schema_for!(Class),
        EntityKind::Word => schema_for!(Word),
        EntityKind::Grammar => schema_for!(Grammar),
        EntityKind::Topic => schema_for!(Topic),
        EntityKind::UsefulLink => schema_for!(UsefulLink),
        EntityKind::UserTextbook => schema_for!(UserTextbook),
        EntityKind::UserLesson => schema_for!(UserLesson),
        EntityKind::ClassWord => schema_for!(ClassWord),
        EntityKind::ClassGrammar => schema_for!(ClassGrammar),
        EntityKind::ClassTopic => schema_for!(ClassTopic),
        EntityKind::ClassUserLesson => schema_for!(ClassUserLesson),
    }
}

#[cfg(test)]
mod tests {
    use kotoba_core::enums::EntityKind;

    use super::schema_of;

    #[test]
    fn every_kind_has_an_object_schema() {
        for kind in EntityKind::ALL {
            let schema = serde_json::to_value(schema_of(kind)).expect("schema serializes");
            assert_eq!(schema["type"], "object", "{kind}");
            assert!(schema["properties"]["id"].is_object(), "{kind}");
        }
    }

    #[test]
    fn word_schema_lists_its_columns() {
        let schema = serde_json::to_value(schema_of(EntityKind::Word)).expect("schema serializes");
        for column in ["kana", "kanji", "translation", "lesson_id"] {
            assert!(schema["properties"][column].is_object(), "{column}");
        }
    }
}
