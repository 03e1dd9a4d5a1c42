//! `Record` impls: one descriptor and row parser per table.

use std::borrow::Cow;

use kotoba_core::entities::{
    Class, ClassGrammar, ClassTopic, ClassUserLesson, ClassWord, Grammar, Lesson, Textbook, Topic,
    UsefulLink, User, UserLesson, UserTextbook, Word,
};
use kotoba_core::enums::EntityKind;

use crate::descriptor::{EntityDescriptor, Record};
use crate::error::DatabaseError;
use crate::helpers::{get_bool, get_opt_string, get_timestamps, parse_date, parse_enum};

impl Record for User {
    const DESCRIPTOR: EntityDescriptor = EntityDescriptor {
        kind: EntityKind::User,
        table: "users",
        columns: &["id", "name", "slug", "email", "hashed_password", "created_at", "updated_at"],
        conflict_label: Cow::Borrowed("Пользователь с такой почтой"),
        slug_source: Some(Cow::Borrowed("name")),
        label_field: Some("email"),
    };

    fn id(&self) -> i64 {
        self.id
    }

    fn from_row(row: &libsql::Row) -> Result<Self, DatabaseError> {
        let (created_at, updated_at) = get_timestamps(row, 5)?;
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            slug: get_opt_string(row, 2)?,
            email: row.get(3)?,
            hashed_password: get_opt_string(row, 4)?,
            created_at,
            updated_at,
        })
    }
}

impl Record for Textbook {
    const DESCRIPTOR: EntityDescriptor = EntityDescriptor {
        kind: EntityKind::Textbook,
        table: "textbooks",
        columns: &["id", "name", "slug", "created_at", "updated_at"],
        conflict_label: Cow::Borrowed("Такой учебник"),
        slug_source: Some(Cow::Borrowed("name")),
        label_field: Some("name"),
    };

    fn id(&self) -> i64 {
        self.id
    }

    fn from_row(row: &libsql::Row) -> Result<Self, DatabaseError> {
        let (created_at, updated_at) = get_timestamps(row, 3)?;
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            slug: get_opt_string(row, 2)?,
            created_at,
            updated_at,
        })
    }
}

impl Record for Lesson {
    const DESCRIPTOR: EntityDescriptor = EntityDescriptor {
        kind: EntityKind::Lesson,
        table: "lessons",
        columns: &["id", "name", "slug", "textbook_id", "created_at", "updated_at"],
        conflict_label: Cow::Borrowed("Такой урок"),
        slug_source: Some(Cow::Borrowed("name")),
        label_field: Some("name"),
    };

    fn id(&self) -> i64 {
        self.id
    }

    fn from_row(row: &libsql::Row) -> Result<Self, DatabaseError> {
        let (created_at, updated_at) = get_timestamps(row, 4)?;
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            slug: get_opt_string(row, 2)?,
            textbook_id: row.get(3)?,
            created_at,
            updated_at,
        })
    }
}

impl Record for Class {
    const DESCRIPTOR: EntityDescriptor = EntityDescriptor {
        kind: EntityKind::Class,
        table: "classes",
        columns: &[
            "id",
            "class_date",
            "name",
            "slug",
            "plan",
            "homework",
            "questions",
            "user_id",
            "created_at",
            "updated_at",
        ],
        conflict_label: Cow::Borrowed("Такое занятие"),
        slug_source: Some(Cow::Borrowed("name")),
        label_field: Some("class_date"),
    };

    fn id(&self) -> i64 {
        self.id
    }

    fn from_row(row: &libsql::Row) -> Result<Self, DatabaseError> {
        let (created_at, updated_at) = get_timestamps(row, 8)?;
        Ok(Self {
            id: row.get(0)?,
            class_date: parse_date(&row.get::<String>(1)?)?,
            name: row.get(2)?,
            slug: get_opt_string(row, 3)?,
            plan: get_opt_string(row, 4)?,
            homework: get_opt_string(row, 5)?,
            questions: get_opt_string(row, 6)?,
            user_id: row.get(7)?,
            created_at,
            updated_at,
        })
    }
}

impl Record for Word {
    const DESCRIPTOR: EntityDescriptor = EntityDescriptor {
        kind: EntityKind::Word,
        table: "words",
        columns: &[
            "id",
            "kanji",
            "kana",
            "translation",
            "example_sentences",
            "slug",
            "lesson_id",
            "created_at",
            "updated_at",
        ],
        conflict_label: Cow::Borrowed("Такое слово"),
        slug_source: Some(Cow::Borrowed("kana")),
        label_field: Some("kana"),
    };

    fn id(&self) -> i64 {
        self.id
    }

    fn from_row(row: &libsql::Row) -> Result<Self, DatabaseError> {
        let (created_at, updated_at) = get_timestamps(row, 7)?;
        Ok(Self {
            id: row.get(0)?,
            kanji: get_opt_string(row, 1)?,
            kana: row.get(2)?,
            translation: get_opt_string(row, 3)?,
            example_sentences: get_opt_string(row, 4)?,
            slug: get_opt_string(row, 5)?,
            lesson_id: row.get::<Option<i64>>(6)?,
            created_at,
            updated_at,
        })
    }
}

impl Record for Grammar {
    const DESCRIPTOR: EntityDescriptor = EntityDescriptor {
        kind: EntityKind::Grammar,
        table: "grammars",
        columns: &["id", "name_russian", "name_japanese", "lesson_id", "created_at", "updated_at"],
        conflict_label: Cow::Borrowed("Такая грамматика"),
        slug_source: None,
        label_field: Some("name_russian"),
    };

    fn id(&self) -> i64 {
        self.id
    }

    fn from_row(row: &libsql::Row) -> Result<Self, DatabaseError> {
        let (created_at, updated_at) = get_timestamps(row, 4)?;
        Ok(Self {
            id: row.get(0)?,
            name_russian: row.get(1)?,
            name_japanese: get_opt_string(row, 2)?,
            lesson_id: row.get(3)?,
            created_at,
            updated_at,
        })
    }
}

impl Record for Topic {
    const DESCRIPTOR: EntityDescriptor = EntityDescriptor {
        kind: EntityKind::Topic,
        table: "topics",
        columns: &["id", "name_russian", "name_japanese", "lesson_id", "created_at", "updated_at"],
        conflict_label: Cow::Borrowed("Такая тема"),
        slug_source: None,
        label_field: Some("name_russian"),
    };

    fn id(&self) -> i64 {
        self.id
    }

    fn from_row(row: &libsql::Row) -> Result<Self, DatabaseError> {
        let (created_at, updated_at) = get_timestamps(row, 4)?;
        Ok(Self {
            id: row.get(0)?,
            name_russian: row.get(1)?,
            name_japanese: get_opt_string(row, 2)?,
            lesson_id: row.get(3)?,
            created_at,
            updated_at,
        })
    }
}

impl Record for UsefulLink {
    const DESCRIPTOR: EntityDescriptor = EntityDescriptor {
        kind: EntityKind::UsefulLink,
        table: "useful_links",
        columns: &[
            "id",
            "url",
            "description",
            "entity_type",
            "grammar_id",
            "topic_id",
            "created_at",
            "updated_at",
        ],
        conflict_label: Cow::Borrowed("Такая ссылка"),
        slug_source: None,
        label_field: Some("url"),
    };

    fn id(&self) -> i64 {
        self.id
    }

    fn from_row(row: &libsql::Row) -> Result<Self, DatabaseError> {
        let (created_at, updated_at) = get_timestamps(row, 6)?;
        Ok(Self {
            id: row.get(0)?,
            url: row.get(1)?,
            description: get_opt_string(row, 2)?,
            entity_type: parse_enum(&row.get::<String>(3)?)?,
            grammar_id: row.get::<Option<i64>>(4)?,
            topic_id: row.get::<Option<i64>>(5)?,
            created_at,
            updated_at,
        })
    }
}

impl Record for UserTextbook {
    const DESCRIPTOR: EntityDescriptor = EntityDescriptor {
        kind: EntityKind::UserTextbook,
        table: "user_textbooks",
        columns: &["id", "user_id", "textbook_id", "completed", "created_at", "updated_at"],
        conflict_label: Cow::Borrowed("Такой учебник у пользователя"),
        slug_source: None,
        label_field: None,
    };

    fn id(&self) -> i64 {
        self.id
    }

    fn from_row(row: &libsql::Row) -> Result<Self, DatabaseError> {
        let (created_at, updated_at) = get_timestamps(row, 4)?;
        Ok(Self {
            id: row.get(0)?,
            user_id: row.get(1)?,
            textbook_id: row.get(2)?,
            completed: get_bool(row, 3)?,
            created_at,
            updated_at,
        })
    }
}

impl Record for UserLesson {
    const DESCRIPTOR: EntityDescriptor = EntityDescriptor {
        kind: EntityKind::UserLesson,
        table: "user_lessons",
        columns: &[
            "id",
            "user_id",
            "lesson_id",
            "user_textbook_id",
            "completed",
            "created_at",
            "updated_at",
        ],
        conflict_label: Cow::Borrowed("Такой урок у пользователя"),
        slug_source: None,
        label_field: None,
    };

    fn id(&self) -> i64 {
        self.id
    }

    fn from_row(row: &libsql::Row) -> Result<Self, DatabaseError> {
        let (created_at, updated_at) = get_timestamps(row, 5)?;
        Ok(Self {
            id: row.get(0)?,
            user_id: row.get(1)?,
            lesson_id: row.get(2)?,
            user_textbook_id: row.get(3)?,
            completed: get_bool(row, 4)?,
            created_at,
            updated_at,
        })
    }
}

/// Join rows share one shape: `id, class_id, <target>_id, created_at, updated_at`.
macro_rules! class_join_record {
    ($ty:ty, $kind:expr, $table:literal, $target:ident, $label:literal) => {
        impl Record for $ty {
            const DESCRIPTOR: EntityDescriptor = EntityDescriptor {
                kind: $kind,
                table: $table,
                columns: &[
                    "id",
                    "class_id",
                    stringify!($target),
                    "created_at",
                    "updated_at",
                ],
                conflict_label: Cow::Borrowed($label),
                slug_source: None,
                label_field: None,
            };

            fn id(&self) -> i64 {
                self.id
            }

            fn from_row(row: &libsql::Row) -> Result<Self, DatabaseError> {
                let (created_at, updated_at) = get_timestamps(row, 3)?;
                Ok(Self {
                    id: row.get(0)?,
                    class_id: row.get(1)?,
                    $target: row.get(2)?,
                    created_at,
                    updated_at,
                })
            }
        }

        impl ClassJoin for $ty {
            const TARGET_COLUMN: &'static str = stringify!($target);

            fn class_id(&self) -> i64 {
                self.class_id
            }

            fn target_id(&self) -> i64 {
                self.$target
            }
        }
    };
}

class_join_record!(ClassWord, EntityKind::ClassWord, "class_words", word_id, "Такое слово в занятии");
class_join_record!(
    ClassGrammar,
    EntityKind::ClassGrammar,
    "class_grammars",
    grammar_id,
    "Такая грамматика в занятии"
);
class_join_record!(ClassTopic, EntityKind::ClassTopic, "class_topics", topic_id, "Такая тема в занятии");
class_join_record!(
    ClassUserLesson,
    EntityKind::ClassUserLesson,
    "class_user_lessons",
    user_lesson_id,
    "Такой урок в занятии"
);

/// A class join row: the class plus one row of another table.
pub trait ClassJoin: Record {
    /// Column holding the non-class side.
    const TARGET_COLUMN: &'static str;

    fn class_id(&self) -> i64;

    fn target_id(&self) -> i64;
}

/// Built-in descriptor for `kind`.
#[must_use]
pub const fn descriptor_for(kind: EntityKind) -> EntityDescriptor {
    match kind {
        EntityKind::User => User::DESCRIPTOR,
        EntityKind::Textbook => Textbook::DESCRIPTOR,
        EntityKind::Lesson => Lesson::DESCRIPTOR,
        EntityKind::Class => Class::DESCRIPTOR,
        EntityKind::Word => Word::DESCRIPTOR,
        EntityKind::Grammar => Grammar::DESCRIPTOR,
        EntityKind::Topic => Topic::DESCRIPTOR,
        EntityKind::UsefulLink => UsefulLink::DESCRIPTOR,
        EntityKind::UserTextbook => UserTextbook::DESCRIPTOR,
        EntityKind::UserLesson => UserLesson::DESCRIPTOR,
        EntityKind::ClassWord => ClassWord::DESCRIPTOR,
        EntityKind::ClassGrammar => ClassGrammar::DESCRIPTOR,
        EntityKind::ClassTopic => ClassTopic::DESCRIPTOR,
        EntityKind::ClassUserLesson => ClassUserLesson::DESCRIPTOR,
    }
}

/// Descriptor of every record type, in [`EntityKind::ALL`] order.
#[must_use]
pub fn all_descriptors() -> [EntityDescriptor; 14] {
    EntityKind::ALL.map(descriptor_for)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descriptors_follow_kind_order() {
        for (descriptor, kind) in all_descriptors().iter().zip(EntityKind::ALL) {
            assert_eq!(descriptor.kind, kind);
        }
    }

    #[test]
    fn every_table_has_id_and_timestamps() {
        for descriptor in all_descriptors() {
            let cols = descriptor.columns;
            assert_eq!(cols.first(), Some(&"id"), "{}", descriptor.table);
            assert_eq!(&cols[cols.len() - 2..], &["created_at", "updated_at"]);
        }
    }

    #[test]
    fn slug_sources_are_real_columns() {
        for descriptor in all_descriptors() {
            if let Some(source) = &descriptor.slug_source {
                assert!(descriptor.has_column(source), "{}", descriptor.table);
                assert!(descriptor.has_column("slug"), "{}", descriptor.table);
            }
            if let Some(label) = descriptor.label_field {
                assert!(descriptor.has_column(label), "{}", descriptor.table);
            }
        }
    }

    #[test]
    fn join_target_columns_exist() {
        assert!(ClassWord::DESCRIPTOR.has_column(ClassWord::TARGET_COLUMN));
        assert!(ClassGrammar::DESCRIPTOR.has_column(ClassGrammar::TARGET_COLUMN));
        assert!(ClassTopic::DESCRIPTOR.has_column(ClassTopic::TARGET_COLUMN));
        assert!(ClassUserLesson::DESCRIPTOR.has_column(ClassUserLesson::TARGET_COLUMN));
    }
}
