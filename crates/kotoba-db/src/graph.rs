//! The entity graph as data.
//!
//! Every foreign key and uniqueness rule of the model is declared here and
//! checked against what `SQLite` actually reports for the migrated schema, so a
//! migration that drops a cascade or a UNIQUE constraint fails on open instead
//! of silently weakening integrity.

use std::collections::BTreeSet;

use kotoba_core::enums::EntityKind;

use crate::error::DatabaseError;
use crate::records::descriptor_for;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnDelete {
    Cascade,
}

impl OnDelete {
    #[must_use]
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::Cascade => "CASCADE",
        }
    }
}

/// `child.column` references `parent.id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Relation {
    pub child: EntityKind,
    pub column: &'static str,
    pub parent: EntityKind,
    pub on_delete: OnDelete,
}

/// The listed columns of `kind` are unique together.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UniqueRule {
    pub kind: EntityKind,
    pub columns: &'static [&'static str],
}

const fn cascade(child: EntityKind, column: &'static str, parent: EntityKind) -> Relation {
    Relation {
        child,
        column,
        parent,
        on_delete: OnDelete::Cascade,
    }
}

pub const RELATIONS: [Relation; 20] = {
    use EntityKind as K;
    [
        cascade(K::Lesson, "textbook_id", K::Textbook),
        cascade(K::Class, "user_id", K::User),
        cascade(K::Word, "lesson_id", K::Lesson),
        cascade(K::Grammar, "lesson_id", K::Lesson),
        cascade(K::Topic, "lesson_id", K::Lesson),
        cascade(K::UsefulLink, "grammar_id", K::Grammar),
        cascade(K::UsefulLink, "topic_id", K::Topic),
        cascade(K::UserTextbook, "user_id", K::User),
        cascade(K::UserTextbook, "textbook_id", K::Textbook),
        cascade(K::UserLesson, "user_id", K::User),
        cascade(K::UserLesson, "lesson_id", K::Lesson),
        cascade(K::UserLesson, "user_textbook_id", K::UserTextbook),
        cascade(K::ClassWord, "class_id", K::Class),
        cascade(K::ClassWord, "word_id", K::Word),
        cascade(K::ClassGrammar, "class_id", K::Class),
        cascade(K::ClassGrammar, "grammar_id", K::Grammar),
        cascade(K::ClassTopic, "class_id", K::Class),
        cascade(K::ClassTopic, "topic_id", K::Topic),
        cascade(K::ClassUserLesson, "class_id", K::Class),
        cascade(K::ClassUserLesson, "user_lesson_id", K::UserLesson),
    ]
};

pub const UNIQUE_RULES: [UniqueRule; 14] = {
    use EntityKind as K;
    [
        UniqueRule { kind: K::User, columns: &["email"] },
        UniqueRule { kind: K::Textbook, columns: &["name"] },
        UniqueRule { kind: K::Lesson, columns: &["name", "textbook_id"] },
        UniqueRule { kind: K::Class, columns: &["class_date", "user_id"] },
        UniqueRule { kind: K::Word, columns: &["kana", "translation"] },
        UniqueRule { kind: K::Grammar, columns: &["name_russian"] },
        UniqueRule { kind: K::Topic, columns: &["name_russian"] },
        UniqueRule { kind: K::UsefulLink, columns: &["url"] },
        UniqueRule { kind: K::UserTextbook, columns: &["user_id", "textbook_id"] },
        UniqueRule { kind: K::UserLesson, columns: &["user_id", "lesson_id"] },
        UniqueRule { kind: K::ClassWord, columns: &["class_id", "word_id"] },
        UniqueRule { kind: K::ClassGrammar, columns: &["class_id", "grammar_id"] },
        UniqueRule { kind: K::ClassTopic, columns: &["class_id", "topic_id"] },
        UniqueRule { kind: K::ClassUserLesson, columns: &["class_id", "user_lesson_id"] },
    ]
};

/// Every declared relation.
pub fn relations() -> impl Iterator<Item = Relation> {
    RELATIONS.into_iter()
}

/// Relations whose parent is `kind`: the rows deleted along with it.
pub fn dependents_of(kind: EntityKind) -> impl Iterator<Item = Relation> {
    relations().filter(move |r| r.parent == kind)
}

/// Relations whose child is `kind`: the rows it references.
pub fn references_of(kind: EntityKind) -> impl Iterator<Item = Relation> {
    relations().filter(move |r| r.child == kind)
}

/// Compare the declared graph with the live schema.
///
/// # Errors
///
/// Returns `DatabaseError::Migration` naming the first missing or weakened
/// rule.
pub async fn verify(conn: &libsql::Connection) -> Result<(), DatabaseError> {
    for kind in EntityKind::ALL {
        let table = descriptor_for(kind).table;
        let live = foreign_keys(conn, table).await?;
        for relation in references_of(kind) {
            let parent = descriptor_for(relation.parent).table;
            let expected = (
                relation.column.to_string(),
                parent.to_string(),
                relation.on_delete.as_sql().to_string(),
            );
            if !live.contains(&expected) {
                return Err(DatabaseError::Migration(format!(
                    "{table}.{} must reference {parent}(id) ON DELETE {}",
                    relation.column,
                    relation.on_delete.as_sql()
                )));
            }
        }

        let unique = unique_column_sets(conn, table).await?;
        for rule in UNIQUE_RULES.iter().filter(|r| r.kind == kind) {
            let expected: BTreeSet<String> = rule.columns.iter().map(ToString::to_string).collect();
            if !unique.contains(&expected) {
                return Err(DatabaseError::Migration(format!(
                    "{table} is missing UNIQUE ({})",
                    rule.columns.join(", ")
                )));
            }
        }
    }
    Ok(())
}

/// `(from_column, parent_table, on_delete)` for each foreign key of `table`.
async fn foreign_keys(
    conn: &libsql::Connection,
    table: &str,
) -> Result<Vec<(String, String, String)>, DatabaseError> {
    let mut rows = conn
        .query(
            "SELECT \"from\", \"table\", on_delete FROM pragma_foreign_key_list(?1)",
            [table],
        )
        .await?;
    let mut out = Vec::new();
    while let Some(row) = rows.next().await? {
        out.push((row.get(0)?, row.get(1)?, row.get(2)?));
    }
    Ok(out)
}

/// Column sets of every UNIQUE constraint on `table`.
async fn unique_column_sets(
    conn: &libsql::Connection,
    table: &str,
) -> Result<Vec<BTreeSet<String>>, DatabaseError> {
    let mut rows = conn
        .query(
            "SELECT il.name, ii.name
             FROM pragma_index_list(?1) AS il, pragma_index_info(il.name) AS ii
             WHERE il.\"unique\" = 1
             ORDER BY il.name, ii.seqno",
            [table],
        )
        .await?;
    let mut sets: Vec<(String, BTreeSet<String>)> = Vec::new();
    while let Some(row) = rows.next().await? {
        let index: String = row.get(0)?;
        let column: String = row.get(1)?;
        match sets.last_mut() {
            Some((name, cols)) if *name == index => {
                cols.insert(column);
            }
            _ => sets.push((index, BTreeSet::from([column]))),
        }
    }
    Ok(sets.into_iter().map(|(_, cols)| cols).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::helpers::test_db;

    #[test]
    fn every_relation_column_exists() {
        for relation in relations() {
            let child = descriptor_for(relation.child);
            assert!(
                child.has_column(relation.column),
                "{}.{}",
                child.table,
                relation.column
            );
        }
        assert_eq!(relations().count(), 20);
    }

    #[test]
    fn every_unique_column_exists() {
        for rule in UNIQUE_RULES {
            let descriptor = descriptor_for(rule.kind);
            for column in rule.columns {
                assert!(descriptor.has_column(column), "{}.{column}", descriptor.table);
            }
        }
    }

    #[test]
    fn association_kinds_reference_both_sides() {
        for kind in EntityKind::ALL.into_iter().filter(|k| k.is_association()) {
            assert!(references_of(kind).count() >= 2, "{kind}");
        }
    }

    #[test]
    fn deleting_a_user_reaches_classes_and_progress() {
        let children: Vec<_> = dependents_of(EntityKind::User).map(|r| r.child).collect();
        assert!(children.contains(&EntityKind::Class));
        assert!(children.contains(&EntityKind::UserTextbook));
        assert!(children.contains(&EntityKind::UserLesson));
    }

    #[tokio::test]
    async fn migrated_schema_matches_declarations() {
        let db = test_db().await;
        verify(db.conn()).await.unwrap();
    }

    #[tokio::test]
    async fn weakened_schema_is_detected() {
        let db = test_db().await;
        db.conn()
            .execute_batch(
                "PRAGMA foreign_keys = OFF;
                 DROP TABLE class_words;
                 CREATE TABLE class_words (
                     id INTEGER PRIMARY KEY AUTOINCREMENT,
                     class_id INTEGER NOT NULL REFERENCES classes(id),
                     word_id INTEGER NOT NULL REFERENCES words(id) ON DELETE CASCADE,
                     created_at TEXT NOT NULL DEFAULT (datetime('now')),
                     updated_at TEXT NOT NULL DEFAULT (datetime('now')),
                     UNIQUE (class_id, word_id)
                 );",
            )
            .await
            .unwrap();
        let err = verify(db.conn()).await.unwrap_err();
        assert!(err.to_string().contains("class_words.class_id"), "{err}");
    }
}
