//! Entity kinds and tag enums for Kotoba.
//!
//! All enums use `snake_case` serialization via `#[serde(rename_all = "snake_case")]`
//! and expose `as_str()` for SQL storage.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// EntityKind
// ---------------------------------------------------------------------------

/// Every entity type in the data model, primary and association alike.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    User,
    Textbook,
    Lesson,
    Class,
    Word,
    Grammar,
    Topic,
    UsefulLink,
    UserTextbook,
    UserLesson,
    ClassWord,
    ClassGrammar,
    ClassTopic,
    ClassUserLesson,
}

impl EntityKind {
    /// All kinds, primary entities first.
    pub const ALL: [Self; 14] = [
        Self::User,
        Self::Textbook,
        Self::Lesson,
        Self::Class,
        Self::Word,
        Self::Grammar,
        Self::Topic,
        Self::UsefulLink,
        Self::UserTextbook,
        Self::UserLesson,
        Self::ClassWord,
        Self::ClassGrammar,
        Self::ClassTopic,
        Self::ClassUserLesson,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Textbook => "textbook",
            Self::Lesson => "lesson",
            Self::Class => "class",
            Self::Word => "word",
            Self::Grammar => "grammar",
            Self::Topic => "topic",
            Self::UsefulLink => "useful_link",
            Self::UserTextbook => "user_textbook",
            Self::UserLesson => "user_lesson",
            Self::ClassWord => "class_word",
            Self::ClassGrammar => "class_grammar",
            Self::ClassTopic => "class_topic",
            Self::ClassUserLesson => "class_user_lesson",
        }
    }

    /// Whether this kind is a pure join row between two primary entities.
    #[must_use]
    pub const fn is_association(self) -> bool {
        matches!(
            self,
            Self::UserTextbook
                | Self::UserLesson
                | Self::ClassWord
                | Self::ClassGrammar
                | Self::ClassTopic
                | Self::ClassUserLesson
        )
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// LinkTarget
// ---------------------------------------------------------------------------

/// Which kind of study material a useful link points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum LinkTarget {
    Grammar,
    Topic,
}

impl LinkTarget {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Grammar => "grammar",
            Self::Topic => "topic",
        }
    }
}

impl fmt::Display for LinkTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
