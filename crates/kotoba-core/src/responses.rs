//! Response types returned as JSON by `kotoba` commands.
//!
//! These structs define the shape of JSON output for commands like
//! `kotoba enroll`, `kotoba progress show`, `kotoba class list` and
//! `kotoba user login`.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::{Class, Grammar, Topic, UserLesson, UserTextbook, Word};

/// Response from `kotoba enroll`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct EnrollmentResponse {
    pub user_textbook: UserTextbook,
    pub lessons_created: u64,
}

/// One enrolled lesson inside [`TextbookProgress`].
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct LessonProgress {
    pub user_lesson_id: i64,
    pub lesson_id: i64,
    pub name: String,
    pub completed: bool,
}

/// One enrolled textbook with its lessons, from `kotoba progress show`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct TextbookProgress {
    pub user_textbook_id: i64,
    pub textbook_id: i64,
    pub name: String,
    pub completed: bool,
    pub lessons: Vec<LessonProgress>,
}

impl TextbookProgress {
    /// Number of completed lessons.
    #[must_use]
    pub fn completed_lessons(&self) -> usize {
        self.lessons.iter().filter(|l| l.completed).count()
    }
}

/// A class with everything studied in it, resolved by id lookup.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ClassDetail {
    pub class: Class,
    pub words: Vec<Word>,
    pub grammar: Vec<Grammar>,
    pub topics: Vec<Topic>,
    pub user_lessons: Vec<UserLesson>,
}

/// Response from `kotoba user login`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct LoginResponse {
    pub user_id: i64,
    pub access_token: String,
}

/// Response from bulk operations that only report a row count.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct CountResponse {
    pub affected: u64,
}
