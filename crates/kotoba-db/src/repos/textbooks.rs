//! Textbook and lesson repository.

use kotoba_core::entities::{Lesson, NewLesson, NewTextbook, Textbook};
use serde_json::json;

use crate::descriptor::{Fields, fields, to_fields};
use crate::error::DatabaseError;
use crate::service::KotobaService;

impl KotobaService {
    /// # Errors
    ///
    /// Returns `AlreadyExists` ("Такой учебник") for a duplicate name.
    pub async fn create_textbook(&self, textbook: NewTextbook) -> Result<Textbook, DatabaseError> {
        self.textbooks
            .insert_with_derived_slug(self.conn(), to_fields(&textbook)?)
            .await
    }

    /// # Errors
    ///
    /// Returns `DatabaseError::Timeout` or `Storage` when the query fails.
    pub async fn list_textbooks(&self) -> Result<Vec<Textbook>, DatabaseError> {
        self.textbooks.get_all_matching(self.conn(), &Fields::new()).await
    }

    /// # Errors
    ///
    /// Returns `DatabaseError::NotFound` when no textbook has this id.
    pub async fn get_textbook(&self, id: i64) -> Result<Textbook, DatabaseError> {
        self.textbooks
            .get_by_id(self.conn(), id)
            .await?
            .ok_or_else(|| DatabaseError::NotFound {
                entity: "textbook".into(),
                detail: format!("id = {id}"),
            })
    }

    /// # Errors
    ///
    /// Returns `AlreadyExists` when the textbook already has a lesson with
    /// this name, `DanglingReference` for an unknown textbook.
    pub async fn create_lesson(&self, lesson: NewLesson) -> Result<Lesson, DatabaseError> {
        self.lessons
            .insert_with_derived_slug(self.conn(), to_fields(&lesson)?)
            .await
    }

    /// Create several lessons at once, deriving missing slugs.
    ///
    /// The `(name, textbook_id)` constraint decides: one duplicate fails the
    /// whole batch and nothing is inserted.
    ///
    /// # Errors
    ///
    /// Returns the first failing lesson's error.
    pub async fn create_lessons(&self, lessons: Vec<NewLesson>) -> Result<Vec<Lesson>, DatabaseError> {
        let mut batch = Vec::with_capacity(lessons.len());
        for lesson in &lessons {
            let mut payload = to_fields(lesson)?;
            self.lessons.derive_slug(&mut payload);
            batch.push(payload);
        }
        self.lessons.insert_bulk(self.conn(), batch).await
    }

    /// Lessons of one textbook, in creation order.
    ///
    /// An unknown textbook yields an empty list.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Timeout` or `Storage` when the query fails.
    pub async fn lessons_of(&self, textbook_id: i64) -> Result<Vec<Lesson>, DatabaseError> {
        self.lessons
            .get_all_matching(self.conn(), &fields([("textbook_id", json!(textbook_id))]))
            .await
    }
}
