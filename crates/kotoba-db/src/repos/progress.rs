//! Completion flags and the per-user progress view.

use std::collections::HashMap;

use kotoba_core::entities::{UserLesson, UserTextbook};
use kotoba_core::responses::{LessonProgress, TextbookProgress};
use serde_json::{Value, json};

use crate::descriptor::{Record, fields};
use crate::error::DatabaseError;
use crate::service::KotobaService;
use crate::store::RecordStore;

impl KotobaService {
    /// # Errors
    ///
    /// Returns `DatabaseError::NotFound` when no user-lesson has this id.
    pub async fn set_lesson_completed(
        &self,
        user_lesson_id: i64,
        completed: bool,
    ) -> Result<UserLesson, DatabaseError> {
        self.set_completed(&self.user_lessons, user_lesson_id, completed)
            .await
    }

    /// # Errors
    ///
    /// Returns `DatabaseError::NotFound` when no user-textbook has this id.
    pub async fn set_textbook_completed(
        &self,
        user_textbook_id: i64,
        completed: bool,
    ) -> Result<UserTextbook, DatabaseError> {
        self.set_completed(&self.user_textbooks, user_textbook_id, completed)
            .await
    }

    /// Every textbook the user is enrolled in, with its lessons.
    pub async fn user_progress(&self, user_id: i64) -> Result<Vec<TextbookProgress>, DatabaseError> {
        let conn = self.conn();
        let by_user = fields([("user_id", json!(user_id))]);

        let enrollments = self.user_textbooks.get_all_matching(conn, &by_user).await?;
        let textbook_ids: Vec<Value> = enrollments.iter().map(|e| json!(e.textbook_id)).collect();
        let textbooks = index_by_id(
            self.textbooks
                .get_all_by_membership(conn, "id", &textbook_ids)
                .await?,
        );

        let user_lessons = self.user_lessons.get_all_matching(conn, &by_user).await?;
        let lesson_ids: Vec<Value> = user_lessons.iter().map(|ul| json!(ul.lesson_id)).collect();
        let lessons = index_by_id(self.lessons.get_all_by_membership(conn, "id", &lesson_ids).await?);

        let mut lessons_by_enrollment: HashMap<i64, Vec<LessonProgress>> = HashMap::new();
        for ul in user_lessons {
            let name = lessons
                .get(&ul.lesson_id)
                .map(|l| l.name.clone())
                .unwrap_or_default();
            lessons_by_enrollment
                .entry(ul.user_textbook_id)
                .or_default()
                .push(LessonProgress {
                    user_lesson_id: ul.id,
                    lesson_id: ul.lesson_id,
                    name,
                    completed: ul.completed,
                });
        }

        Ok(enrollments
            .into_iter()
            .map(|enrollment| TextbookProgress {
                user_textbook_id: enrollment.id,
                textbook_id: enrollment.textbook_id,
                name: textbooks
                    .get(&enrollment.textbook_id)
                    .map(|t| t.name.clone())
                    .unwrap_or_default(),
                completed: enrollment.completed,
                lessons: lessons_by_enrollment.remove(&enrollment.id).unwrap_or_default(),
            })
            .collect())
    }

    async fn set_completed<T: Record>(
        &self,
        store: &RecordStore<T>,
        id: i64,
        completed: bool,
    ) -> Result<T, DatabaseError> {
        let by_id = fields([("id", json!(id))]);
        let updated = store
            .update(self.conn(), &by_id, fields([("completed", json!(completed))]))
            .await?;
        if updated == 0 {
            return Err(DatabaseError::NotFound {
                entity: store.descriptor().kind.to_string(),
                detail: format!("id = {id}"),
            });
        }
        tracing::debug!(table = store.descriptor().table, id, completed, "completion updated");
        store
            .get_by_id(self.conn(), id)
            .await?
            .ok_or_else(|| DatabaseError::NotFound {
                entity: store.descriptor().kind.to_string(),
                detail: format!("id = {id}"),
            })
    }
}

/// Arena lookup: rows keyed by their id.
pub(crate) fn index_by_id<T: Record>(rows: Vec<T>) -> HashMap<i64, T> {
    rows.into_iter().map(|row| (row.id(), row)).collect()
}
