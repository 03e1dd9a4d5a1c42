//! Enrollment workflow: a user-textbook row plus one user-lesson row per
//! lesson of the textbook, committed together or not at all.
//!
//! Steps share one transaction:
//! 1. Insert the `UserTextbook` (a unique violation becomes `AlreadyEnrolled`)
//! 2. Load the textbook's lessons
//! 3. Bulk insert the `UserLesson` rows
//! 4. Commit, or roll back everything on the first error

use kotoba_core::entities::{NewUserLesson, NewUserTextbook};
use kotoba_core::responses::EnrollmentResponse;
use serde_json::json;

use crate::descriptor::{fields, to_fields};
use crate::error::DatabaseError;
use crate::service::KotobaService;

impl KotobaService {
    /// Enroll `user_id` in `textbook_id`.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::AlreadyEnrolled` for a repeated enrollment,
    /// `DanglingReference` for an unknown user or textbook, or the error of
    /// the failing lesson row. Nothing is written in any error case.
    pub async fn enroll(
        &self,
        user_id: i64,
        textbook_id: i64,
    ) -> Result<EnrollmentResponse, DatabaseError> {
        let tx = self.db().transaction().await?;
        match self.enroll_in(&tx, user_id, textbook_id).await {
            Ok(response) => {
                tx.commit().await?;
                tracing::info!(
                    user_id,
                    textbook_id,
                    user_textbook_id = response.user_textbook.id,
                    lessons = response.lessons_created,
                    "enrollment committed"
                );
                Ok(response)
            }
            Err(error) => {
                tracing::warn!(user_id, textbook_id, %error, "enrollment rolled back");
                if let Err(rollback) = tx.rollback().await {
                    tracing::warn!(error = %rollback, "rollback failed");
                }
                Err(error)
            }
        }
    }

    async fn enroll_in(
        &self,
        conn: &libsql::Connection,
        user_id: i64,
        textbook_id: i64,
    ) -> Result<EnrollmentResponse, DatabaseError> {
        let enrollment = NewUserTextbook {
            user_id,
            textbook_id,
            completed: false,
        };
        let user_textbook = self
            .user_textbooks
            .insert(conn, to_fields(&enrollment)?)
            .await
            .map_err(|error| match error {
                DatabaseError::AlreadyExists { .. } => DatabaseError::AlreadyEnrolled {
                    user_id,
                    textbook_id,
                },
                other => other,
            })?;

        let lessons = self
            .lessons
            .get_all_matching(conn, &fields([("textbook_id", json!(textbook_id))]))
            .await?;
        let batch = lessons
            .iter()
            .map(|lesson| {
                to_fields(&NewUserLesson {
                    user_id,
                    lesson_id: lesson.id,
                    user_textbook_id: user_textbook.id,
                    completed: false,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        let created = self.user_lessons.insert_bulk(conn, batch).await?;

        Ok(EnrollmentResponse {
            user_textbook,
            lessons_created: created.len() as u64,
        })
    }
}

#[cfg(test)]
mod tests {
    use kotoba_core::entities::NewLesson;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::Fields;
    use crate::test_support::helpers::{seed_textbook, seed_user, test_service};

    #[tokio::test]
    async fn enroll_creates_one_row_per_lesson() {
        let svc = test_service().await;
        let user = seed_user(&svc, "Nina").await;
        let (book, lessons) = seed_textbook(&svc, "Genki", &["L1", "L2", "L3"]).await;

        let response = svc.enroll(user.id, book.id).await.unwrap();
        assert_eq!(response.lessons_created, 3);
        assert_eq!(response.user_textbook.user_id, user.id);
        assert!(!response.user_textbook.completed);

        let rows = svc
            .user_lessons()
            .get_all_matching(svc.db().conn(), &Fields::new())
            .await
            .unwrap();
        let lesson_ids: Vec<_> = rows.iter().map(|r| r.lesson_id).collect();
        assert_eq!(lesson_ids, lessons.iter().map(|l| l.id).collect::<Vec<_>>());
        assert!(rows.iter().all(|r| r.user_textbook_id == response.user_textbook.id));
    }

    #[tokio::test]
    async fn second_enrollment_is_rejected_and_changes_nothing() {
        let svc = test_service().await;
        let user = seed_user(&svc, "Oleg").await;
        let (book, _) = seed_textbook(&svc, "Genki", &["L1", "L2"]).await;
        svc.enroll(user.id, book.id).await.unwrap();

        let err = svc.enroll(user.id, book.id).await.unwrap_err();
        assert!(
            matches!(err, DatabaseError::AlreadyEnrolled { user_id, textbook_id }
                if user_id == user.id && textbook_id == book.id),
            "{err:?}"
        );

        let conn = svc.db().conn();
        assert_eq!(svc.user_textbooks().count_matching(conn, &Fields::new()).await.unwrap(), 1);
        assert_eq!(svc.user_lessons().count_matching(conn, &Fields::new()).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn enrollment_in_empty_textbook_creates_no_lessons() {
        let svc = test_service().await;
        let user = seed_user(&svc, "Pavel").await;
        let (book, _) = seed_textbook(&svc, "Empty", &[]).await;
        let response = svc.enroll(user.id, book.id).await.unwrap();
        assert_eq!(response.lessons_created, 0);
    }

    #[tokio::test]
    async fn failing_lesson_row_rolls_back_the_enrollment() {
        let svc = test_service().await;
        let user = seed_user(&svc, "Rita").await;
        let (book, lessons) = seed_textbook(&svc, "Genki", &["L1", "L2"]).await;
        let (other, _) = seed_textbook(&svc, "Other", &[]).await;
        let conn = svc.db().conn();

        // A stray user-lesson for L2 under a different enrollment.
        let stray = svc
            .user_textbooks()
            .insert(
                conn,
                to_fields(&NewUserTextbook {
                    user_id: user.id,
                    textbook_id: other.id,
                    completed: false,
                })
                .unwrap(),
            )
            .await
            .unwrap();
        svc.user_lessons()
            .insert(
                conn,
                to_fields(&NewUserLesson {
                    user_id: user.id,
                    lesson_id: lessons[1].id,
                    user_textbook_id: stray.id,
                    completed: false,
                })
                .unwrap(),
            )
            .await
            .unwrap();

        let err = svc.enroll(user.id, book.id).await.unwrap_err();
        assert!(matches!(err, DatabaseError::AlreadyExists { .. }), "{err:?}");

        let for_book = fields([("textbook_id", json!(book.id))]);
        assert_eq!(svc.user_textbooks().count_matching(conn, &for_book).await.unwrap(), 0);
        assert_eq!(svc.user_lessons().count_matching(conn, &Fields::new()).await.unwrap(), 1);

        // The connection is usable again after the rollback.
        svc.create_lesson(NewLesson {
            name: "L3".into(),
            slug: None,
            textbook_id: book.id,
        })
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn unknown_textbook_is_a_dangling_reference() {
        let svc = test_service().await;
        let user = seed_user(&svc, "Sasha").await;
        let err = svc.enroll(user.id, 404).await.unwrap_err();
        assert!(matches!(err, DatabaseError::DanglingReference(_)), "{err:?}");
    }
}
