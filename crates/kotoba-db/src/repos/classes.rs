//! Class repository: class records and the four class join tables.
//!
//! A class's words, grammar, topics and user-lessons are resolved by id
//! lookup over the join rows; nothing holds a pointer back to its class.

use std::collections::HashMap;

use kotoba_core::entities::{
    Class, ClassGrammar, ClassTopic, ClassUserLesson, ClassWord, NewClass, NewClassLink,
};
use kotoba_core::responses::ClassDetail;
use serde_json::{Value, json};

use crate::descriptor::{Record, fields, to_fields};
use crate::error::DatabaseError;
use crate::records::ClassJoin;
use crate::repos::progress::index_by_id;
use crate::service::KotobaService;
use crate::store::RecordStore;

impl KotobaService {
    /// Create a class for `user_id`. The slug is always derived from the
    /// class name; any slug on the payload is ignored.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyExists` ("Такое занятие") when the user already has a
    /// class on that date.
    pub async fn create_class(&self, user_id: i64, mut class: NewClass) -> Result<Class, DatabaseError> {
        class.user_id = user_id;
        class.slug = None;
        let created = self
            .classes
            .insert_with_derived_slug(self.conn(), to_fields(&class)?)
            .await?;
        tracing::info!(class_id = created.id, user_id, date = %created.class_date, "class created");
        Ok(created)
    }

    /// Every class of the user, by date of creation, with its material.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` when a class or one of its join tables cannot
    /// be read.
    pub async fn user_classes(&self, user_id: i64) -> Result<Vec<ClassDetail>, DatabaseError> {
        let classes = self
            .classes
            .get_all_matching(self.conn(), &fields([("user_id", json!(user_id))]))
            .await?;
        self.class_details(classes).await
    }

    /// # Errors
    ///
    /// Returns `DatabaseError::NotFound` when no class has this id.
    pub async fn get_class(&self, class_id: i64) -> Result<ClassDetail, DatabaseError> {
        let class = self
            .classes
            .get_by_id(self.conn(), class_id)
            .await?
            .ok_or_else(|| DatabaseError::NotFound {
                entity: "class".into(),
                detail: format!("id = {class_id}"),
            })?;
        let mut details = self.class_details(vec![class]).await?;
        details.pop().ok_or_else(|| DatabaseError::NotFound {
            entity: "class".into(),
            detail: format!("id = {class_id}"),
        })
    }

    /// # Errors
    ///
    /// Returns `AlreadyExists` when the word is already attached to the
    /// class, `DanglingReference` when either side does not exist.
    pub async fn attach_word(&self, link: NewClassLink) -> Result<ClassWord, DatabaseError> {
        attach(self.conn(), &self.class_words, link).await
    }

    /// # Errors
    ///
    /// Returns `AlreadyExists` when the grammar point is already attached to the
    /// class, `DanglingReference` when either side does not exist.
    pub async fn attach_grammar(&self, link: NewClassLink) -> Result<ClassGrammar, DatabaseError> {
        attach(self.conn(), &self.class_grammars, link).await
    }

    /// # Errors
    ///
    /// Returns `AlreadyExists` when the topic is already attached to the
    /// class, `DanglingReference` when either side does not exist.
    pub async fn attach_topic(&self, link: NewClassLink) -> Result<ClassTopic, DatabaseError> {
        attach(self.conn(), &self.class_topics, link).await
    }

    /// # Errors
    ///
    /// Returns `AlreadyExists` when the lesson is already attached to the
    /// class, `DanglingReference` when either side does not exist.
    pub async fn attach_user_lesson(
        &self,
        link: NewClassLink,
    ) -> Result<ClassUserLesson, DatabaseError> {
        attach(self.conn(), &self.class_user_lessons, link).await
    }

    /// # Errors
    ///
    /// Returns `DatabaseError::NotFound` when the word is not attached.
    pub async fn detach_word(&self, link: NewClassLink) -> Result<(), DatabaseError> {
        detach(self.conn(), &self.class_words, link).await
    }

    /// # Errors
    ///
    /// Returns `DatabaseError::NotFound` when the grammar point is not attached.
    pub async fn detach_grammar(&self, link: NewClassLink) -> Result<(), DatabaseError> {
        detach(self.conn(), &self.class_grammars, link).await
    }

    /// # Errors
    ///
    /// Returns `DatabaseError::NotFound` when the topic is not attached.
    pub async fn detach_topic(&self, link: NewClassLink) -> Result<(), DatabaseError> {
        detach(self.conn(), &self.class_topics, link).await
    }

    /// # Errors
    ///
    /// Returns `DatabaseError::NotFound` when the lesson is not attached.
    pub async fn detach_user_lesson(&self, link: NewClassLink) -> Result<(), DatabaseError> {
        detach(self.conn(), &self.class_user_lessons, link).await
    }

    async fn class_details(&self, classes: Vec<Class>) -> Result<Vec<ClassDetail>, DatabaseError> {
        let class_ids: Vec<Value> = classes.iter().map(|c| json!(c.id)).collect();
        let mut words = self.material(&self.class_words, &self.words, &class_ids).await?;
        let mut grammar = self
            .material(&self.class_grammars, &self.grammars, &class_ids)
            .await?;
        let mut topics = self.material(&self.class_topics, &self.topics, &class_ids).await?;
        let mut user_lessons = self
            .material(&self.class_user_lessons, &self.user_lessons, &class_ids)
            .await?;

        Ok(classes
            .into_iter()
            .map(|class| ClassDetail {
                words: words.remove(&class.id).unwrap_or_default(),
                grammar: grammar.remove(&class.id).unwrap_or_default(),
                topics: topics.remove(&class.id).unwrap_or_default(),
                user_lessons: user_lessons.remove(&class.id).unwrap_or_default(),
                class,
            })
            .collect())
    }

    /// Rows of `targets` linked to each class through `joins`, keyed by class id.
    async fn material<J: ClassJoin, T: Record + Clone>(
        &self,
        joins: &RecordStore<J>,
        targets: &RecordStore<T>,
        class_ids: &[Value],
    ) -> Result<HashMap<i64, Vec<T>>, DatabaseError> {
        let conn = self.conn();
        let links = joins.get_all_by_membership(conn, "class_id", class_ids).await?;
        let target_ids: Vec<Value> = links.iter().map(|l| json!(l.target_id())).collect();
        let rows = index_by_id(targets.get_all_by_membership(conn, "id", &target_ids).await?);

        let mut by_class: HashMap<i64, Vec<T>> = HashMap::new();
        for link in links {
            if let Some(row) = rows.get(&link.target_id()) {
                by_class.entry(link.class_id()).or_default().push(row.clone());
            }
        }
        Ok(by_class)
    }
}

fn link_fields<J: ClassJoin>(link: NewClassLink) -> crate::Fields {
    fields([
        ("class_id", json!(link.class_id)),
        (J::TARGET_COLUMN, json!(link.target_id)),
    ])
}

async fn attach<J: ClassJoin>(
    conn: &libsql::Connection,
    store: &RecordStore<J>,
    link: NewClassLink,
) -> Result<J, DatabaseError> {
    store.insert(conn, link_fields::<J>(link)).await
}

async fn detach<J: ClassJoin>(
    conn: &libsql::Connection,
    store: &RecordStore<J>,
    link: NewClassLink,
) -> Result<(), DatabaseError> {
    store.delete(conn, &link_fields::<J>(link)).await
}
