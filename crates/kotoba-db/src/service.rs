//! Service layer owning the database handle and one record store per table.
//!
//! `KotobaService` wraps `KotobaDb` (raw database access), the credential
//! service and a `RecordStore` for every entity. Stores are built from the
//! built-in descriptors with `[entities.<kind>]` overrides applied. All
//! domain operations are implemented as `impl KotobaService` blocks in
//! [`crate::repos`] and [`crate::enrollment`].

use kotoba_auth::CredentialService;
use kotoba_config::KotobaConfig;
use kotoba_core::entities::{
    Class, ClassGrammar, ClassTopic, ClassUserLesson, ClassWord, Grammar, Lesson, Textbook, Topic,
    UsefulLink, User, UserLesson, UserTextbook, Word,
};

use crate::KotobaDb;
use crate::descriptor::Record;
use crate::error::DatabaseError;
use crate::store::RecordStore;

pub struct KotobaService {
    db: KotobaDb,
    credentials: Option<CredentialService>,
    bcrypt_cost: u32,
    pub(crate) users: RecordStore<User>,
    pub(crate) textbooks: RecordStore<Textbook>,
    pub(crate) lessons: RecordStore<Lesson>,
    pub(crate) classes: RecordStore<Class>,
    pub(crate) words: RecordStore<Word>,
    pub(crate) grammars: RecordStore<Grammar>,
    pub(crate) topics: RecordStore<Topic>,
    pub(crate) links: RecordStore<UsefulLink>,
    pub(crate) user_textbooks: RecordStore<UserTextbook>,
    pub(crate) user_lessons: RecordStore<UserLesson>,
    pub(crate) class_words: RecordStore<ClassWord>,
    pub(crate) class_grammars: RecordStore<ClassGrammar>,
    pub(crate) class_topics: RecordStore<ClassTopic>,
    pub(crate) class_user_lessons: RecordStore<ClassUserLesson>,
}

impl KotobaService {
    /// Open the configured database and build the service on top of it.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened, migrations
    /// fail, or an entity override names an unknown column.
    pub async fn open(config: &KotobaConfig) -> Result<Self, DatabaseError> {
        let db = KotobaDb::open(&config.database).await?;
        Self::new(db, config)
    }

    /// Build the service around an already opened database.
    ///
    /// Token operations are unavailable when `auth.secret_key` is empty;
    /// everything else works without it.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::UnknownColumn` if an `[entities.<kind>]`
    /// override names a slug source the table does not have.
    pub fn new(db: KotobaDb, config: &KotobaConfig) -> Result<Self, DatabaseError> {
        let credentials = config.auth.is_configured().then(|| {
            CredentialService::new(
                &config.auth.secret_key,
                config.auth.token_ttl_minutes,
                config.auth.bcrypt_cost,
            )
        });
        Ok(Self {
            db,
            credentials,
            bcrypt_cost: config.auth.bcrypt_cost,
            users: store(config)?,
            textbooks: store(config)?,
            lessons: store(config)?,
            classes: store(config)?,
            words: store(config)?,
            grammars: store(config)?,
            topics: store(config)?,
            links: store(config)?,
            user_textbooks: store(config)?,
            user_lessons: store(config)?,
            class_words: store(config)?,
            class_grammars: store(config)?,
            class_topics: store(config)?,
            class_user_lessons: store(config)?,
        })
    }

    /// Access the underlying database handle.
    #[must_use]
    pub const fn db(&self) -> &KotobaDb {
        &self.db
    }

    /// Shorthand for the shared connection.
    pub(crate) const fn conn(&self) -> &libsql::Connection {
        self.db.conn()
    }

    pub(crate) const fn bcrypt_cost(&self) -> u32 {
        self.bcrypt_cost
    }

    /// The credential service, if a signing secret is configured.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Other` wrapping `ConfigError::NotConfigured`
    /// when `auth.secret_key` is empty.
    pub fn credentials(&self) -> Result<&CredentialService, DatabaseError> {
        self.credentials.as_ref().ok_or_else(|| {
            DatabaseError::Other(
                kotoba_config::ConfigError::NotConfigured {
                    section: "auth".into(),
                }
                .into(),
            )
        })
    }

    #[must_use]
    pub const fn users(&self) -> &RecordStore<User> {
        &self.users
    }

    #[must_use]
    pub const fn textbooks(&self) -> &RecordStore<Textbook> {
        &self.textbooks
    }

    #[must_use]
    pub const fn lessons(&self) -> &RecordStore<Lesson> {
        &self.lessons
    }

    #[must_use]
    pub const fn classes(&self) -> &RecordStore<Class> {
        &self.classes
    }

    #[must_use]
    pub const fn words(&self) -> &RecordStore<Word> {
        &self.words
    }

    #[must_use]
    pub const fn links(&self) -> &RecordStore<UsefulLink> {
        &self.links
    }

    #[must_use]
    pub const fn user_textbooks(&self) -> &RecordStore<UserTextbook> {
        &self.user_textbooks
    }

    #[must_use]
    pub const fn user_lessons(&self) -> &RecordStore<UserLesson> {
        &self.user_lessons
    }

    #[must_use]
    pub const fn class_words(&self) -> &RecordStore<ClassWord> {
        &self.class_words
    }

    #[must_use]
    pub const fn class_user_lessons(&self) -> &RecordStore<ClassUserLesson> {
        &self.class_user_lessons
    }
}

impl std::fmt::Debug for KotobaService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KotobaService")
            .field("auth_configured", &self.credentials.is_some())
            .finish_non_exhaustive()
    }
}

/// A store for `T` with this config's overrides and operation timeout.
fn store<T: Record>(config: &KotobaConfig) -> Result<RecordStore<T>, DatabaseError> {
    let descriptor = T::DESCRIPTOR.with_overrides(&config.entities)?;
    Ok(RecordStore::with_descriptor(
        descriptor,
        config.database.operation_timeout(),
    ))
}
