//! # kotoba-db
//!
//! libSQL persistence for Kotoba.
//!
//! Holds the whole relational model: users, textbooks, lessons, classes,
//! vocabulary, grammar, topics, useful links and the association rows that
//! tie them together. Uniqueness and cascade rules are enforced by the
//! schema itself; [`store::RecordStore`] gives every table the same CRUD
//! contract and translates constraint failures into [`DatabaseError`].
//!
//! Uses the `libsql` crate (embedded `SQLite` fork) in local mode.

pub mod descriptor;
pub mod enrollment;
pub mod error;
pub mod graph;
pub mod helpers;
mod migrations;
pub mod records;
pub mod repos;
pub mod service;
pub mod store;

#[cfg(test)]
mod test_support;

use std::time::Duration;

use error::DatabaseError;
use kotoba_config::DatabaseConfig;
use libsql::Builder;

pub use descriptor::{EntityDescriptor, Fields, Record, fields, to_fields};
pub use service::KotobaService;
pub use store::RecordStore;

/// Central database handle.
///
/// Wraps a libSQL database and its single connection. Foreign keys are
/// enabled and the schema is migrated on open.
pub struct KotobaDb {
    #[allow(dead_code)]
    db: libsql::Database,
    conn: libsql::Connection,
}

impl KotobaDb {
    /// Open a local database at `path` (or `":memory:"`) with the default
    /// lock wait.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or
    /// migrations fail.
    pub async fn open_local(path: &str) -> Result<Self, DatabaseError> {
        Self::open_with(path, DatabaseConfig::default().lock_wait()).await
    }

    /// Open the database described by `[database]` config.
    ///
    /// Creates the parent directory of an on-disk database if needed.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the directory, database or migrations fail.
    pub async fn open(config: &DatabaseConfig) -> Result<Self, DatabaseError> {
        if !config.is_in_memory()
            && let Some(parent) = std::path::Path::new(&config.path).parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| {
                DatabaseError::Storage(format!("mkdir {}: {e}", parent.display()))
            })?;
        }
        Self::open_with(&config.path, config.lock_wait()).await
    }

    async fn open_with(path: &str, lock_wait: Duration) -> Result<Self, DatabaseError> {
        let db = Builder::new_local(path).build().await?;
        let conn = db.connect()?;

        // Enable foreign keys (must be per-connection in SQLite)
        conn.execute("PRAGMA foreign_keys = ON", ())
            .await
            .map_err(|e| DatabaseError::Migration(format!("PRAGMA foreign_keys: {e}")))?;
        // busy_timeout echoes the new value back as a row, so it goes through query.
        // A lock wait that runs out surfaces as `DatabaseError::Timeout`.
        conn.query(
            &format!("PRAGMA busy_timeout = {}", lock_wait.as_millis()),
            (),
        )
        .await
        .map_err(|e| DatabaseError::Migration(format!("PRAGMA busy_timeout: {e}")))?;

        let kotoba_db = Self { db, conn };
        kotoba_db.run_migrations().await?;
        graph::verify(&kotoba_db.conn).await?;
        tracing::debug!(path, "database opened");
        Ok(kotoba_db)
    }

    /// Access the underlying libSQL connection for direct queries.
    #[must_use]
    pub const fn conn(&self) -> &libsql::Connection {
        &self.conn
    }

    /// Begin a transaction on the shared connection.
    ///
    /// The returned `libsql::Transaction` dereferences to a connection, so it
    /// can be passed to any store operation.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if `BEGIN` fails (e.g. a transaction is
    /// already open).
    pub async fn transaction(&self) -> Result<libsql::Transaction, DatabaseError> {
        Ok(self.conn.transaction().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::helpers::test_db;

    const TABLES: [&str; 14] = [
        "users",
        "textbooks",
        "lessons",
        "classes",
        "words",
        "grammars",
        "topics",
        "useful_links",
        "user_textbooks",
        "user_lessons",
        "class_words",
        "class_grammars",
        "class_topics",
        "class_user_lessons",
    ];

    #[tokio::test]
    async fn open_local_creates_schema() {
        let db = test_db().await;
        for table in &TABLES {
            let mut rows = db
                .conn()
                .query(
                    "SELECT name FROM sqlite_master WHERE type='table' AND name=?1",
                    [*table],
                )
                .await
                .unwrap();
            let row = rows.next().await.unwrap();
            assert!(row.is_some(), "table '{table}' should exist");
        }
    }

    #[tokio::test]
    async fn foreign_keys_are_enabled() {
        let db = test_db().await;
        let mut rows = db.conn().query("PRAGMA foreign_keys", ()).await.unwrap();
        let row = rows.next().await.unwrap().unwrap();
        assert_eq!(row.get::<i64>(0).unwrap(), 1);
    }

    #[tokio::test]
    async fn idempotent_migrations() {
        let db = test_db().await;
        // Run migrations again, should not fail
        db.run_migrations().await.unwrap();
    }

    #[tokio::test]
    async fn open_creates_parent_directory() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("nested").join("kotoba.db");
        let config = DatabaseConfig {
            path: path.to_string_lossy().into_owned(),
            ..Default::default()
        };
        let db = KotobaDb::open(&config).await.unwrap();
        db.conn()
            .execute("INSERT INTO textbooks (name) VALUES ('Genki')", ())
            .await
            .unwrap();
        drop(db);

        // Reopening keeps data and re-runs migrations harmlessly.
        let db = KotobaDb::open(&config).await.unwrap();
        let mut rows = db
            .conn()
            .query("SELECT COUNT(*) FROM textbooks", ())
            .await
            .unwrap();
        let row = rows.next().await.unwrap().unwrap();
        assert_eq!(row.get::<i64>(0).unwrap(), 1);
    }

    #[tokio::test]
    async fn rolled_back_transaction_leaves_no_rows() {
        let db = test_db().await;
        let tx = db.transaction().await.unwrap();
        tx.execute("INSERT INTO textbooks (name) VALUES ('Temp')", ())
            .await
            .unwrap();
        tx.rollback().await.unwrap();

        let mut rows = db
            .conn()
            .query("SELECT COUNT(*) FROM textbooks", ())
            .await
            .unwrap();
        let row = rows.next().await.unwrap().unwrap();
        assert_eq!(row.get::<i64>(0).unwrap(), 0);
    }
}
