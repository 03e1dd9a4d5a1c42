//! Generic record store: one CRUD contract for every table.
//!
//! All operations take a `&libsql::Connection`. A bare connection runs each
//! statement in autocommit mode; a `libsql::Transaction` dereferences to a
//! connection, so callers that need several calls to commit together pass the
//! transaction instead.
//!
//! Column names in filters and field maps are checked against the entity
//! descriptor before they reach SQL, since identifiers cannot be bound as
//! parameters. Values are always bound.

use std::collections::BTreeMap;
use std::future::Future;
use std::marker::PhantomData;
use std::time::Duration;

use chrono::Utc;
use kotoba_core::slug::slugify;
use serde_json::Value;

use crate::descriptor::{EntityDescriptor, Fields, Record};
use crate::error::DatabaseError;
use crate::helpers::{display_value, json_to_sql};

pub struct RecordStore<T: Record> {
    descriptor: EntityDescriptor,
    select_cols: String,
    timeout: Duration,
    _record: PhantomData<fn() -> T>,
}

impl<T: Record> Clone for RecordStore<T> {
    fn clone(&self) -> Self {
        Self {
            descriptor: self.descriptor.clone(),
            select_cols: self.select_cols.clone(),
            timeout: self.timeout,
            _record: PhantomData,
        }
    }
}

impl<T: Record> std::fmt::Debug for RecordStore<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordStore")
            .field("table", &self.descriptor.table)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

/// A WHERE clause with its bound values.
struct Clause {
    sql: String,
    params: Vec<libsql::Value>,
}

impl<T: Record> RecordStore<T> {
    /// Store using the built-in descriptor of `T`.
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        Self::with_descriptor(T::DESCRIPTOR, timeout)
    }

    /// Store using an explicit descriptor (e.g. with config overrides applied).
    #[must_use]
    pub fn with_descriptor(descriptor: EntityDescriptor, timeout: Duration) -> Self {
        let select_cols = descriptor.select_cols();
        Self {
            descriptor,
            select_cols,
            timeout,
            _record: PhantomData,
        }
    }

    #[must_use]
    pub const fn descriptor(&self) -> &EntityDescriptor {
        &self.descriptor
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    /// The row with `id`, or `None`.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` on storage failure or timeout.
    pub async fn get_by_id(
        &self,
        conn: &libsql::Connection,
        id: i64,
    ) -> Result<Option<T>, DatabaseError> {
        self.bounded("get_by_id", async {
            let sql = format!(
                "SELECT {} FROM {} WHERE id = ?1",
                self.select_cols, self.descriptor.table
            );
            tracing::debug!(table = self.descriptor.table, id, "get_by_id");
            let mut rows = conn.query(&sql, [id]).await?;
            match rows.next().await? {
                Some(row) => Ok(Some(T::from_row(&row)?)),
                None => Ok(None),
            }
        })
        .await
    }

    /// The single row matching `filter`, or `None`.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::AmbiguousResult` if more than one row matches.
    pub async fn get_one_matching(
        &self,
        conn: &libsql::Connection,
        filter: &Fields,
    ) -> Result<Option<T>, DatabaseError> {
        self.bounded("get_one_matching", async {
            let clause = self.where_clause(filter, 1)?;
            let sql = format!(
                "SELECT {} FROM {}{} ORDER BY id LIMIT 2",
                self.select_cols, self.descriptor.table, clause.sql
            );
            tracing::debug!(table = self.descriptor.table, "get_one_matching");
            let mut rows = conn.query(&sql, libsql::params_from_iter(clause.params)).await?;
            let Some(first) = rows.next().await? else {
                return Ok(None);
            };
            if rows.next().await?.is_some() {
                return Err(DatabaseError::AmbiguousResult {
                    entity: self.descriptor.kind.to_string(),
                    filter: describe(filter),
                });
            }
            Ok(Some(T::from_row(&first)?))
        })
        .await
    }

    /// Every row matching `filter`, ordered by id. An empty filter matches all rows.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` on unknown columns, storage failure or timeout.
    pub async fn get_all_matching(
        &self,
        conn: &libsql::Connection,
        filter: &Fields,
    ) -> Result<Vec<T>, DatabaseError> {
        self.bounded("get_all_matching", async {
            let clause = self.where_clause(filter, 1)?;
            let sql = format!(
                "SELECT {} FROM {}{} ORDER BY id",
                self.select_cols, self.descriptor.table, clause.sql
            );
            tracing::debug!(table = self.descriptor.table, "get_all_matching");
            let rows = conn.query(&sql, libsql::params_from_iter(clause.params)).await?;
            collect_rows(rows).await
        })
        .await
    }

    /// Every row whose `column` value is in `values`.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::UnknownColumn` for a column not in the table.
    pub async fn get_all_by_membership(
        &self,
        conn: &libsql::Connection,
        column: &str,
        values: &[Value],
    ) -> Result<Vec<T>, DatabaseError> {
        self.descriptor.check_column(column)?;
        if values.is_empty() {
            return Ok(Vec::new());
        }
        self.bounded("get_all_by_membership", async {
            let placeholders = placeholders(1, values.len());
            let sql = format!(
                "SELECT {} FROM {} WHERE {column} IN ({placeholders}) ORDER BY id",
                self.select_cols, self.descriptor.table
            );
            tracing::debug!(table = self.descriptor.table, column, count = values.len(), "get_all_by_membership");
            let params: Vec<libsql::Value> = values.iter().map(json_to_sql).collect();
            let rows = conn.query(&sql, libsql::params_from_iter(params)).await?;
            collect_rows(rows).await
        })
        .await
    }

    /// Number of rows matching `filter`.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` on unknown columns, storage failure or timeout.
    pub async fn count_matching(
        &self,
        conn: &libsql::Connection,
        filter: &Fields,
    ) -> Result<u64, DatabaseError> {
        self.bounded("count_matching", async {
            let clause = self.where_clause(filter, 1)?;
            let sql = format!("SELECT COUNT(*) FROM {}{}", self.descriptor.table, clause.sql);
            let mut rows = conn.query(&sql, libsql::params_from_iter(clause.params)).await?;
            let row = rows
                .next()
                .await?
                .ok_or_else(|| DatabaseError::Storage("COUNT returned no row".into()))?;
            Ok(u64::try_from(row.get::<i64>(0)?).unwrap_or_default())
        })
        .await
    }

    // -----------------------------------------------------------------------
    // Writes
    // -----------------------------------------------------------------------

    /// Insert one row and return it with its id and timestamps.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyExists` (labelled with this entity's conflict label),
    /// `DanglingReference` or `IntegrityViolation` on constraint failures.
    pub async fn insert(
        &self,
        conn: &libsql::Connection,
        fields: Fields,
    ) -> Result<T, DatabaseError> {
        self.bounded("insert", self.insert_unbounded(conn, fields)).await
    }

    /// Insert, deriving `slug` from the descriptor's slug source when absent.
    ///
    /// # Errors
    ///
    /// Same as [`Self::insert`].
    pub async fn insert_with_derived_slug(
        &self,
        conn: &libsql::Connection,
        mut fields: Fields,
    ) -> Result<T, DatabaseError> {
        self.derive_slug(&mut fields);
        self.insert(conn, fields).await
    }

    /// Fill `slug` from the slug source if it is missing, null or empty.
    ///
    /// A no-op for tables without a slug source, or when the source value is
    /// not a string.
    pub fn derive_slug(&self, fields: &mut Fields) {
        let Some(source) = self.descriptor.slug_source.as_deref() else {
            return;
        };
        let missing = match fields.get("slug") {
            None | Some(Value::Null) => true,
            Some(Value::String(s)) => s.is_empty(),
            Some(_) => false,
        };
        if !missing {
            return;
        }
        if let Some(Value::String(text)) = fields.get(source) {
            let slug = slugify(text);
            fields.insert("slug".into(), Value::String(slug));
        }
    }

    /// Insert every payload or none of them; results keep input order.
    ///
    /// Runs inside a SAVEPOINT, so it is atomic both on a bare connection and
    /// nested inside a caller's transaction. Only the inserts are bounded by
    /// the operation timeout; the savepoint is always closed afterwards.
    ///
    /// # Errors
    ///
    /// Returns the first failing row's error after rolling the batch back.
    pub async fn insert_bulk(
        &self,
        conn: &libsql::Connection,
        batch: Vec<Fields>,
    ) -> Result<Vec<T>, DatabaseError> {
        if batch.is_empty() {
            return Ok(Vec::new());
        }
        let savepoint = format!("bulk_{}", self.descriptor.table);
        conn.execute(&format!("SAVEPOINT {savepoint}"), ()).await?;

        let inserted = self
            .bounded("insert_bulk", async {
                let mut created = Vec::with_capacity(batch.len());
                for fields in batch {
                    created.push(self.insert_unbounded(conn, fields).await?);
                }
                Ok(created)
            })
            .await;

        let created = match inserted {
            Ok(created) => created,
            Err(error) => {
                tracing::warn!(
                    table = self.descriptor.table,
                    %error,
                    "bulk insert failed; rolling back batch"
                );
                self.abandon_savepoint(conn, &savepoint).await;
                return Err(error);
            }
        };
        if let Err(error) = conn.execute(&format!("RELEASE {savepoint}"), ()).await {
            self.abandon_savepoint(conn, &savepoint).await;
            return Err(error.into());
        }
        tracing::debug!(table = self.descriptor.table, count = created.len(), "insert_bulk");
        Ok(created)
    }

    /// Roll back to `savepoint` and release it, whatever happens to the
    /// rollback, so the connection never keeps a dangling transaction.
    async fn abandon_savepoint(&self, conn: &libsql::Connection, savepoint: &str) {
        if let Err(error) = conn.execute(&format!("ROLLBACK TO {savepoint}"), ()).await {
            tracing::error!(table = self.descriptor.table, %error, "ROLLBACK TO failed");
        }
        if let Err(error) = conn.execute(&format!("RELEASE {savepoint}"), ()).await {
            tracing::error!(table = self.descriptor.table, %error, "RELEASE failed");
        }
    }

    /// Apply `changes` to every row matching `filter` and stamp `updated_at`.
    ///
    /// Zero matches is not an error. Returns the number of rows updated.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` on unknown columns or constraint failures.
    pub async fn update(
        &self,
        conn: &libsql::Connection,
        filter: &Fields,
        changes: Fields,
    ) -> Result<u64, DatabaseError> {
        if changes.is_empty() {
            return Ok(0);
        }
        self.bounded("update", async {
            let mut sets = Vec::new();
            let mut params: Vec<libsql::Value> = Vec::new();
            let mut idx = 1usize;

            for (column, value) in &changes {
                self.descriptor.check_column(column)?;
                if column == "id" || column == "updated_at" {
                    continue;
                }
                sets.push(format!("{column} = ?{idx}"));
                params.push(json_to_sql(value));
                idx += 1;
            }

            sets.push(format!("updated_at = ?{idx}"));
            params.push(Utc::now().to_rfc3339().into());
            idx += 1;

            let clause = self.where_clause(filter, idx)?;
            params.extend(clause.params);
            let sql = format!(
                "UPDATE {} SET {}{}",
                self.descriptor.table,
                sets.join(", "),
                clause.sql
            );
            tracing::debug!(table = self.descriptor.table, "update");
            let affected = conn
                .execute(&sql, libsql::params_from_iter(params))
                .await
                .map_err(|e| self.relabel(e.into(), &changes))?;
            Ok(affected)
        })
        .await
    }

    /// Delete the single row matching `filter`.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NotFound` if zero rows, or more than one, match.
    pub async fn delete(
        &self,
        conn: &libsql::Connection,
        filter: &Fields,
    ) -> Result<(), DatabaseError> {
        self.bounded("delete", async {
            let clause = self.where_clause(filter, 1)?;
            let sql = format!(
                "SELECT id FROM {}{} LIMIT 2",
                self.descriptor.table, clause.sql
            );
            let mut rows = conn.query(&sql, libsql::params_from_iter(clause.params)).await?;
            let mut ids = Vec::with_capacity(2);
            while let Some(row) = rows.next().await? {
                ids.push(row.get::<i64>(0)?);
            }
            let &[id] = ids.as_slice() else {
                return Err(DatabaseError::NotFound {
                    entity: self.descriptor.kind.to_string(),
                    detail: if ids.is_empty() {
                        format!("no row matches {}", describe(filter))
                    } else {
                        format!("more than one row matches {}", describe(filter))
                    },
                });
            };

            conn.execute(
                &format!("DELETE FROM {} WHERE id = ?1", self.descriptor.table),
                [id],
            )
            .await?;
            tracing::debug!(table = self.descriptor.table, id, "delete");
            Ok(())
        })
        .await
    }

    /// Delete every row where, for each named column, the value is in its set.
    ///
    /// Returns the number of rows deleted. An empty set for any column
    /// matches nothing.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Validation` when no column is named, and
    /// `DatabaseError::UnknownColumn` for columns not in the table.
    pub async fn delete_bulk(
        &self,
        conn: &libsql::Connection,
        filters: &BTreeMap<String, Vec<Value>>,
    ) -> Result<u64, DatabaseError> {
        if filters.is_empty() {
            return Err(DatabaseError::Validation(format!(
                "bulk delete on {} needs at least one column filter",
                self.descriptor.table
            )));
        }
        for column in filters.keys() {
            self.descriptor.check_column(column)?;
        }
        if filters.values().any(Vec::is_empty) {
            return Ok(0);
        }
        self.bounded("delete_bulk", async {
            let mut conditions = Vec::with_capacity(filters.len());
            let mut params: Vec<libsql::Value> = Vec::new();
            let mut idx = 1usize;
            for (column, values) in filters {
                conditions.push(format!("{column} IN ({})", placeholders(idx, values.len())));
                params.extend(values.iter().map(json_to_sql));
                idx += values.len();
            }
            let sql = format!(
                "DELETE FROM {} WHERE {}",
                self.descriptor.table,
                conditions.join(" AND ")
            );
            let deleted = conn.execute(&sql, libsql::params_from_iter(params)).await?;
            tracing::debug!(table = self.descriptor.table, deleted, "delete_bulk");
            Ok(deleted)
        })
        .await
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    async fn insert_unbounded(
        &self,
        conn: &libsql::Connection,
        mut fields: Fields,
    ) -> Result<T, DatabaseError> {
        for column in fields.keys() {
            self.descriptor.check_column(column)?;
        }
        fields.remove("id");
        let now = Value::String(Utc::now().to_rfc3339());
        fields.entry("created_at").or_insert_with(|| now.clone());
        fields.entry("updated_at").or_insert(now);

        let columns: Vec<&str> = fields.keys().map(String::as_str).collect();
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            self.descriptor.table,
            columns.join(", "),
            placeholders(1, columns.len())
        );
        let params: Vec<libsql::Value> = fields.values().map(json_to_sql).collect();

        conn.execute(&sql, libsql::params_from_iter(params))
            .await
            .map_err(|e| self.relabel(e.into(), &fields))?;
        let id = conn.last_insert_rowid();
        tracing::debug!(table = self.descriptor.table, id, "insert");

        let sql = format!(
            "SELECT {} FROM {} WHERE id = ?1",
            self.select_cols, self.descriptor.table
        );
        let mut rows = conn.query(&sql, [id]).await?;
        let row = rows.next().await?.ok_or_else(|| DatabaseError::NotFound {
            entity: self.descriptor.kind.to_string(),
            detail: format!("id = {id} after insert"),
        })?;
        T::from_row(&row)
    }

    /// Replace the engine's column list with this entity's conflict label.
    fn relabel(&self, error: DatabaseError, fields: &Fields) -> DatabaseError {
        match error {
            DatabaseError::AlreadyExists { label: columns, .. } => {
                let record = self
                    .descriptor
                    .label_field
                    .and_then(|field| fields.get(field))
                    .map(display_value);
                tracing::warn!(table = self.descriptor.table, %columns, "unique constraint rejected write");
                DatabaseError::AlreadyExists {
                    label: self.descriptor.conflict_label.to_string(),
                    record,
                }
            }
            other => other,
        }
    }

    fn where_clause(&self, filter: &Fields, first_idx: usize) -> Result<Clause, DatabaseError> {
        let mut conditions = Vec::with_capacity(filter.len());
        let mut params = Vec::with_capacity(filter.len());
        let mut idx = first_idx;
        for (column, value) in filter {
            self.descriptor.check_column(column)?;
            if value.is_null() {
                conditions.push(format!("{column} IS NULL"));
            } else {
                conditions.push(format!("{column} = ?{idx}"));
                params.push(json_to_sql(value));
                idx += 1;
            }
        }
        let sql = if conditions.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", conditions.join(" AND "))
        };
        Ok(Clause { sql, params })
    }

    /// Run `fut` under the operation timeout.
    ///
    /// A lock wait that ran out inside `fut` is reported the same way as the
    /// deadline itself.
    async fn bounded<R, F>(&self, operation: &str, fut: F) -> Result<R, DatabaseError>
    where
        F: Future<Output = Result<R, DatabaseError>>,
    {
        let timed_out = || DatabaseError::Timeout {
            operation: format!("{}.{operation}", self.descriptor.table),
            after_ms: self.timeout.as_millis(),
        };
        match tokio::time::timeout(self.timeout, fut).await {
            Ok(Err(DatabaseError::Timeout { operation: cause, .. })) => {
                tracing::warn!(table = self.descriptor.table, operation, %cause, "lock wait ran out");
                Err(timed_out())
            }
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(table = self.descriptor.table, operation, "store operation timed out");
                Err(timed_out())
            }
        }
    }
}

async fn collect_rows<T: Record>(mut rows: libsql::Rows) -> Result<Vec<T>, DatabaseError> {
    let mut out = Vec::new();
    while let Some(row) = rows.next().await? {
        out.push(T::from_row(&row)?);
    }
    Ok(out)
}

/// `?{start}, ?{start+1}, ...` for `count` parameters.
fn placeholders(start: usize, count: usize) -> String {
    (start..start + count)
        .map(|i| format!("?{i}"))
        .collect::<Vec<_>>()
        .join(", ")
}

fn describe(filter: &Fields) -> String {
    if filter.is_empty() {
        return "{}".into();
    }
    filter
        .iter()
        .map(|(k, v)| format!("{k} = {}", display_value(v)))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use kotoba_config::DatabaseConfig;
    use kotoba_core::entities::{Lesson, Textbook};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::descriptor::fields;
    use crate::KotobaDb;
    use crate::test_support::helpers::test_db;

    fn textbooks() -> RecordStore<Textbook> {
        RecordStore::new(Duration::from_secs(5))
    }

    fn lessons() -> RecordStore<Lesson> {
        RecordStore::new(Duration::from_secs(5))
    }

    #[test]
    fn placeholders_are_numbered_from_start() {
        assert_eq!(placeholders(1, 3), "?1, ?2, ?3");
        assert_eq!(placeholders(4, 2), "?4, ?5");
        assert_eq!(placeholders(1, 0), "");
    }

    #[tokio::test]
    async fn insert_populates_id_and_timestamps() {
        let db = test_db().await;
        let book = textbooks()
            .insert(db.conn(), fields([("name", json!("Minna no Nihongo"))]))
            .await
            .unwrap();
        assert!(book.id > 0);
        assert_eq!(book.name, "Minna no Nihongo");
        assert_eq!(book.created_at, book.updated_at);
        assert_eq!(book.slug, None);
    }

    #[tokio::test]
    async fn get_by_id_missing_is_none() {
        let db = test_db().await;
        assert!(textbooks().get_by_id(db.conn(), 999).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicate_textbook_reports_conflict_label() {
        let db = test_db().await;
        let store = textbooks();
        store.insert(db.conn(), fields([("name", json!("N1"))])).await.unwrap();
        let err = store
            .insert(db.conn(), fields([("name", json!("N1"))]))
            .await
            .unwrap_err();
        match err {
            DatabaseError::AlreadyExists { label, record } => {
                assert_eq!(label, "Такой учебник");
                assert_eq!(record.as_deref(), Some("N1"));
            }
            other => panic!("expected AlreadyExists, got {other:?}"),
        }
        assert_eq!(store.count_matching(db.conn(), &Fields::new()).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn derived_slug_is_deterministic() {
        let db = test_db().await;
        let store = textbooks();
        let a = store
            .insert_with_derived_slug(db.conn(), fields([("name", json!("Hello World")), ("slug", json!(""))]))
            .await
            .unwrap();
        store
            .delete(db.conn(), &fields([("id", json!(a.id))]))
            .await
            .unwrap();
        let b = store
            .insert_with_derived_slug(db.conn(), fields([("name", json!("Hello World"))]))
            .await
            .unwrap();
        assert_eq!(a.slug.as_deref(), Some("hello-world"));
        assert_eq!(a.slug, b.slug);
    }

    #[tokio::test]
    async fn explicit_slug_is_kept() {
        let db = test_db().await;
        let book = textbooks()
            .insert_with_derived_slug(
                db.conn(),
                fields([("name", json!("Genki")), ("slug", json!("genki-1"))]),
            )
            .await
            .unwrap();
        assert_eq!(book.slug.as_deref(), Some("genki-1"));
    }

    #[tokio::test]
    async fn get_one_matching_rejects_two_rows() {
        let db = test_db().await;
        let book = textbooks()
            .insert(db.conn(), fields([("name", json!("N5"))]))
            .await
            .unwrap();
        let store = lessons();
        for name in ["one", "two"] {
            store
                .insert(db.conn(), fields([("name", json!(name)), ("textbook_id", json!(book.id))]))
                .await
                .unwrap();
        }
        let err = store
            .get_one_matching(db.conn(), &fields([("textbook_id", json!(book.id))]))
            .await
            .unwrap_err();
        assert!(matches!(err, DatabaseError::AmbiguousResult { .. }), "{err:?}");

        let one = store
            .get_one_matching(db.conn(), &fields([("name", json!("one"))]))
            .await
            .unwrap();
        assert_eq!(one.map(|l| l.name).as_deref(), Some("one"));

        let none = store
            .get_one_matching(db.conn(), &fields([("name", json!("three"))]))
            .await
            .unwrap();
        assert!(none.is_none());
    }

    #[tokio::test]
    async fn unknown_filter_column_is_rejected() {
        let db = test_db().await;
        let err = textbooks()
            .get_all_matching(db.conn(), &fields([("title", json!("x"))]))
            .await
            .unwrap_err();
        assert!(matches!(err, DatabaseError::UnknownColumn { .. }));
    }

    #[tokio::test]
    async fn insert_bulk_is_all_or_nothing() {
        let db = test_db().await;
        let book = textbooks()
            .insert(db.conn(), fields([("name", json!("N4"))]))
            .await
            .unwrap();
        let store = lessons();
        let batch = vec![
            fields([("name", json!("a")), ("textbook_id", json!(book.id))]),
            fields([("name", json!("b")), ("textbook_id", json!(book.id))]),
            fields([("name", json!("a")), ("textbook_id", json!(book.id))]),
        ];
        let err = store.insert_bulk(db.conn(), batch).await.unwrap_err();
        assert!(matches!(err, DatabaseError::AlreadyExists { .. }));
        assert_eq!(store.count_matching(db.conn(), &Fields::new()).await.unwrap(), 0);

        let batch = vec![
            fields([("name", json!("b")), ("textbook_id", json!(book.id))]),
            fields([("name", json!("a")), ("textbook_id", json!(book.id))]),
        ];
        let created = store.insert_bulk(db.conn(), batch).await.unwrap();
        let names: Vec<_> = created.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, ["b", "a"]);
    }

    #[tokio::test]
    async fn update_zero_rows_is_not_an_error() {
        let db = test_db().await;
        let updated = textbooks()
            .update(
                db.conn(),
                &fields([("name", json!("missing"))]),
                fields([("slug", json!("x"))]),
            )
            .await
            .unwrap();
        assert_eq!(updated, 0);
    }

    #[tokio::test]
    async fn update_changes_matching_rows_and_stamps_updated_at() {
        let db = test_db().await;
        let store = textbooks();
        let book = store.insert(db.conn(), fields([("name", json!("Old"))])).await.unwrap();
        tokio::time::sleep(Duration::from_millis(5)).await;
        let updated = store
            .update(
                db.conn(),
                &fields([("id", json!(book.id))]),
                fields([("name", json!("New"))]),
            )
            .await
            .unwrap();
        assert_eq!(updated, 1);
        let fresh = store.get_by_id(db.conn(), book.id).await.unwrap().unwrap();
        assert_eq!(fresh.name, "New");
        assert!(fresh.updated_at > book.updated_at);
        assert_eq!(fresh.created_at, book.created_at);
    }

    #[tokio::test]
    async fn delete_requires_exactly_one_match() {
        let db = test_db().await;
        let book = textbooks()
            .insert(db.conn(), fields([("name", json!("N3"))]))
            .await
            .unwrap();
        let store = lessons();
        for name in ["x", "y"] {
            store
                .insert(db.conn(), fields([("name", json!(name)), ("textbook_id", json!(book.id))]))
                .await
                .unwrap();
        }

        let none = store
            .delete(db.conn(), &fields([("name", json!("z"))]))
            .await
            .unwrap_err();
        assert!(matches!(none, DatabaseError::NotFound { .. }));

        let many = store
            .delete(db.conn(), &fields([("textbook_id", json!(book.id))]))
            .await
            .unwrap_err();
        assert!(matches!(many, DatabaseError::NotFound { .. }));
        assert_eq!(store.count_matching(db.conn(), &Fields::new()).await.unwrap(), 2);

        store.delete(db.conn(), &fields([("name", json!("x"))])).await.unwrap();
        assert_eq!(store.count_matching(db.conn(), &Fields::new()).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn delete_bulk_is_conjunctive_membership() {
        let db = test_db().await;
        let book = textbooks()
            .insert(db.conn(), fields([("name", json!("N2"))]))
            .await
            .unwrap();
        let store = lessons();
        for name in ["a", "b", "c"] {
            store
                .insert(db.conn(), fields([("name", json!(name)), ("textbook_id", json!(book.id))]))
                .await
                .unwrap();
        }

        let mut filters = BTreeMap::new();
        filters.insert("name".to_string(), vec![json!("a"), json!("b"), json!("zzz")]);
        filters.insert("textbook_id".to_string(), vec![json!(book.id)]);
        let deleted = store.delete_bulk(db.conn(), &filters).await.unwrap();
        assert_eq!(deleted, 2);

        let remaining = store.get_all_matching(db.conn(), &Fields::new()).await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].name, "c");

        assert!(store.delete_bulk(db.conn(), &BTreeMap::new()).await.is_err());
    }

    #[tokio::test]
    async fn membership_lookup() {
        let db = test_db().await;
        let store = textbooks();
        let a = store.insert(db.conn(), fields([("name", json!("A"))])).await.unwrap();
        let _b = store.insert(db.conn(), fields([("name", json!("B"))])).await.unwrap();
        let c = store.insert(db.conn(), fields([("name", json!("C"))])).await.unwrap();

        let found = store
            .get_all_by_membership(db.conn(), "id", &[json!(a.id), json!(c.id)])
            .await
            .unwrap();
        let names: Vec<_> = found.into_iter().map(|t| t.name).collect();
        assert_eq!(names, ["A", "C"]);

        assert!(store.get_all_by_membership(db.conn(), "id", &[]).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn dangling_reference_is_classified() {
        let db = test_db().await;
        let err = lessons()
            .insert(db.conn(), fields([("name", json!("orphan")), ("textbook_id", json!(404))]))
            .await
            .unwrap_err();
        assert!(matches!(err, DatabaseError::DanglingReference(_)), "{err:?}");
    }

    /// An on-disk database plus a second connection holding an exclusive lock.
    struct LockedDb {
        db: KotobaDb,
        _holder_db: libsql::Database,
        holder: libsql::Connection,
        _dir: tempfile::TempDir,
    }

    impl LockedDb {
        /// Lock wait of 3 s, operation bound of 200 ms.
        async fn open() -> Self {
            let dir = tempfile::TempDir::new().unwrap();
            let config = DatabaseConfig {
                path: dir.path().join("kotoba.db").to_string_lossy().into_owned(),
                busy_timeout_ms: 3_000,
                operation_timeout_ms: 200,
            };
            let db = KotobaDb::open(&config).await.unwrap();
            let holder_db = libsql::Builder::new_local(&config.path).build().await.unwrap();
            let holder = holder_db.connect().unwrap();
            holder.execute("BEGIN EXCLUSIVE", ()).await.unwrap();
            Self {
                db,
                _holder_db: holder_db,
                holder,
                _dir: dir,
            }
        }

        async fn unlock(&self) {
            self.holder.execute("ROLLBACK", ()).await.unwrap();
        }
    }

    fn expect_timeout(err: DatabaseError, expected_operation: &str) {
        match err {
            DatabaseError::Timeout { operation, after_ms } => {
                assert_eq!(operation, expected_operation);
                assert_eq!(after_ms, 200);
            }
            other => panic!("expected Timeout, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn locked_database_times_out_within_operation_bound() {
        let locked = LockedDb::open().await;
        let store: RecordStore<Textbook> = RecordStore::new(Duration::from_millis(200));

        let started = Instant::now();
        let err = store
            .insert(locked.db.conn(), fields([("name", json!("N1"))]))
            .await
            .unwrap_err();
        let elapsed = started.elapsed();

        assert!(elapsed < Duration::from_secs(1), "took {elapsed:?}");
        expect_timeout(err, "textbooks.insert");
    }

    #[tokio::test]
    async fn timed_out_bulk_insert_leaves_no_open_transaction() {
        let locked = LockedDb::open().await;
        let store: RecordStore<Textbook> = RecordStore::new(Duration::from_millis(200));
        let batch = vec![fields([("name", json!("N5"))]), fields([("name", json!("N4"))])];

        let err = store.insert_bulk(locked.db.conn(), batch).await.unwrap_err();
        expect_timeout(err, "textbooks.insert_bulk");

        locked.unlock().await;
        let tx = locked.db.transaction().await.unwrap();
        tx.commit().await.unwrap();
        assert_eq!(store.count_matching(locked.db.conn(), &Fields::new()).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn failed_bulk_insert_leaves_no_open_transaction() {
        let db = test_db().await;
        let store = textbooks();
        let batch = vec![fields([("name", json!("N3"))]), fields([("name", json!("N3"))])];
        store.insert_bulk(db.conn(), batch).await.unwrap_err();

        let tx = db.transaction().await.unwrap();
        store.insert(&tx, fields([("name", json!("N2"))])).await.unwrap();
        tx.commit().await.unwrap();
        assert_eq!(store.count_matching(db.conn(), &Fields::new()).await.unwrap(), 1);
    }
}
