//! SQLite repository implementation.
//!
//! Implements the `Repository` contract from `storefront_core::storage` using SQLite.

use std::sync::Arc;

use async_trait::async_trait;
use rusqlite::{params_from_iter, types::Value, OptionalExtension};
use tokio_rusqlite::Connection;

use storefront_core::products::Product;
use storefront_core::storage::{
    Repository, RepositoryError, Result, SearchParams, SearchResult, SearchSchema,
};
use storefront_core::users::{User, UserToken};

use super::conversions::SqliteRecord;
use super::error::{map_tokio_rusqlite_error, map_tokio_rusqlite_error_with_id};
use super::schema;

/// Helper to wrap rusqlite errors for tokio_rusqlite closures.
fn wrap_err(e: rusqlite::Error) -> tokio_rusqlite::Error {
    tokio_rusqlite::Error::Rusqlite(e)
}

/// Values bound by [`schema::update`]: the id, then every updatable column.
fn update_values<E: SqliteRecord>(record: &E) -> Vec<Value> {
    E::COLUMNS
        .iter()
        .zip(record.to_values())
        .filter(|(column, _)| **column != schema::CREATED_AT_COLUMN)
        .map(|(_, value)| value)
        .collect()
}

/// Handle to one SQLite database holding every table.
///
/// Cloning is cheap and shares the connection thread.
#[derive(Clone)]
pub struct SqliteDatabase {
    conn: Connection,
}

impl SqliteDatabase {
    /// Opens a file-based database.
    ///
    /// The database file will be created if it doesn't exist.
    /// Schema tables are created automatically.
    pub async fn open(path: &str) -> Result<Self> {
        let conn = Connection::open(path)
            .await
            .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?;

        let db = Self { conn };
        db.migrate().await?;

        tracing::info!(path = %path, "SQLite database ready");
        Ok(db)
    }

    /// Opens an in-memory database.
    ///
    /// Useful for testing - data is lost when the last clone is dropped.
    pub async fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .await
            .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?;

        let db = Self { conn };
        db.migrate().await?;

        Ok(db)
    }

    /// Creates any missing tables and indexes.
    pub async fn migrate(&self) -> Result<()> {
        self.conn
            .call(|conn| {
                conn.execute_batch(schema::CREATE_TABLES)
                    .map_err(wrap_err)?;
                Ok(())
            })
            .await
            .map_err(|e| RepositoryError::QueryFailed(e.to_string()))
    }

    /// Repository for any record type with a table in this database.
    pub fn repository<E: SqliteRecord>(&self) -> SqliteRepository<E> {
        SqliteRepository::new(self.conn.clone())
    }

    pub fn products(&self) -> SqliteRepository<Product> {
        self.repository()
    }

    pub fn users(&self) -> SqliteRepository<User> {
        self.repository()
    }

    pub fn user_tokens(&self) -> SqliteRepository<UserToken> {
        self.repository()
    }
}

/// SQLite-based repository for one record type.
///
/// Search runs in SQL: the filter becomes a `WHERE` clause on the schema's
/// filter column and the sort an `ORDER BY` on the resolved sort column, with
/// `rowid` as the tiebreaker so results match the in-memory backend.
pub struct SqliteRepository<E: SqliteRecord> {
    conn: Connection,
    schema: Arc<SearchSchema<E>>,
}

impl<E: SqliteRecord> Clone for SqliteRepository<E> {
    fn clone(&self) -> Self {
        Self {
            conn: self.conn.clone(),
            schema: Arc::clone(&self.schema),
        }
    }
}

impl<E: SqliteRecord> SqliteRepository<E> {
    /// Creates a repository searched through the record's own schema.
    pub fn new(conn: Connection) -> Self {
        Self::with_schema(conn, E::search_schema())
    }

    /// Creates a repository searched through `schema`.
    ///
    /// The schema's filter field and sortable field names must be columns of
    /// `E::TABLE`.
    pub fn with_schema(conn: Connection, schema: SearchSchema<E>) -> Self {
        Self {
            conn,
            schema: Arc::new(schema),
        }
    }
}

#[async_trait]
impl<E: SqliteRecord> Repository<E> for SqliteRepository<E> {
    async fn insert(&self, record: E) -> Result<E> {
        record.validate()?;
        let sql = schema::insert(E::TABLE, E::COLUMNS);
        let values = record.to_values();
        let id = record.id().to_string();

        self.conn
            .call(move |conn| {
                conn.execute(&sql, params_from_iter(values))
                    .map_err(wrap_err)?;
                Ok(())
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id::<E>(e, &id))?;

        tracing::debug!(entity = E::ENTITY_TYPE, id = %id, "Record inserted");
        Ok(record)
    }

    async fn find_by_id(&self, id: &str) -> Result<E> {
        let sql = schema::select_by(E::TABLE, E::COLUMNS, schema::ID_COLUMN);
        let key = id.to_string();

        self.conn
            .call(move |conn| conn.query_row(&sql, [&key], E::from_row).map_err(wrap_err))
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id::<E>(e, id))
    }

    async fn find_all_by_ids(&self, ids: &[String]) -> Result<Vec<E>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut ids = ids.to_vec();
        ids.sort_unstable();
        ids.dedup();
        let rowid_index = E::COLUMNS.len();

        self.conn
            .call(move |conn| {
                let tx = conn.transaction().map_err(wrap_err)?;

                let mut found: Vec<(i64, E)> = Vec::new();
                for chunk in ids.chunks(schema::MAX_BOUND_IDS) {
                    let sql = schema::select_by_ids(E::TABLE, E::COLUMNS, chunk.len());
                    let mut stmt = tx.prepare_cached(&sql).map_err(wrap_err)?;
                    let rows = stmt
                        .query_map(params_from_iter(chunk.iter()), |row| {
                            Ok((row.get(rowid_index)?, E::from_row(row)?))
                        })
                        .map_err(wrap_err)?;

                    for row_result in rows {
                        found.push(row_result.map_err(wrap_err)?);
                    }
                }

                tx.commit().map_err(wrap_err)?;
                found.sort_unstable_by_key(|(rowid, _)| *rowid);
                Ok(found.into_iter().map(|(_, record)| record).collect())
            })
            .await
            .map_err(map_tokio_rusqlite_error::<E>)
    }

    async fn update(&self, mut record: E) -> Result<E> {
        record.validate()?;
        let select = schema::select_by(E::TABLE, E::COLUMNS, schema::ID_COLUMN);
        let update = schema::update(E::TABLE, E::COLUMNS);
        let values = update_values(&record);
        let id = record.id().to_string();
        let key = id.clone();

        // Lookup and write share one transaction.
        let stored = self
            .conn
            .call(move |conn| {
                let tx = conn.transaction().map_err(wrap_err)?;
                let stored = tx
                    .query_row(&select, [&key], E::from_row)
                    .map_err(wrap_err)?;
                tx.execute(&update, params_from_iter(values))
                    .map_err(wrap_err)?;
                tx.commit().map_err(wrap_err)?;
                Ok(stored)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id::<E>(e, &id))
            .inspect_err(|err| {
                if err.is_not_found() {
                    tracing::warn!(entity = E::ENTITY_TYPE, id = %id, "Update of unknown record");
                }
            })?;

        record.set_created_at(stored.created_at());
        tracing::debug!(entity = E::ENTITY_TYPE, id = %id, "Record updated");
        Ok(record)
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let sql = schema::delete(E::TABLE);
        let key = id.to_string();

        let deleted = self
            .conn
            .call(move |conn| conn.execute(&sql, [&key]).map_err(wrap_err))
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id::<E>(e, id))?;

        if deleted == 0 {
            tracing::warn!(entity = E::ENTITY_TYPE, id = %id, "Delete of unknown record");
            return Err(RepositoryError::id_not_found::<E>(id));
        }

        tracing::debug!(entity = E::ENTITY_TYPE, id = %id, "Record deleted");
        Ok(())
    }

    async fn find_by_unique_field(&self, value: &str) -> Result<E> {
        let sql = schema::select_by(E::TABLE, E::COLUMNS, E::UNIQUE_FIELD);
        let key = value.to_string();

        let found = self
            .conn
            .call(move |conn| {
                conn.query_row(&sql, [&key], E::from_row)
                    .optional()
                    .map_err(wrap_err)
            })
            .await
            .map_err(map_tokio_rusqlite_error::<E>)?;

        found.ok_or_else(|| RepositoryError::unique_not_found::<E>(value))
    }

    async fn search(&self, params: SearchParams) -> Result<SearchResult<E>> {
        let resolved = self.schema.resolve(&params);

        let filter = resolved.filter.clone();
        let filter_column = filter.as_ref().map(|_| self.schema.filter_field());
        let order = resolved
            .order
            .map(|(field, direction)| (field.name(), direction));
        let select = schema::search(E::TABLE, E::COLUMNS, filter_column, order);
        let count = schema::count(E::TABLE, filter_column);
        let limit = i64::try_from(resolved.per_page).unwrap_or(i64::MAX);
        let offset = i64::try_from(resolved.offset()).unwrap_or(i64::MAX);

        // Page and count read the same snapshot.
        let (items, total) = self
            .conn
            .call(move |conn| {
                let tx = conn.transaction().map_err(wrap_err)?;

                let total: i64 = match &filter {
                    Some(filter) => tx.query_row(&count, [filter], |row| row.get(0)),
                    None => tx.query_row(&count, [], |row| row.get(0)),
                }
                .map_err(wrap_err)?;

                let items = {
                    let mut stmt = tx.prepare(&select).map_err(wrap_err)?;
                    let rows = match &filter {
                        Some(filter) => stmt.query_map(
                            rusqlite::params![filter, limit, offset],
                            E::from_row,
                        ),
                        None => stmt.query_map(rusqlite::params![limit, offset], E::from_row),
                    }
                    .map_err(wrap_err)?;

                    let mut items = Vec::new();
                    for row_result in rows {
                        items.push(row_result.map_err(wrap_err)?);
                    }
                    items
                };

                tx.commit().map_err(wrap_err)?;
                Ok((items, total))
            })
            .await
            .map_err(map_tokio_rusqlite_error::<E>)?;

        let total = u64::try_from(total).unwrap_or_default();
        tracing::trace!(
            entity = E::ENTITY_TYPE,
            total,
            page = resolved.page,
            "Search completed"
        );
        Ok(resolved.into_result(items, total))
    }
}
