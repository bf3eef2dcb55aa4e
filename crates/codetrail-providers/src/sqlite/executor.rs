//! SQLite implementation of the [`DatabaseExecutor`] port.
//!
//! Repositories depend on the domain port traits; they never touch `sqlx`
//! directly. Rows are copied out of the driver type immediately so they can
//! be returned as `Arc<dyn SqlRow>` without holding a connection reference.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use codetrail_domain::error::{Error, Result};
use codetrail_domain::ports::{DatabaseExecutor, SqlParam, SqlRow};
use sqlx::sqlite::SqliteRow;
use sqlx::{Column, Row};

#[derive(Debug)]
struct SqliteMappedRow {
    strings: HashMap<String, Option<String>>,
    i64s: HashMap<String, Option<i64>>,
    f64s: HashMap<String, Option<f64>>,
    blobs: HashMap<String, Option<Vec<u8>>>,
}

impl SqliteMappedRow {
    fn from_sqlite_row(row: &SqliteRow) -> Self {
        let mut strings = HashMap::new();
        let mut i64s = HashMap::new();
        let mut f64s = HashMap::new();
        let mut blobs = HashMap::new();
        for (i, col) in row.columns().iter().enumerate() {
            let name = col.name().to_owned();
            if let Ok(opt) = row.try_get::<Option<String>, _>(i) {
                strings.insert(name, opt);
            } else if let Ok(opt) = row.try_get::<Option<i64>, _>(i) {
                i64s.insert(name, opt);
            } else if let Ok(opt) = row.try_get::<Option<f64>, _>(i) {
                f64s.insert(name, opt);
            } else if let Ok(opt) = row.try_get::<Option<Vec<u8>>, _>(i) {
                blobs.insert(name, opt);
            } else {
                strings.insert(name, None);
            }
        }
        Self {
            strings,
            i64s,
            f64s,
            blobs,
        }
    }
}

impl SqlRow for SqliteMappedRow {
    fn try_get_string(&self, name: &str) -> Result<Option<String>> {
        Ok(self.strings.get(name).cloned().flatten())
    }

    fn try_get_i64(&self, name: &str) -> Result<Option<i64>> {
        Ok(self.i64s.get(name).copied().flatten())
    }

    fn try_get_f64(&self, name: &str) -> Result<Option<f64>> {
        Ok(self.f64s.get(name).copied().flatten())
    }

    fn try_get_blob(&self, name: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.blobs.get(name).cloned().flatten())
    }
}

/// SQLite-backed implementation of [`DatabaseExecutor`].
pub struct SqliteExecutor {
    pool: sqlx::SqlitePool,
}

impl SqliteExecutor {
    /// Wrap an already-connected pool.
    #[must_use]
    pub fn new(pool: sqlx::SqlitePool) -> Self {
        Self { pool }
    }

    /// Open (creating if absent) the SQLite database at `path` and apply the
    /// schema, returning a ready-to-use executor.
    pub async fn connect(path: &std::path::Path) -> Result<Self> {
        let options = sqlx::sqlite::SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal);
        let pool = sqlx::SqlitePool::connect_with(options)
            .await
            .map_err(|e| Error::store_with_source(format!("failed to open {}", path.display()), e))?;
        let executor = Self::new(pool);
        crate::sqlite::schema::ensure_schema(&executor).await?;
        Ok(executor)
    }

    /// Open an in-memory database, primarily for tests.
    pub async fn connect_in_memory() -> Result<Self> {
        let pool = sqlx::SqlitePool::connect("sqlite::memory:")
            .await
            .map_err(|e| Error::store_with_source("failed to open in-memory database", e))?;
        let executor = Self::new(pool);
        crate::sqlite::schema::ensure_schema(&executor).await?;
        Ok(executor)
    }

    /// Borrow the underlying pool, e.g. to run a migration batch directly.
    #[must_use]
    pub fn pool(&self) -> &sqlx::SqlitePool {
        &self.pool
    }

    fn bind<'q>(
        mut q: sqlx::query::Query<'q, sqlx::Sqlite, sqlx::sqlite::SqliteArguments<'q>>,
        params: &'q [SqlParam],
    ) -> sqlx::query::Query<'q, sqlx::Sqlite, sqlx::sqlite::SqliteArguments<'q>> {
        for p in params {
            q = match p {
                SqlParam::String(s) => q.bind(s.as_str()),
                SqlParam::I64(n) => q.bind(*n),
                SqlParam::F64(f) => q.bind(*f),
                SqlParam::Blob(b) => q.bind(b.as_slice()),
                SqlParam::Null => q.bind(Option::<String>::None),
            };
        }
        q
    }
}

#[async_trait]
impl DatabaseExecutor for SqliteExecutor {
    async fn execute(&self, sql: &str, params: &[SqlParam]) -> Result<()> {
        let q = Self::bind(sqlx::query(sql), params);
        q.execute(&self.pool)
            .await
            .map_err(|e| Error::store_with_source(format!("SQL execute failed: {sql}"), e))?;
        Ok(())
    }

    async fn query_one(&self, sql: &str, params: &[SqlParam]) -> Result<Option<Arc<dyn SqlRow>>> {
        let q = Self::bind(sqlx::query(sql), params);
        let row = q
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| Error::store_with_source(format!("SQL query_one failed: {sql}"), e))?;
        Ok(row.map(|r| Arc::new(SqliteMappedRow::from_sqlite_row(&r)) as Arc<dyn SqlRow>))
    }

    async fn query_all(&self, sql: &str, params: &[SqlParam]) -> Result<Vec<Arc<dyn SqlRow>>> {
        let q = Self::bind(sqlx::query(sql), params);
        let rows = q
            .fetch_all(&self.pool)
            .await
            .map_err(|e| Error::store_with_source(format!("SQL query_all failed: {sql}"), e))?;
        Ok(rows
            .iter()
            .map(|r| Arc::new(SqliteMappedRow::from_sqlite_row(r)) as Arc<dyn SqlRow>)
            .collect())
    }
}
