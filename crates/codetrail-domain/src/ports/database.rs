//! Database executor port.
//!
//! Abstraction for SQL execution so repositories do not depend on a concrete
//! driver. Implementations live in the providers crate and are injected via
//! constructor parameters.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;

/// Parameter for prepared statement binding (driver-agnostic).
#[derive(Debug, Clone)]
pub enum SqlParam {
    /// String value.
    String(String),
    /// 64-bit integer.
    I64(i64),
    /// 64-bit float.
    F64(f64),
    /// Raw bytes (e.g. a serialized embedding vector).
    Blob(Vec<u8>),
    /// Null.
    Null,
}

/// Abstraction for a single query result row.
///
/// Implementations wrap driver-specific rows so repository code maps to
/// domain entities without depending on the driver.
pub trait SqlRow: Send + Sync {
    /// Try to get a string by column name.
    fn try_get_string(&self, name: &str) -> Result<Option<String>>;

    /// Try to get an i64 by column name.
    fn try_get_i64(&self, name: &str) -> Result<Option<i64>>;

    /// Try to get an f64 by column name.
    fn try_get_f64(&self, name: &str) -> Result<Option<f64>>;

    /// Try to get raw bytes by column name.
    fn try_get_blob(&self, name: &str) -> Result<Option<Vec<u8>>>;
}

/// Port for executing SQL.
///
/// Repositories depend on this trait; they do not hold a pool or use driver
/// types directly. The SQLite implementation lives in `codetrail-providers`.
#[async_trait]
pub trait DatabaseExecutor: Send + Sync {
    /// Execute a statement with no result rows (INSERT/UPDATE/DELETE/DDL).
    async fn execute(&self, sql: &str, params: &[SqlParam]) -> Result<()>;

    /// Execute a query and return at most one row.
    async fn query_one(&self, sql: &str, params: &[SqlParam]) -> Result<Option<Arc<dyn SqlRow>>>;

    /// Execute a query and return all matching rows.
    async fn query_all(&self, sql: &str, params: &[SqlParam]) -> Result<Vec<Arc<dyn SqlRow>>>;
}
