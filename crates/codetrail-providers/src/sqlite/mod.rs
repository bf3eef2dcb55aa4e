//! SQLite persistence: executor, schema and repository implementations.

pub mod executor;
pub mod repository;
pub mod schema;

pub use executor::SqliteExecutor;
pub use schema::ensure_schema;
