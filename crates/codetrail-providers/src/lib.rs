//! # Providers Layer
//!
//! Concrete implementations of the domain ports: SQLite persistence,
//! language detection and the deterministic keyword-frequency embedding
//! engine.
//!
//! | Component | Description |
//! |-----------|-------------|
//! | [`sqlite`] | `DatabaseExecutor` and repository implementations |
//! | [`language`] | Root-indicator and extension-based language detection |
//! | [`embedding`] | Keyword-frequency vector construction |

/// Keyword-frequency embedding engine.
pub mod embedding;
/// Language detection.
pub mod language;
/// SQLite persistence.
pub mod sqlite;

pub use sqlite::SqliteExecutor;
