//! Domain port interfaces.
//!
//! Defines the boundary contracts between the domain and external layers:
//! high-level modules (domain, application) define interfaces; low-level
//! modules (providers, infrastructure) implement them.

mod database;
mod repositories;

pub use database::{DatabaseExecutor, SqlParam, SqlRow};
pub use repositories::{
    EmbeddingRepository, FileRepository, ProjectRepository, SearchHistoryRepository,
    SymbolRepository, TaskEventRepository, TaskRepository,
};
