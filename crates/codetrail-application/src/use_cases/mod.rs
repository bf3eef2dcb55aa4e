//! Use cases orchestrating the domain ports and infrastructure adapters.

pub mod indexing_service;
pub mod search_service;
pub mod task_service;

pub use indexing_service::IndexingService;
pub use search_service::SearchService;
pub use task_service::{TaskInput, TaskService};
