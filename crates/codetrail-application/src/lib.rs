//! # Application Layer
//!
//! Use cases that orchestrate the domain ports and infrastructure adapters
//! into the three subsystems: the incremental code index, semantic
//! retrieval, and the task graph engine.
//!
//! | Component | Description |
//! |-----------|-------------|
//! | [`use_cases::IndexingService`] | Incremental code index operations |
//! | [`use_cases::SearchService`] | Embedding index and ranked search |
//! | [`use_cases::TaskService`] | Task CRUD, state machine, scheduling views |
//! | [`dto`] | Result shapes returned across the use-case boundary |
//!
//! This crate never touches SQL or the filesystem directly; it depends only
//! on `codetrail-domain`'s ports and the adapters in `codetrail-providers`
//! and `codetrail-infrastructure`.

/// Result shapes returned across the use-case boundary.
pub mod dto;
/// Use cases for the index, retrieval and task graph subsystems.
pub mod use_cases;

pub use use_cases::{IndexingService, SearchService, TaskInput, TaskService};
