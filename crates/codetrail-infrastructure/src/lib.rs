//! # Infrastructure Layer
//!
//! Side-effecting adapters that drive the incremental code index and the
//! task graph engine: the parallel file walker, content hashing, LSP
//! transport, regex fallback extraction, dependency-graph algorithms and the
//! parallel task executor.
//!
//! | Component | Description |
//! |-----------|-------------|
//! | [`walker`] | Parallel, exclusion-aware project file walker |
//! | [`hasher`] | Content hashing for change detection |
//! | [`fallback`] | Regex-based symbol extraction when no LSP server is available |
//! | [`lsp`] | JSON-RPC/stdio LSP client, wire framing and server registry |
//! | [`graph`] | Dependency-graph algorithms over the `blocks` subgraph |
//! | [`executor`] | Parallel task executor |
//!
//! This crate depends on [`codetrail_domain`] for entities/ports and on
//! [`codetrail_providers`] for language detection and embeddings; it never
//! talks to the persistent store directly except through the repository
//! ports passed into it.

/// Parallel, exclusion-aware project file walker.
pub mod walker;
/// Content hashing for change detection.
pub mod hasher;
/// Regex-based fallback symbol extraction.
pub mod fallback;
/// LSP transport: wire framing, kind mapping, client lifecycle, registry.
pub mod lsp;
/// Dependency-graph algorithms over the `blocks` subgraph.
pub mod graph;
/// Parallel task executor.
pub mod executor;

pub use executor::{CallbackResult, ExecutionReport, TaskCallback, TaskExecutor};
pub use graph::TaskGraph;
pub use lsp::{LspClient, LspRegistry};
