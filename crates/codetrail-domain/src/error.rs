//! Error handling types shared across the core.

use thiserror::Error;

/// Result type alias for operations that can fail.
pub type Result<T> = std::result::Result<T, Error>;

/// Closed taxonomy of errors surfaced by the indexing, retrieval and
/// scheduling subsystems (see the error taxonomy table in the design docs).
#[derive(Error, Debug)]
pub enum Error {
    /// Missing entity (task, file, project, symbol).
    #[error("not found: {resource}")]
    NotFound {
        /// Description of the missing resource.
        resource: String,
    },

    /// Duplicate id or a concurrent-write conflict.
    #[error("conflict: {message}")]
    Conflict {
        /// Description of the conflict.
        message: String,
    },

    /// A status change was attempted that the state machine does not allow.
    #[error("invalid transition: {message}")]
    InvalidTransition {
        /// Description of the rejected transition.
        message: String,
    },

    /// A dependency edge would have formed a cycle in the `blocks` subgraph.
    #[error("cycle detected: {message}")]
    CycleDetected {
        /// Description of the rejected edge.
        message: String,
    },

    /// A required field was missing or a value was out of range.
    #[error("validation failed: {message}")]
    ValidationFailed {
        /// Description of the validation failure.
        message: String,
    },

    /// An LSP request exceeded its timeout.
    #[error("LSP request timed out: {message}")]
    LspTimeout {
        /// Description of the timed-out request.
        message: String,
    },

    /// A language server was not installed or failed to start.
    #[error("LSP server unavailable: {message}")]
    LspUnavailable {
        /// Description of why the server is unavailable.
        message: String,
    },

    /// A task callback exceeded its configured timeout.
    #[error("task timed out: {message}")]
    TaskTimeout {
        /// Description of the timed-out task.
        message: String,
    },

    /// The underlying storage engine reported an error.
    #[error("store error: {message}")]
    Store {
        /// Description of the storage failure.
        message: String,
        /// Optional underlying error.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A filesystem read/write error.
    #[error("I/O error: {message}")]
    Io {
        /// Description of the I/O failure.
        message: String,
        /// Optional underlying error.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl Error {
    /// Build a [`Error::NotFound`].
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    /// Build a [`Error::Conflict`].
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    /// Build a [`Error::InvalidTransition`].
    pub fn invalid_transition(message: impl Into<String>) -> Self {
        Self::InvalidTransition {
            message: message.into(),
        }
    }

    /// Build a [`Error::CycleDetected`].
    pub fn cycle_detected(message: impl Into<String>) -> Self {
        Self::CycleDetected {
            message: message.into(),
        }
    }

    /// Build a [`Error::ValidationFailed`].
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationFailed {
            message: message.into(),
        }
    }

    /// Build a [`Error::LspTimeout`].
    pub fn lsp_timeout(message: impl Into<String>) -> Self {
        Self::LspTimeout {
            message: message.into(),
        }
    }

    /// Build a [`Error::LspUnavailable`].
    pub fn lsp_unavailable(message: impl Into<String>) -> Self {
        Self::LspUnavailable {
            message: message.into(),
        }
    }

    /// Build a [`Error::TaskTimeout`].
    pub fn task_timeout(message: impl Into<String>) -> Self {
        Self::TaskTimeout {
            message: message.into(),
        }
    }

    /// Build a [`Error::Store`] with no source.
    pub fn store(message: impl Into<String>) -> Self {
        Self::Store {
            message: message.into(),
            source: None,
        }
    }

    /// Build a [`Error::Store`] wrapping an underlying error.
    pub fn store_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Store {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Build a [`Error::Io`] with no source.
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
            source: None,
        }
    }

    /// Build a [`Error::Io`] wrapping an underlying error.
    pub fn io_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Io {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Self::io_with_source("I/O operation failed", source)
    }
}
