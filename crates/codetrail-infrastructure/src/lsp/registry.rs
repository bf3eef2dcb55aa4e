//! Lazily-started, per-language registry of LSP clients.
//!
//! A server for a language is started the first time a file of that language
//! is analyzed, and reused for the remainder of the `analyze` call. Servers
//! for languages that are never encountered are never started.

use std::collections::HashMap;

use codetrail_domain::error::Result;
use tokio::sync::Mutex;
use tracing::warn;

use super::client::LspClient;

/// Executable + arguments used to start the server for a given language.
fn server_command(language: &str) -> Option<(&'static str, Vec<String>)> {
    match language {
        "rust" => Some(("rust-analyzer", vec![])),
        "python" => Some(("pyright-langserver", vec!["--stdio".to_string()])),
        "javascript" | "typescript" => {
            Some(("typescript-language-server", vec!["--stdio".to_string()]))
        }
        "go" => Some(("gopls", vec![])),
        "ruby" => Some(("solargraph", vec!["stdio".to_string()])),
        "java" => Some(("jdtls", vec![])),
        "php" => Some(("intelephense", vec!["--stdio".to_string()])),
        _ => None,
    }
}

/// Per-`analyze` pool of language servers, one per language actually used.
pub struct LspRegistry {
    root: String,
    clients: Mutex<HashMap<String, LspClient>>,
    /// Languages whose server failed to start; not retried within this
    /// registry's lifetime.
    unavailable: Mutex<Vec<String>>,
}

impl LspRegistry {
    /// Create an empty registry scoped to a single project root.
    #[must_use]
    pub fn new(root: String) -> Self {
        Self {
            root,
            clients: Mutex::new(HashMap::new()),
            unavailable: Mutex::new(Vec::new()),
        }
    }

    /// Run `f` against the running client for `language`, starting it on
    /// first use. Returns `None` if no server is configured or known
    /// unavailable for this language; the caller should fall back to regex
    /// extraction in that case.
    pub async fn with_client<F, T>(&self, language: &str, f: F) -> Option<Result<T>>
    where
        F: for<'a> FnOnce(
            &'a mut LspClient,
        ) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<T>> + Send + 'a>>,
    {
        if self.unavailable.lock().await.iter().any(|l| l == language) {
            return None;
        }

        let Some((command, args)) = server_command(language) else {
            return None;
        };

        let mut clients = self.clients.lock().await;
        if !clients.contains_key(language) {
            match LspClient::spawn(command, &args, &self.root).await {
                Ok(client) => {
                    clients.insert(language.to_string(), client);
                }
                Err(err) => {
                    warn!(language, %err, "LSP server unavailable, falling back to regex extraction");
                    self.unavailable.lock().await.push(language.to_string());
                    return None;
                }
            }
        }
        let client = clients.get_mut(language)?;
        Some(f(client).await)
    }

    /// Terminate every running server.
    pub async fn shutdown_all(self) {
        let mut clients = self.clients.lock().await;
        for (_, client) in clients.drain() {
            client.shutdown().await;
        }
    }
}
