//! One language-server subprocess, driven over JSON-RPC/stdio.
//!
//! A client is started lazily per detected language and reused for every
//! file of that language within a single `analyze` call; it is never shared
//! across languages.

use std::process::Stdio;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;

use codetrail_domain::entities::{FileId, Symbol};
use codetrail_domain::error::{Error, Result};
use serde_json::json;
use tokio::io::BufReader;
use tokio::process::{Child, ChildStdin, Command};

use super::protocol::{read_message, write_message};
use super::symbol_kind::from_lsp_kind;

/// Per-request timeout. A server that does not answer within this window has
/// its request abandoned; the caller records an error and moves on.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// A running language server and the plumbing needed to talk to it.
pub struct LspClient {
    child: Child,
    stdin: ChildStdin,
    reader: BufReader<tokio::process::ChildStdout>,
    next_id: AtomicI64,
}

impl LspClient {
    /// Spawn `command` with `args` and perform the `initialize`/`initialized`
    /// handshake. Returns [`Error::LspUnavailable`] if the process cannot be
    /// started.
    pub async fn spawn(command: &str, args: &[String], root: &str) -> Result<Self> {
        let mut child = Command::new(command)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| Error::lsp_unavailable(format!("failed to start {command}: {e}")))?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| Error::lsp_unavailable("server stdin unavailable"))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| Error::lsp_unavailable("server stdout unavailable"))?;

        let mut client = Self {
            child,
            stdin,
            reader: BufReader::new(stdout),
            next_id: AtomicI64::new(1),
        };
        client.handshake(root).await?;
        Ok(client)
    }

    async fn handshake(&mut self, root: &str) -> Result<()> {
        let params = json!({
            "processId": std::process::id(),
            "rootUri": format!("file://{root}"),
            "capabilities": {
                "textDocument": {
                    "documentSymbol": {
                        "hierarchicalDocumentSymbolSupport": true
                    }
                }
            }
        });
        self.request("initialize", params).await?;
        self.notify("initialized", json!({})).await?;
        Ok(())
    }

    async fn notify(&mut self, method: &str, params: serde_json::Value) -> Result<()> {
        let body = json!({ "jsonrpc": "2.0", "method": method, "params": params });
        write_message(&mut self.stdin, &body).await
    }

    async fn request(&mut self, method: &str, params: serde_json::Value) -> Result<serde_json::Value> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let body = json!({ "jsonrpc": "2.0", "id": id, "method": method, "params": params });
        write_message(&mut self.stdin, &body).await?;

        let response = tokio::time::timeout(REQUEST_TIMEOUT, self.await_response(id))
            .await
            .map_err(|_| Error::lsp_timeout(format!("{method} timed out")))??;
        if let Some(error) = response.get("error") {
            return Err(Error::lsp_unavailable(format!("{method} failed: {error}")));
        }
        Ok(response.get("result").cloned().unwrap_or(serde_json::Value::Null))
    }

    async fn await_response(&mut self, id: i64) -> Result<serde_json::Value> {
        loop {
            let message = read_message(&mut self.reader).await?;
            if message.get("id").and_then(serde_json::Value::as_i64) == Some(id) {
                return Ok(message);
            }
            // Notification or response to a stale request; the sequential
            // request pattern means this should be rare.
        }
    }

    /// Extract the symbol tree for a single file: `didOpen`, then
    /// `documentSymbol`, then `didClose`. `file_id` is the caller's own
    /// identifier for the file at `uri`, attached to every returned symbol.
    pub async fn document_symbols(
        &mut self,
        uri: &str,
        language_id: &str,
        text: &str,
        file_id: FileId,
    ) -> Result<Vec<Symbol>> {
        self.notify(
            "textDocument/didOpen",
            json!({
                "textDocument": {
                    "uri": uri,
                    "languageId": language_id,
                    "version": 1,
                    "text": text,
                }
            }),
        )
        .await?;

        let result = self
            .request(
                "textDocument/documentSymbol",
                json!({ "textDocument": { "uri": uri } }),
            )
            .await;

        self.notify(
            "textDocument/didClose",
            json!({ "textDocument": { "uri": uri } }),
        )
        .await?;

        let result = result?;
        Ok(parse_document_symbols(&result, file_id, None))
    }

    /// Terminate the child process and abandon any in-flight request.
    pub async fn shutdown(mut self) {
        let _ = self.child.kill().await;
    }
}

/// Recursively convert an LSP `DocumentSymbol[]` (or legacy flat
/// `SymbolInformation[]`) result into domain symbols, preserving hierarchy.
fn parse_document_symbols(
    value: &serde_json::Value,
    file_id: FileId,
    parent_id: Option<codetrail_domain::entities::SymbolId>,
) -> Vec<Symbol> {
    let Some(entries) = value.as_array() else {
        return Vec::new();
    };
    let mut out = Vec::new();
    for entry in entries {
        let Some(name) = entry.get("name").and_then(serde_json::Value::as_str) else {
            continue;
        };
        let kind = entry
            .get("kind")
            .and_then(serde_json::Value::as_i64)
            .map_or(codetrail_domain::entities::SymbolKind::Unknown, from_lsp_kind);
        let detail = entry
            .get("detail")
            .and_then(serde_json::Value::as_str)
            .map(str::to_owned);
        let range = entry.get("range").or_else(|| entry.get("location").and_then(|l| l.get("range")));
        let (start_line, start_column, end_line, end_column) = range
            .map(parse_range)
            .unwrap_or((0, 0, 0, 0));

        let symbol = Symbol::new(
            file_id,
            name,
            kind,
            detail,
            start_line,
            start_column,
            end_line,
            end_column,
            parent_id,
        );
        let symbol_id = symbol.id;
        out.push(symbol);

        if let Some(children) = entry.get("children") {
            out.extend(parse_document_symbols(children, file_id, Some(symbol_id)));
        }
    }
    out
}

fn parse_range(range: &serde_json::Value) -> (u32, u32, u32, u32) {
    let get = |object: &str, field: &str| -> u32 {
        range
            .get(object)
            .and_then(|o| o.get(field))
            .and_then(serde_json::Value::as_u64)
            .unwrap_or(0) as u32
    };
    (
        get("start", "line") + 1,
        get("start", "character"),
        get("end", "line") + 1,
        get("end", "character"),
    )
}
