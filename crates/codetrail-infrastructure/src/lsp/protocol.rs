//! JSON-RPC over stdio message framing: `Content-Length: N\r\n\r\n<N bytes>`.

use codetrail_domain::error::{Error, Result};
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::process::{ChildStdin, ChildStdout};

/// Write a single framed JSON-RPC message to the server's stdin.
pub async fn write_message(stdin: &mut ChildStdin, body: &serde_json::Value) -> Result<()> {
    let payload = serde_json::to_vec(body)
        .map_err(|e| Error::lsp_unavailable(format!("failed to serialize request: {e}")))?;
    let header = format!("Content-Length: {}\r\n\r\n", payload.len());
    stdin
        .write_all(header.as_bytes())
        .await
        .map_err(|e| Error::io_with_source("failed to write LSP header", e))?;
    stdin
        .write_all(&payload)
        .await
        .map_err(|e| Error::io_with_source("failed to write LSP body", e))?;
    stdin
        .flush()
        .await
        .map_err(|e| Error::io_with_source("failed to flush LSP stdin", e))?;
    Ok(())
}

/// Read a single framed JSON-RPC message from the server's stdout.
pub async fn read_message(reader: &mut BufReader<ChildStdout>) -> Result<serde_json::Value> {
    let mut content_length: Option<usize> = None;
    loop {
        let mut line = String::new();
        let bytes_read = reader
            .read_line(&mut line)
            .await
            .map_err(|e| Error::io_with_source("failed to read LSP header line", e))?;
        if bytes_read == 0 {
            return Err(Error::lsp_unavailable("server closed stdout"));
        }
        let trimmed = line.trim_end();
        if trimmed.is_empty() {
            break;
        }
        if let Some(value) = trimmed.strip_prefix("Content-Length:") {
            content_length = value.trim().parse::<usize>().ok();
        }
    }

    let length = content_length
        .ok_or_else(|| Error::lsp_unavailable("missing Content-Length header"))?;
    let mut buf = vec![0u8; length];
    reader
        .read_exact(&mut buf)
        .await
        .map_err(|e| Error::io_with_source("failed to read LSP body", e))?;
    serde_json::from_slice(&buf)
        .map_err(|e| Error::lsp_unavailable(format!("failed to parse LSP message: {e}")))
}
