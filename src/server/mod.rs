//! Line-delimited JSON-RPC server over stdio.
//!
//! Each request line is handled on its own task; responses are written by a
//! single writer task so lines never interleave. Stdout carries protocol
//! traffic only; logs go to stderr.

pub mod protocol;

use anyhow::{Context, Result};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::config::ServerConfig;
use crate::tools::catalog::catalog;
use crate::tools::ToolDispatcher;
use protocol::{error_codes, JsonRpcRequest, JsonRpcResponse, DEFAULT_PROTOCOL_VERSION};

/// Outbound queue depth before request handlers wait on the writer.
const RESPONSE_QUEUE: usize = 64;

pub struct McpServer {
    info: ServerConfig,
    dispatcher: ToolDispatcher,
}

impl McpServer {
    pub fn new(info: ServerConfig, dispatcher: ToolDispatcher) -> Self {
        Self { info, dispatcher }
    }

    /// Handle one raw input line. `None` means nothing should be written.
    pub async fn handle_line(&self, line: &str) -> Option<JsonRpcResponse> {
        let value: Value = match serde_json::from_str(line) {
            Ok(v) => v,
            Err(e) => {
                warn!(error = %e, "Unparseable request line");
                return Some(JsonRpcResponse::error(
                    None,
                    error_codes::PARSE_ERROR,
                    format!("Parse error: {e}"),
                ));
            }
        };

        let id = value.get("id").cloned();
        match serde_json::from_value::<JsonRpcRequest>(value) {
            Ok(request) => self.handle_request(request).await,
            Err(e) => Some(JsonRpcResponse::error(
                id,
                error_codes::INVALID_REQUEST,
                format!("Invalid request: {e}"),
            )),
        }
    }

    pub async fn handle_request(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        debug!(method = %request.method, id = ?request.id, "Request received");

        if request.is_notification() {
            return None;
        }

        let response = match request.method.as_str() {
            "initialize" => {
                let protocol_version = request
                    .params
                    .get("protocolVersion")
                    .and_then(Value::as_str)
                    .unwrap_or(DEFAULT_PROTOCOL_VERSION);
                info!(protocol_version, "Client initializing");
                JsonRpcResponse::success(
                    request.id,
                    json!({
                        "protocolVersion": protocol_version,
                        "capabilities": { "tools": {} },
                        "serverInfo": {
                            "name": self.info.name,
                            "version": self.info.version,
                        },
                    }),
                )
            }

            "ping" => JsonRpcResponse::success(request.id, json!({})),

            "tools/list" => JsonRpcResponse::success(request.id, json!({ "tools": catalog() })),

            "tools/call" => {
                let Some(name) = request.params.get("name").and_then(Value::as_str) else {
                    return Some(JsonRpcResponse::error(
                        request.id,
                        error_codes::INVALID_PARAMS,
                        "Missing tool name",
                    ));
                };
                let arguments = request.params.get("arguments").cloned();

                let output = self.dispatcher.dispatch(name, arguments).await;
                match serde_json::to_value(output) {
                    Ok(result) => JsonRpcResponse::success(request.id, result),
                    Err(e) => JsonRpcResponse::error(
                        request.id,
                        error_codes::INTERNAL_ERROR,
                        format!("Failed to encode result: {e}"),
                    ),
                }
            }

            other => JsonRpcResponse::error(
                request.id,
                error_codes::METHOD_NOT_FOUND,
                format!("Method not found: {other}"),
            ),
        };

        Some(response)
    }

    /// Serve requests from `reader` until EOF, writing responses to `writer`.
    /// In-flight calls are drained before returning.
    pub async fn run<R, W>(self, reader: R, writer: W) -> Result<()>
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let server = Arc::new(self);
        let (tx, rx) = mpsc::channel::<String>(RESPONSE_QUEUE);
        let writer_task = tokio::spawn(write_responses(rx, writer));

        let mut lines = BufReader::new(reader).lines();
        while let Some(line) = lines.next_line().await.context("Failed to read request")? {
            if line.trim().is_empty() {
                continue;
            }

            let server = Arc::clone(&server);
            let tx = tx.clone();
            tokio::spawn(async move {
                let Some(response) = server.handle_line(&line).await else {
                    return;
                };
                match serde_json::to_string(&response) {
                    Ok(encoded) => {
                        if tx.send(encoded).await.is_err() {
                            warn!("Response writer closed; dropping response");
                        }
                    }
                    Err(e) => error!(error = %e, "Failed to encode response"),
                }
            });
        }

        info!("Input closed, draining in-flight requests");
        drop(tx);
        writer_task.await.context("Response writer panicked")?
    }
}

async fn write_responses<W>(mut rx: mpsc::Receiver<String>, mut writer: W) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    while let Some(line) = rx.recv().await {
        writer.write_all(line.as_bytes()).await.context("Failed to write response")?;
        writer.write_all(b"\n").await.context("Failed to write response")?;
        writer.flush().await.context("Failed to flush response")?;
    }
    Ok(())
}

/// Serve on the process's stdin/stdout.
pub async fn serve_stdio(server: McpServer) -> Result<()> {
    server.run(tokio::io::stdin(), tokio::io::stdout()).await
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
