//! MCP server over stdio.
//!
//! Newline-delimited JSON-RPC 2.0. Each request line is handled to completion
//! on the blocking pool before the next one is read, since tool calls make a
//! blocking HTTP request to Fava.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};

use crate::convert::get_optional_string;
use crate::error::{McpError, Result};
use crate::session::McpSession;
use crate::tools::ToolRegistry;

/// MCP protocol revision reported by `initialize`.
pub const PROTOCOL_VERSION: &str = "2024-11-05";

/// Server name reported by `initialize`.
pub const SERVER_NAME: &str = "beancount-fava";

/// An incoming JSON-RPC request or notification.
#[derive(Debug, Clone, Deserialize)]
pub struct JsonRpcRequest {
    /// Protocol marker, expected to be "2.0"
    #[serde(default)]
    pub jsonrpc: String,
    /// Request id; absent for notifications
    #[serde(default)]
    pub id: Option<JsonValue>,
    /// Method name
    pub method: String,
    /// Method parameters
    #[serde(default)]
    pub params: Option<JsonValue>,
}

/// JSON-RPC error object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcError {
    /// Error code
    pub code: i64,
    /// Human-readable message
    pub message: String,
}

/// An outgoing JSON-RPC response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    /// Always "2.0"
    pub jsonrpc: String,
    /// Id of the request being answered
    pub id: JsonValue,
    /// Result on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<JsonValue>,
    /// Error on failure
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

impl JsonRpcResponse {
    fn success(id: JsonValue, result: JsonValue) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    fn failure(id: JsonValue, err: &McpError) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: None,
            error: Some(JsonRpcError {
                code: err.code(),
                message: err.to_string(),
            }),
        }
    }
}

/// MCP server exposing the ledger tools.
pub struct McpServer {
    registry: ToolRegistry,
    session: McpSession,
}

impl McpServer {
    /// Create a server over a session.
    pub fn new(session: McpSession) -> Self {
        Self {
            registry: ToolRegistry::new(),
            session,
        }
    }

    /// Serve requests from stdin, writing responses to stdout, until EOF.
    pub async fn run(self: Arc<Self>) -> Result<()> {
        let stdin = BufReader::new(tokio::io::stdin());
        let stdout = tokio::io::stdout();
        self.serve(stdin, stdout).await
    }

    /// Serve requests from `reader`, writing responses to `writer`, until EOF.
    pub async fn serve<R, W>(self: Arc<Self>, reader: R, mut writer: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = reader.lines();
        tracing::info!("MCP server ready");

        while let Some(line) = lines.next_line().await? {
            if line.trim().is_empty() {
                continue;
            }

            let server = Arc::clone(&self);
            let response = tokio::task::spawn_blocking(move || server.handle_line(&line))
                .await
                .map_err(|e| McpError::Internal(format!("request handler failed: {}", e)))?;

            if let Some(response) = response {
                let mut out = serde_json::to_vec(&response)?;
                out.push(b'\n');
                writer.write_all(&out).await?;
                writer.flush().await?;
            }
        }

        tracing::info!("stdin closed, shutting down");
        Ok(())
    }

    /// Handle one line of input. Returns `None` for notifications.
    pub fn handle_line(&self, line: &str) -> Option<JsonRpcResponse> {
        let value = match serde_json::from_str::<JsonValue>(line) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(error = %e, "Unparseable request");
                return Some(JsonRpcResponse::failure(JsonValue::Null, &McpError::Json(e)));
            }
        };

        // Echo the id back when one can be recovered from the bad request.
        let id = value.get("id").cloned().unwrap_or(JsonValue::Null);
        match serde_json::from_value::<JsonRpcRequest>(value) {
            Ok(request) => self.handle_request(request),
            Err(e) => {
                tracing::warn!(error = %e, "Invalid request");
                Some(JsonRpcResponse::failure(
                    id,
                    &McpError::InvalidRequest(e.to_string()),
                ))
            }
        }
    }

    /// Handle a parsed request. Returns `None` for notifications.
    pub fn handle_request(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        let Some(id) = request.id else {
            tracing::debug!(method = %request.method, "Notification");
            return None;
        };

        let response = match self.call(&request.method, request.params) {
            Ok(result) => JsonRpcResponse::success(id, result),
            Err(e) => {
                tracing::warn!(method = %request.method, error = %e, "Request failed");
                JsonRpcResponse::failure(id, &e)
            }
        };
        Some(response)
    }

    fn call(&self, method: &str, params: Option<JsonValue>) -> Result<JsonValue> {
        match method {
            "initialize" => Ok(serde_json::json!({
                "protocolVersion": PROTOCOL_VERSION,
                "capabilities": { "tools": {} },
                "serverInfo": {
                    "name": SERVER_NAME,
                    "version": env!("CARGO_PKG_VERSION"),
                },
            })),

            "ping" => Ok(serde_json::json!({})),

            "tools/list" => Ok(serde_json::json!({ "tools": self.registry.tools() })),

            "tools/call" => {
                let params = match params {
                    Some(JsonValue::Object(map)) => map,
                    _ => return Err(McpError::MissingArg("params".to_string())),
                };
                let name = get_optional_string(&params, "name")
                    .ok_or_else(|| McpError::MissingArg("name".to_string()))?;
                let args = match params.get("arguments") {
                    Some(JsonValue::Object(map)) => map.clone(),
                    None | Some(JsonValue::Null) => Map::new(),
                    Some(_) => {
                        return Err(McpError::InvalidArg {
                            name: "arguments".to_string(),
                            reason: "Expected an object".to_string(),
                        })
                    }
                };

                tracing::info!(tool = %name, "Tool call");
                let output = self.registry.dispatch(&self.session, &name, args)?;
                Ok(output.to_json())
            }

            other => Err(McpError::UnknownMethod(other.to_string())),
        }
    }
}
