//! Error types for the MCP server.

use thiserror::Error;

/// Result type alias for MCP operations.
pub type Result<T> = std::result::Result<T, McpError>;

/// Errors raised while serving MCP requests or talking to Fava.
#[derive(Debug, Error)]
pub enum McpError {
    /// Tool name not present in the registry
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// Well-formed JSON that is not a JSON-RPC request
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// JSON-RPC method not supported by the server
    #[error("Method not found: {0}")]
    UnknownMethod(String),

    /// A required argument was not supplied
    #[error("Missing required argument: {0}")]
    MissingArg(String),

    /// An argument had the wrong shape
    #[error("Invalid argument '{name}': {reason}")]
    InvalidArg {
        /// Argument name
        name: String,
        /// What was wrong with it
        reason: String,
    },

    /// Transport failure or non-success response from the Fava API
    #[error("Failed to communicate with Fava ({endpoint}): {reason}")]
    Communication {
        /// Endpoint that was requested
        endpoint: String,
        /// Underlying cause
        reason: String,
    },

    /// Invalid process configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Malformed JSON on the protocol stream
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O failure on the protocol stream
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Unexpected server-side failure
    #[error("Internal error: {0}")]
    Internal(String),
}

impl McpError {
    /// JSON-RPC error code for this error.
    pub fn code(&self) -> i64 {
        match self {
            McpError::Json(_) => -32700,
            McpError::InvalidRequest(_) => -32600,
            McpError::UnknownMethod(_) => -32601,
            McpError::UnknownTool(_) | McpError::MissingArg(_) | McpError::InvalidArg { .. } => {
                -32602
            }
            McpError::Communication { .. }
            | McpError::Config(_)
            | McpError::Io(_)
            | McpError::Internal(_) => -32603,
        }
    }
}
