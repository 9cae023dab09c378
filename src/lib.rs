//! # fava-mcp
//!
//! MCP (Model Context Protocol) server for Fava, the Beancount web interface.
//!
//! This crate exposes two read-only Fava API operations as tools for AI agents.
//! It implements the MCP protocol over stdin/stdout using JSON-RPC 2.0.
//!
//! ## Tools
//!
//! - `get_ledger_data`: accounts, tags and links of the ledger
//! - `query_journal`: journal entries filtered by account, time, tags, links,
//!   payee, narration and a raw Fava filter expression
//!
//! ## Usage
//!
//! The server is typically run as an executable and configured in AI tools like Claude Desktop:
//!
//! ```json
//! {
//!   "mcpServers": {
//!     "beancount-fava": {
//!       "command": "/path/to/fava-mcp",
//!       "env": { "FAVA_URL": "http://localhost:5000/my-ledger" }
//!     }
//!   }
//! }
//! ```
//!
//! ## Library Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use fava_mcp::{FavaClient, FavaConfig, McpServer, McpSession};
//!
//! let config = FavaConfig::new("http://localhost:5000/my-ledger").expect("bad config");
//! let client = FavaClient::new(config).expect("HTTP client");
//! let server = Arc::new(McpServer::new(McpSession::new(client)));
//!
//! let response = server.handle_line(r#"{"jsonrpc":"2.0","id":1,"method":"tools/list"}"#);
//! ```

#![warn(missing_docs)]

mod config;
mod convert;
mod error;
pub mod filter;
mod gateway;
mod server;
mod session;
mod tools;

pub use config::{Credentials, FavaConfig};
pub use convert::render_json;
pub use error::{McpError, Result};
pub use filter::{compose, JournalQuery, QueryParams};
pub use gateway::{FavaApi, FavaClient, LEDGER_DATA_ENDPOINT, QUERY_ENDPOINT};
pub use server::{JsonRpcError, JsonRpcRequest, JsonRpcResponse, McpServer};
pub use session::McpSession;
pub use tools::{ToolDef, ToolOutput, ToolRegistry};
