//! Tool registry and dispatch.
//!
//! Exposes the read-only ledger tools to MCP clients. Tool results are plain
//! text; upstream failures become `Error: ...` text results rather than
//! protocol errors.

pub mod ledger;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

use crate::error::{McpError, Result};
use crate::session::McpSession;

/// A tool definition for the MCP tools/list response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDef {
    /// Tool name (e.g., "query_journal")
    pub name: String,
    /// Tool description
    pub description: String,
    /// JSON Schema for the input parameters
    #[serde(rename = "inputSchema")]
    pub input_schema: JsonValue,
}

impl ToolDef {
    /// Create a new tool definition.
    pub fn new(name: &str, description: &str, input_schema: JsonValue) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            input_schema,
        }
    }
}

/// Text result of a tool invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOutput {
    /// Text shown to the agent
    pub text: String,
    /// Whether the text describes a failure
    pub is_error: bool,
}

impl ToolOutput {
    /// Successful result.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: false,
        }
    }

    /// Failed result, rendered as `Error: <message>`.
    pub fn error(err: &McpError) -> Self {
        Self {
            text: format!("Error: {}", err),
            is_error: true,
        }
    }

    /// MCP `tools/call` result body.
    pub fn to_json(&self) -> JsonValue {
        serde_json::json!({
            "content": [{ "type": "text", "text": self.text }],
            "isError": self.is_error,
        })
    }
}

/// Registry of available MCP tools.
pub struct ToolRegistry {
    tools: Vec<ToolDef>,
}

impl ToolRegistry {
    /// Create the tool registry with the ledger tools.
    pub fn new() -> Self {
        Self {
            tools: ledger::tools(),
        }
    }

    /// Get all tool definitions.
    pub fn tools(&self) -> &[ToolDef] {
        &self.tools
    }

    /// Dispatch a tool call to the appropriate handler.
    ///
    /// Returns `Err` only for calls that could not be attempted (unknown tool,
    /// malformed arguments).
    pub fn dispatch(
        &self,
        session: &McpSession,
        name: &str,
        args: Map<String, JsonValue>,
    ) -> Result<ToolOutput> {
        if !self.tools.iter().any(|t| t.name == name) {
            return Err(McpError::UnknownTool(name.to_string()));
        }
        ledger::dispatch(session, name, args)
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Helper macro for creating JSON Schema for tool input parameters.
///
/// Optional properties may carry a description: `"time": string => "..."`.
#[macro_export]
macro_rules! schema {
    // Object with only optional properties
    (object {
        optional: { $($opt_name:literal : $opt_type:tt $(=> $opt_desc:literal)?),* $(,)? }
    }) => {{
        let mut props = serde_json::Map::new();
        $(
            #[allow(unused_mut)]
            let mut prop = schema!(@type $opt_type);
            $(prop["description"] = serde_json::json!($opt_desc);)?
            props.insert($opt_name.to_string(), prop);
        )*

        serde_json::json!({
            "type": "object",
            "properties": props,
            "required": []
        })
    }};

    // Empty object (no parameters)
    (object {}) => {{
        serde_json::json!({
            "type": "object",
            "properties": {},
            "required": []
        })
    }};

    // Type mappings
    (@type string) => { serde_json::json!({"type": "string"}) };
    (@type array_string) => { serde_json::json!({"type": "array", "items": {"type": "string"}}) };
}
