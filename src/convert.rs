//! Conversion helpers between MCP tool arguments, Fava responses and text.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value as JsonValue};

use crate::error::{McpError, Result};

/// Decode a `tools/call` argument object into a typed parameter struct.
pub fn parse_args<T: DeserializeOwned>(args: Map<String, JsonValue>) -> Result<T> {
    serde_json::from_value(JsonValue::Object(args)).map_err(|e| McpError::InvalidArg {
        name: "arguments".to_string(),
        reason: e.to_string(),
    })
}

/// Render a decoded Fava response as tool text.
///
/// The response is passed through unchanged; only the outer encoding differs.
pub fn render_json(value: &JsonValue) -> String {
    value.to_string()
}

/// Helper to get an optional string argument from JSON arguments.
pub fn get_optional_string(args: &Map<String, JsonValue>, name: &str) -> Option<String> {
    args.get(name).and_then(|v| v.as_str()).map(|s| s.to_string())
}
