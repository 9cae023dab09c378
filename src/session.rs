//! MCP session.
//!
//! Wraps the Fava gateway with the two ledger operations the tools expose.

use std::sync::Arc;

use serde_json::Value as JsonValue;

use crate::error::Result;
use crate::filter::{JournalQuery, QueryParams};
use crate::gateway::{FavaApi, LEDGER_DATA_ENDPOINT, QUERY_ENDPOINT};

/// MCP session state.
///
/// Holds the upstream API handle. There is no per-call state; the session is
/// shared across requests behind an `Arc`.
#[derive(Clone)]
pub struct McpSession {
    api: Arc<dyn FavaApi>,
}

impl McpSession {
    /// Create a session over any [`FavaApi`] implementation.
    pub fn new(api: impl FavaApi + 'static) -> Self {
        Self { api: Arc::new(api) }
    }

    /// Fetch ledger metadata (accounts, tags, links).
    pub fn ledger_data(&self) -> Result<JsonValue> {
        self.api.get(LEDGER_DATA_ENDPOINT, None)
    }

    /// Run a filtered journal query.
    pub fn query_journal(&self, query: &JournalQuery) -> Result<JsonValue> {
        let params = QueryParams::from(query);
        tracing::debug!(
            account = ?params.account,
            time = ?params.time,
            filter = ?params.filter,
            "Composed journal query"
        );
        self.api.get(QUERY_ENDPOINT, Some(&params))
    }
}
