//! Ledger tools.
//!
//! Tools: get_ledger_data, query_journal

use serde_json::{Map, Value as JsonValue};

use crate::convert::{parse_args, render_json};
use crate::error::{McpError, Result};
use crate::filter::JournalQuery;
use crate::schema;
use crate::session::McpSession;
use crate::tools::{ToolDef, ToolOutput};

/// Get all ledger tool definitions.
pub fn tools() -> Vec<ToolDef> {
    vec![
        ToolDef::new(
            "get_ledger_data",
            "List all the data in the ledger including all the full account names, all the \
             tags, all the links.",
            schema!(object {}),
        ),
        ToolDef::new(
            "query_journal",
            "Find the exact journal entries using specific filters. All filters are optional \
             and combined with AND.",
            schema!(object {
                optional: {
                    "account": string => "The account to filter by (e.g. 'Assets:Balance').",
                    "time": string => "Time period filter. Year '2015', quarter '2012-Q1', \
                        month '2010-10', week '2016-W12', day '2015-06-12', or an inclusive \
                        range linked by ' - ' such as '2010 - 2012-10'.",
                    "tags": array_string => "Tags to filter by (e.g. ['vacation', '2024']). \
                        All must match.",
                    "links": array_string => "Links to filter by (e.g. ['invoice-123']). \
                        All must match.",
                    "payee": string => "Payee name to filter by (partial match or regex).",
                    "narration": string => "Narration text to filter by (partial match or regex).",
                    "extra_filter": string => "Any additional raw Fava filter string \
                        (e.g. 'number > 100')."
                }
            }),
        ),
    ]
}

/// Dispatch a ledger tool call.
pub fn dispatch(
    session: &McpSession,
    name: &str,
    args: Map<String, JsonValue>,
) -> Result<ToolOutput> {
    match name {
        "get_ledger_data" => Ok(get_ledger_data(session)),

        "query_journal" => {
            let query: JournalQuery = parse_args(args)?;
            Ok(query_journal(session, &query))
        }

        _ => Err(McpError::UnknownTool(name.to_string())),
    }
}

/// Fetch ledger metadata as text.
pub fn get_ledger_data(session: &McpSession) -> ToolOutput {
    match session.ledger_data() {
        Ok(data) => ToolOutput::text(render_json(&data)),
        Err(e) => ToolOutput::error(&e),
    }
}

/// Run a filtered journal query and return the rows as text.
pub fn query_journal(session: &McpSession, query: &JournalQuery) -> ToolOutput {
    match session.query_journal(query) {
        Ok(rows) => ToolOutput::text(render_json(&rows)),
        Err(e) => ToolOutput::error(&e),
    }
}
