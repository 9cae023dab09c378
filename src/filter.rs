//! Journal filter composition.
//!
//! Translates the structured arguments of `query_journal` into the query
//! parameters Fava's `api/query` endpoint understands. Fava combines the
//! space-separated clauses of its `filter` parameter with logical AND, so each
//! argument contributes one or more fragments and the fragments are joined in
//! a fixed order: tags, links, payee, narration, then the raw extra filter.

use serde::{Deserialize, Deserializer, Serialize};

/// Base query sent with every journal request.
pub const BASE_QUERY: &str = "SELECT *";

/// Structured journal query as supplied by the caller.
///
/// Every field is optional; an absent (or empty) field places no constraint
/// on that dimension.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct JournalQuery {
    /// Account name, e.g. `Assets:Balance`
    pub account: Option<String>,
    /// Time period, e.g. `2015`, `2012-Q1`, `2010-10`, `2016-W12`,
    /// `2015-06-12`, or an inclusive range such as `2010 - 2012-10`
    pub time: Option<String>,
    /// Tags, with or without the leading `#`
    #[serde(deserialize_with = "null_as_empty")]
    pub tags: Vec<String>,
    /// Links, with or without the leading `^`
    #[serde(deserialize_with = "null_as_empty")]
    pub links: Vec<String>,
    /// Payee text (partial match / regex)
    pub payee: Option<String>,
    /// Narration text (partial match / regex)
    pub narration: Option<String>,
    /// Raw filter expression forwarded unescaped, e.g. `number > 100`
    #[serde(alias = "filter_str")]
    pub extra_filter: Option<String>,
}

/// Query parameters for Fava's `api/query` endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryParams {
    /// Always [`BASE_QUERY`]
    pub query_string: String,
    /// Account scope
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account: Option<String>,
    /// Time scope
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    /// Space-joined filter fragments
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
}

impl QueryParams {
    /// Parameters that select everything, with no scoping.
    pub fn base() -> Self {
        Self {
            query_string: BASE_QUERY.to_string(),
            account: None,
            time: None,
            filter: None,
        }
    }
}

impl From<&JournalQuery> for QueryParams {
    fn from(query: &JournalQuery) -> Self {
        compose(query)
    }
}

/// Build the upstream parameters for a journal query.
pub fn compose(query: &JournalQuery) -> QueryParams {
    let mut fragments: Vec<String> = Vec::new();

    fragments.extend(query.tags.iter().map(|tag| tag_fragment(tag)));
    fragments.extend(query.links.iter().map(|link| link_fragment(link)));

    if let Some(payee) = non_empty(&query.payee) {
        fragments.push(quoted_clause("payee", payee));
    }
    if let Some(narration) = non_empty(&query.narration) {
        fragments.push(quoted_clause("narration", narration));
    }
    if let Some(extra) = non_empty(&query.extra_filter) {
        fragments.push(extra.to_string());
    }

    QueryParams {
        account: non_empty(&query.account).map(str::to_string),
        time: non_empty(&query.time).map(str::to_string),
        filter: (!fragments.is_empty()).then(|| fragments.join(" ")),
        ..QueryParams::base()
    }
}

/// `#tag`, however many `#` the input already carried.
pub fn tag_fragment(tag: &str) -> String {
    format!("#{}", tag.trim_start_matches('#'))
}

/// `^link`, however many `^` the input already carried.
pub fn link_fragment(link: &str) -> String {
    format!("^{}", link.trim_start_matches('^'))
}

/// `field:"value"` with embedded double quotes escaped.
pub fn quoted_clause(field: &str, value: &str) -> String {
    format!("{}:\"{}\"", field, value.replace('"', "\\\""))
}

// Agents often send `null` for an unused list argument.
fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}
