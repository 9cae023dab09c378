//! HTTP gateway to the Fava JSON API.
//!
//! One blocking GET per call, no retries. Every failure is reported as
//! [`McpError::Communication`] so the tool layer can turn it into a textual
//! result.

use serde_json::Value as JsonValue;

use crate::config::FavaConfig;
use crate::error::{McpError, Result};
use crate::filter::QueryParams;

/// Ledger metadata: accounts, tags, links, currencies.
pub const LEDGER_DATA_ENDPOINT: &str = "api/ledger_data";

/// Filtered journal query.
pub const QUERY_ENDPOINT: &str = "api/query";

/// Read access to a Fava instance.
pub trait FavaApi: Send + Sync {
    /// Fetch `endpoint` with optional query parameters and decode the JSON body.
    fn get(&self, endpoint: &str, params: Option<&QueryParams>) -> Result<JsonValue>;
}

impl<T: FavaApi + ?Sized> FavaApi for std::sync::Arc<T> {
    fn get(&self, endpoint: &str, params: Option<&QueryParams>) -> Result<JsonValue> {
        (**self).get(endpoint, params)
    }
}

/// [`FavaApi`] backed by a blocking `reqwest` client.
pub struct FavaClient {
    config: FavaConfig,
    client: reqwest::blocking::Client,
}

impl FavaClient {
    /// Create a client for the configured Fava instance.
    pub fn new(config: FavaConfig) -> Result<Self> {
        // reqwest's blocking client defaults to a 30s timeout; pass ours
        // through explicitly so an unset timeout means none.
        let client = reqwest::blocking::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| McpError::Config(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self { config, client })
    }

    /// The configuration this client was built from.
    pub fn config(&self) -> &FavaConfig {
        &self.config
    }

    fn send(&self, url: &str, params: Option<&QueryParams>) -> reqwest::Result<JsonValue> {
        let mut request = self.client.get(url);
        if let Some(params) = params {
            request = request.query(params);
        }
        if let Some(creds) = self.config.credentials() {
            request = request.basic_auth(&creds.username, Some(&creds.password));
        }
        request.send()?.error_for_status()?.json()
    }
}

impl FavaApi for FavaClient {
    fn get(&self, endpoint: &str, params: Option<&QueryParams>) -> Result<JsonValue> {
        let url = self.config.endpoint_url(endpoint);
        tracing::debug!(url = %url, ?params, "Fava request");

        self.send(&url, params).map_err(|e| {
            tracing::error!(url = %url, error = %e, "Error fetching data from Fava");
            McpError::Communication {
                endpoint: endpoint.to_string(),
                reason: error_chain(&e),
            }
        })
    }
}

// reqwest's Display stops at the outermost error; the transport cause
// (refused connection, DNS, timeout) lives further down the source chain.
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut text = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let cause_text = cause.to_string();
        if !text.ends_with(&cause_text) {
            text.push_str(": ");
            text.push_str(&cause_text);
        }
        source = cause.source();
    }
    text
}
