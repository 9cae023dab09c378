//! Process configuration.
//!
//! Built once in `main` from CLI flags and environment variables, then shared
//! read-only with the gateway.

use std::fmt;
use std::time::Duration;

use crate::error::{McpError, Result};

/// Basic-auth credentials for Fava.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Username
    pub username: String,
    /// Password
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"****")
            .finish()
    }
}

/// Connection settings for the upstream Fava instance.
#[derive(Debug, Clone)]
pub struct FavaConfig {
    base_url: String,
    credentials: Option<Credentials>,
    timeout: Option<Duration>,
}

impl FavaConfig {
    /// Create a configuration for the Fava instance at `base_url`.
    ///
    /// The URL should include the ledger slug, e.g.
    /// `http://localhost:5000/my-ledger`. An empty URL is rejected.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let base_url = base_url.into().trim().to_string();
        if base_url.is_empty() {
            return Err(McpError::Config(
                "FAVA_URL environment variable is required".to_string(),
            ));
        }
        Ok(Self {
            base_url,
            credentials: None,
            timeout: None,
        })
    }

    /// Enable basic auth. Takes effect only when both parts are non-empty.
    pub fn with_credentials(mut self, username: Option<String>, password: Option<String>) -> Self {
        self.credentials = match (username, password) {
            (Some(username), Some(password)) if !username.is_empty() && !password.is_empty() => {
                Some(Credentials { username, password })
            }
            _ => None,
        };
        self
    }

    /// Set a request timeout. Requests wait indefinitely when unset.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Base URL as configured.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Basic-auth credentials, if configured.
    pub fn credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }

    /// Request timeout, if configured.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Full URL for an API endpoint such as `api/query`.
    pub fn endpoint_url(&self, endpoint: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            endpoint.trim_start_matches('/')
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_url_rejected() {
        assert!(matches!(FavaConfig::new(""), Err(McpError::Config(_))));
        assert!(matches!(FavaConfig::new("   "), Err(McpError::Config(_))));
    }

    #[test]
    fn test_endpoint_url_join() {
        let config = FavaConfig::new("http://localhost:5000/ledger/").unwrap();
        assert_eq!(
            config.endpoint_url("/api/query"),
            "http://localhost:5000/ledger/api/query"
        );

        let config = FavaConfig::new("http://localhost:5000/ledger").unwrap();
        assert_eq!(
            config.endpoint_url("api/ledger_data"),
            "http://localhost:5000/ledger/api/ledger_data"
        );
    }

    #[test]
    fn test_credentials_need_both_parts() {
        let base = FavaConfig::new("http://fava").unwrap();

        let config = base.clone().with_credentials(Some("alice".into()), None);
        assert!(config.credentials().is_none());

        let config = base
            .clone()
            .with_credentials(Some("alice".into()), Some(String::new()));
        assert!(config.credentials().is_none());

        let config = base.with_credentials(Some("alice".into()), Some("secret".into()));
        let creds = config.credentials().unwrap();
        assert_eq!(creds.username, "alice");
        assert_eq!(creds.password, "secret");
    }

    #[test]
    fn test_debug_redacts_password() {
        let config = FavaConfig::new("http://fava")
            .unwrap()
            .with_credentials(Some("alice".into()), Some("hunter2".into()));
        let shown = format!("{:?}", config);
        assert!(shown.contains("alice"));
        assert!(!shown.contains("hunter2"));
    }

    #[test]
    fn test_no_timeout_by_default() {
        let config = FavaConfig::new("http://fava").unwrap();
        assert!(config.timeout().is_none());

        let config = config.with_timeout(Some(Duration::from_secs(30)));
        assert_eq!(config.timeout(), Some(Duration::from_secs(30)));
    }
}
