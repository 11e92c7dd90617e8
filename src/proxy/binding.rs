//! Downstream binding
//!
//! The static, read-only handle naming the one service that every request
//! is forwarded to.

use crate::config::{ConfigError, DownstreamConfig};
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    /// Downstream URL (e.g., "http://localhost:3000")
    pub url: Url,

    /// Optional name for logging
    pub name: Option<String>,

    authority: String,
}

impl Binding {
    /// Create a binding from configuration.
    ///
    /// Only plain `http` origins are accepted. A path, query or fragment is
    /// rejected because honouring it would mean rewriting request targets.
    pub fn new(config: &DownstreamConfig) -> Result<Self, ConfigError> {
        let url = Url::parse(&config.url)
            .map_err(|e| ConfigError::Invalid(format!("downstream.url {:?}: {e}", config.url)))?;

        if url.scheme() != "http" {
            return Err(ConfigError::Invalid(format!(
                "downstream.url scheme must be http, got {}",
                url.scheme()
            )));
        }

        let host = url
            .host_str()
            .filter(|h| !h.is_empty())
            .ok_or_else(|| ConfigError::Invalid("downstream.url is missing a host".into()))?;

        if url.path() != "/" || url.query().is_some() || url.fragment().is_some() {
            return Err(ConfigError::Invalid(
                "downstream.url must not carry a path, query or fragment".into(),
            ));
        }

        // `port_or_known_default` is always Some for http
        let port = url.port_or_known_default().unwrap_or(80);
        let authority = format!("{host}:{port}");

        Ok(Self {
            url,
            name: config.name.clone(),
            authority,
        })
    }

    /// `host:port` to connect to.
    pub fn authority(&self) -> &str {
        &self.authority
    }

    /// Get a display name for the binding (name or URL)
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(self.url.as_str())
    }
}
