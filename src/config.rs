//! Relay configuration.
//!
//! Loaded from an optional YAML file, then overridden by the `LISTEN` and
//! `DOWNSTREAM_URL` environment variables.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::proxy::binding::Binding;

/// Environment variable naming the config file when no path is passed.
pub const CONFIG_ENV: &str = "RELAY_CONFIG";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub server: ServerConfig,
    pub downstream: DownstreamConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    /// Address the relay accepts connections on
    pub listen_addr: String,
}

/// The single service every request is forwarded to.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DownstreamConfig {
    /// Downstream URL, `http://host[:port]`
    pub url: String,
    /// Optional name for logging
    pub name: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:8080".to_string(),
        }
    }
}

impl Default for DownstreamConfig {
    fn default() -> Self {
        Self {
            url: "http://127.0.0.1:9000".to_string(),
            name: None,
        }
    }
}

impl Config {
    /// Loads the config from `path`, or from `$RELAY_CONFIG`, or falls back to
    /// defaults. Environment overrides are applied and the result validated.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = path
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from));

        let mut cfg = match path {
            Some(path) => {
                let content = std::fs::read_to_string(&path)
                    .map_err(|source| ConfigError::Io { path, source })?;
                Self::from_yaml(&content)?
            }
            None => Self::default(),
        };

        cfg.apply_overrides(|key| std::env::var(key).ok());
        cfg.validate()?;
        Ok(cfg)
    }

    /// Parses a YAML document. Missing fields take their defaults.
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Applies `LISTEN` and `DOWNSTREAM_URL` from `lookup`.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(listen_addr) = lookup("LISTEN") {
            self.server.listen_addr = listen_addr;
        }
        if let Some(url) = lookup("DOWNSTREAM_URL") {
            self.downstream.url = url;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.listen_addr.trim().is_empty() {
            return Err(ConfigError::Invalid("server.listen_addr is empty".into()));
        }
        self.binding().map(|_| ())
    }

    /// Builds the downstream binding described by this config.
    pub fn binding(&self) -> Result<Binding, ConfigError> {
        Binding::new(&self.downstream)
    }
}
