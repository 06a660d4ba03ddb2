//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the tester.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct TentConfig {
    /// OCCI server under test.
    pub server: ServerConfig,

    /// Suite lookup and log placement.
    pub suites: SuiteConfig,

    /// Process log settings.
    pub logging: LoggingConfig,
}

/// Connection settings for the server under test.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host name or address (e.g., "localhost").
    pub host: String,

    /// TCP port.
    pub port: u16,

    /// URL scheme, `http` or `https`.
    pub scheme: String,

    /// Optional transport timeout in seconds. No timeout when unset.
    pub timeout_secs: Option<u64>,

    /// User agent sent with every request.
    pub user_agent: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 8080,
            scheme: "http".to_string(),
            timeout_secs: None,
            user_agent: default_user_agent(),
        }
    }
}

impl ServerConfig {
    /// Base URL without trailing slash, e.g. `http://localhost:8080`.
    pub fn base_url(&self) -> String {
        format!("{}://{}:{}", self.scheme, self.host, self.port)
    }
}

fn default_user_agent() -> String {
    format!("occi-tent/{} OCCI/1.1", env!("CARGO_PKG_VERSION"))
}

/// Suite file settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SuiteConfig {
    /// Directory searched for suites given by bare name.
    pub directory: String,

    /// Directory for `<suite>.log` files. Defaults to next to the suite.
    pub log_directory: Option<String>,
}

impl Default for SuiteConfig {
    fn default() -> Self {
        Self {
            directory: "suites".to_string(),
            log_directory: None,
        }
    }
}

/// Process log configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}
