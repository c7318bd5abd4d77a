//! Configuration type definitions

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use super::defaults;
use crate::server::ServerOptions;
use crate::types::{ServerAddress, ThreadCount, duration_serde};

/// Top-level configuration file
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub fixtures: FixturesConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// `[server]` section
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ServerConfig {
    /// `nntp://host:port` or `host:port`
    #[serde(default = "defaults::address")]
    pub address: ServerAddress,
    #[serde(default)]
    pub require_auth: bool,
    /// Text sent after the 201 code on connect
    #[serde(default = "defaults::greeting")]
    pub greeting: String,
    /// Seconds a client may stay silent; 0 disables
    #[serde(with = "duration_serde", default = "defaults::idle_timeout")]
    pub idle_timeout: Duration,
    /// Tokio worker threads (1 = current-thread runtime)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threads: Option<ThreadCount>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: defaults::address(),
            require_auth: false,
            greeting: defaults::greeting(),
            idle_timeout: defaults::idle_timeout(),
            threads: None,
        }
    }
}

impl ServerConfig {
    /// Options handed to [`crate::server::NntpServer::new`]
    #[must_use]
    pub fn options(&self) -> ServerOptions {
        ServerOptions {
            require_auth: self.require_auth,
            greeting: self.greeting.clone(),
            idle_timeout: self.idle_timeout,
        }
    }
}

/// `[fixtures]` section
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct FixturesConfig {
    #[serde(default = "defaults::fixtures_path")]
    pub path: PathBuf,
}

impl Default for FixturesConfig {
    fn default() -> Self {
        Self {
            path: defaults::fixtures_path(),
        }
    }
}

/// `[logging]` section
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct LoggingConfig {
    /// Also write logs (without ANSI colours) to this file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}
