//! Command-line arguments for the server binary

use clap::Parser;
use std::path::PathBuf;

use crate::config::Config;
use crate::types::{ConfigPath, Port, ServerAddress, ThreadCount};

/// Fixture-backed NNTP server for integration tests
///
/// Command line flags override the config file and `NNTP_MOCK_*`
/// environment variables.
#[derive(Parser, Debug, Clone, Default)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Listen address, `nntp://host:port` or `host:port`
    #[arg(short, long)]
    pub address: Option<ServerAddress>,

    /// Listen port, keeping the configured host
    #[arg(short, long)]
    pub port: Option<Port>,

    /// Fixture database (YAML)
    #[arg(short, long)]
    pub fixtures: Option<PathBuf>,

    /// Configuration file path [default: nntp-mock.toml if present]
    #[arg(short, long, env = "NNTP_MOCK_CONFIG")]
    pub config: Option<ConfigPath>,

    /// Require AUTHINFO before reader commands
    #[arg(long)]
    pub require_auth: bool,

    /// Number of worker threads (default: 1, use 0 for CPU cores)
    #[arg(short, long, env = "NNTP_MOCK_THREADS")]
    pub threads: Option<ThreadCount>,

    /// Also write logs to this file
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Args {
    /// Apply flags on top of a loaded configuration
    pub fn apply_to(&self, config: &mut Config) {
        if let Some(address) = &self.address {
            config.server.address = address.clone();
        }
        if let Some(port) = self.port {
            config.server.address = config.server.address.with_port(port.get());
        }
        if let Some(path) = &self.fixtures {
            config.fixtures.path = path.clone();
        }
        if self.require_auth {
            config.server.require_auth = true;
        }
        if self.threads.is_some() {
            config.server.threads = self.threads;
        }
        if let Some(file) = &self.log_file {
            config.logging.file = Some(file.clone());
        }
    }
}
