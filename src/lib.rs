//! Fixture-backed NNTP server for integration tests
//!
//! Seeds an in-memory newsgroup database from a YAML fixture file and
//! serves it over NNTP (RFC 3977 reader commands, AUTHINFO USER/PASS).
//! Posting is always refused.
//!
//! ```no_run
//! use nntp_mock::{NntpServer, ServerOptions};
//! use nntp_mock::types::ServerAddress;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let mut server = NntpServer::new(ServerAddress::default_listen(), ServerOptions::default());
//! server.load_fixtures("fixtures/db.yml")?;
//! let listening = server.listen().await?;
//! listening.serve(nntp_mock::runtime::shutdown_signal()).await?;
//! # Ok(())
//! # }
//! ```

pub mod args;
pub mod auth;
pub mod command;
pub mod config;
pub mod fixture;
pub mod logging;
pub mod protocol;
pub mod runtime;
pub mod server;
pub mod session;
pub mod store;
pub mod types;

pub use config::{Config, ConfigSource, load_config, load_config_with_fallback};
pub use fixture::{FixtureDb, FixtureError, load_fixtures};
pub use server::{ListeningServer, NntpServer, ServerHandle, ServerOptions};
pub use store::Store;
pub use types::ServerAddress;
