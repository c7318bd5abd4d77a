//! Default values for configuration fields
//!
//! Used by serde `default = "..."` attributes and by `Default` impls.

use std::path::PathBuf;
use std::time::Duration;

use crate::protocol::DEFAULT_GREETING;
use crate::server::DEFAULT_IDLE_TIMEOUT;
use crate::types::ServerAddress;

/// Config file looked up when `--config` is not given
pub const CONFIG_FILE: &str = "nntp-mock.toml";

/// Listen on all interfaces, port 8119
#[inline]
pub fn address() -> ServerAddress {
    ServerAddress::default_listen()
}

#[inline]
pub fn greeting() -> String {
    DEFAULT_GREETING.to_string()
}

#[inline]
pub fn idle_timeout() -> Duration {
    DEFAULT_IDLE_TIMEOUT
}

#[inline]
pub fn fixtures_path() -> PathBuf {
    PathBuf::from("fixtures/db.yml")
}
