//! Configuration validation
//!
//! Types already reject malformed addresses and zero thread counts; this
//! checks what remains.

use anyhow::Result;
use std::time::Duration;

use super::types::Config;

/// Idle timeouts shorter than this are probably a unit mistake
const MIN_RECOMMENDED_IDLE_TIMEOUT: Duration = Duration::from_secs(10);

impl Config {
    /// Validate configuration for correctness
    pub fn validate(&self) -> Result<()> {
        let greeting = &self.server.greeting;
        if greeting.trim().is_empty() {
            return Err(anyhow::anyhow!("server.greeting must not be empty"));
        }
        if greeting.contains(['\r', '\n']) {
            return Err(anyhow::anyhow!(
                "server.greeting must be a single line, got {:?}",
                greeting
            ));
        }

        if self.fixtures.path.as_os_str().is_empty() {
            return Err(anyhow::anyhow!("fixtures.path must not be empty"));
        }

        let idle = self.server.idle_timeout;
        if !idle.is_zero() && idle < MIN_RECOMMENDED_IDLE_TIMEOUT {
            tracing::warn!(
                "server.idle_timeout is {:?} (< {:?}); clients will be dropped quickly. \
                 Set 0 to disable the timeout.",
                idle,
                MIN_RECOMMENDED_IDLE_TIMEOUT
            );
        }

        Ok(())
    }
}
