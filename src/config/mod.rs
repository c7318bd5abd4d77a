//! Configuration module
//!
//! TOML configuration for the mock server, with `NNTP_MOCK_*` environment
//! overrides.

mod defaults;
mod loading;
mod types;
mod validation;

pub use defaults::CONFIG_FILE;
pub use loading::{
    ConfigSource, ENV_ADDRESS, ENV_FIXTURES, ENV_REQUIRE_AUTH, active_env_overrides,
    apply_env_overrides, create_default_config, load_config, load_config_with_fallback,
    parse_config,
};
pub use types::{Config, FixturesConfig, LoggingConfig, ServerConfig};
