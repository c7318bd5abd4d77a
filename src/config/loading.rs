//! Configuration loading from files and environment variables
//!
//! Precedence, lowest first: built-in defaults, the TOML file, `NNTP_MOCK_*`
//! environment variables, then command line flags (applied by the binary).

use anyhow::Result;
use std::path::{Path, PathBuf};

use super::types::Config;
use crate::types::ServerAddress;

/// Listen address override
pub const ENV_ADDRESS: &str = "NNTP_MOCK_ADDRESS";
/// Fixture file override
pub const ENV_FIXTURES: &str = "NNTP_MOCK_FIXTURES";
/// `true`/`false` override for `server.require_auth`
pub const ENV_REQUIRE_AUTH: &str = "NNTP_MOCK_REQUIRE_AUTH";

/// Where the effective configuration came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    File(PathBuf),
    Default,
}

impl ConfigSource {
    #[must_use]
    pub fn description(&self) -> String {
        match self {
            Self::File(path) => format!("config file '{}'", path.display()),
            Self::Default => "built-in defaults".to_string(),
        }
    }
}

/// Parse a TOML document into a [`Config`] without validating it
pub fn parse_config(contents: &str, origin: &Path) -> Result<Config> {
    toml::from_str(contents)
        .map_err(|e| anyhow::anyhow!("Failed to parse config file '{}': {}", origin.display(), e))
}

/// Load configuration from a TOML file, with environment variable overrides
pub fn load_config(config_path: impl AsRef<Path>) -> Result<Config> {
    let config_path = config_path.as_ref();
    let contents = std::fs::read_to_string(config_path).map_err(|e| {
        anyhow::anyhow!(
            "Failed to read config file '{}': {}",
            config_path.display(),
            e
        )
    })?;

    let mut config = parse_config(&contents, config_path)?;
    apply_env_overrides(&mut config, |key| std::env::var(key).ok())?;
    config.validate()?;
    Ok(config)
}

/// Load `config_path` if it exists, otherwise use built-in defaults
///
/// Environment overrides apply in both cases.
pub fn load_config_with_fallback(config_path: impl AsRef<Path>) -> Result<(Config, ConfigSource)> {
    let config_path = config_path.as_ref();
    if config_path.exists() {
        let config = load_config(config_path)?;
        return Ok((config, ConfigSource::File(config_path.to_path_buf())));
    }

    let mut config = create_default_config();
    apply_env_overrides(&mut config, |key| std::env::var(key).ok())?;
    config.validate()?;
    Ok((config, ConfigSource::Default))
}

/// Apply `NNTP_MOCK_*` overrides read through `lookup`
///
/// Unset or empty variables are ignored.
pub fn apply_env_overrides<F>(config: &mut Config, lookup: F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(address) = get(ENV_ADDRESS) {
        config.server.address = address
            .trim()
            .parse::<ServerAddress>()
            .map_err(|e| anyhow::anyhow!("Invalid {}: {}", ENV_ADDRESS, e))?;
    }

    if let Some(path) = get(ENV_FIXTURES) {
        config.fixtures.path = PathBuf::from(path.trim());
    }

    if let Some(value) = get(ENV_REQUIRE_AUTH) {
        config.server.require_auth = parse_bool(&value)
            .ok_or_else(|| anyhow::anyhow!("Invalid {}: {:?}", ENV_REQUIRE_AUTH, value))?;
    }

    Ok(())
}

/// The `NNTP_MOCK_*` variables that [`apply_env_overrides`] would apply, with their values
///
/// Config loading runs before logging is set up, so the binary reports these afterwards.
pub fn active_env_overrides<F>(lookup: F) -> Vec<(&'static str, String)>
where
    F: Fn(&str) -> Option<String>,
{
    [ENV_ADDRESS, ENV_FIXTURES, ENV_REQUIRE_AUTH]
        .into_iter()
        .filter_map(|key| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .map(|v| (key, v.trim().to_string()))
        })
        .collect()
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Configuration used when no file is present
#[must_use]
pub fn create_default_config() -> Config {
    Config::default()
}
