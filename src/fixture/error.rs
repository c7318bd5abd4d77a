use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading or validating a fixture database
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FixtureError {
    #[error("failed to read fixture file '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse fixture file '{}': {source}", path.display())]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid fixture data: {0}")]
    Invalid(String),
}

impl FixtureError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Self::Invalid(msg.into())
    }
}
