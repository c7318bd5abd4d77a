//! Tests for config file loading and fallback logic

use anyhow::Result;
use nntp_mock::config::{ConfigSource, create_default_config, load_config, load_config_with_fallback};
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;
use tempfile::NamedTempFile;

fn write_config(contents: &str) -> Result<NamedTempFile> {
    let mut temp_file = NamedTempFile::new()?;
    temp_file.write_all(contents.as_bytes())?;
    temp_file.flush()?;
    Ok(temp_file)
}

/// Test loading from TOML file
#[test]
fn test_load_config_from_file() -> Result<()> {
    let temp_file = write_config(
        r#"
[server]
address = "nntp://127.0.0.1:1119"
require_auth = true
greeting = "test server ready"
idle_timeout = 30

[fixtures]
path = "tests/fixtures/db.yml"
"#,
    )?;

    let config = load_config(temp_file.path())?;

    assert_eq!(config.server.address.host(), "127.0.0.1");
    assert_eq!(config.server.address.port(), 1119);
    assert!(config.server.require_auth);
    assert_eq!(config.server.greeting, "test server ready");
    assert_eq!(config.server.idle_timeout, Duration::from_secs(30));
    assert_eq!(config.fixtures.path, PathBuf::from("tests/fixtures/db.yml"));
    assert_eq!(config.logging.file, None);

    Ok(())
}

/// Sections and keys that are left out take their defaults
#[test]
fn test_partial_config_uses_defaults() -> Result<()> {
    let temp_file = write_config("[server]\nrequire_auth = true\n")?;

    let config = load_config(temp_file.path())?;
    let defaults = create_default_config();

    assert!(config.server.require_auth);
    assert_eq!(config.server.address, defaults.server.address);
    assert_eq!(config.server.greeting, defaults.server.greeting);
    assert_eq!(config.fixtures, defaults.fixtures);

    Ok(())
}

#[test]
fn test_default_config_listens_on_8119() {
    let config = create_default_config();
    assert_eq!(config.server.address.to_string(), "nntp://0.0.0.0:8119");
    assert!(!config.server.require_auth);
    assert_eq!(config.fixtures.path, PathBuf::from("fixtures/db.yml"));
}

/// Test invalid TOML returns error
#[test]
fn test_invalid_toml_returns_error() -> Result<()> {
    let temp_file = write_config("this is not valid TOML [[[")?;

    let result = load_config(temp_file.path());

    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("Failed to parse"));

    Ok(())
}

#[test]
fn test_invalid_address_returns_error() -> Result<()> {
    let temp_file = write_config("[server]\naddress = \"http://localhost:80\"\n")?;

    let result = load_config(temp_file.path());
    assert!(result.unwrap_err().to_string().contains("Failed to parse"));

    Ok(())
}

#[test]
fn test_multiline_greeting_fails_validation() -> Result<()> {
    let temp_file = write_config("[server]\ngreeting = \"two\\nlines\"\n")?;

    assert!(load_config(temp_file.path()).is_err());

    Ok(())
}

/// Test missing file returns error
#[test]
fn test_missing_file_returns_error() {
    let result = load_config("/nonexistent/path.toml");

    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("Failed to read"));
}

#[test]
fn test_fallback_uses_existing_file() -> Result<()> {
    let temp_file = write_config("[server]\ngreeting = \"from file\"\n")?;

    let (config, source) = load_config_with_fallback(temp_file.path())?;

    assert_eq!(config.server.greeting, "from file");
    assert_eq!(source, ConfigSource::File(temp_file.path().to_path_buf()));

    Ok(())
}

#[test]
fn test_fallback_to_defaults_when_missing() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let missing = dir.path().join("nntp-mock.toml");

    let (config, source) = load_config_with_fallback(&missing)?;

    assert_eq!(source, ConfigSource::Default);
    assert_eq!(config.server.greeting, create_default_config().server.greeting);

    Ok(())
}
