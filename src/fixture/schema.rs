//! Serde model of the fixture YAML file

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_yaml::{Mapping, Value};

use super::FixtureError;

/// Top-level fixture document
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FixtureDb {
    /// Credential table for AUTHINFO
    #[serde(default)]
    pub users: Vec<FixtureUser>,
    #[serde(default)]
    pub groups: Vec<FixtureGroup>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FixtureUser {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FixtureGroup {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Creation time reported by NEWGROUPS and LIST ACTIVE.TIMES
    #[serde(default)]
    pub created: Option<DateTime<Utc>>,
    #[serde(default, alias = "messages")]
    pub articles: Vec<FixtureArticle>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FixtureArticle {
    /// Explicit article number; defaults to the previous one plus one
    #[serde(default)]
    pub number: Option<u64>,
    /// Header fields in file order
    #[serde(default)]
    pub headers: Mapping,
    #[serde(default)]
    pub body: String,
}

impl FixtureArticle {
    /// Header fields as (name, value) pairs in file order
    ///
    /// Scalar values are rendered as text. Line breaks inside a value are
    /// folded into single spaces so each field stays on one wire line.
    pub fn header_pairs(&self) -> Result<Vec<(String, String)>, FixtureError> {
        self.headers
            .iter()
            .map(|(key, value)| {
                let name = match key {
                    Value::String(s) => s.trim().to_string(),
                    other => {
                        return Err(FixtureError::invalid(format!(
                            "header name must be a string, got {other:?}"
                        )));
                    }
                };
                if name.is_empty()
                    || name
                        .bytes()
                        .any(|b| b == b':' || b.is_ascii_whitespace() || b.is_ascii_control())
                {
                    return Err(FixtureError::invalid(format!(
                        "invalid header name {name:?}"
                    )));
                }
                Ok((name.clone(), scalar_text(&name, value)?))
            })
            .collect()
    }
}

fn scalar_text(name: &str, value: &Value) -> Result<String, FixtureError> {
    let text = match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Tagged(tagged) => return scalar_text(name, &tagged.value),
        Value::Sequence(_) | Value::Mapping(_) => {
            return Err(FixtureError::invalid(format!(
                "header {name} must be a scalar value"
            )));
        }
    };
    Ok(text
        .trim()
        .split(['\r', '\n'])
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" "))
}
