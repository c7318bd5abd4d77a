//! YAML fixture database
//!
//! A fixture file describes the newsgroups, articles and user accounts the
//! mock server exposes. Loading parses the YAML and checks it for
//! consistency; [`FixtureDb::resolve`] turns it into numbered, typed records
//! ready for the in-memory store.

mod error;
mod schema;

pub use error::FixtureError;
pub use schema::{FixtureArticle, FixtureDb, FixtureGroup, FixtureUser};

use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use crate::types::{ArticleNumber, GroupName, MessageId, Password, Username};

/// Read, parse and validate a fixture file
pub fn load_fixtures(path: impl AsRef<Path>) -> Result<FixtureDb, FixtureError> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path).map_err(|source| FixtureError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let db = FixtureDb::parse(&contents, path)?;
    db.validate()?;
    Ok(db)
}

/// A fixture group with typed name and numbered articles
#[derive(Debug, Clone)]
pub struct ResolvedGroup {
    pub name: GroupName,
    pub description: String,
    pub created: Option<DateTime<Utc>>,
    pub articles: Vec<ResolvedArticle>,
}

/// A fixture article with its number and message-id settled
#[derive(Debug, Clone)]
pub struct ResolvedArticle {
    pub number: ArticleNumber,
    pub message_id: MessageId,
    /// Headers in file order, including a generated Message-ID if there was none
    pub headers: Vec<(String, String)>,
    pub body: String,
}

/// Fully validated fixture contents
#[derive(Debug, Clone, Default)]
pub struct ResolvedDb {
    pub users: Vec<(Username, Password)>,
    pub groups: Vec<ResolvedGroup>,
}

impl FixtureDb {
    /// Parse and validate fixture YAML held in memory
    pub fn from_yaml_str(yaml: &str) -> Result<Self, FixtureError> {
        let db = Self::parse(yaml, Path::new("<inline>"))?;
        db.validate()?;
        Ok(db)
    }

    fn parse(yaml: &str, path: &Path) -> Result<Self, FixtureError> {
        // serde_yaml rejects an empty document for a struct
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(yaml).map_err(|source| FixtureError::Yaml {
            path: PathBuf::from(path),
            source,
        })
    }

    /// Check the database for consistency without keeping the result
    pub fn validate(&self) -> Result<(), FixtureError> {
        self.resolve().map(|_| ())
    }

    /// Number every article, settle message-ids and type-check names
    pub fn resolve(&self) -> Result<ResolvedDb, FixtureError> {
        let mut usernames = HashSet::new();
        let mut users = Vec::with_capacity(self.users.len());
        for user in &self.users {
            let username = Username::new(user.username.clone())
                .map_err(|e| FixtureError::invalid(e.to_string()))?;
            let password = Password::new(user.password.clone())
                .map_err(|e| FixtureError::invalid(format!("user {username}: {e}")))?;
            if !usernames.insert(username.clone()) {
                return Err(FixtureError::invalid(format!(
                    "duplicate user {username}"
                )));
            }
            users.push((username, password));
        }

        let mut seen_groups = HashSet::new();
        let mut groups = Vec::with_capacity(self.groups.len());
        for group in &self.groups {
            let name = GroupName::new(group.name.clone())
                .map_err(|e| FixtureError::invalid(e.to_string()))?;
            if !seen_groups.insert(name.clone()) {
                return Err(FixtureError::invalid(format!("duplicate group {name}")));
            }
            let articles = resolve_articles(&name, &group.articles)?;
            groups.push(ResolvedGroup {
                name,
                description: group.description.trim().to_string(),
                created: group.created,
                articles,
            });
        }

        Ok(ResolvedDb { users, groups })
    }
}

fn resolve_articles(
    group: &GroupName,
    articles: &[FixtureArticle],
) -> Result<Vec<ResolvedArticle>, FixtureError> {
    let mut previous: Option<ArticleNumber> = None;
    let mut ids: HashMap<MessageId, ArticleNumber> = HashMap::new();
    let mut resolved = Vec::with_capacity(articles.len());

    for (index, article) in articles.iter().enumerate() {
        let number = match (article.number, previous) {
            (Some(n), _) => ArticleNumber::new(n).ok_or_else(|| {
                FixtureError::invalid(format!(
                    "{group}: article number {n} out of range 1..={}",
                    ArticleNumber::MAX
                ))
            })?,
            (None, None) => ArticleNumber::FIRST,
            (None, Some(prev)) => prev.next().ok_or_else(|| {
                FixtureError::invalid(format!("{group}: article numbers exhausted"))
            })?,
        };
        if let Some(prev) = previous
            && number <= prev
        {
            return Err(FixtureError::invalid(format!(
                "{group}: article #{} has number {number}, not greater than {prev}",
                index + 1
            )));
        }

        let mut headers = article
            .header_pairs()
            .map_err(|e| FixtureError::invalid(format!("{group} article {number}: {e}")))?;
        let message_id = match headers
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case("Message-ID"))
        {
            Some((_, value)) => MessageId::new(value.clone())
                .map_err(|e| FixtureError::invalid(format!("{group} article {number}: {e}")))?,
            None => {
                let generated = MessageId::new(format!("<{number}.{group}@nntp-mock>"))
                    .map_err(|e| FixtureError::invalid(e.to_string()))?;
                headers.push(("Message-ID".to_string(), generated.to_string()));
                generated
            }
        };
        if let Some(other) = ids.insert(message_id.clone(), number) {
            return Err(FixtureError::invalid(format!(
                "{group}: message-id {message_id} used by articles {other} and {number}"
            )));
        }

        resolved.push(ResolvedArticle {
            number,
            message_id,
            headers,
            body: article.body.clone(),
        });
        previous = Some(number);
    }

    Ok(resolved)
}
