//! In-memory newsgroup database
//!
//! Built once from a fixture database and shared read-only between all
//! client sessions.

mod article;
mod group;

pub use article::{Article, NumberedArticle, OVERVIEW_HEADERS};
pub use group::Group;

use chrono::Utc;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use crate::fixture::{FixtureDb, FixtureError, ResolvedGroup};
use crate::types::{ArticleNumber, GroupName, MessageId};

/// Immutable newsgroup store
#[derive(Debug, Clone, Default)]
pub struct Store {
    groups: BTreeMap<GroupName, Group>,
    by_id: HashMap<MessageId, (GroupName, ArticleNumber)>,
    article_count: usize,
}

impl Store {
    /// Validate a fixture database and build the store from it
    pub fn from_fixtures(db: &FixtureDb) -> Result<Self, FixtureError> {
        Ok(Self::from_resolved(db.resolve()?.groups))
    }

    /// Build from already resolved groups
    ///
    /// Groups without a creation time are stamped with the current time.
    /// A message-id present in several groups resolves to the first one.
    pub fn from_resolved(groups: Vec<ResolvedGroup>) -> Self {
        let now = Utc::now();
        let mut store = Self::default();

        for resolved in groups {
            let mut group = Group::new(
                resolved.name.clone(),
                resolved.description,
                resolved.created.unwrap_or(now),
            );
            for article in resolved.articles {
                store
                    .by_id
                    .entry(article.message_id.clone())
                    .or_insert_with(|| (resolved.name.clone(), article.number));
                group.insert(
                    article.number,
                    Arc::new(Article::new(article.message_id, article.headers, &article.body)),
                );
                store.article_count += 1;
            }
            store.groups.insert(resolved.name, group);
        }

        store
    }

    pub fn group(&self, name: &GroupName) -> Option<&Group> {
        self.groups.get(name)
    }

    /// All groups ordered by name
    pub fn groups(&self) -> impl Iterator<Item = &Group> {
        self.groups.values()
    }

    /// Look an article up by message-id across all groups
    pub fn article_by_id(
        &self,
        id: &MessageId,
    ) -> Option<(&Group, ArticleNumber, &Arc<Article>)> {
        let (group_name, number) = self.by_id.get(id)?;
        let group = self.groups.get(group_name)?;
        let article = group.article(*number)?;
        Some((group, *number, article))
    }

    #[inline]
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Total articles, counting each cross-posted copy
    #[inline]
    pub fn article_count(&self) -> usize {
        self.article_count
    }
}
