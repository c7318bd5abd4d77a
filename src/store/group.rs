use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::sync::Arc;

use super::article::{Article, NumberedArticle};
use crate::types::{ArticleNumber, ArticleRange, GroupName};

/// A newsgroup and its articles keyed by number
#[derive(Debug, Clone)]
pub struct Group {
    name: GroupName,
    description: String,
    created: DateTime<Utc>,
    articles: BTreeMap<ArticleNumber, Arc<Article>>,
}

impl Group {
    pub fn new(name: GroupName, description: String, created: DateTime<Utc>) -> Self {
        Self {
            name,
            description,
            created,
            articles: BTreeMap::new(),
        }
    }

    pub(crate) fn insert(&mut self, number: ArticleNumber, article: Arc<Article>) {
        self.articles.insert(number, article);
    }

    #[inline]
    pub fn name(&self) -> &GroupName {
        &self.name
    }

    #[inline]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[inline]
    pub fn created(&self) -> DateTime<Utc> {
        self.created
    }

    #[inline]
    pub fn count(&self) -> usize {
        self.articles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }

    /// Lowest article number; 1 when the group is empty
    pub fn low(&self) -> u64 {
        self.first().map_or(1, |n| n.get())
    }

    /// Highest article number; 0 when the group is empty
    pub fn high(&self) -> u64 {
        self.articles.keys().next_back().map_or(0, |n| n.get())
    }

    pub fn first(&self) -> Option<ArticleNumber> {
        self.articles.keys().next().copied()
    }

    pub fn article(&self, number: ArticleNumber) -> Option<&Arc<Article>> {
        self.articles.get(&number)
    }

    pub fn articles(&self) -> impl Iterator<Item = NumberedArticle<'_>> {
        self.articles.iter().map(|(n, a)| (*n, a))
    }

    /// Articles whose numbers fall in `range`, ascending
    pub fn articles_in(&self, range: ArticleRange) -> impl Iterator<Item = NumberedArticle<'_>> {
        self.articles()
            .skip_while(move |(n, _)| n.get() < range.start())
            .take_while(move |(n, _)| range.contains(n.get()))
    }

    /// The next existing article after `number`
    pub fn next_after(&self, number: ArticleNumber) -> Option<NumberedArticle<'_>> {
        use std::ops::Bound::{Excluded, Unbounded};
        self.articles
            .range((Excluded(number), Unbounded))
            .next()
            .map(|(n, a)| (*n, a))
    }

    /// The previous existing article before `number`
    pub fn prev_before(&self, number: ArticleNumber) -> Option<NumberedArticle<'_>> {
        self.articles
            .range(..number)
            .next_back()
            .map(|(n, a)| (*n, a))
    }
}
