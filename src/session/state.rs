//! Per-connection reader state

use super::AuthState;
use crate::types::{ArticleNumber, GroupName};

/// Everything a session remembers between commands
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    /// Currently selected newsgroup
    pub group: Option<GroupName>,
    /// Current article pointer within `group`
    pub article: Option<ArticleNumber>,
    pub auth: AuthState,
    /// Set once QUIT has been answered
    pub closing: bool,
}

impl SessionState {
    /// Select a group and point at its first article
    pub fn select(&mut self, group: GroupName, first: Option<ArticleNumber>) {
        self.group = Some(group);
        self.article = first;
    }
}
