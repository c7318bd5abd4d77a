//! Command types and structures

use thiserror::Error;

use crate::types::{ArticleNumber, ArticleRange, GroupName, MessageId};

/// Which part of an article a retrieval command asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArticlePart {
    /// ARTICLE: head, blank line, body
    Whole,
    /// HEAD
    Head,
    /// BODY
    Body,
    /// STAT: status line only
    Stat,
}

impl ArticlePart {
    #[must_use]
    pub const fn keyword(&self) -> &'static str {
        match self {
            Self::Whole => "ARTICLE",
            Self::Head => "HEAD",
            Self::Body => "BODY",
            Self::Stat => "STAT",
        }
    }
}

/// Argument of ARTICLE/HEAD/BODY/STAT
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArticleSpec {
    /// No argument: the current article
    Current,
    Number(ArticleNumber),
    MessageId(MessageId),
}

/// Argument of OVER/XOVER and HDR/XHDR
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// No argument: the current article
    Current,
    Range(ArticleRange),
    MessageId(MessageId),
}

/// LIST variants (RFC 3977 §7.6, RFC 6048)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListKeyword {
    /// LIST / LIST ACTIVE [wildmat]
    Active(Option<String>),
    /// LIST NEWSGROUPS [wildmat]
    Newsgroups(Option<String>),
    /// LIST ACTIVE.TIMES [wildmat]
    ActiveTimes(Option<String>),
    /// LIST OVERVIEW.FMT
    OverviewFmt,
    /// LIST HEADERS [MSGID|RANGE]
    Headers,
    /// A keyword we recognize but have no data for (DISTRIB.PATS, MOTD, ...)
    Unsupported(String),
}

/// A parsed client command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Capabilities,
    ModeReader,
    Quit,
    Help,
    Date,
    Group(GroupName),
    ListGroup {
        group: Option<GroupName>,
        range: Option<ArticleRange>,
    },
    Last,
    Next,
    Article {
        part: ArticlePart,
        spec: ArticleSpec,
    },
    List(ListKeyword),
    Over {
        selection: Selection,
        /// Sent as XOVER
        legacy: bool,
    },
    Hdr {
        field: String,
        selection: Selection,
        /// Sent as XHDR
        legacy: bool,
    },
    NewGroups {
        date: String,
        time: String,
        gmt: bool,
    },
    NewNews {
        wildmat: String,
        date: String,
        time: String,
        gmt: bool,
    },
    AuthinfoUser(String),
    AuthinfoPass(String),
    Post,
    Ihave(MessageId),
}

impl Command {
    /// Commands a client may issue before authenticating (RFC 4643 §2.2)
    #[must_use]
    pub const fn allowed_before_auth(&self) -> bool {
        matches!(
            self,
            Self::Capabilities
                | Self::ModeReader
                | Self::Quit
                | Self::Help
                | Self::AuthinfoUser(_)
                | Self::AuthinfoPass(_)
        )
    }

    /// Command keyword for log lines (never includes credentials)
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Capabilities => "CAPABILITIES",
            Self::ModeReader => "MODE READER",
            Self::Quit => "QUIT",
            Self::Help => "HELP",
            Self::Date => "DATE",
            Self::Group(_) => "GROUP",
            Self::ListGroup { .. } => "LISTGROUP",
            Self::Last => "LAST",
            Self::Next => "NEXT",
            Self::Article { part, .. } => part.keyword(),
            Self::List(_) => "LIST",
            Self::Over { legacy: false, .. } => "OVER",
            Self::Over { legacy: true, .. } => "XOVER",
            Self::Hdr { legacy: false, .. } => "HDR",
            Self::Hdr { legacy: true, .. } => "XHDR",
            Self::NewGroups { .. } => "NEWGROUPS",
            Self::NewNews { .. } => "NEWNEWS",
            Self::AuthinfoUser(_) => "AUTHINFO USER",
            Self::AuthinfoPass(_) => "AUTHINFO PASS",
            Self::Post => "POST",
            Self::Ihave(_) => "IHAVE",
        }
    }
}

/// Why a command line could not be parsed
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("empty command")]
    Empty,

    #[error("command line exceeds {limit} octets")]
    LineTooLong { limit: usize },

    #[error("unknown command {0}")]
    Unknown(String),

    #[error("{0}")]
    Syntax(String),
}

impl CommandError {
    pub(crate) fn syntax(msg: impl Into<String>) -> Self {
        Self::Syntax(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allowed_before_auth() {
        assert!(Command::Capabilities.allowed_before_auth());
        assert!(Command::Quit.allowed_before_auth());
        assert!(Command::AuthinfoUser("u".to_string()).allowed_before_auth());
        assert!(!Command::Date.allowed_before_auth());
        assert!(!Command::Last.allowed_before_auth());
        assert!(
            !Command::Article {
                part: ArticlePart::Stat,
                spec: ArticleSpec::Current
            }
            .allowed_before_auth()
        );
    }

    #[test]
    fn test_names_hide_credentials() {
        let cmd = Command::AuthinfoPass("hunter2".to_string());
        assert_eq!(cmd.name(), "AUTHINFO PASS");
    }

    #[test]
    fn test_legacy_names() {
        let over = Command::Over {
            selection: Selection::Current,
            legacy: true,
        };
        assert_eq!(over.name(), "XOVER");

        let hdr = Command::Hdr {
            field: "Subject".to_string(),
            selection: Selection::Current,
            legacy: false,
        };
        assert_eq!(hdr.name(), "HDR");
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            CommandError::LineTooLong { limit: 512 }.to_string(),
            "command line exceeds 512 octets"
        );
        assert_eq!(
            CommandError::Unknown("FOO".to_string()).to_string(),
            "unknown command FOO"
        );
    }
}
