//! Command execution against the store
//!
//! [`Session`] is synchronous: it takes one parsed command, updates the
//! per-connection state, and produces the full response. The connection
//! loop in [`super::connection`] owns the I/O.

use chrono::Utc;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::SessionState;
use super::auth_state::AuthState;
use crate::auth::AuthHandler;
use crate::command::{
    ArticlePart, ArticleSpec, Command, CommandError, ListKeyword, Selection,
};
use crate::protocol::datetime::{format_date, parse_date_time};
use crate::protocol::{Response, Wildmat, codes};
use crate::store::{Article, Group, OVERVIEW_HEADERS, Store};
use crate::types::{ArticleNumber, ArticleRange, ClientId, GroupName};

const IMPLEMENTATION: &str = concat!("IMPLEMENTATION nntp-mock ", env!("CARGO_PKG_VERSION"));

const HELP_LINES: &[&str] = &[
    "ARTICLE [message-id|number]",
    "AUTHINFO USER name|PASS password",
    "BODY [message-id|number]",
    "CAPABILITIES [keyword]",
    "DATE",
    "GROUP newsgroup",
    "HDR header [message-id|range]",
    "HEAD [message-id|number]",
    "HELP",
    "LAST",
    "LIST [ACTIVE|ACTIVE.TIMES|NEWSGROUPS|OVERVIEW.FMT|HEADERS] [wildmat]",
    "LISTGROUP [newsgroup [range]]",
    "MODE READER",
    "NEWGROUPS [yy]yymmdd hhmmss [GMT]",
    "NEWNEWS wildmat [yy]yymmdd hhmmss [GMT]",
    "NEXT",
    "OVER [range|message-id]",
    "QUIT",
    "STAT [message-id|number]",
    "XHDR header [range|message-id]",
    "XOVER [range]",
];

/// One client's view of the server
pub struct Session {
    client: ClientId,
    store: Arc<Store>,
    auth: Arc<AuthHandler>,
    state: SessionState,
}

enum Step {
    Back,
    Forward,
}

impl Session {
    pub fn new(client: ClientId, store: Arc<Store>, auth: Arc<AuthHandler>) -> Self {
        Self {
            client,
            store,
            auth,
            state: SessionState::default(),
        }
    }

    #[inline]
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    #[inline]
    pub fn client(&self) -> ClientId {
        self.client
    }

    /// True once the client has sent QUIT
    #[inline]
    pub fn is_closing(&self) -> bool {
        self.state.closing
    }

    /// Parse and execute one raw command line
    pub fn handle_line(&mut self, raw: &[u8]) -> Response {
        match Command::parse_line(raw) {
            Ok(command) => {
                debug!("Client {} command: {}", self.client, command.name());
                self.execute(command)
            }
            Err(e) => {
                warn!("Client {} sent bad command: {}", self.client, e);
                error_response(&e)
            }
        }
    }

    /// Execute a parsed command
    pub fn execute(&mut self, command: Command) -> Response {
        if self.auth.is_required()
            && !self.state.auth.is_authenticated()
            && !command.allowed_before_auth()
        {
            return Response::auth_required();
        }

        match command {
            Command::Capabilities => self.capabilities(),
            Command::ModeReader => Response::new(codes::NO_POSTING, "Posting prohibited"),
            Command::Quit => {
                self.state.closing = true;
                Response::closing()
            }
            Command::Help => Response::multiline(
                codes::HELP_TEXT,
                "Help text follows",
                HELP_LINES.iter().map(|l| (*l).to_string()).collect(),
            ),
            Command::Date => Response::new(codes::SERVER_DATE, format_date(Utc::now())),
            Command::Group(name) => self.group(name),
            Command::ListGroup { group, range } => self.list_group(group, range),
            Command::Last => self.step(Step::Back),
            Command::Next => self.step(Step::Forward),
            Command::Article { part, spec } => self.article(part, spec),
            Command::List(keyword) => self.list(keyword),
            Command::Over { selection, .. } => self.over(selection),
            Command::Hdr {
                field,
                selection,
                legacy,
            } => self.hdr(&field, selection, legacy),
            Command::NewGroups { date, time, .. } => self.new_groups(&date, &time),
            Command::NewNews {
                wildmat,
                date,
                time,
                ..
            } => self.new_news(&wildmat, &date, &time),
            Command::AuthinfoUser(user) => self.authinfo_user(user),
            Command::AuthinfoPass(pass) => self.authinfo_pass(&pass),
            Command::Post => Response::new(codes::POSTING_NOT_PERMITTED, "Posting not permitted"),
            Command::Ihave(_) => Response::new(codes::ARTICLE_NOT_WANTED, "Article not wanted"),
        }
    }

    fn capabilities(&self) -> Response {
        let mut lines: Vec<String> = [
            "VERSION 2",
            "READER",
            IMPLEMENTATION,
            "LIST ACTIVE NEWSGROUPS OVERVIEW.FMT ACTIVE.TIMES HEADERS",
            "OVER MSGID",
            "HDR",
            "NEWNEWS",
        ]
        .iter()
        .map(|s| (*s).to_string())
        .collect();
        if !self.state.auth.is_authenticated() {
            lines.push("AUTHINFO USER".to_string());
        }
        Response::multiline(codes::CAPABILITY_LIST, "Capability list:", lines)
    }

    /// The selected group, or 412
    fn current_group(&self) -> Result<&Group, Response> {
        self.state
            .group
            .as_ref()
            .and_then(|name| self.store.group(name))
            .ok_or_else(Response::no_group_selected)
    }

    /// Select `name`, or 411 if it does not exist
    fn select_group(&mut self, name: GroupName) -> Result<&Group, Response> {
        let first = self
            .store
            .group(&name)
            .ok_or_else(Response::no_such_group)?
            .first();
        self.state.select(name, first);
        self.current_group()
    }

    fn group(&mut self, name: GroupName) -> Response {
        match self.select_group(name) {
            Ok(group) => Response::new(codes::GROUP_SELECTED, group_status(group)),
            Err(resp) => resp,
        }
    }

    fn list_group(&mut self, name: Option<GroupName>, range: Option<ArticleRange>) -> Response {
        let name = match name {
            Some(name) => name,
            None => match self.current_group() {
                Ok(group) => group.name().clone(),
                Err(resp) => return resp,
            },
        };
        let group = match self.select_group(name) {
            Ok(group) => group,
            Err(resp) => return resp,
        };
        let numbers = group
            .articles_in(range.unwrap_or(ArticleRange::ALL))
            .map(|(n, _)| n.to_string())
            .collect();
        Response::multiline(codes::GROUP_SELECTED, group_status(group), numbers)
    }

    fn step(&mut self, step: Step) -> Response {
        let group = match self.current_group() {
            Ok(group) => group,
            Err(resp) => return resp,
        };
        let Some(current) = self.state.article else {
            return Response::no_current_article();
        };
        let found = match step {
            Step::Back => group.prev_before(current),
            Step::Forward => group.next_after(current),
        };
        let Some((number, article)) = found else {
            return match step {
                Step::Back => Response::new(codes::NO_PREV_ARTICLE, "No previous article to retrieve"),
                Step::Forward => Response::new(codes::NO_NEXT_ARTICLE, "No next article to retrieve"),
            };
        };
        let status = format!("{number} {}", article.message_id());
        self.state.article = Some(number);
        Response::new(codes::ARTICLE_EXISTS, status)
    }

    fn article(&mut self, part: ArticlePart, spec: ArticleSpec) -> Response {
        match spec {
            ArticleSpec::MessageId(id) => match self.store.article_by_id(&id) {
                Some((_, _, article)) => article_response(part, 0, article),
                None => Response::no_such_article_id(),
            },
            ArticleSpec::Number(number) => {
                let group = match self.current_group() {
                    Ok(group) => group,
                    Err(resp) => return resp,
                };
                let Some(article) = group.article(number) else {
                    return Response::no_such_article_number();
                };
                let resp = article_response(part, number.get(), article);
                self.state.article = Some(number);
                resp
            }
            ArticleSpec::Current => match self.current_article() {
                Ok((number, article)) => article_response(part, number.get(), article),
                Err(resp) => resp,
            },
        }
    }

    /// The article under the pointer: 412 without a group, 420 without a pointer
    fn current_article(&self) -> Result<(ArticleNumber, &Arc<Article>), Response> {
        let group = self.current_group()?;
        let number = self.state.article.ok_or_else(Response::no_current_article)?;
        let article = group
            .article(number)
            .ok_or_else(Response::no_current_article)?;
        Ok((number, article))
    }

    /// Articles addressed by an OVER/HDR argument, paired with the label
    /// each output line starts with
    fn select_articles(&self, selection: Selection) -> Result<Vec<(u64, &Arc<Article>)>, Response> {
        match selection {
            Selection::MessageId(id) => self
                .store
                .article_by_id(&id)
                .map(|(_, _, article)| vec![(0, article)])
                .ok_or_else(Response::no_such_article_id),
            Selection::Range(range) => {
                let group = self.current_group()?;
                let selected: Vec<_> = group
                    .articles_in(range)
                    .map(|(n, article)| (n.get(), article))
                    .collect();
                if selected.is_empty() {
                    Err(Response::no_article_in_range())
                } else {
                    Ok(selected)
                }
            }
            Selection::Current => {
                let (number, article) = self.current_article()?;
                Ok(vec![(number.get(), article)])
            }
        }
    }

    fn over(&self, selection: Selection) -> Response {
        match self.select_articles(selection) {
            Ok(articles) => Response::multiline(
                codes::OVERVIEW_FOLLOWS,
                "Overview information follows",
                articles
                    .into_iter()
                    .map(|(n, article)| article.overview(n))
                    .collect(),
            ),
            Err(resp) => resp,
        }
    }

    fn hdr(&self, field: &str, selection: Selection, legacy: bool) -> Response {
        let by_id = matches!(selection, Selection::MessageId(_));
        let articles = match self.select_articles(selection) {
            Ok(articles) => articles,
            Err(resp) => return resp,
        };
        let lines = articles
            .into_iter()
            .map(|(n, article)| {
                let value = article.field(field).unwrap_or_default();
                // XHDR clients expect the message-id as the key for the id form
                if legacy && by_id {
                    format!("{} {value}", article.message_id())
                } else {
                    format!("{n} {value}")
                }
            })
            .collect();
        let code = if legacy {
            codes::HEAD_FOLLOWS
        } else {
            codes::HEADERS_FOLLOW
        };
        Response::multiline(code, "Headers follow", lines)
    }

    fn list(&self, keyword: ListKeyword) -> Response {
        let groups = |wildmat: Option<String>| {
            let wildmat = wildmat.as_deref().map_or_else(Wildmat::any, Wildmat::new);
            self.store
                .groups()
                .filter(move |g| wildmat.matches(g.name()))
        };

        let (text, lines): (&str, Vec<String>) = match keyword {
            ListKeyword::Active(w) => (
                "Newsgroups in form \"group high low status\"",
                groups(w).map(active_line).collect(),
            ),
            ListKeyword::Newsgroups(w) => (
                "Descriptions in form \"group description\"",
                groups(w)
                    .map(|g| format!("{}\t{}", g.name(), g.description()))
                    .collect(),
            ),
            ListKeyword::ActiveTimes(w) => (
                "Group creations in form \"name time who\"",
                groups(w)
                    .map(|g| format!("{} {} nntp-mock", g.name(), g.created().timestamp()))
                    .collect(),
            ),
            ListKeyword::OverviewFmt => (
                "Order of fields in overview database",
                OVERVIEW_HEADERS
                    .iter()
                    .map(|h| format!("{h}:"))
                    .chain([":bytes".to_string(), ":lines".to_string()])
                    .collect(),
            ),
            ListKeyword::Headers => (
                "Headers and metadata items supported",
                vec![":".to_string(), ":bytes".to_string(), ":lines".to_string()],
            ),
            ListKeyword::Unsupported(keyword) => {
                return Response::new(
                    codes::FEATURE_NOT_SUPPORTED,
                    format!("LIST {keyword} not available"),
                );
            }
        };
        Response::multiline(codes::INFORMATION_FOLLOWS, text, lines)
    }

    fn new_groups(&self, date: &str, time: &str) -> Response {
        let Some(since) = parse_date_time(date, time, Utc::now()) else {
            return Response::syntax_error("invalid date or time");
        };
        let lines = self
            .store
            .groups()
            .filter(|g| g.created() > since)
            .map(active_line)
            .collect();
        Response::multiline(
            codes::NEW_GROUPS_FOLLOW,
            "List of new newsgroups follows",
            lines,
        )
    }

    fn new_news(&self, wildmat: &str, date: &str, time: &str) -> Response {
        let Some(since) = parse_date_time(date, time, Utc::now()) else {
            return Response::syntax_error("invalid date or time");
        };
        let wildmat = Wildmat::new(wildmat);
        let mut seen = HashSet::new();
        let lines = self
            .store
            .groups()
            .filter(|g| wildmat.matches(g.name()))
            .flat_map(|g| g.articles())
            .filter(|(_, article)| article.date().is_some_and(|d| d > since))
            .filter(|(_, article)| seen.insert(article.message_id().clone()))
            .map(|(_, article)| article.message_id().to_string())
            .collect();
        Response::multiline(
            codes::NEW_ARTICLES_FOLLOW,
            "List of new articles follows",
            lines,
        )
    }

    fn authinfo_user(&mut self, user: String) -> Response {
        if self.state.auth.is_authenticated() {
            return Response::new(codes::ACCESS_DENIED, "Already authenticated");
        }
        self.state.auth = AuthState::PendingPassword(user);
        Response::new(codes::PASSWORD_REQUIRED, "Password required")
    }

    fn authinfo_pass(&mut self, pass: &str) -> Response {
        if self.state.auth.is_authenticated() {
            return Response::new(codes::ACCESS_DENIED, "Already authenticated");
        }
        let Some(user) = self.state.auth.pending_user().map(str::to_string) else {
            return Response::new(
                codes::AUTH_OUT_OF_SEQUENCE,
                "Authentication commands issued out of sequence",
            );
        };
        if self.auth.validate(&user, pass) {
            info!("Client {} authenticated as {}", self.client, user);
            self.state.auth = AuthState::Authenticated(user);
            Response::new(codes::AUTH_ACCEPTED, "Authentication accepted")
        } else {
            warn!("Client {} failed authentication as {}", self.client, user);
            self.state.auth = AuthState::Anonymous;
            Response::new(codes::AUTH_REJECTED, "Authentication failed")
        }
    }
}

/// Response for a command line that did not parse
pub fn error_response(err: &CommandError) -> Response {
    match err {
        CommandError::Empty | CommandError::Unknown(_) => Response::unknown_command(),
        CommandError::LineTooLong { .. } => Response::syntax_error(&err.to_string()),
        CommandError::Syntax(detail) => Response::syntax_error(detail),
    }
}

fn group_status(group: &Group) -> String {
    format!(
        "{} {} {} {}",
        group.count(),
        group.low(),
        group.high(),
        group.name()
    )
}

fn active_line(group: &Group) -> String {
    format!("{} {} {} n", group.name(), group.high(), group.low())
}

fn article_response(part: ArticlePart, number: u64, article: &Article) -> Response {
    let status = format!("{number} {}", article.message_id());
    match part {
        ArticlePart::Whole => {
            Response::multiline(codes::ARTICLE_FOLLOWS, status, article.full_lines())
        }
        ArticlePart::Head => Response::multiline(codes::HEAD_FOLLOWS, status, article.head_lines()),
        ArticlePart::Body => {
            Response::multiline(codes::BODY_FOLLOWS, status, article.body_lines().to_vec())
        }
        ArticlePart::Stat => Response::new(codes::ARTICLE_EXISTS, status),
    }
}
