//! Article representation and derived metadata

use chrono::{DateTime, Utc};

use crate::protocol::datetime::parse_header_date;
use crate::types::{ArticleNumber, MessageId};

/// Header fields reported by OVER, in LIST OVERVIEW.FMT order
pub const OVERVIEW_HEADERS: [&str; 5] = ["Subject", "From", "Date", "Message-ID", "References"];

/// An immutable article held by the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Article {
    message_id: MessageId,
    headers: Vec<(String, String)>,
    body: Vec<String>,
}

impl Article {
    /// Build an article; `body` is split into lines, CRLF or LF
    pub fn new(message_id: MessageId, headers: Vec<(String, String)>, body: &str) -> Self {
        Self {
            message_id,
            headers,
            body: body.lines().map(str::to_string).collect(),
        }
    }

    #[inline]
    pub fn message_id(&self) -> &MessageId {
        &self.message_id
    }

    #[inline]
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// First header with this name, compared case-insensitively
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Parsed `Date` header
    pub fn date(&self) -> Option<DateTime<Utc>> {
        self.header("Date").and_then(parse_header_date)
    }

    pub fn head_lines(&self) -> Vec<String> {
        self.headers
            .iter()
            .map(|(name, value)| format!("{name}: {value}"))
            .collect()
    }

    #[inline]
    pub fn body_lines(&self) -> &[String] {
        &self.body
    }

    /// Head, separating blank line, body
    pub fn full_lines(&self) -> Vec<String> {
        let mut lines = self.head_lines();
        lines.reserve(self.body.len() + 1);
        lines.push(String::new());
        lines.extend(self.body.iter().cloned());
        lines
    }

    /// Size in octets of the whole article as sent, CRLF line endings,
    /// before dot-stuffing
    pub fn bytes(&self) -> usize {
        let head: usize = self
            .headers
            .iter()
            .map(|(name, value)| name.len() + 2 + value.len() + 2)
            .sum();
        let body: usize = self.body.iter().map(|line| line.len() + 2).sum();
        head + 2 + body
    }

    /// Number of body lines
    #[inline]
    pub fn lines(&self) -> usize {
        self.body.len()
    }

    /// Value of a header or `:bytes` / `:lines` metadata item for HDR
    pub fn field(&self, name: &str) -> Option<String> {
        if name.eq_ignore_ascii_case(":bytes") {
            Some(self.bytes().to_string())
        } else if name.eq_ignore_ascii_case(":lines") {
            Some(self.lines().to_string())
        } else {
            self.header(name).map(str::to_string)
        }
    }

    /// Tab-separated overview line as returned by OVER
    pub fn overview(&self, number: u64) -> String {
        let mut fields = Vec::with_capacity(OVERVIEW_HEADERS.len() + 3);
        fields.push(number.to_string());
        fields.extend(
            OVERVIEW_HEADERS
                .iter()
                .map(|name| sanitize_overview(self.header(name).unwrap_or(""))),
        );
        fields.push(self.bytes().to_string());
        fields.push(self.lines().to_string());
        fields.join("\t")
    }
}

/// Overview fields cannot contain TAB, CR or LF
fn sanitize_overview(value: &str) -> String {
    value.replace(['\t', '\r', '\n'], " ")
}

/// An article together with the number it has in one group
pub type NumberedArticle<'a> = (ArticleNumber, &'a std::sync::Arc<Article>);

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample() -> Article {
        Article::new(
            MessageId::new("<1@example.com>".to_string()).unwrap(),
            vec![
                ("From".to_string(), "a@example.com".to_string()),
                ("Subject".to_string(), "hello\tworld".to_string()),
                ("Date".to_string(), "Wed, 1 Jan 2020 00:00:00 +0000".to_string()),
                ("Message-ID".to_string(), "<1@example.com>".to_string()),
            ],
            "line one\nline two\n",
        )
    }

    #[test]
    fn test_header_lookup_is_case_insensitive() {
        let article = sample();
        assert_eq!(article.header("subject"), Some("hello\tworld"));
        assert_eq!(article.header("MESSAGE-ID"), Some("<1@example.com>"));
        assert_eq!(article.header("References"), None);
    }

    #[test]
    fn test_body_lines_ignore_trailing_newline() {
        let article = sample();
        assert_eq!(article.body_lines(), ["line one", "line two"]);
        assert_eq!(article.lines(), 2);
    }

    #[test]
    fn test_crlf_body() {
        let article = Article::new(
            MessageId::new("<x@y>".to_string()).unwrap(),
            vec![],
            "a\r\nb\r\n",
        );
        assert_eq!(article.body_lines(), ["a", "b"]);
    }

    #[test]
    fn test_full_lines_layout() {
        let article = sample();
        let lines = article.full_lines();
        assert_eq!(lines[0], "From: a@example.com");
        assert_eq!(lines[4], "");
        assert_eq!(lines[5], "line one");
        assert_eq!(lines.len(), 7);
    }

    #[test]
    fn test_bytes_matches_wire_size() {
        let article = sample();
        let wire: usize = article.full_lines().iter().map(|l| l.len() + 2).sum();
        assert_eq!(article.bytes(), wire);
    }

    #[test]
    fn test_date() {
        assert_eq!(
            sample().date(),
            Some(Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_overview_line() {
        let article = sample();
        let fields: Vec<String> = article
            .overview(7)
            .split('\t')
            .map(str::to_string)
            .collect();
        assert_eq!(fields.len(), 8);
        assert_eq!(fields[0], "7");
        assert_eq!(fields[1], "hello world");
        assert_eq!(fields[2], "a@example.com");
        assert_eq!(fields[4], "<1@example.com>");
        assert_eq!(fields[5], "");
        assert_eq!(fields[6], article.bytes().to_string());
        assert_eq!(fields[7], "2");
    }

    #[test]
    fn test_metadata_fields() {
        let article = sample();
        assert_eq!(article.field(":lines").as_deref(), Some("2"));
        assert_eq!(
            article.field(":BYTES"),
            Some(article.bytes().to_string())
        );
        assert_eq!(article.field("from").as_deref(), Some("a@example.com"));
        assert_eq!(article.field("Xref"), None);
    }
}
