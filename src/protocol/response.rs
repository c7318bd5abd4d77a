//! NNTP responses and their wire encoding
//!
//! A response is a status line, optionally followed by a multi-line data
//! block. Data lines are dot-stuffed and the block ends with `.\r\n`
//! (RFC 3977 §3.1.1).

use tokio::io::{AsyncWrite, AsyncWriteExt};

use super::codes;

/// Line ending: "\r\n"
pub const CRLF: &[u8] = b"\r\n";

/// Multi-line block terminator line: ".\r\n"
pub const MULTILINE_END: &[u8] = b".\r\n";

/// A response ready to be sent to a client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    code: u16,
    text: String,
    body: Option<Vec<String>>,
}

impl Response {
    /// Single-line response
    pub fn new(code: u16, text: impl Into<String>) -> Self {
        Self {
            code,
            text: text.into(),
            body: None,
        }
    }

    /// Multi-line response; `lines` are raw (not yet dot-stuffed)
    pub fn multiline(code: u16, text: impl Into<String>, lines: Vec<String>) -> Self {
        Self {
            code,
            text: text.into(),
            body: Some(lines),
        }
    }

    #[must_use]
    pub const fn code(&self) -> u16 {
        self.code
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn body(&self) -> Option<&[String]> {
        self.body.as_deref()
    }

    /// Status line without CRLF, e.g. `211 2 1 2 test.groups.foo`
    #[must_use]
    pub fn status_line(&self) -> String {
        if self.text.is_empty() {
            self.code.to_string()
        } else {
            format!("{} {}", self.code, self.text)
        }
    }

    /// Encode the full response as it goes on the wire
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.encoded_len_hint());
        out.extend_from_slice(self.status_line().as_bytes());
        out.extend_from_slice(CRLF);
        if let Some(lines) = &self.body {
            for line in lines {
                if line.starts_with('.') {
                    out.push(b'.');
                }
                out.extend_from_slice(line.as_bytes());
                out.extend_from_slice(CRLF);
            }
            out.extend_from_slice(MULTILINE_END);
        }
        out
    }

    fn encoded_len_hint(&self) -> usize {
        let body: usize = self
            .body
            .as_ref()
            .map_or(0, |lines| lines.iter().map(|l| l.len() + 3).sum::<usize>() + 3);
        self.text.len() + 6 + body
    }

    /// Write the response and flush
    pub async fn write_to<W>(&self, writer: &mut W) -> std::io::Result<usize>
    where
        W: AsyncWrite + Unpin,
    {
        let bytes = self.to_bytes();
        writer.write_all(&bytes).await?;
        writer.flush().await?;
        Ok(bytes.len())
    }

    // Canned responses shared by several handlers

    pub fn no_group_selected() -> Self {
        Self::new(codes::NO_GROUP_SELECTED, "No newsgroup selected")
    }

    pub fn no_current_article() -> Self {
        Self::new(codes::NO_CURRENT_ARTICLE, "Current article number is invalid")
    }

    pub fn no_such_article_number() -> Self {
        Self::new(codes::NO_SUCH_ARTICLE_NUMBER, "No article with that number")
    }

    pub fn no_article_in_range() -> Self {
        Self::new(codes::NO_SUCH_ARTICLE_NUMBER, "No articles in that range")
    }

    pub fn no_such_article_id() -> Self {
        Self::new(codes::NO_SUCH_ARTICLE_ID, "No article with that message-id")
    }

    pub fn no_such_group() -> Self {
        Self::new(codes::NO_SUCH_GROUP, "No such newsgroup")
    }

    pub fn syntax_error(detail: &str) -> Self {
        Self::new(codes::COMMAND_SYNTAX_ERROR, format!("Syntax error: {}", detail))
    }

    pub fn unknown_command() -> Self {
        Self::new(codes::COMMAND_NOT_RECOGNIZED, "Unknown command")
    }

    pub fn auth_required() -> Self {
        Self::new(codes::AUTH_REQUIRED, "Authentication required")
    }

    pub fn closing() -> Self {
        Self::new(codes::CONNECTION_CLOSING, "Connection closing")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_line_encoding() {
        let resp = Response::new(211, "2 1 2 test.groups.foo");
        assert_eq!(resp.to_bytes(), b"211 2 1 2 test.groups.foo\r\n");
        assert!(resp.body().is_none());
    }

    #[test]
    fn test_status_line_without_text() {
        let resp = Response::new(205, "");
        assert_eq!(resp.status_line(), "205");
    }

    #[test]
    fn test_multiline_encoding() {
        let resp = Response::multiline(
            215,
            "list follows",
            vec!["a 2 1 n".to_string(), "b 0 1 n".to_string()],
        );
        assert_eq!(
            resp.to_bytes(),
            b"215 list follows\r\na 2 1 n\r\nb 0 1 n\r\n.\r\n"
        );
    }

    #[test]
    fn test_empty_multiline_block() {
        let resp = Response::multiline(231, "New newsgroups follow", vec![]);
        assert_eq!(resp.to_bytes(), b"231 New newsgroups follow\r\n.\r\n");
    }

    #[test]
    fn test_dot_stuffing() {
        let resp = Response::multiline(
            222,
            "0 <a@b> body",
            vec![".".to_string(), "..x".to_string(), "a.b".to_string()],
        );
        assert_eq!(
            resp.to_bytes(),
            b"222 0 <a@b> body\r\n..\r\n...x\r\na.b\r\n.\r\n"
        );
    }

    #[test]
    fn test_canned_codes() {
        assert_eq!(Response::no_group_selected().code(), 412);
        assert_eq!(Response::no_current_article().code(), 420);
        assert_eq!(Response::no_such_article_number().code(), 423);
        assert_eq!(Response::no_article_in_range().code(), 423);
        assert_eq!(Response::no_such_article_id().code(), 430);
        assert_eq!(Response::no_such_group().code(), 411);
        assert_eq!(Response::syntax_error("x").code(), 501);
        assert_eq!(Response::unknown_command().code(), 500);
        assert_eq!(Response::auth_required().code(), 480);
        assert_eq!(Response::closing().code(), 205);
    }

    #[tokio::test]
    async fn test_write_to() {
        let mut out = Vec::new();
        let written = Response::new(111, "20240101000000")
            .write_to(&mut out)
            .await
            .unwrap();
        assert_eq!(out, b"111 20240101000000\r\n");
        assert_eq!(written, out.len());
    }
}
