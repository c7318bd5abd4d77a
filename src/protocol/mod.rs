//! NNTP protocol primitives
//!
//! Status codes, response encoding, wildmat matching and the date formats
//! used on the wire.

pub mod codes;
pub mod datetime;
mod response;
pub mod wildmat;

pub use response::{CRLF, MULTILINE_END, Response};
pub use wildmat::Wildmat;

/// Maximum command line length including CRLF (RFC 3977 §3.1)
pub const MAX_COMMAND_LINE: usize = 512;

/// Default greeting text, sent with code 201 since posting is never allowed
pub const DEFAULT_GREETING: &str = "nntp-mock server ready (no posting)";

/// Construct the connection greeting
///
/// # Examples
/// ```
/// use nntp_mock::protocol::greeting;
///
/// let msg = greeting("news.example.com ready");
/// assert_eq!(msg.status_line(), "201 news.example.com ready");
/// ```
#[inline]
pub fn greeting(message: &str) -> Response {
    Response::new(codes::NO_POSTING, message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_greeting_is_no_posting() {
        let resp = greeting(DEFAULT_GREETING);
        assert_eq!(resp.code(), codes::NO_POSTING);
        assert_eq!(
            resp.to_bytes(),
            b"201 nntp-mock server ready (no posting)\r\n"
        );
    }
}
