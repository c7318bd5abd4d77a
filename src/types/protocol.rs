//! Protocol-related type-safe wrappers for NNTP primitives

use nom::{
    IResult, Parser,
    branch::alt,
    character::complete::{char, digit1},
    combinator::{all_consuming, map, map_res},
    sequence::terminated,
};
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::num::NonZeroU64;
use std::str::FromStr;

use super::ValidationError;

/// A validated NNTP message ID (RFC 3977 §3.6)
///
/// Message IDs are enclosed in angle brackets, at least 3 octets long,
/// and never contain whitespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MessageId(String);

impl MessageId {
    /// Maximum length of a message ID in octets (RFC 3977 §3.6)
    pub const MAX_LEN: usize = 250;

    /// Create a MessageId from a string with validation
    pub fn new(s: String) -> Result<Self, ValidationError> {
        Self::validate(&s)?;
        Ok(Self(s))
    }

    /// Check whether an argument looks like a message ID rather than a number
    #[inline]
    #[must_use]
    pub fn looks_like(arg: &str) -> bool {
        arg.starts_with('<')
    }

    fn validate(s: &str) -> Result<(), ValidationError> {
        if s.len() < 3 || !s.starts_with('<') || !s.ends_with('>') {
            return Err(ValidationError::InvalidMessageId(format!(
                "{s:?} must be <...>"
            )));
        }
        if s.len() > Self::MAX_LEN {
            return Err(ValidationError::InvalidMessageId(format!(
                "longer than {} octets",
                Self::MAX_LEN
            )));
        }
        if s.bytes().any(|b| b.is_ascii_whitespace() || b.is_ascii_control()) {
            return Err(ValidationError::InvalidMessageId(format!(
                "{s:?} contains whitespace"
            )));
        }
        Ok(())
    }

    #[must_use]
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    #[inline]
    pub fn without_brackets(&self) -> &str {
        &self.0[1..self.0.len() - 1]
    }
}

impl FromStr for MessageId {
    type Err = ValidationError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MessageId::new(s.to_string())
    }
}

impl AsRef<str> for MessageId {
    #[inline]
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for MessageId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for MessageId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for MessageId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        MessageId::new(s).map_err(serde::de::Error::custom)
    }
}

/// An article number within a newsgroup (RFC 3977 §6)
///
/// Article numbers are in the range 1 to 2,147,483,647.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ArticleNumber(NonZeroU64);

impl ArticleNumber {
    /// Largest article number a client must be able to handle
    pub const MAX: u64 = 2_147_483_647;

    /// First article number assigned in a fresh group
    pub const FIRST: Self = Self(NonZeroU64::new(1).unwrap());

    /// Create a new article number, returning None when out of range
    #[must_use]
    pub const fn new(value: u64) -> Option<Self> {
        if value > Self::MAX {
            return None;
        }
        match NonZeroU64::new(value) {
            Some(nz) => Some(Self(nz)),
            None => None,
        }
    }

    #[must_use]
    #[inline]
    pub const fn get(&self) -> u64 {
        self.0.get()
    }

    /// The following article number, if still in range
    #[must_use]
    pub const fn next(&self) -> Option<Self> {
        Self::new(self.get() + 1)
    }
}

impl fmt::Display for ArticleNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.get())
    }
}

impl From<ArticleNumber> for u64 {
    fn from(val: ArticleNumber) -> Self {
        val.get()
    }
}

impl FromStr for ArticleNumber {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ValidationError::InvalidArticleNumber(s.to_string()));
        }
        s.parse::<u64>()
            .ok()
            .and_then(Self::new)
            .ok_or_else(|| ValidationError::InvalidArticleNumber(s.to_string()))
    }
}

impl TryFrom<u64> for ArticleNumber {
    type Error = ValidationError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        Self::new(value).ok_or_else(|| ValidationError::InvalidArticleNumber(value.to_string()))
    }
}

impl Serialize for ArticleNumber {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_u64(self.get())
    }
}

impl<'de> Deserialize<'de> for ArticleNumber {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = u64::deserialize(deserializer)?;
        Self::try_from(value).map_err(serde::de::Error::custom)
    }
}

/// An article range argument (RFC 3977 §3.1): `n`, `n-` or `n-m`
///
/// A range whose end is below its start is valid and empty.
///
/// # Examples
/// ```
/// use nntp_mock::types::ArticleRange;
///
/// let range: ArticleRange = "3-5".parse().unwrap();
/// assert!(range.contains(4));
/// assert!(!range.contains(6));
///
/// let open: ArticleRange = "10-".parse().unwrap();
/// assert!(open.contains(1_000));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArticleRange {
    start: u64,
    end: Option<u64>,
}

impl ArticleRange {
    /// Range covering every article
    pub const ALL: Self = Self {
        start: 1,
        end: None,
    };

    /// Single-article range
    #[must_use]
    pub const fn single(number: u64) -> Self {
        Self {
            start: number,
            end: Some(number),
        }
    }

    /// Inclusive `start-end` range
    #[must_use]
    pub const fn between(start: u64, end: u64) -> Self {
        Self {
            start,
            end: Some(end),
        }
    }

    /// Open `start-` range
    #[must_use]
    pub const fn starting_at(start: u64) -> Self {
        Self { start, end: None }
    }

    #[must_use]
    pub const fn start(&self) -> u64 {
        self.start
    }

    /// Inclusive end, `None` for an open range
    #[must_use]
    pub const fn end(&self) -> Option<u64> {
        self.end
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        match self.end {
            Some(end) => end < self.start,
            None => false,
        }
    }

    #[must_use]
    pub const fn contains(&self, number: u64) -> bool {
        if number < self.start {
            return false;
        }
        match self.end {
            Some(end) => number <= end,
            None => true,
        }
    }
}

impl fmt::Display for ArticleRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.end {
            Some(end) if end == self.start => write!(f, "{}", self.start),
            Some(end) => write!(f, "{}-{}", self.start, end),
            None => write!(f, "{}-", self.start),
        }
    }
}

impl FromStr for ArticleRange {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        all_consuming(parse_article_range)
            .parse(s)
            .map(|(_, range)| range)
            .map_err(|_| ValidationError::InvalidRange(s.to_string()))
    }
}

/// Parse an article number: `1*16DIGIT` in 1..=2^31-1 (RFC 3977 §6)
pub(crate) fn parse_article_number(input: &str) -> IResult<&str, ArticleNumber> {
    map_res(digit1, |digits: &str| digits.parse::<ArticleNumber>()).parse(input)
}

/// Parse a range argument (RFC 3977 §8.3)
///
/// ```text
/// range = article-number ["-" [article-number]]
/// ```
pub(crate) fn parse_article_range(input: &str) -> IResult<&str, ArticleRange> {
    alt((
        map(
            (parse_article_number, char('-'), parse_article_number),
            |(start, _, end)| ArticleRange::between(start.get(), end.get()),
        ),
        map(terminated(parse_article_number, char('-')), |start| {
            ArticleRange::starting_at(start.get())
        }),
        map(parse_article_number, |n| ArticleRange::single(n.get())),
    ))
    .parse(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_id_valid() {
        let id = MessageId::new("<abc@example.com>".to_string()).unwrap();
        assert_eq!(id.as_str(), "<abc@example.com>");
        assert_eq!(id.without_brackets(), "abc@example.com");
    }

    #[test]
    fn test_message_id_invalid() {
        assert!(MessageId::new("abc@example.com".to_string()).is_err());
        assert!(MessageId::new("<>".to_string()).is_err());
        assert!(MessageId::new("<a b@c>".to_string()).is_err());
        assert!(MessageId::new(format!("<{}>", "a".repeat(300))).is_err());
    }

    #[test]
    fn test_article_number_bounds() {
        assert!(ArticleNumber::new(0).is_none());
        assert!(ArticleNumber::new(ArticleNumber::MAX).is_some());
        assert!(ArticleNumber::new(ArticleNumber::MAX + 1).is_none());
        assert_eq!(ArticleNumber::FIRST.get(), 1);
    }

    #[test]
    fn test_article_number_parse() {
        assert_eq!("42".parse::<ArticleNumber>().unwrap().get(), 42);
        assert!("+42".parse::<ArticleNumber>().is_err());
        assert!("0".parse::<ArticleNumber>().is_err());
        assert!("".parse::<ArticleNumber>().is_err());
        assert!("abc".parse::<ArticleNumber>().is_err());
    }

    #[test]
    fn test_article_number_next() {
        let n = ArticleNumber::new(7).unwrap();
        assert_eq!(n.next().unwrap().get(), 8);
        assert!(ArticleNumber::new(ArticleNumber::MAX).unwrap().next().is_none());
    }

    #[test]
    fn test_range_forms() {
        assert_eq!("5".parse::<ArticleRange>().unwrap(), ArticleRange::single(5));
        assert_eq!("5-".parse::<ArticleRange>().unwrap(), ArticleRange::starting_at(5));
        assert_eq!(
            "5-9".parse::<ArticleRange>().unwrap(),
            ArticleRange::between(5, 9)
        );
    }

    #[test]
    fn test_range_reversed_is_empty() {
        let range: ArticleRange = "9-5".parse().unwrap();
        assert!(range.is_empty());
        assert!(!range.contains(7));
    }

    #[test]
    fn test_range_invalid() {
        for bad in ["", "-", "-5", "a-b", "1-2-3", "0-4"] {
            assert!(bad.parse::<ArticleRange>().is_err(), "{bad:?} should fail");
        }
    }

    #[test]
    fn test_parse_article_range_leaves_remainder() {
        let (rest, range) = parse_article_range("3-7 <id@x>").unwrap();
        assert_eq!(rest, " <id@x>");
        assert_eq!(range, ArticleRange::between(3, 7));

        let (rest, number) = parse_article_number("0042x").unwrap();
        assert_eq!(rest, "x");
        assert_eq!(number.get(), 42);
        assert!(parse_article_number("2147483648").is_err());
    }

    #[test]
    fn test_range_display() {
        assert_eq!(ArticleRange::single(3).to_string(), "3");
        assert_eq!(ArticleRange::starting_at(3).to_string(), "3-");
        assert_eq!(ArticleRange::between(3, 4).to_string(), "3-4");
    }
}
