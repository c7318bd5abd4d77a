//! Network-related types: listen port and `nntp://` server address

use std::fmt;
use std::num::NonZeroU16;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::types::ValidationError;

nonzero_newtype! {
    /// A validated network port number that cannot be zero
    ///
    /// # Examples
    /// ```
    /// use nntp_mock::types::Port;
    ///
    /// let port = Port::new(119).unwrap();
    /// assert_eq!(port.get(), 119);
    /// assert!(Port::new(0).is_none());
    /// assert_eq!(Port::DEFAULT.get(), 8119);
    /// ```
    #[doc(alias = "tcp_port")]
    pub struct Port(NonZeroU16: u16, serialize as serialize_u16);
}

impl Port {
    /// NNTP port (119)
    pub const NNTP: Self = Self(NonZeroU16::new(119).unwrap());

    /// Default mock server listen port (8119)
    pub const DEFAULT: Self = Self(NonZeroU16::new(8119).unwrap());
}

impl Default for Port {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl FromStr for Port {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let port = s
            .parse::<u16>()
            .map_err(|_| ValidationError::InvalidAddress(format!("invalid port number: {}", s)))?;
        Self::new(port).ok_or(ValidationError::InvalidPort)
    }
}

impl TryFrom<u16> for Port {
    type Error = ValidationError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Self::new(value).ok_or(ValidationError::InvalidPort)
    }
}

/// Address the server listens on, written as `nntp://host:port`
///
/// A bare `host:port` is accepted as well. The port may be `0` here
/// (unlike [`Port`]) so tests can ask the OS for a free port.
///
/// # Examples
/// ```
/// use nntp_mock::types::ServerAddress;
///
/// let addr: ServerAddress = "nntp://0.0.0.0:8119".parse().unwrap();
/// assert_eq!(addr.host(), "0.0.0.0");
/// assert_eq!(addr.port(), 8119);
/// assert_eq!(addr.to_string(), "nntp://0.0.0.0:8119");
///
/// assert!("nntps://0.0.0.0:563".parse::<ServerAddress>().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ServerAddress {
    host: String,
    port: u16,
}

impl ServerAddress {
    /// URL scheme served by this crate
    pub const SCHEME: &'static str = "nntp";

    /// Default listen address (`nntp://0.0.0.0:8119`)
    #[must_use]
    pub fn default_listen() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: Port::DEFAULT.get(),
        }
    }

    /// Build an address from parts
    pub fn new(host: impl Into<String>, port: u16) -> Result<Self, ValidationError> {
        let host = host.into();
        let bare = host.trim_start_matches('[').trim_end_matches(']');
        if bare.is_empty() || bare.chars().any(|c| c.is_whitespace() || c == '/') {
            return Err(ValidationError::InvalidAddress(host));
        }
        Ok(Self {
            host: bare.to_string(),
            port,
        })
    }

    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    #[must_use]
    pub const fn port(&self) -> u16 {
        self.port
    }

    /// Same host with a different port
    #[must_use]
    pub fn with_port(&self, port: u16) -> Self {
        Self {
            host: self.host.clone(),
            port,
        }
    }

    /// `host:port` form suitable for `TcpListener::bind`
    #[must_use]
    pub fn socket_addr_string(&self) -> String {
        if self.host.contains(':') {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }
}

impl Default for ServerAddress {
    fn default() -> Self {
        Self::default_listen()
    }
}

impl fmt::Display for ServerAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}", Self::SCHEME, self.socket_addr_string())
    }
}

impl FromStr for ServerAddress {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (authority, default_port) = match s.split_once("://") {
            Some((scheme, rest)) => {
                if !scheme.eq_ignore_ascii_case(Self::SCHEME) {
                    return Err(ValidationError::UnsupportedScheme(scheme.to_string()));
                }
                (rest.trim_end_matches('/'), Some(Port::NNTP.get()))
            }
            None => (s, None),
        };

        let (host, port) = split_host_port(authority)
            .ok_or_else(|| ValidationError::InvalidAddress(s.to_string()))?;

        let port = match (port, default_port) {
            (Some(p), _) => p
                .parse::<u16>()
                .map_err(|_| ValidationError::InvalidAddress(s.to_string()))?,
            (None, Some(p)) => p,
            (None, None) => return Err(ValidationError::InvalidAddress(s.to_string())),
        };

        Self::new(host, port)
    }
}

/// Split `host:port`, `[v6]:port`, `host` or `[v6]` into its parts
fn split_host_port(authority: &str) -> Option<(&str, Option<&str>)> {
    if authority.is_empty() {
        return None;
    }
    if let Some(rest) = authority.strip_prefix('[') {
        let end = rest.find(']')?;
        let host = &rest[..end];
        let tail = &rest[end + 1..];
        return match tail.strip_prefix(':') {
            Some(port) => Some((host, Some(port))),
            None if tail.is_empty() => Some((host, None)),
            None => None,
        };
    }
    match authority.rsplit_once(':') {
        // More than one colon without brackets is ambiguous
        Some((host, _)) if host.contains(':') => None,
        Some((host, port)) => Some((host, Some(port))),
        None => Some((authority, None)),
    }
}

impl TryFrom<String> for ServerAddress {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl Serialize for ServerAddress {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ServerAddress {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_port_default() {
        assert_eq!(Port::default(), Port::DEFAULT);
        assert_eq!(Port::NNTP.get(), 119);
    }

    #[test]
    fn test_port_from_str() {
        assert_eq!("443".parse::<Port>().unwrap().get(), 443);
        assert!(matches!("0".parse::<Port>(), Err(ValidationError::InvalidPort)));
        assert!("abc".parse::<Port>().is_err());
        assert!("70000".parse::<Port>().is_err());
    }

    #[test]
    fn test_port_serde_rejects_zero() {
        let port: Port = toml::Value::Integer(119).try_into().unwrap();
        assert_eq!(port.get(), 119);

        let zero: Result<Port, _> = toml::Value::Integer(0).try_into();
        assert!(zero.is_err());
    }

    #[test]
    fn test_address_nntp_url() {
        let addr: ServerAddress = "nntp://0.0.0.0:8119".parse().unwrap();
        assert_eq!(addr.host(), "0.0.0.0");
        assert_eq!(addr.port(), 8119);
        assert_eq!(addr.socket_addr_string(), "0.0.0.0:8119");
        assert_eq!(addr.to_string(), "nntp://0.0.0.0:8119");
    }

    #[test]
    fn test_address_scheme_case_insensitive() {
        let addr: ServerAddress = "NNTP://localhost:119".parse().unwrap();
        assert_eq!(addr.host(), "localhost");
    }

    #[test]
    fn test_address_default_port_for_url() {
        let addr: ServerAddress = "nntp://news.example.com".parse().unwrap();
        assert_eq!(addr.port(), 119);

        let trailing: ServerAddress = "nntp://news.example.com:120/".parse().unwrap();
        assert_eq!(trailing.port(), 120);
    }

    #[test]
    fn test_address_bare_host_port() {
        let addr: ServerAddress = "127.0.0.1:0".parse().unwrap();
        assert_eq!(addr.port(), 0);
        assert_eq!(addr.to_string(), "nntp://127.0.0.1:0");
    }

    #[test]
    fn test_address_bare_host_requires_port() {
        assert!("localhost".parse::<ServerAddress>().is_err());
    }

    #[test]
    fn test_address_ipv6() {
        let addr: ServerAddress = "nntp://[::1]:8119".parse().unwrap();
        assert_eq!(addr.host(), "::1");
        assert_eq!(addr.socket_addr_string(), "[::1]:8119");
        assert_eq!(addr.to_string(), "nntp://[::1]:8119");

        assert!("::1:8119".parse::<ServerAddress>().is_err());
    }

    #[test]
    fn test_address_rejects_other_schemes() {
        assert!(matches!(
            "nntps://0.0.0.0:563".parse::<ServerAddress>(),
            Err(ValidationError::UnsupportedScheme(s)) if s == "nntps"
        ));
        assert!("http://x:1".parse::<ServerAddress>().is_err());
    }

    #[test]
    fn test_address_rejects_garbage() {
        assert!("".parse::<ServerAddress>().is_err());
        assert!("nntp://".parse::<ServerAddress>().is_err());
        assert!("nntp://host:port".parse::<ServerAddress>().is_err());
        assert!("nntp://:119".parse::<ServerAddress>().is_err());
    }

    #[test]
    fn test_address_with_port() {
        let addr = ServerAddress::default_listen().with_port(9000);
        assert_eq!(addr.to_string(), "nntp://0.0.0.0:9000");
    }

    #[test]
    fn test_address_serde_round_trip_through_toml() {
        #[derive(Serialize, Deserialize)]
        struct Wrapper {
            address: ServerAddress,
        }
        let parsed: Wrapper = toml::from_str("address = \"nntp://127.0.0.1:1119\"").unwrap();
        assert_eq!(parsed.address.port(), 1119);
        let text = toml::to_string(&parsed).unwrap();
        assert!(text.contains("nntp://127.0.0.1:1119"));
    }
}
