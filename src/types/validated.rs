//! Validated string types that enforce invariants at construction time

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Validation errors for primitive protocol and configuration values
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum ValidationError {
    #[error("username cannot be empty or whitespace")]
    EmptyUsername,

    #[error("password cannot be empty or whitespace")]
    EmptyPassword,

    #[error("config path cannot be empty")]
    EmptyConfigPath,

    #[error("invalid newsgroup name: {0}")]
    InvalidGroupName(String),

    #[error("invalid server address: {0}")]
    InvalidAddress(String),

    #[error("unsupported address scheme '{0}' (only nntp:// is served)")]
    UnsupportedScheme(String),

    #[error("port cannot be 0")]
    InvalidPort,

    #[error("invalid message ID: {0}")]
    InvalidMessageId(String),

    #[error("invalid article number: {0}")]
    InvalidArticleNumber(String),

    #[error("invalid article range: {0}")]
    InvalidRange(String),
}

/// Macro to generate validated string newtypes.
///
/// Each type gets a validating `new()`, `as_str()`, `AsRef<str>`, `Deref`,
/// `Display`, `TryFrom<String>`, and serde impls that run the validation.
macro_rules! validated_string {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident(String) {
            validation: |$s_param:ident| $validation:expr,
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
        #[serde(transparent)]
        $vis struct $name(String);

        impl $name {
            #[doc = concat!("Create a new ", stringify!($name), " after validation")]
            pub fn new($s_param: String) -> Result<Self, ValidationError> {
                let validate = || $validation;
                validate()?;
                Ok(Self($s_param))
            }

            #[doc = concat!("Get the ", stringify!($name), " as a string slice")]
            #[must_use]
            #[inline]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl AsRef<str> for $name {
            #[inline]
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl std::ops::Deref for $name {
            type Target = str;

            #[inline]
            fn deref(&self) -> &Self::Target {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl TryFrom<String> for $name {
            type Error = ValidationError;

            fn try_from($s_param: String) -> Result<Self, Self::Error> {
                Self::new($s_param)
            }
        }

        impl std::str::FromStr for $name {
            type Err = ValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s.to_string())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let s = String::deserialize(deserializer)?;
                Self::new(s).map_err(serde::de::Error::custom)
            }
        }
    };
}

/// Characters with wildmat meaning that may not appear in a newsgroup name
const WILDMAT_SPECIALS: &[char] = &['*', '?', '[', ']', '\\', '!', ','];

validated_string! {
    /// Username accepted by AUTHINFO USER
    pub struct Username(String) {
        validation: |s| {
            if s.trim().is_empty() {
                Err(ValidationError::EmptyUsername)
            } else {
                Ok(())
            }
        },
    }
}

validated_string! {
    /// Password accepted by AUTHINFO PASS
    ///
    /// Debug output still shows the value; don't log fixtures with real secrets.
    pub struct Password(String) {
        validation: |s| {
            if s.trim().is_empty() {
                Err(ValidationError::EmptyPassword)
            } else {
                Ok(())
            }
        },
    }
}

validated_string! {
    /// Path to a TOML configuration file
    pub struct ConfigPath(String) {
        validation: |s| {
            if s.trim().is_empty() {
                Err(ValidationError::EmptyConfigPath)
            } else {
                Ok(())
            }
        },
    }
}

validated_string! {
    /// A newsgroup name such as `comp.lang.rust`
    ///
    /// Names are non-empty, contain no whitespace or control characters,
    /// and never contain wildmat metacharacters, so a literal name can
    /// always be used as a pattern matching only itself.
    ///
    /// # Examples
    /// ```
    /// use nntp_mock::types::GroupName;
    ///
    /// let group = GroupName::new("test.groups.foo".to_string()).unwrap();
    /// assert_eq!(group.as_str(), "test.groups.foo");
    ///
    /// assert!(GroupName::new("alt.*".to_string()).is_err());
    /// assert!(GroupName::new("has space".to_string()).is_err());
    /// ```
    pub struct GroupName(String) {
        validation: |s| {
            if s.is_empty()
                || s.chars().any(|c| c.is_whitespace() || c.is_control())
                || s.contains(WILDMAT_SPECIALS)
            {
                Err(ValidationError::InvalidGroupName(s.clone()))
            } else {
                Ok(())
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_username_valid() {
        let user = Username::new("alice".to_string()).unwrap();
        assert_eq!(user.as_str(), "alice");
        assert_eq!(format!("{}", user), "alice");
    }

    #[test]
    fn test_username_whitespace_rejected() {
        assert!(matches!(
            Username::new(" \t".to_string()),
            Err(ValidationError::EmptyUsername)
        ));
    }

    #[test]
    fn test_password_empty_rejected() {
        assert!(matches!(
            Password::new(String::new()),
            Err(ValidationError::EmptyPassword)
        ));
    }

    #[test]
    fn test_password_special_chars() {
        let pass = Password::new("p@ss!w0rd#$%".to_string()).unwrap();
        assert_eq!(pass.as_str(), "p@ss!w0rd#$%");
    }

    #[test]
    fn test_config_path() {
        assert!(ConfigPath::new("nntp-mock.toml".to_string()).is_ok());
        assert!(matches!(
            ConfigPath::new("  ".to_string()),
            Err(ValidationError::EmptyConfigPath)
        ));
    }

    #[test]
    fn test_group_name_rejects_wildmat_chars() {
        for bad in ["alt.*", "a?b", "a[b]", "a,b", "!a", "a\\b"] {
            assert!(
                GroupName::new(bad.to_string()).is_err(),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn test_group_name_rejects_whitespace_and_empty() {
        assert!(GroupName::new(String::new()).is_err());
        assert!(GroupName::new("a b".to_string()).is_err());
        assert!(GroupName::new("a\tb".to_string()).is_err());
    }

    #[test]
    fn test_group_name_ordering() {
        let a: GroupName = "alt.test".parse().unwrap();
        let b: GroupName = "comp.lang".parse().unwrap();
        assert!(a < b);
    }

    #[test]
    fn test_group_name_deserialize_validates() {
        let ok: GroupName = serde_yaml::from_str("test.groups.foo").unwrap();
        assert_eq!(ok.as_str(), "test.groups.foo");

        let bad: Result<GroupName, _> = serde_yaml::from_str("\"bad group\"");
        assert!(bad.is_err());
    }

    #[test]
    fn test_try_from() {
        let result: Result<Username, _> = "bob".to_string().try_into();
        assert_eq!(result.unwrap().as_str(), "bob");
    }
}
