//! Credential table and the require-auth switch

use crate::types::{Password, Username, ValidationError};
use std::collections::HashMap;

/// Checks AUTHINFO credentials against the fixture user table
#[derive(Clone, Default)]
pub struct AuthHandler {
    required: bool,
    /// username -> password
    users: HashMap<String, String>,
}

impl std::fmt::Debug for AuthHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthHandler")
            .field("required", &self.required)
            .field("user_count", &self.users.len())
            .finish_non_exhaustive()
    }
}

impl AuthHandler {
    /// Create a handler from validated credentials
    pub fn new(required: bool, users: impl IntoIterator<Item = (Username, Password)>) -> Self {
        Self {
            required,
            users: users
                .into_iter()
                .map(|(u, p)| (u.as_str().to_string(), p.as_str().to_string()))
                .collect(),
        }
    }

    /// Create a handler from raw strings, validating each pair
    ///
    /// # Errors
    /// Returns `Err` if any username or password is empty or whitespace.
    pub fn with_users(
        required: bool,
        user_list: Vec<(String, String)>,
    ) -> Result<Self, ValidationError> {
        let users = user_list
            .into_iter()
            .map(|(u, p)| Ok((Username::new(u)?, Password::new(p)?)))
            .collect::<Result<Vec<_>, ValidationError>>()?;
        Ok(Self::new(required, users))
    }

    /// Whether clients must authenticate before reading
    #[inline]
    pub fn is_required(&self) -> bool {
        self.required
    }

    #[inline]
    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    /// Same table, different require-auth switch
    #[must_use]
    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Validate credentials
    ///
    /// With no users configured every pair is accepted.
    pub fn validate(&self, username: &str, password: &str) -> bool {
        if self.users.is_empty() {
            return true;
        }
        self.users
            .get(username)
            .is_some_and(|stored| stored == password)
    }
}
