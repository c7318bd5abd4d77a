//! Authentication progress of a single client

/// Where a client stands in the AUTHINFO USER/PASS exchange
///
/// ```
/// use nntp_mock::session::AuthState;
///
/// let mut state = AuthState::default();
/// assert!(!state.is_authenticated());
///
/// state = AuthState::PendingPassword("alice".to_string());
/// assert_eq!(state.pending_user(), Some("alice"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AuthState {
    #[default]
    Anonymous,
    /// AUTHINFO USER accepted, waiting for PASS
    PendingPassword(String),
    Authenticated(String),
}

impl AuthState {
    #[inline]
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }

    /// Username given by AUTHINFO USER, if PASS is still due
    #[must_use]
    pub fn pending_user(&self) -> Option<&str> {
        match self {
            Self::PendingPassword(user) => Some(user),
            _ => None,
        }
    }

    /// Authenticated username
    #[must_use]
    pub fn username(&self) -> Option<&str> {
        match self {
            Self::Authenticated(user) => Some(user),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_anonymous() {
        let state = AuthState::default();
        assert_eq!(state, AuthState::Anonymous);
        assert!(state.username().is_none());
        assert!(state.pending_user().is_none());
    }

    #[test]
    fn test_authenticated() {
        let state = AuthState::Authenticated("bob".to_string());
        assert!(state.is_authenticated());
        assert_eq!(state.username(), Some("bob"));
        assert!(state.pending_user().is_none());
    }
}
