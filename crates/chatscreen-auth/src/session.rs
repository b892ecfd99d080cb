// SPDX-FileCopyrightText: 2026 Chatscreen Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-client login state.

use chatscreen_core::AuthError;

/// Binding of one client to an authenticated username.
///
/// `Anonymous -> Authenticated -> Anonymous` is the only lifecycle. The
/// transitions are owned by [`crate::AuthService`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Session {
    #[default]
    Anonymous,
    Authenticated {
        username: String,
    },
}

impl Session {
    /// A session already bound to `username`.
    pub fn authenticated(username: impl Into<String>) -> Self {
        Session::Authenticated {
            username: username.into(),
        }
    }

    pub fn username(&self) -> Option<&str> {
        match self {
            Session::Anonymous => None,
            Session::Authenticated { username } => Some(username),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Session::Authenticated { .. })
    }

    /// The bound username, or [`AuthError::NotAuthenticated`].
    pub fn require_user(&self) -> Result<&str, AuthError> {
        self.username().ok_or(AuthError::NotAuthenticated)
    }

    pub(crate) fn bind(&mut self, username: &str) {
        *self = Session::authenticated(username);
    }

    pub(crate) fn clear(&mut self) {
        *self = Session::Anonymous;
    }
}
