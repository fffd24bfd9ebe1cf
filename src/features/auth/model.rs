use std::time::Duration;

use serde::{Deserialize, Serialize};

/// The signed-in user as known to the client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    /// Identity provider user id
    pub id: String,
    /// Email address (absent when restored from a refresh token only)
    pub email: Option<String>,
}

/// Tokens issued by the identity provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionTokens {
    pub id_token: String,
    pub refresh_token: String,
    pub expires_in: Duration,
}

/// Result of a successful sign-in, sign-up or token refresh
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSession {
    pub user: SessionUser,
    pub tokens: SessionTokens,
}

/// Published session state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    pub user: Option<SessionUser>,
    /// True until the initial session is resolved and while a sign-in,
    /// sign-up or sign-out is in flight
    pub loading: bool,
}

impl SessionState {
    pub fn signed_in(&self) -> bool {
        self.user.is_some()
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            user: None,
            loading: true,
        }
    }
}
