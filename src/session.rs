//! Authentication state of the running client.
//!
//! The HTTP layer never reads a global; it is handed a [`CredentialProvider`]
//! and asks it for the bearer token of each request.

use std::sync::{PoisonError, RwLock};

use crate::domain::auth::AuthTokens;
use crate::domain::user::User;

/// Source of the bearer credentials attached to API requests.
pub trait CredentialProvider: Send + Sync {
    fn access_token(&self) -> Option<String>;
    fn refresh_token(&self) -> Option<String>;
    /// Stores a freshly refreshed access token, keeping the refresh token.
    fn update_access_token(&self, access_token: String);
    /// Forgets every credential, e.g. after the API rejected them.
    fn clear(&self);
}

#[derive(Debug, Default)]
struct SessionState {
    tokens: Option<AuthTokens>,
    user: Option<User>,
}

/// In-memory session shared by the repository, services and route guards.
#[derive(Debug, Default)]
pub struct SessionStore {
    state: RwLock<SessionState>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_tokens(&self, tokens: AuthTokens) {
        self.write(|state| state.tokens = Some(tokens));
    }

    pub fn set_user(&self, user: Option<User>) {
        self.write(|state| state.user = user);
    }

    pub fn user(&self) -> Option<User> {
        self.read(|state| state.user.clone())
    }

    pub fn has_tokens(&self) -> bool {
        self.read(|state| state.tokens.is_some())
    }

    /// A session counts as authenticated once tokens were issued.
    pub fn is_authenticated(&self) -> bool {
        self.has_tokens()
    }

    pub fn is_admin(&self) -> bool {
        self.read(|state| state.user.as_ref().is_some_and(User::is_admin))
    }

    fn read<T>(&self, f: impl FnOnce(&SessionState) -> T) -> T {
        let guard = self.state.read().unwrap_or_else(PoisonError::into_inner);
        f(&guard)
    }

    fn write(&self, f: impl FnOnce(&mut SessionState)) {
        let mut guard = self.state.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }
}

impl CredentialProvider for SessionStore {
    fn access_token(&self) -> Option<String> {
        self.read(|state| state.tokens.as_ref().map(|t| t.access_token.clone()))
    }

    fn refresh_token(&self) -> Option<String> {
        self.read(|state| state.tokens.as_ref().map(|t| t.refresh_token.clone()))
    }

    fn update_access_token(&self, access_token: String) {
        self.write(|state| {
            if let Some(tokens) = state.tokens.as_mut() {
                tokens.access_token = access_token;
            }
        });
    }

    fn clear(&self) {
        self.write(|state| {
            state.tokens = None;
            state.user = None;
        });
    }
}
