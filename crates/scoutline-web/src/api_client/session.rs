//! Credentials for authenticated requests
//!
//! The token lives in an explicit [`SessionStorage`] instead of ambient
//! browser state, and the caller says which [`Environment`] it runs in.
//! Server-side rendering never sends a token.

use parking_lot::RwLock;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use std::collections::HashMap;
use std::fmt;
use tracing::warn;

/// Storage key the bearer token is kept under
pub const TOKEN_STORAGE_KEY: &str = "scoutline.auth_token";

/// Key/value store standing in for browser local storage
#[derive(Debug, Default)]
pub struct SessionStorage {
    entries: RwLock<HashMap<String, String>>,
}

impl SessionStorage {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a value
    #[must_use]
    pub fn get_item(&self, key: &str) -> Option<String> {
        self.entries.read().get(key).cloned()
    }

    /// Write a value, replacing any previous one
    pub fn set_item(&self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.write().insert(key.into(), value.into());
    }

    /// Remove a value
    pub fn remove_item(&self, key: &str) -> Option<String> {
        self.entries.write().remove(key)
    }

    /// The stored bearer token, if any
    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.get_item(TOKEN_STORAGE_KEY)
    }

    /// Persist the bearer token after login
    pub fn store_token(&self, token: impl Into<String>) {
        self.set_item(TOKEN_STORAGE_KEY, token);
    }

    /// Forget the bearer token on logout
    pub fn clear_token(&self) {
        self.remove_item(TOKEN_STORAGE_KEY);
    }
}

/// Where request building runs
#[derive(Debug, Clone, Copy)]
pub enum Environment<'a> {
    /// In the browser, with access to persisted storage
    Browser(&'a SessionStorage),
    /// During server-side rendering; no stored credentials exist
    Server,
}

/// Credential threaded through request building
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Session {
    token: Option<String>,
}

impl Session {
    /// A session without credentials
    #[must_use]
    pub const fn anonymous() -> Self {
        Self { token: None }
    }

    /// A session carrying `token`; blank tokens count as absent
    #[must_use]
    pub fn bearer(token: impl Into<String>) -> Self {
        let token = token.into();
        let token = token.trim();
        Self {
            token: (!token.is_empty()).then(|| token.to_string()),
        }
    }

    /// Read the session out of the environment
    #[must_use]
    pub fn from_env(env: Environment<'_>) -> Self {
        match env {
            Environment::Browser(storage) => storage.token().map_or_else(Self::anonymous, Self::bearer),
            Environment::Server => Self::anonymous(),
        }
    }

    /// The bearer token, if any
    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Whether a token is present
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// Headers to attach to a request: empty, or a single `Authorization` entry
    #[must_use]
    pub fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Some(token) = &self.token {
            match HeaderValue::from_str(&format!("Bearer {token}")) {
                Ok(mut value) => {
                    value.set_sensitive(true);
                    headers.insert(AUTHORIZATION, value);
                }
                Err(_) => warn!("Stored token is not a valid header value; sending request without it"),
            }
        }
        headers
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}

/// Authorization headers for the current environment
#[must_use]
pub fn auth_headers(env: Environment<'_>) -> HeaderMap {
    Session::from_env(env).headers()
}
