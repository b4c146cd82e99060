//! Reseller credentials and credential lookup.
//!
//! [`Credentials`] is what a client signs with. [`CredentialProvider`] is the
//! server-side view: resolve the API key for a username found in
//! `X-Username`.

use std::collections::HashMap;
use std::fmt;

use crate::error::AuthError;

/// A reseller username and its API key.
///
/// The `Debug` output never includes the key.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    username: String,
    api_key: String,
}

impl Credentials {
    /// Create credentials from a username and an API key.
    pub fn new(username: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            api_key: api_key.into(),
        }
    }

    /// The reseller username sent in `X-Username`.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// The private key used to sign requests. Never sent on the wire.
    #[must_use]
    pub fn api_key(&self) -> &str {
        &self.api_key
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

/// Trait for looking up API keys by reseller username.
pub trait CredentialProvider: Send + Sync {
    /// Retrieve the API key for the given username.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::UnknownUser`] if the username is not recognized.
    fn get_api_key(&self, username: &str) -> Result<String, AuthError>;
}

/// An in-memory credential provider backed by a `HashMap`.
///
/// Used by the mock OpenSRS server in tests.
#[derive(Clone)]
pub struct StaticCredentialProvider {
    keys: HashMap<String, String>,
}

impl StaticCredentialProvider {
    /// Create a provider from (username, api_key) pairs.
    pub fn new(keys: impl IntoIterator<Item = (String, String)>) -> Self {
        Self {
            keys: keys.into_iter().collect(),
        }
    }
}

impl From<&Credentials> for StaticCredentialProvider {
    fn from(credentials: &Credentials) -> Self {
        Self::new([(
            credentials.username().to_owned(),
            credentials.api_key().to_owned(),
        )])
    }
}

impl fmt::Debug for StaticCredentialProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticCredentialProvider")
            .field("usernames", &self.keys.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl CredentialProvider for StaticCredentialProvider {
    fn get_api_key(&self, username: &str) -> Result<String, AuthError> {
        self.keys
            .get(username)
            .cloned()
            .ok_or_else(|| AuthError::UnknownUser(username.to_owned()))
    }
}
