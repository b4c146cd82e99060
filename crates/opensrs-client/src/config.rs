//! Client configuration.
//!
//! Provides [`ClientConfig`] for configuring the OpenSRS client. Values can be
//! set through the typed builder or loaded from environment variables.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

/// Production XCP endpoint.
pub const LIVE_ENDPOINT: &str = "https://rr-n1-tor.opensrs.net:55443";

/// Test (Horizon) XCP endpoint.
pub const TEST_ENDPOINT: &str = "https://horizon.opensrs.net:55443";

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

fn default_user_agent() -> String {
    format!("opensrs-rs/{}", env!("CARGO_PKG_VERSION"))
}

/// OpenSRS client configuration.
///
/// `Debug` and `Serialize` never expose the API key.
///
/// # Examples
///
/// ```
/// use opensrs_client::config::{ClientConfig, TEST_ENDPOINT};
///
/// let config = ClientConfig::builder()
///     .username("reseller")
///     .api_key("0123456789abcdef")
///     .base_url(TEST_ENDPOINT)
///     .build();
/// assert_eq!(config.timeout.as_secs(), 30);
/// assert!(!format!("{config:?}").contains("0123456789abcdef"));
/// ```
#[derive(Clone, Serialize, Deserialize, TypedBuilder)]
#[serde(rename_all = "camelCase")]
pub struct ClientConfig {
    /// Reseller username, sent as `X-Username`.
    #[builder(setter(into))]
    pub username: String,

    /// Private API key used to sign requests.
    #[builder(setter(into))]
    #[serde(skip_serializing, default)]
    pub api_key: String,

    /// Endpoint every request is POSTed to.
    #[builder(default = String::from(LIVE_ENDPOINT), setter(into))]
    pub base_url: String,

    /// Timeout for the whole exchange, connect through last body byte.
    #[builder(default = DEFAULT_TIMEOUT)]
    pub timeout: Duration,

    /// `User-Agent` header value.
    #[builder(default = default_user_agent(), setter(into))]
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            username: String::new(),
            api_key: String::new(),
            base_url: String::from(LIVE_ENDPOINT),
            timeout: DEFAULT_TIMEOUT,
            user_agent: default_user_agent(),
        }
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("username", &self.username)
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// Reads the following environment variables (falling back to defaults):
    ///
    /// | Variable | Default |
    /// |----------|---------|
    /// | `OPENSRS_USERNAME` | empty |
    /// | `OPENSRS_API_KEY` | empty |
    /// | `OPENSRS_BASE_URL` | `https://rr-n1-tor.opensrs.net:55443` |
    /// | `OPENSRS_TIMEOUT_SECS` | `30` |
    ///
    /// Missing credentials are left empty;
    /// [`OpsClient::new`](crate::OpsClient::new) rejects them.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(v) = var("OPENSRS_USERNAME") {
            config.username = v;
        }
        if let Some(v) = var("OPENSRS_API_KEY") {
            config.api_key = v;
        }
        if let Some(v) = var("OPENSRS_BASE_URL") {
            config.base_url = v;
        }
        if let Some(v) = var("OPENSRS_TIMEOUT_SECS") {
            if let Ok(secs) = v.parse::<u64>() {
                config.timeout = Duration::from_secs(secs);
            }
        }

        config
    }
}
