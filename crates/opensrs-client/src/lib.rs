//! Async client for the OpenSRS XCP API.
//!
//! Every call follows the same path: typed attributes are encoded into an
//! `OPS_envelope`, the exact bytes are signed, POSTed to the configured
//! endpoint, and the reply is decoded. A reply with `is_success = 0` is
//! returned as [`OpsError::Api`].
//!
//! # Usage
//!
//! ```no_run
//! use opensrs_client::{ClientConfig, OpsClient};
//!
//! # async fn run() -> Result<(), opensrs_client::OpsError> {
//! let client = OpsClient::new(ClientConfig::from_env())?;
//! if client.domains().is_available("example.com", false).await? {
//!     println!("example.com is available");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Modules
//!
//! - [`client`] - [`OpsClient`], encode/sign/send/decode
//! - [`config`] - [`ClientConfig`] and endpoint constants
//! - [`domains`] - `DOMAIN` actions (`LOOKUP`, `NAME_SUGGEST`)
//! - [`error`] - [`OpsError`]
//! - [`transport`] - the [`Transport`] seam and its reqwest implementation

pub mod client;
pub mod config;
pub mod domains;
pub mod error;
pub mod transport;

pub use client::OpsClient;
pub use config::{ClientConfig, DEFAULT_TIMEOUT, LIVE_ENDPOINT, TEST_ENDPOINT};
pub use domains::DomainsService;
pub use error::{OpsError, OpsResult, TransportErrorKind};
pub use transport::{HttpTransport, Transport, TransportRequest, TransportResponse};
