//! HTTP transport.
//!
//! [`Transport`] is the seam between the client and the network: one
//! request in, one response out, no retries. [`HttpTransport`] is the
//! reqwest-backed implementation; tests substitute their own.

use std::fmt;

use bytes::Bytes;
use http::{HeaderMap, Method, StatusCode};
use tracing::debug;

use crate::config::ClientConfig;
use crate::error::{OpsError, TransportErrorKind};

/// An outgoing HTTP request.
#[derive(Debug, Clone)]
pub struct TransportRequest {
    /// HTTP method, `POST` for every OPS call.
    pub method: Method,
    /// Absolute URL.
    pub url: String,
    /// Request headers, including the signature.
    pub headers: HeaderMap,
    /// The exact body that was signed.
    pub body: Bytes,
}

/// A complete HTTP response.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    /// HTTP status.
    pub status: StatusCode,
    /// Full response body.
    pub body: Bytes,
}

/// Sends a single request and returns the complete response.
///
/// Implementations must not retry and must report non-2xx statuses as a
/// normal [`TransportResponse`]; the client decides what a status means.
#[async_trait::async_trait]
pub trait Transport: Send + Sync + fmt::Debug {
    /// Perform the exchange.
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, OpsError>;
}

/// [`Transport`] backed by a pooled `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Build a transport honoring the configured timeout and user agent.
    pub fn new(config: &ClientConfig) -> Result<Self, OpsError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| OpsError::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

#[async_trait::async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, OpsError> {
        let response = self
            .client
            .request(request.method, &request.url)
            .headers(request.headers)
            .body(request.body)
            .send()
            .await
            .map_err(|e| classify(e, TransportErrorKind::Request))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| classify(e, TransportErrorKind::Body))?;

        debug!(status = %status, body_len = body.len(), "HTTP exchange complete");
        Ok(TransportResponse { status, body })
    }
}

/// Map a reqwest error onto a transport error kind. `fallback` is used when
/// the error is neither a timeout nor a connect failure.
fn classify(err: reqwest::Error, fallback: TransportErrorKind) -> OpsError {
    let kind = if err.is_timeout() {
        TransportErrorKind::Timeout
    } else if err.is_connect() {
        TransportErrorKind::Connect
    } else if err.is_body() || err.is_decode() {
        TransportErrorKind::Body
    } else {
        fallback
    };
    OpsError::transport(kind, err)
}
