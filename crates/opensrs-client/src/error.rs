//! Error types for the OpenSRS client.

use std::fmt;

use http::StatusCode;
use opensrs_auth::AuthError;
use opensrs_model::BaseResponse;
use opensrs_xml::XmlError;

/// What part of the HTTP exchange failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    /// The configured timeout elapsed.
    Timeout,
    /// No connection could be established.
    Connect,
    /// The request could not be sent.
    Request,
    /// The response body could not be read.
    Body,
}

impl fmt::Display for TransportErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Timeout => "timeout",
            Self::Connect => "connect",
            Self::Request => "request",
            Self::Body => "body",
        })
    }
}

/// Errors returned by [`OpsClient`](crate::OpsClient).
#[derive(Debug, thiserror::Error)]
pub enum OpsError {
    /// The request could not be encoded or the reply could not be decoded.
    #[error("codec error: {0}")]
    Codec(#[from] XmlError),

    /// The request could not be signed.
    #[error("signing error: {0}")]
    Auth(#[from] AuthError),

    /// The HTTP exchange failed.
    #[error("transport error ({kind}): {source}")]
    Transport {
        /// Which part of the exchange failed.
        kind: TransportErrorKind,
        /// The underlying error.
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },

    /// The server answered with a non-2xx status.
    #[error("unexpected HTTP status {status}")]
    UnexpectedStatus {
        /// The HTTP status.
        status: StatusCode,
        /// The response body, lossily decoded.
        body: String,
    },

    /// The server processed the request and reported failure
    /// (`is_success = 0`).
    #[error("OpenSRS API error {response_code}: {response_text}")]
    Api {
        /// Server response code, e.g. `415`.
        response_code: String,
        /// Server response text.
        response_text: String,
        /// All outcome fields of the reply.
        response: BaseResponse,
    },

    /// The client configuration is unusable.
    #[error("configuration error: {0}")]
    Config(String),
}

impl OpsError {
    /// Build a transport error from any error type.
    pub fn transport(
        kind: TransportErrorKind,
        source: impl Into<Box<dyn std::error::Error + Send + Sync + 'static>>,
    ) -> Self {
        Self::Transport {
            kind,
            source: source.into(),
        }
    }

    /// Whether the request timed out.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            Self::Transport {
                kind: TransportErrorKind::Timeout,
                ..
            }
        )
    }

    /// Whether the server reported an application-level failure.
    #[must_use]
    pub fn is_api_error(&self) -> bool {
        matches!(self, Self::Api { .. })
    }
}

/// Convenience result type for client operations.
pub type OpsResult<T> = Result<T, OpsError>;
