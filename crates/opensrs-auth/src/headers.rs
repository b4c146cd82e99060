//! Signed header construction and server-side request verification.

use http::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use tracing::debug;

use crate::credentials::{CredentialProvider, Credentials};
use crate::error::AuthError;
use crate::signature::{sign, verify_signature};

/// Header carrying the reseller username.
pub const X_USERNAME: HeaderName = HeaderName::from_static("x-username");

/// Header carrying the request signature.
pub const X_SIGNATURE: HeaderName = HeaderName::from_static("x-signature");

/// Content type of every OPS request.
pub const CONTENT_TYPE_XML: &str = "text/xml";

/// The outcome of a successful [`verify_request`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedRequest {
    /// The reseller that signed the request.
    pub username: String,
}

/// Build the headers that authenticate `body`: `Content-Type`,
/// `X-Username` and `X-Signature`.
///
/// # Errors
///
/// Returns [`AuthError::InvalidHeader`] if the username cannot be carried in
/// an HTTP header.
pub fn signed_headers(credentials: &Credentials, body: &[u8]) -> Result<HeaderMap, AuthError> {
    let username = HeaderValue::from_str(credentials.username())
        .map_err(|_| AuthError::InvalidHeader(X_USERNAME.to_string()))?;
    let signature = HeaderValue::from_str(&sign(body, credentials.api_key()))
        .map_err(|_| AuthError::InvalidHeader(X_SIGNATURE.to_string()))?;

    let mut headers = HeaderMap::with_capacity(3);
    headers.insert(CONTENT_TYPE, HeaderValue::from_static(CONTENT_TYPE_XML));
    headers.insert(X_USERNAME, username);
    headers.insert(X_SIGNATURE, signature);
    Ok(headers)
}

/// Verify an incoming OPS request.
///
/// Reads `X-Username` and `X-Signature`, resolves the API key through
/// `credential_provider` and checks the signature over `body`.
///
/// # Errors
///
/// Returns an [`AuthError`] if a header is missing or unreadable, the
/// username is unknown, or the signature does not match.
pub fn verify_request(
    parts: &http::request::Parts,
    body: &[u8],
    credential_provider: &dyn CredentialProvider,
) -> Result<VerifiedRequest, AuthError> {
    let username = required_header(&parts.headers, &X_USERNAME)?;
    let signature = required_header(&parts.headers, &X_SIGNATURE)?;

    debug!(username = %username, "Verifying OpenSRS signature");

    let api_key = credential_provider.get_api_key(username)?;
    verify_signature(body, &api_key, signature)?;

    debug!(username = %username, "OpenSRS signature verification succeeded");
    Ok(VerifiedRequest {
        username: username.to_owned(),
    })
}

fn required_header<'a>(headers: &'a HeaderMap, name: &HeaderName) -> Result<&'a str, AuthError> {
    let value = headers
        .get(name)
        .ok_or_else(|| AuthError::MissingHeader(name.to_string()))?
        .to_str()
        .map_err(|_| AuthError::InvalidHeader(name.to_string()))?;

    if value.is_empty() {
        return Err(AuthError::InvalidHeader(name.to_string()));
    }
    Ok(value)
}
