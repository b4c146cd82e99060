//! The OpenSRS double-MD5 request signature.

use md5::{Digest, Md5};
use subtle::ConstantTimeEq;
use tracing::debug;

use crate::error::AuthError;

/// Compute the signature of a request body.
///
/// The body must be the exact bytes that go on the wire; re-serializing
/// the same request may not reproduce them.
#[must_use]
pub fn sign(body: &[u8], api_key: &str) -> String {
    let inner = md5_hex(&[body, api_key.as_bytes()]);
    md5_hex(&[inner.as_bytes(), api_key.as_bytes()])
}

/// Check a provided signature against the one computed for `body`.
///
/// The comparison is constant-time and case-sensitive: OpenSRS signatures
/// are lowercase hex.
///
/// # Errors
///
/// Returns [`AuthError::SignatureDoesNotMatch`] if the signatures differ.
pub fn verify_signature(body: &[u8], api_key: &str, provided: &str) -> Result<(), AuthError> {
    let expected = sign(body, api_key);

    if provided.as_bytes().ct_eq(expected.as_bytes()).into() {
        Ok(())
    } else {
        debug!(body_len = body.len(), "OpenSRS signature mismatch");
        Err(AuthError::SignatureDoesNotMatch)
    }
}

/// Lowercase hex MD5 of the concatenation of `parts`.
fn md5_hex(parts: &[&[u8]]) -> String {
    let mut hasher = Md5::new();
    for part in parts {
        hasher.update(part);
    }
    hex::encode(hasher.finalize())
}
