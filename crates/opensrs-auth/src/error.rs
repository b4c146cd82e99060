//! Error types for request signing and verification.

/// Errors that can occur while signing or verifying an OpenSRS request.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// A required header is missing from the request.
    #[error("Missing required header: {0}")]
    MissingHeader(String),

    /// A header is present but its value is unusable (not visible ASCII,
    /// or empty).
    #[error("Invalid header value: {0}")]
    InvalidHeader(String),

    /// The username was not found in the credential store.
    #[error("Unknown reseller username: {0}")]
    UnknownUser(String),

    /// The computed signature does not match the provided signature.
    #[error("Signature does not match")]
    SignatureDoesNotMatch,
}
