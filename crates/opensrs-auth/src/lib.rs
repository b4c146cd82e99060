//! Request signing for the OpenSRS XCP API.
//!
//! OpenSRS authenticates each request by a reseller username and a signature
//! computed over the exact request body:
//!
//! ```text
//! signature = hex(MD5(hex(MD5(body + api_key)) + api_key))
//! ```
//!
//! Both digests are rendered as lowercase hex before use. The username and
//! signature travel in the `X-Username` and `X-Signature` headers.
//!
//! This crate implements both sides: [`signed_headers`] for clients and
//! [`verify_request`] for servers (and test doubles) that need to check an
//! incoming request against a [`CredentialProvider`].
//!
//! # Usage
//!
//! ```rust
//! use opensrs_auth::{sign, verify_signature};
//!
//! let body = b"<OPS_envelope>...</OPS_envelope>";
//! let signature = sign(body, "my-api-key");
//! assert_eq!(signature.len(), 32);
//! assert!(verify_signature(body, "my-api-key", &signature).is_ok());
//! ```
//!
//! # Modules
//!
//! - [`credentials`] - Reseller credentials and credential lookup
//! - [`error`] - Authentication error types
//! - [`headers`] - Signed header construction and request verification
//! - [`signature`] - The double-MD5 signature itself

pub mod credentials;
pub mod error;
pub mod headers;
pub mod signature;

pub use credentials::{CredentialProvider, Credentials, StaticCredentialProvider};
pub use error::AuthError;
pub use headers::{
    CONTENT_TYPE_XML, X_SIGNATURE, X_USERNAME, VerifiedRequest, signed_headers, verify_request,
};
pub use signature::{sign, verify_signature};
