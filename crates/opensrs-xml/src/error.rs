//! Codec error types.

use std::io;

/// Errors that can occur while encoding or decoding OPS envelopes.
#[derive(Debug, thiserror::Error)]
pub enum XmlError {
    /// An I/O error during XML writing.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The bytes do not follow the `OPS_envelope` grammar, or are not
    /// well-formed XML at all.
    #[error("malformed OPS envelope: {0}")]
    MalformedEnvelope(String),

    /// A node the destination type requires is absent.
    #[error("missing required field: {0}")]
    MissingField(String),

    /// A boolean field holds something other than `1` or `0`.
    #[error("invalid boolean literal for {field}: {value:?}")]
    InvalidBooleanLiteral {
        /// Dotted path of the offending field.
        field: String,
        /// The text found on the wire.
        value: String,
    },

    /// A node has a different shape than the destination type expects,
    /// e.g. a container where text was expected.
    #[error("unexpected {found} for {field}, expected {expected}")]
    UnexpectedShape {
        /// Dotted path of the offending field.
        field: String,
        /// What the destination type accepts.
        expected: &'static str,
        /// What was found on the wire.
        found: &'static str,
    },
}

impl XmlError {
    pub(crate) fn malformed(message: impl std::fmt::Display) -> Self {
        Self::MalformedEnvelope(message.to_string())
    }
}
