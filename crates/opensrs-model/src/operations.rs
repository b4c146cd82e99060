//! Supported OpenSRS operations.

/// All supported OpenSRS operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpsOperation {
    /// `LOOKUP` on `DOMAIN`: availability of a single name.
    Lookup,
    /// `NAME_SUGGEST` on `DOMAIN`: lookups and suggestions across TLDs.
    NameSuggest,
}

impl OpsOperation {
    /// Returns the wire value of the `action` key.
    #[must_use]
    pub fn action(&self) -> &'static str {
        match self {
            Self::Lookup => "LOOKUP",
            Self::NameSuggest => "NAME_SUGGEST",
        }
    }

    /// Returns the wire value of the `object` key.
    #[must_use]
    pub fn object(&self) -> &'static str {
        match self {
            Self::Lookup | Self::NameSuggest => "DOMAIN",
        }
    }
}

/// Ties an attributes type to the operation it belongs to and to the shape of
/// its reply.
pub trait OpsAction {
    /// The operation these attributes are sent with.
    const OPERATION: OpsOperation;

    /// Attributes type of a successful reply.
    type Response;
}

impl std::fmt::Display for OpsOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.object(), self.action())
    }
}
