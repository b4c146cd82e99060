//! `LOOKUP` on the `DOMAIN` object.
//!
//! Checks whether a single domain name can be registered.

use serde::{Deserialize, Serialize};

use crate::operations::{OpsAction, OpsOperation};

/// Attributes of a `LOOKUP` request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupRequest {
    /// Fully qualified name to check.
    pub domain: String,
    /// Query the registry instead of the OpenSRS cache. Sent only when set.
    pub no_cache: bool,
}

impl LookupRequest {
    /// A cached lookup of `domain`.
    pub fn new(domain: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            no_cache: false,
        }
    }

    /// Bypass the OpenSRS cache.
    #[must_use]
    pub fn with_no_cache(mut self, no_cache: bool) -> Self {
        self.no_cache = no_cache;
        self
    }
}

impl OpsAction for LookupRequest {
    const OPERATION: OpsOperation = OpsOperation::Lookup;
    type Response = LookupResponse;
}

/// Attributes of a `LOOKUP` reply.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupResponse {
    /// `available` or `taken`.
    pub status: String,
    /// Why the name is unavailable, when the registry says so.
    pub reason: Option<String>,
    /// Pricing tier for premium names.
    pub price_status: Option<String>,
    /// Whether a trademark claim exists for the name.
    pub has_claim: bool,
    /// Whether email forwarding can be offered.
    pub email_available: bool,
    /// Whether the registry could not be queried.
    pub no_service: bool,
}

impl LookupResponse {
    /// Status value the server uses for registrable names.
    pub const STATUS_AVAILABLE: &str = "available";

    /// Whether the name can be registered.
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.status == Self::STATUS_AVAILABLE
    }
}
