//! `NAME_SUGGEST` on the `DOMAIN` object.
//!
//! One request fans out to several services (`lookup`, `suggestion`,
//! `premium`, `personal_names`, `premium_brokered_transfer`,
//! `premium_make_offer`). Each service can be tuned through an independent
//! override block; an override that is present but empty is sent as an empty
//! block, which the server treats differently from an absent one.

use serde::{Deserialize, Serialize};

use crate::operations::{OpsAction, OpsOperation};

/// Attributes of a `NAME_SUGGEST` request.
///
/// Fields are encoded in declaration order. Empty lists, `None` values and a
/// false `skip_registry_lookup` are left out of the request entirely, so the
/// server applies its own defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameSuggestRequest {
    /// Languages used for suggestions (`en`, `de`, ...).
    pub languages: Vec<String>,
    /// Upper bound on server run time, in seconds (e.g. `"0.4"`).
    pub max_wait_time: Option<String>,
    /// Key of an earlier incomplete search to resume.
    pub search_key: Option<String>,
    /// Term to search for. Sent under the wire key `searchstring`.
    pub search_string: Option<String>,
    /// Per-service tuning.
    pub service_override: Option<ServiceOverride>,
    /// Services to run.
    pub services: Vec<String>,
    /// Skip registry checks and return cached results only.
    pub skip_registry_lookup: bool,
    /// TLDs to search across.
    pub tlds: Vec<String>,
}

impl OpsAction for NameSuggestRequest {
    const OPERATION: OpsOperation = OpsOperation::NameSuggest;
    type Response = NameSuggestResponse;
}

/// Per-service override blocks. Each one is independently present or absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceOverride {
    /// Tuning for the `lookup` service.
    pub lookup: Option<LookupOverride>,
    /// Names fed to the `personal_names` service.
    pub personal_names: Vec<String>,
    /// Tuning for the `premium` service.
    pub premium: Option<ServiceLimits>,
    /// Tuning for the `suggestion` service.
    pub suggestion: Option<ServiceLimits>,
}

/// Result limits for the `premium` and `suggestion` services.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceLimits {
    /// Maximum number of results.
    pub maximum: Option<String>,
    /// Upper price bound.
    pub price_max: Option<String>,
    /// Lower price bound.
    pub price_min: Option<String>,
    /// TLDs this service is restricted to.
    pub tlds: Vec<String>,
}

/// Tuning for the `lookup` service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupOverride {
    /// Maximum number of results.
    pub maximum: Option<String>,
    /// Upper price bound.
    pub price_max: Option<String>,
    /// Lower price bound.
    pub price_min: Option<String>,
    /// TLDs this service is restricted to.
    pub tlds: Vec<String>,
    /// TLDs checked at the registry rather than the cache.
    pub no_cache_tlds: Vec<String>,
}

/// Attributes of a `NAME_SUGGEST` reply.
///
/// A service block is `None` when the server did not return it, which is
/// the case for services that were not requested.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameSuggestResponse {
    /// Results of the `lookup` service.
    pub lookup: Option<NameSuggestItems>,
    /// Results of the `personal_names` service.
    pub personal_names: Option<NameSuggestItems>,
    /// Results of the `premium` service.
    pub premium: Option<NameSuggestItems>,
    /// Results of the `premium_brokered_transfer` service.
    pub premium_brokered_transfer: Option<NameSuggestItems>,
    /// Results of the `premium_make_offer` service.
    pub premium_make_offer: Option<NameSuggestItems>,
    /// Results of the `suggestion` service.
    pub suggestion: Option<NameSuggestItems>,
    /// Key to resume an incomplete search with.
    pub search_key: Option<String>,
    /// Whether every lookup finished within `max_wait_time`.
    pub is_search_complete: bool,
}

/// Results of a single service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameSuggestItems {
    /// Number of items, as sent by the server.
    pub count: String,
    /// Per-service response code.
    pub response_code: String,
    /// Per-service response text.
    pub response_text: String,
    /// Whether this service succeeded.
    pub is_success: bool,
    /// Returned names.
    pub items: Vec<NameSuggestItem>,
}

/// One name returned by a service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameSuggestItem {
    /// The suggested name.
    pub domain: String,
    /// `available`, `taken`, ...
    pub status: String,
    /// Price, for premium names.
    pub price: Option<String>,
    /// Whether a trademark claim exists for the name.
    pub has_claim: bool,
    /// Why the name is unavailable.
    pub reason: Option<String>,
    /// Offer page for brokered names.
    pub third_party_offer_url: Option<String>,
}

impl NameSuggestItems {
    /// Items whose status is `available`.
    pub fn available(&self) -> impl Iterator<Item = &NameSuggestItem> {
        self.items.iter().filter(|item| item.status == "available")
    }
}
