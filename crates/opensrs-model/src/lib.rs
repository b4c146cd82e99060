//! Typed request and response shapes for the OpenSRS XCP API.
//!
//! These are plain data types. The mapping to and from the `OPS_envelope`
//! wire grammar lives in `opensrs-xml`, which implements its projection
//! traits for every type defined here.
//!
//! # Layout
//!
//! - [`envelope`] - the common request/response wrappers shared by every action
//! - [`operations`] - the set of supported actions
//! - [`lookup`] - `LOOKUP` on the `DOMAIN` object
//! - [`name_suggest`] - `NAME_SUGGEST` on the `DOMAIN` object

pub mod envelope;
pub mod lookup;
pub mod name_suggest;
pub mod operations;

pub use envelope::{BaseRequest, BaseResponse, OpsRequest, OpsResponse, PROTOCOL_XCP};
pub use lookup::{LookupRequest, LookupResponse};
pub use name_suggest::{
    LookupOverride, NameSuggestItem, NameSuggestItems, NameSuggestRequest, NameSuggestResponse,
    ServiceLimits, ServiceOverride,
};
pub use operations::{OpsAction, OpsOperation};
