//! Common envelope shapes shared by every OpenSRS action.
//!
//! Every request carries `protocol`, `object` and `action` next to the
//! action-specific `attributes` block. Every reply additionally carries the
//! outcome fields (`is_success`, `response_code`, `response_text`).

use serde::{Deserialize, Serialize};

use crate::operations::{OpsAction, OpsOperation};

/// The only protocol OpenSRS speaks over the XML interface.
pub const PROTOCOL_XCP: &str = "XCP";

/// Routing fields of an outgoing request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseRequest {
    /// Protocol name, always `XCP` in practice.
    pub protocol: String,
    /// Target object, e.g. `DOMAIN`.
    pub object: String,
    /// Action name, e.g. `LOOKUP`.
    pub action: String,
}

impl BaseRequest {
    /// Routing fields for the given operation.
    #[must_use]
    pub fn for_operation(operation: OpsOperation) -> Self {
        Self {
            protocol: PROTOCOL_XCP.to_owned(),
            object: operation.object().to_owned(),
            action: operation.action().to_owned(),
        }
    }
}

/// Outcome fields present on every reply, successful or not.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseResponse {
    /// Always `REPLY` for responses.
    pub action: String,
    /// Object the request addressed.
    pub object: String,
    /// Protocol echoed by the server.
    pub protocol: String,
    /// Whether the server executed the request.
    pub is_success: bool,
    /// Numeric response code, kept as the server sent it.
    pub response_code: String,
    /// Human readable outcome.
    pub response_text: String,
}

/// A complete request: routing fields plus typed attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpsRequest<A> {
    /// Routing fields.
    pub base: BaseRequest,
    /// Action-specific payload.
    pub attributes: A,
}

impl<A: OpsAction> OpsRequest<A> {
    /// Wrap attributes with the routing fields of their operation.
    pub fn new(attributes: A) -> Self {
        Self {
            base: BaseRequest::for_operation(A::OPERATION),
            attributes,
        }
    }
}

/// A complete reply: outcome fields plus typed attributes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpsResponse<A> {
    /// Outcome fields.
    pub base: BaseResponse,
    /// Action-specific payload.
    pub attributes: A,
}

impl<A> OpsResponse<A> {
    /// Whether the server reported success.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.base.is_success
    }
}
