//! OPS_envelope XML codec for the OpenSRS XCP API.
//!
//! OpenSRS wraps every message in a single generic grammar: nested
//! `dt_assoc` (keyed map) and `dt_array` (sequence) containers whose entries
//! are `<item key="...">` elements holding either text or another container.
//! Nothing in the wire syntax says whether a leaf is a string or a boolean,
//! so decoding happens in two phases:
//!
//! 1. XML text is parsed into an untyped [`WireValue`] tree.
//! 2. The tree is projected onto typed structures through [`FromWire`],
//!    which decides list/map/scalar from the destination type.
//!
//! Encoding is the mirror image: [`ToWire`] builds the tree and
//! [`envelope_to_xml`] writes it behind the fixed preamble.
//!
//! # Wire conventions
//!
//! - Preamble: `<?xml version='1.0' encoding='UTF-8' standalone='no' ?><!DOCTYPE OPS_envelope SYSTEM 'ops.dtd'>`
//! - Protocol version: `0.9`
//! - Booleans: `1` / `0`
//! - Arrays: `<dt_array>` with items keyed `0`, `1`, ...
//! - No whitespace between elements; the signature covers the exact bytes.

pub mod deserialize;
pub mod envelope;
pub mod error;
pub mod serialize;
pub mod value;

pub use deserialize::{Fields, FromWire, from_xml, parse_bool_literal};
pub use envelope::{
    Envelope, decode_base_response, decode_request, decode_response, parse_envelope,
    request_to_xml, response_to_xml,
};
pub use error::XmlError;
pub use serialize::{PROTOCOL_VERSION, ToWire, XML_PREAMBLE, envelope_to_xml, to_xml};
pub use value::{Assoc, WireValue};
