//! OPS XML serialization: typed values to [`WireValue`] trees to bytes.
//!
//! [`ToWire`] builds the tree; [`to_xml`] and [`envelope_to_xml`] write it.
//! The writer emits no whitespace, and assoc children are written in
//! insertion order, so a given typed value always produces the same bytes.

use std::io::{self, Write};

use quick_xml::Writer;
use quick_xml::escape::partial_escape;
use quick_xml::events::{BytesText, Event};

use opensrs_model::{
    BaseResponse, LookupOverride, LookupRequest, LookupResponse, NameSuggestItem,
    NameSuggestItems, NameSuggestRequest, NameSuggestResponse, OpsRequest, OpsResponse,
    ServiceLimits, ServiceOverride,
};

use crate::error::XmlError;
use crate::value::{Assoc, WireValue};

/// Static prefix of every envelope. Not part of the tree.
pub const XML_PREAMBLE: &str =
    "<?xml version='1.0' encoding='UTF-8' standalone='no' ?><!DOCTYPE OPS_envelope SYSTEM 'ops.dtd'>";

/// Envelope protocol version written into `<header>`.
pub const PROTOCOL_VERSION: &str = "0.9";

/// Trait for converting typed values into the generic wire tree.
pub trait ToWire {
    /// Build the wire representation of this value.
    fn to_wire(&self) -> WireValue;
}

/// Serialize a single container (or scalar) as an XML fragment, without
/// preamble or envelope.
///
/// # Errors
///
/// Returns `XmlError` if writing fails.
pub fn to_xml(value: &WireValue) -> Result<Vec<u8>, XmlError> {
    let mut buf = Vec::with_capacity(256);
    let mut writer = Writer::new(&mut buf);
    write_value(&mut writer, value)?;
    Ok(buf)
}

/// Serialize a full envelope: preamble, header and the body assoc inside
/// `<body><data_block>`.
///
/// # Errors
///
/// Returns `XmlError` if writing fails.
pub fn envelope_to_xml(body: &Assoc) -> Result<Vec<u8>, XmlError> {
    let mut buf = Vec::with_capacity(512);
    buf.extend_from_slice(XML_PREAMBLE.as_bytes());
    let mut writer = Writer::new(&mut buf);

    writer
        .create_element("OPS_envelope")
        .write_inner_content(|w| {
            w.create_element("header").write_inner_content(|w| {
                w.create_element("version")
                    .write_text_content(BytesText::new(PROTOCOL_VERSION))?;
                Ok(())
            })?;
            w.create_element("body").write_inner_content(|w| {
                w.create_element("data_block")
                    .write_inner_content(|w| write_assoc(w, body))?;
                Ok(())
            })?;
            Ok(())
        })?;

    Ok(buf)
}

// ---------------------------------------------------------------------------
// Writer
// ---------------------------------------------------------------------------

fn write_value<W: Write>(writer: &mut Writer<W>, value: &WireValue) -> io::Result<()> {
    match value {
        WireValue::Scalar(text) => {
            writer.write_event(Event::Text(BytesText::from_escaped(partial_escape(text))))?;
        }
        WireValue::Assoc(assoc) => write_assoc(writer, assoc)?,
        WireValue::Array(items) => {
            writer.create_element("dt_array").write_inner_content(|w| {
                for (index, item) in items.iter().enumerate() {
                    write_item(w, &index.to_string(), item)?;
                }
                Ok(())
            })?;
        }
    }
    Ok(())
}

/// Write `<dt_assoc>` with one `item` per child. An empty assoc is written
/// as an explicit start/end pair.
fn write_assoc<W: Write>(writer: &mut Writer<W>, assoc: &Assoc) -> io::Result<()> {
    writer.create_element("dt_assoc").write_inner_content(|w| {
        for (key, value) in assoc.iter() {
            write_item(w, key, value)?;
        }
        Ok(())
    })?;
    Ok(())
}

fn write_item<W: Write>(writer: &mut Writer<W>, key: &str, value: &WireValue) -> io::Result<()> {
    writer
        .create_element("item")
        .with_attribute(("key", key))
        .write_inner_content(|w| write_value(w, value))?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Tree-building helpers
// ---------------------------------------------------------------------------

/// Wire literal for a boolean.
pub(crate) fn bool_literal(value: bool) -> &'static str {
    if value { "1" } else { "0" }
}

/// Insert `key` only if the value is `Some`.
fn insert_optional_text(assoc: &mut Assoc, key: &str, value: Option<&str>) {
    if let Some(v) = value {
        assoc.insert(key, v);
    }
}

/// Insert a boolean flag only when it is set.
fn insert_flag(assoc: &mut Assoc, key: &str, value: bool) {
    if value {
        assoc.insert(key, bool_literal(true));
    }
}

/// Insert a list only when it has elements.
fn insert_list<T: ToWire>(assoc: &mut Assoc, key: &str, values: &[T]) {
    if !values.is_empty() {
        assoc.insert(key, values.to_wire());
    }
}

/// Insert a nested value when present. A present value that encodes to an
/// empty assoc is still inserted.
fn insert_optional<T: ToWire>(assoc: &mut Assoc, key: &str, value: Option<&T>) {
    if let Some(v) = value {
        assoc.insert(key, v.to_wire());
    }
}

// ---------------------------------------------------------------------------
// ToWire for primitives and containers
// ---------------------------------------------------------------------------

impl ToWire for WireValue {
    fn to_wire(&self) -> WireValue {
        self.clone()
    }
}

impl ToWire for Assoc {
    fn to_wire(&self) -> WireValue {
        WireValue::Assoc(self.clone())
    }
}

impl ToWire for str {
    fn to_wire(&self) -> WireValue {
        WireValue::from(self)
    }
}

impl ToWire for String {
    fn to_wire(&self) -> WireValue {
        WireValue::Scalar(self.clone())
    }
}

impl ToWire for bool {
    fn to_wire(&self) -> WireValue {
        WireValue::from(bool_literal(*self))
    }
}

impl<T: ToWire> ToWire for [T] {
    fn to_wire(&self) -> WireValue {
        WireValue::Array(self.iter().map(ToWire::to_wire).collect())
    }
}

impl<T: ToWire> ToWire for Vec<T> {
    fn to_wire(&self) -> WireValue {
        self.as_slice().to_wire()
    }
}

impl<T: ToWire> ToWire for indexmap::IndexMap<String, T> {
    fn to_wire(&self) -> WireValue {
        WireValue::Assoc(self.iter().map(|(k, v)| (k.clone(), v.to_wire())).collect())
    }
}

// ---------------------------------------------------------------------------
// ToWire for envelopes
// ---------------------------------------------------------------------------

/// Body assoc of an outgoing request: routing fields, then attributes.
pub(crate) fn request_body<A: ToWire>(request: &OpsRequest<A>) -> Assoc {
    let mut assoc = Assoc::new();
    assoc.insert("protocol", request.base.protocol.as_str());
    assoc.insert("object", request.base.object.as_str());
    assoc.insert("action", request.base.action.as_str());
    assoc.insert("attributes", request.attributes.to_wire());
    assoc
}

impl<A: ToWire> ToWire for OpsRequest<A> {
    fn to_wire(&self) -> WireValue {
        WireValue::Assoc(request_body(self))
    }
}

fn write_base_response(assoc: &mut Assoc, base: &BaseResponse) {
    assoc.insert("action", base.action.as_str());
    assoc.insert("object", base.object.as_str());
    assoc.insert("protocol", base.protocol.as_str());
    assoc.insert("response_code", base.response_code.as_str());
    assoc.insert("is_success", bool_literal(base.is_success));
    assoc.insert("response_text", base.response_text.as_str());
}

impl ToWire for BaseResponse {
    fn to_wire(&self) -> WireValue {
        let mut assoc = Assoc::new();
        write_base_response(&mut assoc, self);
        WireValue::Assoc(assoc)
    }
}

impl<A: ToWire> ToWire for OpsResponse<A> {
    fn to_wire(&self) -> WireValue {
        let mut assoc = Assoc::new();
        write_base_response(&mut assoc, &self.base);
        assoc.insert("attributes", self.attributes.to_wire());
        WireValue::Assoc(assoc)
    }
}

// ---------------------------------------------------------------------------
// ToWire for LOOKUP
// ---------------------------------------------------------------------------

impl ToWire for LookupRequest {
    fn to_wire(&self) -> WireValue {
        let mut assoc = Assoc::new();
        assoc.insert("domain", self.domain.as_str());
        insert_flag(&mut assoc, "no_cache", self.no_cache);
        WireValue::Assoc(assoc)
    }
}

impl ToWire for LookupResponse {
    fn to_wire(&self) -> WireValue {
        let mut assoc = Assoc::new();
        assoc.insert("status", self.status.as_str());
        insert_optional_text(&mut assoc, "reason", self.reason.as_deref());
        insert_optional_text(&mut assoc, "price_status", self.price_status.as_deref());
        insert_flag(&mut assoc, "has_claim", self.has_claim);
        insert_flag(&mut assoc, "email_available", self.email_available);
        insert_flag(&mut assoc, "noservice", self.no_service);
        WireValue::Assoc(assoc)
    }
}

// ---------------------------------------------------------------------------
// ToWire for NAME_SUGGEST
// ---------------------------------------------------------------------------

impl ToWire for NameSuggestRequest {
    fn to_wire(&self) -> WireValue {
        let mut assoc = Assoc::new();
        insert_list(&mut assoc, "languages", &self.languages);
        insert_optional_text(&mut assoc, "max_wait_time", self.max_wait_time.as_deref());
        insert_optional_text(&mut assoc, "search_key", self.search_key.as_deref());
        insert_optional_text(&mut assoc, "searchstring", self.search_string.as_deref());
        insert_optional(&mut assoc, "service_override", self.service_override.as_ref());
        insert_list(&mut assoc, "services", &self.services);
        insert_flag(&mut assoc, "skip_registry_lookup", self.skip_registry_lookup);
        insert_list(&mut assoc, "tlds", &self.tlds);
        WireValue::Assoc(assoc)
    }
}

impl ToWire for ServiceOverride {
    fn to_wire(&self) -> WireValue {
        let mut assoc = Assoc::new();
        insert_optional(&mut assoc, "lookup", self.lookup.as_ref());
        insert_list(&mut assoc, "personal_names", &self.personal_names);
        insert_optional(&mut assoc, "premium", self.premium.as_ref());
        insert_optional(&mut assoc, "suggestion", self.suggestion.as_ref());
        WireValue::Assoc(assoc)
    }
}

impl ToWire for ServiceLimits {
    fn to_wire(&self) -> WireValue {
        let mut assoc = Assoc::new();
        insert_optional_text(&mut assoc, "maximum", self.maximum.as_deref());
        insert_optional_text(&mut assoc, "price_max", self.price_max.as_deref());
        insert_optional_text(&mut assoc, "price_min", self.price_min.as_deref());
        insert_list(&mut assoc, "tlds", &self.tlds);
        WireValue::Assoc(assoc)
    }
}

impl ToWire for LookupOverride {
    fn to_wire(&self) -> WireValue {
        let mut assoc = Assoc::new();
        insert_optional_text(&mut assoc, "maximum", self.maximum.as_deref());
        insert_optional_text(&mut assoc, "price_max", self.price_max.as_deref());
        insert_optional_text(&mut assoc, "price_min", self.price_min.as_deref());
        insert_list(&mut assoc, "tlds", &self.tlds);
        insert_list(&mut assoc, "no_cache_tlds", &self.no_cache_tlds);
        WireValue::Assoc(assoc)
    }
}

impl ToWire for NameSuggestResponse {
    fn to_wire(&self) -> WireValue {
        let mut assoc = Assoc::new();
        insert_optional(&mut assoc, "lookup", self.lookup.as_ref());
        insert_optional(&mut assoc, "personal_names", self.personal_names.as_ref());
        insert_optional(&mut assoc, "premium", self.premium.as_ref());
        insert_optional(
            &mut assoc,
            "premium_brokered_transfer",
            self.premium_brokered_transfer.as_ref(),
        );
        insert_optional(
            &mut assoc,
            "premium_make_offer",
            self.premium_make_offer.as_ref(),
        );
        insert_optional(&mut assoc, "suggestion", self.suggestion.as_ref());
        insert_optional_text(&mut assoc, "search_key", self.search_key.as_deref());
        assoc.insert("is_search_complete", bool_literal(self.is_search_complete));
        WireValue::Assoc(assoc)
    }
}

impl ToWire for NameSuggestItems {
    fn to_wire(&self) -> WireValue {
        let mut assoc = Assoc::new();
        assoc.insert("count", self.count.as_str());
        assoc.insert("response_code", self.response_code.as_str());
        assoc.insert("response_text", self.response_text.as_str());
        assoc.insert("is_success", bool_literal(self.is_success));
        insert_list(&mut assoc, "items", &self.items);
        WireValue::Assoc(assoc)
    }
}

impl ToWire for NameSuggestItem {
    fn to_wire(&self) -> WireValue {
        let mut assoc = Assoc::new();
        assoc.insert("domain", self.domain.as_str());
        assoc.insert("status", self.status.as_str());
        insert_optional_text(&mut assoc, "price", self.price.as_deref());
        insert_flag(&mut assoc, "has_claim", self.has_claim);
        insert_optional_text(&mut assoc, "reason", self.reason.as_deref());
        insert_optional_text(
            &mut assoc,
            "third_party_offer_url",
            self.third_party_offer_url.as_deref(),
        );
        WireValue::Assoc(assoc)
    }
}
