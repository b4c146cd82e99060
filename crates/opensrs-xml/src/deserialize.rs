//! OPS XML deserialization: bytes to [`WireValue`] trees to typed values.
//!
//! The reader only knows the generic grammar (`dt_assoc`, `dt_array`,
//! `item`). Whether a node is a string, a boolean, a list or a map is decided
//! afterwards by the [`FromWire`] implementation of the destination type.

use indexmap::IndexMap;
use quick_xml::Reader;
use quick_xml::events::{BytesRef, BytesStart, BytesText, Event};

use opensrs_model::{
    BaseRequest, BaseResponse, LookupOverride, LookupRequest, LookupResponse, NameSuggestItem,
    NameSuggestItems, NameSuggestRequest, NameSuggestResponse, OpsRequest, OpsResponse,
    ServiceLimits, ServiceOverride,
};

use crate::error::XmlError;
use crate::value::{Assoc, WireValue};

/// Parse a standalone `dt_assoc` or `dt_array` fragment into a tree.
///
/// Leading declarations, doctypes, comments and whitespace are skipped.
///
/// # Errors
///
/// Returns [`XmlError::MalformedEnvelope`] if the input is not well-formed or
/// does not start with a container.
pub fn from_xml(xml: &[u8]) -> Result<WireValue, XmlError> {
    let mut reader = new_reader(xml);

    loop {
        match next_event(&mut reader)? {
            Event::Start(e) => {
                let value = read_container(&mut reader, &e)?;
                expect_end_of_document(&mut reader)?;
                return Ok(value);
            }
            Event::Text(e) if is_blank(&e) => {}
            Event::Text(_) | Event::CData(_) | Event::GeneralRef(_) => {
                return Err(XmlError::malformed("text outside of a container"));
            }
            Event::Eof => return Err(XmlError::malformed("no container element found")),
            _ => {}
        }
    }
}

// ---------------------------------------------------------------------------
// Reader helpers
// ---------------------------------------------------------------------------

/// Reader configured for OPS input: empty elements are expanded to
/// start/end pairs and text is not trimmed, so scalar values arrive exactly
/// as sent.
pub(crate) fn new_reader(xml: &[u8]) -> Reader<&[u8]> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().expand_empty_elements = true;
    reader
}

/// Read the next event, folding reader failures into `MalformedEnvelope`.
pub(crate) fn next_event<'a>(reader: &mut Reader<&'a [u8]>) -> Result<Event<'a>, XmlError> {
    reader.read_event().map_err(|err| {
        XmlError::malformed(format!(
            "{err} at byte {}",
            reader.error_position()
        ))
    })
}

/// Whether a text event holds only whitespace.
pub(crate) fn is_blank(e: &BytesText<'_>) -> bool {
    e.iter().all(u8::is_ascii_whitespace)
}

/// Only trailing whitespace, comments and processing instructions may
/// follow the root element.
pub(crate) fn expect_end_of_document(reader: &mut Reader<&[u8]>) -> Result<(), XmlError> {
    loop {
        match next_event(reader)? {
            Event::Eof => return Ok(()),
            Event::Text(e) if is_blank(&e) => {}
            Event::Comment(_) | Event::PI(_) => {}
            _ => return Err(XmlError::malformed("content after the root element")),
        }
    }
}

/// Read a container whose start tag has just been consumed.
pub(crate) fn read_container(
    reader: &mut Reader<&[u8]>,
    start: &BytesStart<'_>,
) -> Result<WireValue, XmlError> {
    match start.name().as_ref() {
        b"dt_assoc" => read_assoc(reader).map(WireValue::Assoc),
        b"dt_array" => read_array(reader).map(WireValue::Array),
        other => Err(XmlError::malformed(format!(
            "expected dt_assoc or dt_array, found <{}>",
            String::from_utf8_lossy(other)
        ))),
    }
}

/// Read the items of a `dt_assoc` through its end tag.
///
/// A repeated key keeps the last value.
fn read_assoc(reader: &mut Reader<&[u8]>) -> Result<Assoc, XmlError> {
    let mut assoc = Assoc::new();
    read_items(reader, "dt_assoc", |key, value| {
        assoc.insert(key, value);
        Ok(())
    })?;
    Ok(assoc)
}

/// Read the items of a `dt_array` through its end tag, ordered by their
/// numeric keys. The keys must be exactly `0..n`, in any document order.
fn read_array(reader: &mut Reader<&[u8]>) -> Result<Vec<WireValue>, XmlError> {
    let mut indexed: Vec<(usize, WireValue)> = Vec::new();
    read_items(reader, "dt_array", |key, value| {
        let index = key
            .parse::<usize>()
            .map_err(|_| XmlError::malformed(format!("dt_array item key {key:?} is not an index")))?;
        indexed.push((index, value));
        Ok(())
    })?;
    indexed.sort_by_key(|(index, _)| *index);

    indexed
        .into_iter()
        .enumerate()
        .map(|(position, (index, value))| {
            if index == position {
                Ok(value)
            } else {
                Err(XmlError::malformed(format!(
                    "dt_array keys are not contiguous: expected index {position}, found {index}"
                )))
            }
        })
        .collect()
}

/// Drive the `<item key="...">` children of a container, handing each
/// decoded child to `on_item`. Consumes the container's end tag.
fn read_items<F>(reader: &mut Reader<&[u8]>, container: &str, mut on_item: F) -> Result<(), XmlError>
where
    F: FnMut(String, WireValue) -> Result<(), XmlError>,
{
    loop {
        match next_event(reader)? {
            Event::Start(e) => {
                if e.name().as_ref() != b"item" {
                    return Err(XmlError::malformed(format!(
                        "unexpected <{}> inside {container}",
                        String::from_utf8_lossy(e.name().as_ref())
                    )));
                }
                let key = item_key(&e)?;
                let value = read_item(reader)?;
                on_item(key, value)?;
            }
            Event::End(_) => return Ok(()),
            Event::Text(e) if is_blank(&e) => {}
            Event::Text(_) | Event::CData(_) | Event::GeneralRef(_) => {
                return Err(XmlError::malformed(format!(
                    "text directly inside {container}"
                )));
            }
            Event::Eof => {
                return Err(XmlError::malformed(format!(
                    "unexpected EOF inside {container}"
                )));
            }
            _ => {}
        }
    }
}

/// The unescaped `key` attribute of an `item` start tag.
fn item_key(e: &BytesStart<'_>) -> Result<String, XmlError> {
    let attr = e
        .try_get_attribute("key")
        .map_err(XmlError::malformed)?
        .ok_or_else(|| XmlError::malformed("item without a key attribute"))?;
    let raw = std::str::from_utf8(&attr.value).map_err(XmlError::malformed)?;
    let unescaped = quick_xml::escape::unescape(raw).map_err(XmlError::malformed)?;
    Ok(unescaped.into_owned())
}

/// Read the content of an `item` through its end tag: either text, or
/// exactly one container surrounded by optional whitespace.
fn read_item(reader: &mut Reader<&[u8]>) -> Result<WireValue, XmlError> {
    let mut text = String::new();
    let mut container = None;

    loop {
        match next_event(reader)? {
            Event::Text(e) => text.push_str(&decode_text(&e)?),
            Event::CData(e) => {
                let raw = std::str::from_utf8(&e).map_err(XmlError::malformed)?;
                text.push_str(raw);
            }
            Event::GeneralRef(e) => text.push_str(&resolve_reference(&e)?),
            Event::Start(e) => {
                if container.is_some() {
                    return Err(XmlError::malformed("item holds more than one container"));
                }
                container = Some(read_container(reader, &e)?);
            }
            Event::End(_) => break,
            Event::Eof => return Err(XmlError::malformed("unexpected EOF inside item")),
            _ => {}
        }
    }

    match container {
        Some(_) if !text.trim().is_empty() => {
            Err(XmlError::malformed("item mixes text with a container"))
        }
        Some(value) => Ok(value),
        None => Ok(WireValue::Scalar(text)),
    }
}

fn decode_text(e: &BytesText<'_>) -> Result<String, XmlError> {
    let decoded = e.decode().map_err(XmlError::malformed)?;
    let unescaped = quick_xml::escape::unescape(&decoded).map_err(XmlError::malformed)?;
    Ok(unescaped.into_owned())
}

/// Resolve `&#NN;`, `&#xNN;` and the five predefined entities.
fn resolve_reference(e: &BytesRef<'_>) -> Result<String, XmlError> {
    if let Some(ch) = e.resolve_char_ref().map_err(XmlError::malformed)? {
        return Ok(ch.to_string());
    }
    let name = e.decode().map_err(XmlError::malformed)?;
    quick_xml::escape::resolve_predefined_entity(&name)
        .map(str::to_owned)
        .ok_or_else(|| XmlError::malformed(format!("unknown entity &{name};")))
}

/// Skip over an element and all its children.
pub(crate) fn skip_element(reader: &mut Reader<&[u8]>) -> Result<(), XmlError> {
    let mut depth: u32 = 1;
    loop {
        match next_event(reader)? {
            Event::Start(_) => depth += 1,
            Event::End(_) => {
                depth -= 1;
                if depth == 0 {
                    return Ok(());
                }
            }
            Event::Eof => {
                return Err(XmlError::malformed("unexpected EOF while skipping element"));
            }
            _ => {}
        }
    }
}

// ---------------------------------------------------------------------------
// Projection onto typed values
// ---------------------------------------------------------------------------

/// Trait for projecting a [`WireValue`] tree onto a typed value.
///
/// `path` is the dotted location of `value` inside the message, used in
/// error messages (e.g. `attributes.suggestion.items.3.status`).
pub trait FromWire: Sized {
    /// Build `Self` from a wire node.
    ///
    /// # Errors
    ///
    /// Returns `XmlError` if the node has the wrong shape or a leaf cannot
    /// be parsed.
    fn from_wire(value: &WireValue, path: &str) -> Result<Self, XmlError>;
}

/// Parse an OPS boolean literal: `1` is true, `0` is false, anything else
/// (including an empty string) is rejected.
///
/// # Errors
///
/// Returns [`XmlError::InvalidBooleanLiteral`] for any other text.
pub fn parse_bool_literal(text: &str, field: &str) -> Result<bool, XmlError> {
    match text {
        "1" => Ok(true),
        "0" => Ok(false),
        _ => Err(XmlError::InvalidBooleanLiteral {
            field: field.to_owned(),
            value: text.to_owned(),
        }),
    }
}

fn join_path(path: &str, key: &str) -> String {
    if path.is_empty() {
        key.to_owned()
    } else {
        format!("{path}.{key}")
    }
}

fn unexpected(value: &WireValue, path: &str, expected: &'static str) -> XmlError {
    XmlError::UnexpectedShape {
        field: path.to_owned(),
        expected,
        found: value.kind(),
    }
}

/// Keyed access to the children of an assoc node.
///
/// A blank scalar is accepted as an assoc without children, since servers
/// write an empty block as `<item key="x"></item>` as often as with an
/// explicit `<dt_assoc/>`.
#[derive(Debug, Clone, Copy)]
pub struct Fields<'a> {
    assoc: Option<&'a Assoc>,
    path: &'a str,
}

impl<'a> Fields<'a> {
    /// View `value` as a keyed container.
    ///
    /// # Errors
    ///
    /// Returns [`XmlError::UnexpectedShape`] if `value` is an array or a
    /// non-blank scalar.
    pub fn of(value: &'a WireValue, path: &'a str) -> Result<Self, XmlError> {
        match value {
            WireValue::Assoc(assoc) => Ok(Self {
                assoc: Some(assoc),
                path,
            }),
            WireValue::Scalar(_) if value.is_empty() => Ok(Self { assoc: None, path }),
            _ => Err(unexpected(value, path, "dt_assoc")),
        }
    }

    /// The raw child under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&'a WireValue> {
        self.assoc.and_then(|assoc| assoc.get(key))
    }

    /// Project the child under `key`, or `None` if it is absent.
    pub fn optional<T: FromWire>(&self, key: &str) -> Result<Option<T>, XmlError> {
        self.get(key)
            .map(|value| T::from_wire(value, &join_path(self.path, key)))
            .transpose()
    }

    /// Project the child under `key`, failing if it is absent.
    pub fn required<T: FromWire>(&self, key: &str) -> Result<T, XmlError> {
        self.optional(key)?
            .ok_or_else(|| XmlError::MissingField(join_path(self.path, key)))
    }

    /// Project the child under `key`, or `T::default()` if it is absent.
    pub fn or_default<T: FromWire + Default>(&self, key: &str) -> Result<T, XmlError> {
        Ok(self.optional(key)?.unwrap_or_default())
    }
}

impl FromWire for WireValue {
    fn from_wire(value: &WireValue, _path: &str) -> Result<Self, XmlError> {
        Ok(value.clone())
    }
}

impl FromWire for String {
    fn from_wire(value: &WireValue, path: &str) -> Result<Self, XmlError> {
        value
            .as_scalar()
            .map(str::to_owned)
            .ok_or_else(|| unexpected(value, path, "scalar"))
    }
}

impl FromWire for bool {
    fn from_wire(value: &WireValue, path: &str) -> Result<Self, XmlError> {
        let text = value
            .as_scalar()
            .ok_or_else(|| unexpected(value, path, "scalar"))?;
        parse_bool_literal(text, path)
    }
}

/// A sequence accepts a `dt_array`, a `dt_assoc` keyed `0..n`, or an empty
/// node.
impl<T: FromWire> FromWire for Vec<T> {
    fn from_wire(value: &WireValue, path: &str) -> Result<Self, XmlError> {
        let elements: Vec<&WireValue> = if let Some(items) = value.as_array() {
            items.iter().collect()
        } else if let Some(assoc) = value.as_assoc() {
            assoc
                .as_sequence()
                .ok_or_else(|| unexpected(value, path, "dt_array"))?
        } else if value.is_empty() {
            Vec::new()
        } else {
            return Err(unexpected(value, path, "dt_array"));
        };

        elements
            .into_iter()
            .enumerate()
            .map(|(index, element)| T::from_wire(element, &join_path(path, &index.to_string())))
            .collect()
    }
}

/// A mapping accepts a `dt_assoc`, a `dt_array` (keyed by index), or an
/// empty node.
impl<T: FromWire> FromWire for IndexMap<String, T> {
    fn from_wire(value: &WireValue, path: &str) -> Result<Self, XmlError> {
        match value {
            WireValue::Assoc(assoc) => assoc
                .iter()
                .map(|(key, child)| -> Result<(String, T), XmlError> {
                    Ok((key.to_owned(), T::from_wire(child, &join_path(path, key))?))
                })
                .collect(),
            WireValue::Array(items) => items
                .iter()
                .enumerate()
                .map(|(index, child)| -> Result<(String, T), XmlError> {
                    let key = index.to_string();
                    let projected = T::from_wire(child, &join_path(path, &key))?;
                    Ok((key, projected))
                })
                .collect(),
            WireValue::Scalar(_) if value.is_empty() => Ok(IndexMap::new()),
            WireValue::Scalar(_) => Err(unexpected(value, path, "dt_assoc")),
        }
    }
}

impl FromWire for Assoc {
    fn from_wire(value: &WireValue, path: &str) -> Result<Self, XmlError> {
        let map: IndexMap<String, WireValue> = IndexMap::from_wire(value, path)?;
        Ok(map.into_iter().collect())
    }
}

// ---------------------------------------------------------------------------
// FromWire for envelopes
// ---------------------------------------------------------------------------

impl FromWire for BaseRequest {
    fn from_wire(value: &WireValue, path: &str) -> Result<Self, XmlError> {
        let fields = Fields::of(value, path)?;
        Ok(Self {
            protocol: fields.required("protocol")?,
            object: fields.required("object")?,
            action: fields.required("action")?,
        })
    }
}

impl<A: FromWire> FromWire for OpsRequest<A> {
    fn from_wire(value: &WireValue, path: &str) -> Result<Self, XmlError> {
        let fields = Fields::of(value, path)?;
        Ok(Self {
            base: BaseRequest::from_wire(value, path)?,
            attributes: fields.required("attributes")?,
        })
    }
}

impl FromWire for BaseResponse {
    fn from_wire(value: &WireValue, path: &str) -> Result<Self, XmlError> {
        let fields = Fields::of(value, path)?;
        Ok(Self {
            action: fields.or_default("action")?,
            object: fields.or_default("object")?,
            protocol: fields.or_default("protocol")?,
            is_success: fields.or_default("is_success")?,
            response_code: fields.or_default("response_code")?,
            response_text: fields.or_default("response_text")?,
        })
    }
}

impl<A: FromWire> FromWire for OpsResponse<A> {
    fn from_wire(value: &WireValue, path: &str) -> Result<Self, XmlError> {
        let fields = Fields::of(value, path)?;
        Ok(Self {
            base: BaseResponse::from_wire(value, path)?,
            attributes: fields.required("attributes")?,
        })
    }
}

// ---------------------------------------------------------------------------
// FromWire for LOOKUP
// ---------------------------------------------------------------------------

impl FromWire for LookupRequest {
    fn from_wire(value: &WireValue, path: &str) -> Result<Self, XmlError> {
        let fields = Fields::of(value, path)?;
        Ok(Self {
            domain: fields.required("domain")?,
            no_cache: fields.or_default("no_cache")?,
        })
    }
}

impl FromWire for LookupResponse {
    fn from_wire(value: &WireValue, path: &str) -> Result<Self, XmlError> {
        let fields = Fields::of(value, path)?;
        Ok(Self {
            status: fields.required("status")?,
            reason: fields.optional("reason")?,
            price_status: fields.optional("price_status")?,
            has_claim: fields.or_default("has_claim")?,
            email_available: fields.or_default("email_available")?,
            no_service: fields.or_default("noservice")?,
        })
    }
}

// ---------------------------------------------------------------------------
// FromWire for NAME_SUGGEST
// ---------------------------------------------------------------------------

impl FromWire for NameSuggestRequest {
    fn from_wire(value: &WireValue, path: &str) -> Result<Self, XmlError> {
        let fields = Fields::of(value, path)?;
        Ok(Self {
            languages: fields.or_default("languages")?,
            max_wait_time: fields.optional("max_wait_time")?,
            search_key: fields.optional("search_key")?,
            search_string: fields.optional("searchstring")?,
            service_override: fields.optional("service_override")?,
            services: fields.or_default("services")?,
            skip_registry_lookup: fields.or_default("skip_registry_lookup")?,
            tlds: fields.or_default("tlds")?,
        })
    }
}

impl FromWire for ServiceOverride {
    fn from_wire(value: &WireValue, path: &str) -> Result<Self, XmlError> {
        let fields = Fields::of(value, path)?;
        Ok(Self {
            lookup: fields.optional("lookup")?,
            personal_names: fields.or_default("personal_names")?,
            premium: fields.optional("premium")?,
            suggestion: fields.optional("suggestion")?,
        })
    }
}

impl FromWire for ServiceLimits {
    fn from_wire(value: &WireValue, path: &str) -> Result<Self, XmlError> {
        let fields = Fields::of(value, path)?;
        Ok(Self {
            maximum: fields.optional("maximum")?,
            price_max: fields.optional("price_max")?,
            price_min: fields.optional("price_min")?,
            tlds: fields.or_default("tlds")?,
        })
    }
}

impl FromWire for LookupOverride {
    fn from_wire(value: &WireValue, path: &str) -> Result<Self, XmlError> {
        let fields = Fields::of(value, path)?;
        Ok(Self {
            maximum: fields.optional("maximum")?,
            price_max: fields.optional("price_max")?,
            price_min: fields.optional("price_min")?,
            tlds: fields.or_default("tlds")?,
            no_cache_tlds: fields.or_default("no_cache_tlds")?,
        })
    }
}

impl FromWire for NameSuggestResponse {
    fn from_wire(value: &WireValue, path: &str) -> Result<Self, XmlError> {
        let fields = Fields::of(value, path)?;
        Ok(Self {
            lookup: fields.optional("lookup")?,
            personal_names: fields.optional("personal_names")?,
            premium: fields.optional("premium")?,
            premium_brokered_transfer: fields.optional("premium_brokered_transfer")?,
            premium_make_offer: fields.optional("premium_make_offer")?,
            suggestion: fields.optional("suggestion")?,
            search_key: fields.optional("search_key")?,
            is_search_complete: fields.or_default("is_search_complete")?,
        })
    }
}

impl FromWire for NameSuggestItems {
    fn from_wire(value: &WireValue, path: &str) -> Result<Self, XmlError> {
        let fields = Fields::of(value, path)?;
        Ok(Self {
            count: fields.or_default("count")?,
            response_code: fields.or_default("response_code")?,
            response_text: fields.or_default("response_text")?,
            is_success: fields.or_default("is_success")?,
            items: fields.or_default("items")?,
        })
    }
}

impl FromWire for NameSuggestItem {
    fn from_wire(value: &WireValue, path: &str) -> Result<Self, XmlError> {
        let fields = Fields::of(value, path)?;
        Ok(Self {
            domain: fields.or_default("domain")?,
            status: fields.or_default("status")?,
            price: fields.optional("price")?,
            has_claim: fields.or_default("has_claim")?,
            reason: fields.optional("reason")?,
            third_party_offer_url: fields.optional("third_party_offer_url")?,
        })
    }
}
