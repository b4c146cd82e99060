//! The `OPS_envelope` wrapper and typed encode/decode entry points.

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use opensrs_model::{BaseResponse, OpsAction, OpsRequest, OpsResponse};

use crate::deserialize::{
    FromWire, expect_end_of_document, is_blank, new_reader, next_event, read_container,
    skip_element,
};
use crate::error::XmlError;
use crate::serialize::{ToWire, envelope_to_xml, request_body};
use crate::value::{Assoc, WireValue};

/// A parsed `OPS_envelope`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    /// Text of `<header><version>`.
    pub version: String,
    /// The `dt_assoc` inside `<body><data_block>`. Always a
    /// [`WireValue::Assoc`].
    pub body: WireValue,
}

impl Envelope {
    /// Children of the top-level assoc.
    #[must_use]
    pub fn body(&self) -> Option<&Assoc> {
        self.body.as_assoc()
    }

    /// Project the body onto a typed value.
    pub fn decode<T: FromWire>(&self) -> Result<T, XmlError> {
        T::from_wire(&self.body, "")
    }
}

/// Serialize a request, including preamble and envelope. The returned bytes
/// are exactly what gets signed and sent.
///
/// # Errors
///
/// Returns `XmlError` if writing fails.
pub fn request_to_xml<A: ToWire>(request: &OpsRequest<A>) -> Result<Vec<u8>, XmlError> {
    envelope_to_xml(&request_body(request))
}

/// Serialize a reply, including preamble and envelope.
///
/// # Errors
///
/// Returns `XmlError` if writing fails.
pub fn response_to_xml<A: ToWire>(response: &OpsResponse<A>) -> Result<Vec<u8>, XmlError> {
    match response.to_wire() {
        WireValue::Assoc(body) => envelope_to_xml(&body),
        other => Err(XmlError::malformed(format!(
            "reply body must be a dt_assoc, got {}",
            other.kind()
        ))),
    }
}

/// Parse the outer envelope structure and the body tree.
///
/// Unknown elements next to `header` and `body` are skipped; a missing
/// `OPS_envelope`, `header`, `version`, `body`, `data_block` or top-level
/// `dt_assoc` is an error.
///
/// # Errors
///
/// Returns [`XmlError::MalformedEnvelope`] if the structure is wrong or the
/// XML is not well-formed.
pub fn parse_envelope(xml: &[u8]) -> Result<Envelope, XmlError> {
    let mut reader = new_reader(xml);

    loop {
        match next_event(&mut reader)? {
            Event::Start(e) if e.name().as_ref() == b"OPS_envelope" => break,
            Event::Start(e) => {
                return Err(XmlError::malformed(format!(
                    "expected <OPS_envelope>, found <{}>",
                    String::from_utf8_lossy(e.name().as_ref())
                )));
            }
            Event::Text(e) if is_blank(&e) => {}
            Event::Text(_) | Event::CData(_) | Event::GeneralRef(_) => {
                return Err(XmlError::malformed("text before <OPS_envelope>"));
            }
            Event::Eof => return Err(XmlError::malformed("missing <OPS_envelope>")),
            _ => {}
        }
    }

    let mut version = None;
    let mut body = None;
    read_children(&mut reader, "OPS_envelope", |reader, start| {
        match start.name().as_ref() {
            b"header" => version = Some(read_header(reader)?),
            b"body" => body = Some(read_body(reader)?),
            _ => skip_element(reader)?,
        }
        Ok(())
    })?;
    expect_end_of_document(&mut reader)?;

    let version = version.ok_or_else(|| XmlError::malformed("missing <header>"))?;
    let body = body.ok_or_else(|| XmlError::malformed("missing <body>"))?;

    tracing::trace!(%version, "parsed OPS envelope");
    Ok(Envelope { version, body })
}

/// Parse a request envelope and check that it carries the operation of `A`.
///
/// # Errors
///
/// Returns `XmlError` if the envelope is malformed, addresses a different
/// operation, or the attributes do not match `A`.
pub fn decode_request<A: OpsAction + FromWire>(xml: &[u8]) -> Result<OpsRequest<A>, XmlError> {
    let request: OpsRequest<A> = parse_envelope(xml)?.decode()?;
    let operation = A::OPERATION;
    if request.base.action != operation.action() || request.base.object != operation.object() {
        return Err(XmlError::malformed(format!(
            "expected {operation}, found {} {}",
            request.base.object, request.base.action
        )));
    }
    Ok(request)
}

/// Parse only the outcome fields of a reply. Works for failed replies,
/// which usually carry no `attributes`.
///
/// # Errors
///
/// Returns `XmlError` if the envelope is malformed or an outcome field is
/// invalid.
pub fn decode_base_response(xml: &[u8]) -> Result<BaseResponse, XmlError> {
    parse_envelope(xml)?.decode()
}

/// Parse a full reply with typed attributes.
///
/// # Errors
///
/// Returns `XmlError` if the envelope is malformed, `attributes` is
/// missing, or it does not match `A`.
pub fn decode_response<A: FromWire>(xml: &[u8]) -> Result<OpsResponse<A>, XmlError> {
    parse_envelope(xml)?.decode()
}

// ---------------------------------------------------------------------------
// Envelope structure
// ---------------------------------------------------------------------------

/// Hand each child element of `parent` to `on_child` until the parent's end
/// tag. `on_child` must consume the child through its own end tag.
fn read_children<F>(reader: &mut Reader<&[u8]>, parent: &str, mut on_child: F) -> Result<(), XmlError>
where
    F: FnMut(&mut Reader<&[u8]>, &BytesStart<'_>) -> Result<(), XmlError>,
{
    loop {
        match next_event(reader)? {
            Event::Start(e) => on_child(reader, &e)?,
            Event::End(_) => return Ok(()),
            Event::Text(e) if is_blank(&e) => {}
            Event::Text(_) | Event::CData(_) | Event::GeneralRef(_) => {
                return Err(XmlError::malformed(format!("text directly inside <{parent}>")));
            }
            Event::Eof => {
                return Err(XmlError::malformed(format!("unexpected EOF inside <{parent}>")));
            }
            _ => {}
        }
    }
}

fn read_header(reader: &mut Reader<&[u8]>) -> Result<String, XmlError> {
    let mut version = None;
    read_children(reader, "header", |reader, start| {
        if start.name().as_ref() == b"version" {
            version = Some(read_text(reader, "version")?);
        } else {
            skip_element(reader)?;
        }
        Ok(())
    })?;
    version.ok_or_else(|| XmlError::malformed("missing <version> in <header>"))
}

fn read_body(reader: &mut Reader<&[u8]>) -> Result<WireValue, XmlError> {
    let mut data = None;
    read_children(reader, "body", |reader, start| {
        if start.name().as_ref() == b"data_block" {
            data = Some(read_data_block(reader)?);
        } else {
            skip_element(reader)?;
        }
        Ok(())
    })?;
    data.ok_or_else(|| XmlError::malformed("missing <data_block> in <body>"))
}

fn read_data_block(reader: &mut Reader<&[u8]>) -> Result<WireValue, XmlError> {
    let mut root = None;
    read_children(reader, "data_block", |reader, start| {
        if root.is_some() {
            return Err(XmlError::malformed("more than one container in <data_block>"));
        }
        if start.name().as_ref() != b"dt_assoc" {
            return Err(XmlError::malformed(format!(
                "expected <dt_assoc> in <data_block>, found <{}>",
                String::from_utf8_lossy(start.name().as_ref())
            )));
        }
        root = Some(read_container(reader, start)?);
        Ok(())
    })?;
    root.ok_or_else(|| XmlError::malformed("missing <dt_assoc> in <data_block>"))
}

/// Text content of a leaf element such as `<version>`.
fn read_text(reader: &mut Reader<&[u8]>, tag: &str) -> Result<String, XmlError> {
    let mut text = String::new();
    loop {
        match next_event(reader)? {
            Event::Text(e) => {
                let decoded = e.decode().map_err(XmlError::malformed)?;
                text.push_str(decoded.trim());
            }
            Event::End(_) => return Ok(text),
            Event::Start(_) => {
                return Err(XmlError::malformed(format!("unexpected element inside <{tag}>")));
            }
            Event::Eof => {
                return Err(XmlError::malformed(format!("unexpected EOF inside <{tag}>")));
            }
            _ => {}
        }
    }
}
