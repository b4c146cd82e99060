//! The OpenSRS client: encode, sign, send, decode.

use std::fmt;
use std::sync::Arc;

use bytes::Bytes;
use http::Method;
use tracing::{debug, warn};

use opensrs_auth::{Credentials, signed_headers};
use opensrs_model::{BaseResponse, OpsAction, OpsRequest, OpsResponse};
use opensrs_xml::{FromWire, ToWire, XmlError, parse_envelope, request_to_xml};

use crate::config::ClientConfig;
use crate::domains::DomainsService;
use crate::error::{OpsError, OpsResult};
use crate::transport::{HttpTransport, Transport, TransportRequest};

/// Client for the OpenSRS XCP API.
///
/// Cheap to clone; clones share the transport and its connection pool.
#[derive(Clone)]
pub struct OpsClient {
    config: Arc<ClientConfig>,
    credentials: Credentials,
    transport: Arc<dyn Transport>,
}

impl fmt::Debug for OpsClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpsClient")
            .field("config", &self.config)
            .field("transport", &self.transport)
            .finish_non_exhaustive()
    }
}

impl OpsClient {
    /// Create a client that talks HTTP through reqwest.
    ///
    /// # Errors
    ///
    /// Returns [`OpsError::Config`] if the credentials are missing or the
    /// HTTP client cannot be built.
    pub fn new(config: ClientConfig) -> Result<Self, OpsError> {
        let transport = HttpTransport::new(&config)?;
        Self::with_transport(config, Arc::new(transport))
    }

    /// Create a client on top of a custom transport.
    ///
    /// # Errors
    ///
    /// Returns [`OpsError::Config`] if the credentials or the base URL are
    /// missing.
    pub fn with_transport(
        config: ClientConfig,
        transport: Arc<dyn Transport>,
    ) -> Result<Self, OpsError> {
        if config.username.is_empty() {
            return Err(OpsError::Config("username is required".to_owned()));
        }
        if config.api_key.is_empty() {
            return Err(OpsError::Config("api key is required".to_owned()));
        }
        if config.base_url.is_empty() {
            return Err(OpsError::Config("base url is required".to_owned()));
        }

        let credentials = Credentials::new(config.username.clone(), config.api_key.clone());
        Ok(Self {
            config: Arc::new(config),
            credentials,
            transport,
        })
    }

    /// The configuration this client was built with.
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Operations on the `DOMAIN` object.
    #[must_use]
    pub fn domains(&self) -> DomainsService<'_> {
        DomainsService::new(self)
    }

    /// The exact body that [`OpsClient::execute`] would sign and send for
    /// `request`.
    ///
    /// # Errors
    ///
    /// Returns [`OpsError::Codec`] if the request cannot be encoded.
    pub fn build_request_body<A: ToWire>(&self, request: &OpsRequest<A>) -> OpsResult<String> {
        let body = request_to_xml(request)?;
        String::from_utf8(body).map_err(|e| {
            OpsError::Codec(XmlError::MalformedEnvelope(format!(
                "encoded request is not UTF-8: {e}"
            )))
        })
    }

    /// Send a request and decode the typed reply.
    ///
    /// The signature is computed over the same buffer that is sent. A reply
    /// with `is_success = 0` becomes [`OpsError::Api`]; its attributes are
    /// not decoded.
    ///
    /// # Errors
    ///
    /// Returns an [`OpsError`] if encoding, the HTTP exchange or decoding
    /// fails, the status is not 2xx, or the server reports failure.
    pub async fn execute<A>(
        &self,
        request: &OpsRequest<A>,
    ) -> OpsResult<OpsResponse<A::Response>>
    where
        A: OpsAction + ToWire + Sync,
        A::Response: FromWire,
    {
        let body = Bytes::from(request_to_xml(request)?);
        let headers = signed_headers(&self.credentials, &body)?;

        debug!(
            url = %self.config.base_url,
            object = %request.base.object,
            action = %request.base.action,
            body_len = body.len(),
            body = %String::from_utf8_lossy(&body),
            "Sending OpenSRS request"
        );

        let response = self
            .transport
            .send(TransportRequest {
                method: Method::POST,
                url: self.config.base_url.clone(),
                headers,
                body,
            })
            .await?;

        debug!(
            status = %response.status,
            response_len = response.body.len(),
            action = %request.base.action,
            "Received OpenSRS response"
        );

        if !response.status.is_success() {
            warn!(
                status = %response.status,
                action = %request.base.action,
                "OpenSRS returned an unexpected HTTP status"
            );
            return Err(OpsError::UnexpectedStatus {
                status: response.status,
                body: String::from_utf8_lossy(&response.body).into_owned(),
            });
        }

        let envelope = parse_envelope(&response.body)?;
        let base: BaseResponse = envelope.decode()?;
        if !base.is_success {
            warn!(
                response_code = %base.response_code,
                response_text = %base.response_text,
                action = %request.base.action,
                "OpenSRS request failed"
            );
            return Err(OpsError::Api {
                response_code: base.response_code.clone(),
                response_text: base.response_text.clone(),
                response: base,
            });
        }

        Ok(envelope.decode()?)
    }
}
