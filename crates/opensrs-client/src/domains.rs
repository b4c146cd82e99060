//! Operations on the `DOMAIN` object.

use opensrs_model::{
    LookupRequest, LookupResponse, NameSuggestRequest, NameSuggestResponse, OpsRequest,
    OpsResponse,
};

use crate::client::OpsClient;
use crate::error::OpsResult;

/// `DOMAIN` actions, borrowed from an [`OpsClient`] via
/// [`OpsClient::domains`].
#[derive(Debug, Clone, Copy)]
pub struct DomainsService<'a> {
    client: &'a OpsClient,
}

impl<'a> DomainsService<'a> {
    pub(crate) fn new(client: &'a OpsClient) -> Self {
        Self { client }
    }

    /// `LOOKUP`: check whether a single name can be registered.
    ///
    /// # Errors
    ///
    /// See [`OpsClient::execute`].
    pub async fn lookup(
        &self,
        request: LookupRequest,
    ) -> OpsResult<OpsResponse<LookupResponse>> {
        self.client.execute(&OpsRequest::new(request)).await
    }

    /// `NAME_SUGGEST`: lookups, suggestions and premium names across TLDs.
    ///
    /// # Errors
    ///
    /// See [`OpsClient::execute`].
    pub async fn name_suggest(
        &self,
        request: NameSuggestRequest,
    ) -> OpsResult<OpsResponse<NameSuggestResponse>> {
        self.client.execute(&OpsRequest::new(request)).await
    }

    /// Whether `domain` is available for registration.
    ///
    /// # Errors
    ///
    /// See [`OpsClient::execute`].
    pub async fn is_available(&self, domain: &str, no_cache: bool) -> OpsResult<bool> {
        let response = self
            .lookup(LookupRequest::new(domain).with_no_cache(no_cache))
            .await?;
        Ok(response.attributes.is_available())
    }
}
