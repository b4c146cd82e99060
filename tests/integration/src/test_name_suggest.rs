//! `NAME_SUGGEST` integration tests.
//!
//! Each example builds a request, sends it through the mock server and
//! compares what arrived with a request captured from the OpenSRS
//! documentation. The comparison is made on decoded requests, so key order
//! and the exact preamble do not matter.

#[cfg(test)]
mod tests {
    use opensrs_model::{
        BaseResponse, LookupOverride, NameSuggestItem, NameSuggestItems, NameSuggestRequest,
        NameSuggestResponse, OpsRequest, OpsResponse, ServiceLimits, ServiceOverride,
    };
    use opensrs_xml::{decode_request, response_to_xml};

    use crate::{MockServer, Reply, fixtures};

    const EXAMPLE1: &str = include_str!("../fixtures/domain.namesuggest.example1.request.xml");
    const EXAMPLE2: &str = include_str!("../fixtures/domain.namesuggest.example2.request.xml");
    const EXAMPLE3: &str = include_str!("../fixtures/domain.namesuggest.example3.request.xml");
    const EXAMPLE4: &str = include_str!("../fixtures/domain.namesuggest.example4.request.xml");
    const EXAMPLE5: &str = include_str!("../fixtures/domain.namesuggest.example5.request.xml");
    const EXAMPLE6: &str = include_str!("../fixtures/domain.namesuggest.example6.request.xml");
    const EXAMPLE7: &str = include_str!("../fixtures/domain.namesuggest.example7.request.xml");
    const EXAMPLE8: &str = include_str!("../fixtures/domain.namesuggest.example8.request.xml");
    const EXAMPLE9: &str = include_str!("../fixtures/domain.namesuggest.example9.request.xml");
    const EXAMPLE10: &str = include_str!("../fixtures/domain.namesuggest.example10.request.xml");

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| (*v).to_owned()).collect()
    }

    fn limits(maximum: Option<&str>, tlds: &[&str]) -> ServiceLimits {
        ServiceLimits {
            maximum: maximum.map(str::to_owned),
            tlds: strings(tlds),
            ..ServiceLimits::default()
        }
    }

    /// Every override block present and empty.
    fn empty_overrides() -> ServiceOverride {
        ServiceOverride {
            lookup: Some(LookupOverride::default()),
            premium: Some(ServiceLimits::default()),
            suggestion: Some(ServiceLimits::default()),
            ..ServiceOverride::default()
        }
    }

    fn success_reply(attributes: NameSuggestResponse) -> Reply {
        let response = OpsResponse {
            base: BaseResponse {
                action: "REPLY".to_owned(),
                object: "DOMAIN".to_owned(),
                protocol: "XCP".to_owned(),
                is_success: true,
                response_code: "200".to_owned(),
                response_text: "Command completed successfully".to_owned(),
            },
            attributes,
        };
        let xml = response_to_xml(&response).expect("encodable reply");
        Reply::Xml(String::from_utf8(xml).expect("utf-8 reply"))
    }

    fn service(count: &str, items: Vec<NameSuggestItem>) -> NameSuggestItems {
        NameSuggestItems {
            count: count.to_owned(),
            response_code: "200".to_owned(),
            response_text: "Command completed successfully.".to_owned(),
            is_success: true,
            items,
        }
    }

    fn item(domain: &str, status: &str) -> NameSuggestItem {
        NameSuggestItem {
            domain: domain.to_owned(),
            status: status.to_owned(),
            ..NameSuggestItem::default()
        }
    }

    /// Send `request`, check the server received the same request as
    /// `expected`, and return the decoded reply.
    async fn exchange(
        request: NameSuggestRequest,
        expected: &str,
        reply: Reply,
    ) -> OpsResponse<NameSuggestResponse> {
        let server = MockServer::start(reply).await.expect("mock server");
        let response = server
            .client()
            .domains()
            .name_suggest(request.clone())
            .await
            .expect("name suggest");

        let sent = server.single_request();
        assert!(sent.signature_valid);
        let got: OpsRequest<NameSuggestRequest> =
            decode_request(&sent.body).expect("decodable sent request");
        let want: OpsRequest<NameSuggestRequest> =
            decode_request(expected.as_bytes()).expect("decodable expected request");

        assert_eq!(got, want);
        assert_eq!(got, OpsRequest::new(request));
        response
    }

    #[tokio::test]
    async fn test_should_run_example1_across_all_services() {
        let request = NameSuggestRequest {
            languages: strings(&["en", "de", "it", "es"]),
            search_string: Some("search string".to_owned()),
            services: strings(&["lookup", "suggestion", "premium", "personal_names"]),
            tlds: strings(&[".com", ".net", ".org"]),
            ..NameSuggestRequest::default()
        };
        let server = MockServer::start(Reply::Xml(fixtures::NAME_SUGGEST_EXAMPLE1.to_owned()))
            .await
            .expect("mock server");
        let response = server
            .client()
            .domains()
            .name_suggest(request.clone())
            .await
            .expect("name suggest");

        let body = server.single_request().body_str().to_owned();
        let positions: Vec<usize> = ["languages", "searchstring", "services", "tlds"]
            .iter()
            .map(|key| {
                body.find(&format!("<item key=\"{key}\">"))
                    .unwrap_or_else(|| panic!("{key} missing from request"))
            })
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]), "keys out of order");
        assert!(!body.contains("service_override"));

        let got: OpsRequest<NameSuggestRequest> =
            decode_request(body.as_bytes()).expect("decodable sent request");
        let want: OpsRequest<NameSuggestRequest> =
            decode_request(EXAMPLE1.as_bytes()).expect("decodable expected request");
        assert_eq!(got, want);

        assert!(response.is_success());
        let attributes = response.attributes;
        assert!(attributes.is_search_complete);

        let lookup = attributes.lookup.expect("lookup block");
        assert!(lookup.is_success);
        assert_eq!(lookup.count, "5");
        assert_eq!(lookup.items[0].status, "taken");
        assert_eq!(lookup.items[0].domain, "searchstring.com");
        assert_eq!(lookup.items.len(), 5);

        let premium = attributes.premium.expect("premium block");
        assert!(premium.is_success);
        assert_eq!(premium.count, "13");
        assert_eq!(premium.items[0].status, "available");
        assert_eq!(premium.items[0].domain, "searchstring.net");
        assert_eq!(premium.items[0].price.as_deref(), Some("5499"));
        assert_eq!(
            premium.items[2].third_party_offer_url.as_deref(),
            Some("https://example.com/offer?d=bestsearch.com&src=ns")
        );

        let suggestion = attributes.suggestion.expect("suggestion block");
        assert!(suggestion.is_success);
        assert_eq!(suggestion.count, "96");
        assert_eq!(suggestion.items[0].status, "available");
        assert_eq!(suggestion.items[0].domain, "bestsearchstring.com");

        let personal_names = attributes.personal_names.expect("personal names block");
        assert!(personal_names.is_success);
        assert_eq!(personal_names.count, "0");
        assert!(personal_names.items.is_empty());

        assert!(attributes.premium_make_offer.is_none());
    }

    #[tokio::test]
    async fn test_should_run_example2_with_lookup_and_suggestion_overrides() {
        let request = NameSuggestRequest {
            search_string: Some("example@search.com".to_owned()),
            services: strings(&["lookup", "suggestion"]),
            service_override: Some(ServiceOverride {
                suggestion: Some(limits(Some("25"), &[".com", ".org"])),
                lookup: Some(LookupOverride {
                    tlds: strings(&[".com", ".info"]),
                    no_cache_tlds: strings(&[".com"]),
                    ..LookupOverride::default()
                }),
                ..ServiceOverride::default()
            }),
            ..NameSuggestRequest::default()
        };

        let response = exchange(
            request,
            EXAMPLE2,
            success_reply(NameSuggestResponse {
                lookup: Some(service("8", vec![item("examplesearch.com", "taken")])),
                suggestion: Some(service("22", vec![item("examplefind.com", "available")])),
                is_search_complete: true,
                ..NameSuggestResponse::default()
            }),
        )
        .await;

        let lookup = response.attributes.lookup.expect("lookup block");
        assert_eq!(lookup.count, "8");
        assert_eq!(lookup.items[0].domain, "examplesearch.com");
        let suggestion = response.attributes.suggestion.expect("suggestion block");
        assert_eq!(suggestion.count, "22");
        assert_eq!(suggestion.items[0].domain, "examplefind.com");
        assert!(response.attributes.premium.is_none());
    }

    #[tokio::test]
    async fn test_should_run_example3_with_escaped_search_string() {
        let request = NameSuggestRequest {
            search_string: Some("abc&amp;d !".to_owned()),
            services: strings(&["premium"]),
            service_override: Some(ServiceOverride {
                lookup: Some(LookupOverride::default()),
                premium: Some(limits(None, &[".com", ".net"])),
                suggestion: Some(ServiceLimits::default()),
                ..ServiceOverride::default()
            }),
            ..NameSuggestRequest::default()
        };

        let mut premium_item = item("abc-and-d.com", "available");
        premium_item.price = Some("299.98".to_owned());
        let response = exchange(
            request,
            EXAMPLE3,
            success_reply(NameSuggestResponse {
                premium: Some(service("4", vec![premium_item])),
                ..NameSuggestResponse::default()
            }),
        )
        .await;

        let premium = response.attributes.premium.expect("premium block");
        assert!(premium.is_success);
        assert_eq!(premium.count, "4");
        assert_eq!(premium.items[0].status, "available");
        assert_eq!(premium.items[0].domain, "abc-and-d.com");
        assert_eq!(premium.items[0].price.as_deref(), Some("299.98"));
        assert!(!response.attributes.is_search_complete);
    }

    #[tokio::test]
    async fn test_should_run_example4_with_per_service_tlds() {
        let request = NameSuggestRequest {
            search_string: Some("abc&amp;d".to_owned()),
            services: strings(&["lookup", "suggestion", "premium"]),
            service_override: Some(ServiceOverride {
                lookup: Some(LookupOverride {
                    tlds: strings(&[".com"]),
                    ..LookupOverride::default()
                }),
                premium: Some(limits(None, &[".com"])),
                suggestion: Some(limits(Some("10"), &[".com"])),
                ..ServiceOverride::default()
            }),
            ..NameSuggestRequest::default()
        };

        let response = exchange(request, EXAMPLE4, success_reply(NameSuggestResponse::default())).await;
        assert!(response.is_success());
    }

    #[tokio::test]
    async fn test_should_run_example5_with_empty_premium_override() {
        let request = NameSuggestRequest {
            search_string: Some("smith".to_owned()),
            services: strings(&["lookup", "suggestion"]),
            service_override: Some(ServiceOverride {
                lookup: Some(LookupOverride {
                    tlds: strings(&[".com"]),
                    ..LookupOverride::default()
                }),
                premium: Some(ServiceLimits::default()),
                suggestion: Some(limits(Some("10"), &[".com"])),
                ..ServiceOverride::default()
            }),
            ..NameSuggestRequest::default()
        };

        exchange(request, EXAMPLE5, success_reply(NameSuggestResponse::default())).await;
    }

    #[tokio::test]
    async fn test_should_run_example6_with_max_wait_time() {
        let request = NameSuggestRequest {
            tlds: strings(&[".com", ".net", ".org", "in"]),
            languages: strings(&["en", "de", "it", "es"]),
            max_wait_time: Some("0.4".to_owned()),
            search_string: Some("search string".to_owned()),
            service_override: Some(empty_overrides()),
            services: strings(&["lookup", "suggestion", "premium", "personal_names"]),
            ..NameSuggestRequest::default()
        };

        let response = exchange(
            request,
            EXAMPLE6,
            success_reply(NameSuggestResponse {
                search_key: Some("vgL2FeBzZ8JuS5lIluIEYhDc7Vg".to_owned()),
                is_search_complete: false,
                ..NameSuggestResponse::default()
            }),
        )
        .await;

        assert!(!response.attributes.is_search_complete);
        assert_eq!(
            response.attributes.search_key.as_deref(),
            Some("vgL2FeBzZ8JuS5lIluIEYhDc7Vg")
        );
    }

    #[tokio::test]
    async fn test_should_run_example7_resuming_with_search_key() {
        let request = NameSuggestRequest {
            search_key: Some("vgL2FeBzZ8JuS5lIluIEYhDc7Vg".to_owned()),
            max_wait_time: Some("0.7".to_owned()),
            ..NameSuggestRequest::default()
        };

        let response = exchange(
            request,
            EXAMPLE7,
            success_reply(NameSuggestResponse {
                is_search_complete: true,
                ..NameSuggestResponse::default()
            }),
        )
        .await;
        assert!(response.attributes.is_search_complete);
    }

    #[tokio::test]
    async fn test_should_run_example8_with_premium_price_range() {
        let request = NameSuggestRequest {
            search_string: Some("computerstore".to_owned()),
            service_override: Some(ServiceOverride {
                lookup: Some(LookupOverride::default()),
                premium: Some(ServiceLimits {
                    maximum: Some("10".to_owned()),
                    price_max: Some("10000".to_owned()),
                    price_min: Some("100".to_owned()),
                    tlds: strings(&[".com", ".net"]),
                }),
                suggestion: Some(ServiceLimits::default()),
                ..ServiceOverride::default()
            }),
            services: strings(&["premium"]),
            ..NameSuggestRequest::default()
        };

        exchange(request, EXAMPLE8, success_reply(NameSuggestResponse::default())).await;
    }

    #[tokio::test]
    async fn test_should_run_example9_with_claim_on_lookup_item() {
        let request = NameSuggestRequest {
            services: strings(&["lookup"]),
            tlds: strings(&["guru"]),
            search_string: Some("example".to_owned()),
            service_override: Some(empty_overrides()),
            ..NameSuggestRequest::default()
        };

        let mut claimed = item("example.guru", "available");
        claimed.has_claim = true;
        let response = exchange(
            request,
            EXAMPLE9,
            success_reply(NameSuggestResponse {
                lookup: Some(service("1", vec![claimed])),
                is_search_complete: true,
                ..NameSuggestResponse::default()
            }),
        )
        .await;

        let lookup = response.attributes.lookup.expect("lookup block");
        assert!(lookup.is_success);
        assert_eq!(lookup.count, "1");
        assert_eq!(lookup.items[0].domain, "example.guru");
        assert_eq!(lookup.items[0].status, "available");
        assert!(lookup.items[0].has_claim);
    }

    #[tokio::test]
    async fn test_should_run_example10_with_brokered_services() {
        let request = NameSuggestRequest {
            search_string: Some("testdomain".to_owned()),
            service_override: Some(empty_overrides()),
            services: strings(&[
                "premium",
                "premium_make_offer",
                "premium_brokered_transfer",
                "lookup",
            ]),
            tlds: strings(&[".com", ".net", ".org", ".de"]),
            ..NameSuggestRequest::default()
        };

        let mut brokered = item("testdomain.de", "available");
        brokered.third_party_offer_url = Some("https://example.com/offer/testdomain.de".to_owned());
        let response = exchange(
            request,
            EXAMPLE10,
            success_reply(NameSuggestResponse {
                premium_brokered_transfer: Some(service("1", vec![brokered])),
                premium_make_offer: Some(service("0", Vec::new())),
                ..NameSuggestResponse::default()
            }),
        )
        .await;

        let brokered = response
            .attributes
            .premium_brokered_transfer
            .expect("brokered block");
        assert_eq!(
            brokered.items[0].third_party_offer_url.as_deref(),
            Some("https://example.com/offer/testdomain.de")
        );
        let make_offer = response.attributes.premium_make_offer.expect("make offer block");
        assert_eq!(make_offer.count, "0");
        assert!(make_offer.items.is_empty());
    }
}
