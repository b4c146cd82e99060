//! `LOOKUP` integration tests.

#[cfg(test)]
mod tests {
    use http::Method;
    use opensrs_auth::sign;
    use opensrs_model::{LookupRequest, OpsRequest};
    use opensrs_xml::decode_request;

    use crate::{API_KEY, MockServer, Reply, USERNAME, fixtures};

    const LOOKUP_NO_CACHE: &str = concat!(
        "<?xml version='1.0' encoding='UTF-8' standalone='no' ?>",
        "<!DOCTYPE OPS_envelope SYSTEM 'ops.dtd'>",
        "<OPS_envelope><header><version>0.9</version></header><body><data_block>",
        "<dt_assoc><item key=\"protocol\">XCP</item><item key=\"object\">DOMAIN</item>",
        "<item key=\"action\">LOOKUP</item><item key=\"attributes\"><dt_assoc>",
        "<item key=\"domain\">example.com</item><item key=\"no_cache\">1</item>",
        "</dt_assoc></item></dt_assoc></data_block></body></OPS_envelope>",
    );

    #[tokio::test]
    async fn test_should_lookup_available_domain() {
        let server = MockServer::start(Reply::Xml(fixtures::LOOKUP_AVAILABLE.to_owned()))
            .await
            .expect("mock server");
        let client = server.client();

        let response = client
            .domains()
            .lookup(LookupRequest::new("example.com").with_no_cache(true))
            .await
            .expect("lookup");

        assert!(response.is_success());
        assert_eq!(response.base.response_code, "210");
        assert_eq!(response.base.response_text, "Domain available");
        assert_eq!(response.base.action, "REPLY");
        assert_eq!(response.attributes.status, "available");
        assert!(response.attributes.is_available());
        assert!(!response.attributes.has_claim);
    }

    #[tokio::test]
    async fn test_should_lookup_taken_domain() {
        let server = MockServer::start(Reply::Xml(fixtures::LOOKUP_TAKEN.to_owned()))
            .await
            .expect("mock server");

        let response = server
            .client()
            .domains()
            .lookup(LookupRequest::new("google.com"))
            .await
            .expect("lookup");

        assert_eq!(response.base.response_code, "211");
        assert_eq!(response.attributes.status, "taken");
        assert!(!response.attributes.is_available());
    }

    #[tokio::test]
    async fn test_should_lookup_domain_with_claim() {
        let server = MockServer::start(Reply::Xml(fixtures::LOOKUP_CLAIM.to_owned()))
            .await
            .expect("mock server");

        let response = server
            .client()
            .domains()
            .lookup(LookupRequest::new("example.guru"))
            .await
            .expect("lookup");

        assert!(response.attributes.has_claim);
        assert_eq!(response.attributes.status, "available");

        let sent = server.single_request();
        assert!(!sent.body_str().contains("no_cache"));
        let request: OpsRequest<LookupRequest> =
            decode_request(&sent.body).expect("decodable request");
        assert_eq!(request.attributes, LookupRequest::new("example.guru"));
    }

    #[tokio::test]
    async fn test_should_send_exact_signed_body() {
        let server = MockServer::start(Reply::Xml(fixtures::LOOKUP_AVAILABLE.to_owned()))
            .await
            .expect("mock server");
        let client = server.client();
        let request = OpsRequest::new(LookupRequest::new("example.com").with_no_cache(true));

        assert_eq!(
            client.build_request_body(&request).expect("encodable"),
            LOOKUP_NO_CACHE
        );

        client.execute(&request).await.expect("lookup");

        let sent = server.single_request();
        assert_eq!(sent.method, Method::POST);
        assert_eq!(sent.body_str(), LOOKUP_NO_CACHE);
        assert!(sent.signature_valid);
        assert_eq!(sent.header("content-type"), Some("text/xml"));
        assert_eq!(sent.header("x-username"), Some(USERNAME));
        let expected_signature = sign(LOOKUP_NO_CACHE.as_bytes(), API_KEY);
        assert_eq!(sent.header("x-signature"), Some(expected_signature.as_str()));
    }

    #[tokio::test]
    async fn test_should_report_availability() {
        let available = MockServer::start(Reply::Xml(fixtures::LOOKUP_AVAILABLE.to_owned()))
            .await
            .expect("mock server");
        let taken = MockServer::start(Reply::Xml(fixtures::LOOKUP_TAKEN.to_owned()))
            .await
            .expect("mock server");

        assert!(
            available
                .client()
                .domains()
                .is_available("example.com", false)
                .await
                .expect("lookup")
        );
        assert!(
            !taken
                .client()
                .domains()
                .is_available("google.com", true)
                .await
                .expect("lookup")
        );

        let sent = taken.single_request();
        assert!(sent.body_str().contains("<item key=\"no_cache\">1</item>"));
    }

    #[tokio::test]
    async fn test_should_share_connections_across_clones() {
        let server = MockServer::start(Reply::Xml(fixtures::LOOKUP_AVAILABLE.to_owned()))
            .await
            .expect("mock server");
        let client = server.client();

        let handles: Vec<_> = ["a.com", "b.com", "c.com"]
            .into_iter()
            .map(|domain| {
                let client = client.clone();
                tokio::spawn(async move { client.domains().is_available(domain, false).await })
            })
            .collect();
        for handle in handles {
            assert!(handle.await.expect("join").expect("lookup"));
        }

        let requests = server.requests();
        assert_eq!(requests.len(), 3);
        assert!(requests.iter().all(|r| r.signature_valid));
    }
}
