//! Error handling integration tests.

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use http::StatusCode;
    use opensrs_client::{OpsError, TransportErrorKind};
    use opensrs_model::LookupRequest;

    use crate::{MockServer, Reply, fixtures};

    #[tokio::test]
    async fn test_should_return_api_error_on_failed_reply() {
        let server = MockServer::start(Reply::Xml(fixtures::AUTH_FAILURE.to_owned()))
            .await
            .expect("mock server");

        let err = server
            .client()
            .domains()
            .lookup(LookupRequest::new("example.com"))
            .await
            .expect_err("is_success is 0");

        assert!(err.is_api_error());
        match err {
            OpsError::Api {
                response_code,
                response_text,
                response,
            } => {
                assert_eq!(response_code, "415");
                assert_eq!(response_text, "Authentication Error.");
                assert!(!response.is_success);
                assert_eq!(response.action, "REPLY");
            }
            other => panic!("expected an API error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_should_return_unexpected_status_on_server_error() {
        let server = MockServer::start(Reply::Status(
            StatusCode::INTERNAL_SERVER_ERROR,
            "upstream unavailable".to_owned(),
        ))
        .await
        .expect("mock server");

        let err = server
            .client()
            .domains()
            .is_available("example.com", false)
            .await
            .expect_err("HTTP 500");

        match err {
            OpsError::UnexpectedStatus { status, body } => {
                assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
                assert_eq!(body, "upstream unavailable");
            }
            other => panic!("expected an unexpected status, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_should_return_codec_error_on_malformed_reply() {
        let server = MockServer::start(Reply::Xml("<html><body>maintenance</body></html>".to_owned()))
            .await
            .expect("mock server");

        let err = server
            .client()
            .domains()
            .lookup(LookupRequest::new("example.com"))
            .await
            .expect_err("not an OPS envelope");

        assert!(matches!(err, OpsError::Codec(_)), "got {err:?}");
        assert!(!err.is_api_error());
    }

    #[tokio::test]
    async fn test_should_return_codec_error_on_bad_boolean() {
        let reply = fixtures::LOOKUP_CLAIM.replace(
            "<item key=\"has_claim\">1</item>",
            "<item key=\"has_claim\">yes</item>",
        );
        let server = MockServer::start(Reply::Xml(reply)).await.expect("mock server");

        let err = server
            .client()
            .domains()
            .lookup(LookupRequest::new("example.guru"))
            .await
            .expect_err("invalid boolean literal");

        assert!(matches!(err, OpsError::Codec(_)), "got {err:?}");
        assert!(err.to_string().contains("yes"));
    }

    #[tokio::test]
    async fn test_should_time_out_on_slow_server() {
        let server = MockServer::start(Reply::Delayed(
            Duration::from_secs(5),
            fixtures::LOOKUP_AVAILABLE.to_owned(),
        ))
        .await
        .expect("mock server");

        let err = server
            .client_with_timeout(Duration::from_millis(200))
            .domains()
            .lookup(LookupRequest::new("example.com"))
            .await
            .expect_err("server is too slow");

        assert!(err.is_timeout(), "got {err:?}");
        assert!(matches!(
            err,
            OpsError::Transport {
                kind: TransportErrorKind::Timeout,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_should_reject_request_signed_with_wrong_key() {
        let server = MockServer::start(Reply::Xml(fixtures::LOOKUP_AVAILABLE.to_owned()))
            .await
            .expect("mock server");

        let err = server
            .client_with_key("not-the-key")
            .domains()
            .lookup(LookupRequest::new("example.com"))
            .await
            .expect_err("bad signature");

        assert!(matches!(
            err,
            OpsError::UnexpectedStatus { status, .. } if status == StatusCode::UNAUTHORIZED
        ));
        assert!(!server.single_request().signature_valid);
    }
}
