//! Request/response debug logs and verifier events as seen by a subscriber.

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use bytes::Bytes;
    use http::{Request, Response, StatusCode};
    use lcp_auth::RequestFacts;
    use lcp_http::{MacAuth, RequestPreparer, log_response};

    use crate::{NOW, capture_logs, signer_at, verifier};

    #[test]
    fn test_should_log_signed_request_without_secrets() -> Result<()> {
        let preparer = RequestPreparer::new(
            Some("https://lcp.example.com/v1/".to_owned()),
            Some(MacAuth::new(signer_at(NOW))),
        );
        let mut request = Request::post("/orders/").body(Bytes::from_static(
            br#"{"billingInfo":{"cardNumber":"4111111111111111","securityCode":"737"},"password":"pw"}"#,
        ))?;

        let mut outcome = Ok(());
        let logs = capture_logs(|| outcome = preparer.prepare(&mut request));
        outcome?;

        let logs = logs.contents();
        assert!(logs.contains("POST https://lcp.example.com/v1/orders/ HTTP/1.1"));
        assert!(logs.contains("authorization: <redacted>"));
        assert!(logs.contains("XXXXXXXXXXXX1111"));
        assert!(!logs.contains("4111111111111111"));
        assert!(logs.contains("\"securityCode\": \"XXX\""));
        assert!(!logs.contains("\"737\""));
        assert!(!logs.contains("\"pw\""));
        assert!(!logs.contains("MAC id="));
        Ok(())
    }

    #[test]
    fn test_should_log_response_as_pretty_json() {
        let response = Response::builder()
            .status(StatusCode::OK)
            .body(Bytes::from_static(br#"{"status":"ok","id":7}"#))
            .expect("valid response");

        let logs = capture_logs(|| log_response(&response)).contents();
        assert!(logs.contains("HTTP/1.1 200 OK"));
        assert!(logs.contains("\"id\": 7,\n  \"status\": \"ok\""));
    }

    #[test]
    fn test_should_emit_verifier_warning_for_stale_request() -> Result<()> {
        let url = "https://lcp.example.com/v1/orders/";
        let header = signer_at(NOW - 120).authorization_header("GET", url, None, None)?;
        let facts = RequestFacts::from_url("GET", url, None, None)?;
        let verifier = verifier();

        let logs = capture_logs(|| {
            let _ = verifier.verify(Some(header.as_str()), &facts);
        })
        .contents();
        assert!(logs.contains("WARN"));
        assert!(logs.contains("Rejecting timestamp in the past"));
        assert!(logs.contains("age=120"));
        Ok(())
    }
}
