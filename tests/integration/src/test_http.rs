//! Signing `http::Request`s and verifying them as a receiving server would.

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use bytes::Bytes;
    use http::header::{AUTHORIZATION, CONTENT_TYPE, HOST};
    use http::{Request, Uri};
    use lcp_auth::AuthError;
    use lcp_http::{MacAuth, RequestPreparer, verify_request};

    use crate::{NOW, deterministic_signer, signer_at, verifier};

    const BASE_URL: &str = "https://lcp.example.com/v1/";

    /// Rewrite a client-side request into what a server sees: an origin-form
    /// URI and a `Host` header.
    fn as_received(request: Request<Bytes>) -> Result<(http::request::Parts, Bytes)> {
        let (mut parts, body) = request.into_parts();
        let authority = parts
            .uri
            .authority()
            .ok_or_else(|| anyhow::anyhow!("request URI has no authority"))?
            .to_string();
        let path = parts
            .uri
            .path_and_query()
            .map_or_else(|| "/".to_owned(), ToString::to_string);
        parts.headers.insert(HOST, authority.parse()?);
        parts.uri = path.parse::<Uri>()?;
        Ok((parts, body))
    }

    fn preparer() -> RequestPreparer {
        RequestPreparer::new(
            Some(BASE_URL.to_owned()),
            Some(MacAuth::new(signer_at(NOW))),
        )
    }

    #[test]
    fn test_should_verify_prepared_post_request() -> Result<()> {
        let mut request = Request::post("/orders/")
            .body(Bytes::from_static(br#"{"amount":250}"#))?;
        preparer().prepare(&mut request)?;
        assert_eq!(request.headers()[CONTENT_TYPE], "application/json");

        let (parts, body) = as_received(request)?;
        let verified = verify_request(&parts, &body, &verifier(), "https")?;
        assert_eq!(verified.key_id, crate::KEY_ID);
        assert_eq!(verified.timestamp, NOW);
        Ok(())
    }

    #[test]
    fn test_should_verify_prepared_get_request_with_query() -> Result<()> {
        let mut request = Request::get("/orders/?status=pending&limit=5").body(Bytes::new())?;
        preparer().prepare(&mut request)?;
        assert_eq!(
            request.uri().to_string(),
            "https://lcp.example.com/v1/orders/?status=pending&limit=5"
        );
        assert_eq!(request.headers()[CONTENT_TYPE], "");

        let (parts, body) = as_received(request)?;
        verify_request(&parts, &body, &verifier(), "https")?;
        Ok(())
    }

    #[test]
    fn test_should_verify_absolute_form_request() -> Result<()> {
        let mut request = Request::put("http://lcp.example.com:8080/v1/members/1/")
            .header(CONTENT_TYPE, "application/json")
            .body(Bytes::from_static(b"{}"))?;
        MacAuth::new(deterministic_signer(NOW, "AAECAwQFBgc=")).apply(&mut request)?;

        let (parts, body) = request.into_parts();
        let verified = verify_request(&parts, &body, &verifier(), "https")?;
        assert_eq!(verified.nonce, "AAECAwQFBgc=");
        Ok(())
    }

    #[test]
    fn test_should_reject_body_changed_in_transit() -> Result<()> {
        let mut request = Request::post("/orders/")
            .body(Bytes::from_static(br#"{"amount":250}"#))?;
        preparer().prepare(&mut request)?;

        let (parts, _) = as_received(request)?;
        assert_eq!(
            verify_request(&parts, br#"{"amount":25000}"#, &verifier(), "https"),
            Err(AuthError::InvalidSignature)
        );
        Ok(())
    }

    #[test]
    fn test_should_reject_request_routed_to_other_host() -> Result<()> {
        let mut request = Request::get("/orders/").body(Bytes::new())?;
        preparer().prepare(&mut request)?;

        let (mut parts, body) = as_received(request)?;
        parts.headers.insert(HOST, "evil.example.com".parse()?);
        assert_eq!(
            verify_request(&parts, &body, &verifier(), "https"),
            Err(AuthError::InvalidSignature)
        );
        Ok(())
    }

    #[test]
    fn test_should_reject_anonymous_request() -> Result<()> {
        let anonymous = RequestPreparer::new(Some(BASE_URL.to_owned()), None);
        let mut request = Request::get("/orders/").body(Bytes::new())?;
        anonymous.prepare(&mut request)?;
        assert!(request.headers().get(AUTHORIZATION).is_none());

        let (parts, body) = as_received(request)?;
        assert_eq!(
            verify_request(&parts, &body, &verifier(), "https"),
            Err(AuthError::InvalidAuthHeader)
        );
        Ok(())
    }
}
