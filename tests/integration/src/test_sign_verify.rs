//! Signer to verifier round trips on bare request facts.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use anyhow::Result;
    use lcp_auth::timestamp::FixedClock;
    use lcp_auth::{
        AuthError, AuthHeader, Credentials, KeyEncoding, MacConfig, RequestFacts, SharedSecret,
        Signer, StaticCredentialProvider, Verifier,
    };

    use crate::{NOW, deterministic_signer, signer_at, verifier};

    const URL: &str = "https://lcp.example.com/v1/orders/?limit=10&offset=0";

    #[test]
    fn test_should_verify_requests_for_every_method() -> Result<()> {
        let verifier = verifier();
        let body: &[u8] = br#"{"amount":100,"currency":"USD"}"#;

        for method in ["GET", "DELETE", "HEAD", "OPTIONS"] {
            let header = signer_at(NOW).authorization_header(method, URL, Some(""), None)?;
            let facts = RequestFacts::from_url(method, URL, Some(""), None)?;
            verifier.verify(Some(header.as_str()), &facts)?;
        }
        for method in ["PATCH", "POST", "PUT"] {
            let content_type = Some("application/json");
            let header =
                signer_at(NOW).authorization_header(method, URL, content_type, Some(body))?;
            let facts = RequestFacts::from_url(method, URL, content_type, Some(body))?;
            verifier.verify(Some(header.as_str()), &facts)?;
        }
        Ok(())
    }

    #[test]
    fn test_should_reproduce_known_header() -> Result<()> {
        let credentials = Credentials::new("KEY_ID", SharedSecret::from_bytes(b"SECRET".to_vec()));
        let signer = Signer::new(credentials)
            .with_clock(Arc::new(FixedClock(42)))
            .with_nonce_source(Arc::new(lcp_auth::nonce::FixedNonce::new("NONCE")));
        let header = signer.authorization_header(
            "METHOD",
            "http://HOST:8008/PATH",
            Some("CONTENT_TYPE"),
            Some(b"BODY"),
        )?;
        assert_eq!(
            header,
            r#"MAC id="KEY_ID", ts="42", nonce="NONCE", ext="151e57676f457b4aa3dbe0aa3f8df6366c310737", mac="4X6uJApeC7vwdoBBwKoWH5u1hi0=""#
        );
        Ok(())
    }

    #[test]
    fn test_should_reject_replay_outside_window() -> Result<()> {
        let header = deterministic_signer(NOW - 31, "AAAAAAAAAAA=")
            .authorization_header("GET", URL, None, None)?;
        let facts = RequestFacts::from_url("GET", URL, None, None)?;
        assert_eq!(
            verifier().verify(Some(header.as_str()), &facts),
            Err(AuthError::InvalidTimeStamp)
        );
        Ok(())
    }

    #[test]
    fn test_should_accept_replay_inside_window() -> Result<()> {
        let header = deterministic_signer(NOW - 30, "AAAAAAAAAAA=")
            .authorization_header("GET", URL, None, None)?;
        let facts = RequestFacts::from_url("GET", URL, None, None)?;
        let verifier = verifier();

        let first = verifier.verify(Some(header.as_str()), &facts)?;
        let second = verifier.verify(Some(header.as_str()), &facts)?;
        assert_eq!(first, second);
        assert_eq!(first.nonce, "AAAAAAAAAAA=");
        Ok(())
    }

    #[test]
    fn test_should_report_header_errors_before_timestamp_errors() -> Result<()> {
        let facts = RequestFacts::from_url("GET", URL, None, None)?;
        let header = r#"MAC id="integration-key", ts="1", nonce="n", mac="m""#;
        assert_eq!(
            verifier().verify(Some(header), &facts),
            Err(AuthError::InvalidAuthHeader)
        );
        Ok(())
    }

    #[test]
    fn test_should_report_timestamp_errors_before_signature_errors() -> Result<()> {
        let facts = RequestFacts::from_url("GET", URL, None, None)?;
        let header = AuthHeader::new("unknown", "1", "n", "", "bad").to_string();
        assert_eq!(
            verifier().verify(Some(header.as_str()), &facts),
            Err(AuthError::InvalidTimeStamp)
        );
        Ok(())
    }

    #[test]
    fn test_should_reject_header_signed_with_raw_secret_text() -> Result<()> {
        let raw = Credentials::from_encoded(
            crate::KEY_ID,
            crate::SHARED_SECRET,
            KeyEncoding::Raw,
        )?;
        let header = Signer::new(raw)
            .with_clock(Arc::new(FixedClock(NOW)))
            .authorization_header("GET", URL, None, None)?;
        let facts = RequestFacts::from_url("GET", URL, None, None)?;
        assert_eq!(
            verifier().verify(Some(header.as_str()), &facts),
            Err(AuthError::InvalidSignature)
        );
        Ok(())
    }

    #[test]
    fn test_should_reject_tampered_fields() -> Result<()> {
        let header = signer_at(NOW).sign("POST", URL, Some("application/json"), Some(b"{}"))?;
        let facts = RequestFacts::from_url("POST", URL, Some("application/json"), Some(b"{}"))?;
        let verifier = verifier();
        verifier.verify(Some(header.to_string().as_str()), &facts)?;

        let tampered = [
            AuthHeader {
                nonce: "ZZZZZZZZZZZ=".to_owned(),
                ..header.clone()
            },
            AuthHeader {
                ext: "0000000000000000000000000000000000000000".to_owned(),
                ..header.clone()
            },
            AuthHeader {
                ts: (NOW - 1).to_string(),
                ..header.clone()
            },
        ];
        for candidate in tampered {
            assert_eq!(
                verifier.verify(Some(candidate.to_string().as_str()), &facts),
                Err(AuthError::InvalidSignature),
                "accepted {candidate}"
            );
        }
        Ok(())
    }

    #[test]
    fn test_should_sign_and_verify_from_configuration() -> Result<()> {
        let config = MacConfig::from_lookup(|name| match name {
            "LCP_MAC_KEY_ID" => Some(crate::KEY_ID.to_owned()),
            "LCP_MAC_SHARED_SECRET" => Some(crate::SHARED_SECRET.to_owned()),
            "LCP_MAC_MAX_SKEW_SECONDS" => Some("5".to_owned()),
            "LOG_LEVEL" => Some("lcp_auth=debug".to_owned()),
            _ => None,
        })?;
        assert_eq!(
            crate::env_filter(&config).max_level_hint(),
            Some(tracing::level_filters::LevelFilter::DEBUG)
        );
        let credentials = config
            .credentials()?
            .ok_or_else(|| anyhow::anyhow!("credentials should be configured"))?;

        let verifier = Verifier::from_config(
            &config,
            Arc::new(StaticCredentialProvider::from(credentials.clone())),
        )
        .with_clock(Arc::new(FixedClock(NOW)));

        let facts = RequestFacts::from_url("GET", URL, None, None)?;
        let fresh = Signer::new(credentials.clone())
            .with_clock(Arc::new(FixedClock(NOW - 5)))
            .authorization_header("GET", URL, None, None)?;
        let stale = Signer::new(credentials)
            .with_clock(Arc::new(FixedClock(NOW - 6)))
            .authorization_header("GET", URL, None, None)?;

        assert!(verifier.verify(Some(fresh.as_str()), &facts).is_ok());
        assert_eq!(
            verifier.verify(Some(stale.as_str()), &facts),
            Err(AuthError::InvalidTimeStamp)
        );
        Ok(())
    }
}
