//! Receiving-side verification of `MAC` `Authorization` headers.
//!
//! Checks run in a fixed order and stop at the first failure:
//!
//! 1. header format ([`AuthError::InvalidAuthHeader`])
//! 2. timestamp freshness ([`AuthError::InvalidTimeStamp`])
//! 3. key lookup, payload digest and signature ([`AuthError::InvalidSignature`])
//!
//! A request whose key id is unknown is rejected as a signature failure so the
//! caller cannot probe which key ids exist.

use std::sync::Arc;

use crate::canonical::{RequestTarget, build_normalized_request_string};
use crate::config::MacConfig;
use crate::credentials::CredentialProvider;
use crate::error::{AuthError, SignError};
use crate::ext::generate_ext;
use crate::header::AuthHeader;
use crate::observe::{AuthObserver, TracingObserver};
use crate::signature::verify_signature;
use crate::timestamp::{
    Clock, SystemClock, TIMESTAMP_MAX_SECONDS, TimestampCheck, TimestampRejection,
    verify_timestamp,
};

/// The facts of a received request that take part in the signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestFacts<'a> {
    /// HTTP method as received.
    pub method: &'a str,
    /// Host, port and path the request was addressed to.
    pub target: RequestTarget,
    /// `Content-Type` header value, if any.
    pub content_type: Option<&'a str>,
    /// Request body, if any.
    pub body: Option<&'a [u8]>,
}

impl<'a> RequestFacts<'a> {
    /// Collect request facts from an already resolved target.
    #[must_use]
    pub fn new(
        method: &'a str,
        target: RequestTarget,
        content_type: Option<&'a str>,
        body: Option<&'a [u8]>,
    ) -> Self {
        Self {
            method,
            target,
            content_type,
            body,
        }
    }

    /// Collect request facts from an absolute URL.
    ///
    /// # Errors
    ///
    /// Returns a [`SignError`] when the URL cannot be parsed.
    pub fn from_url(
        method: &'a str,
        url: &str,
        content_type: Option<&'a str>,
        body: Option<&'a [u8]>,
    ) -> Result<Self, SignError> {
        Ok(Self::new(
            method,
            RequestTarget::from_url(url)?,
            content_type,
            body,
        ))
    }
}

/// Details of a request that passed verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verified {
    /// Key id the request was signed with.
    pub key_id: String,
    /// Request timestamp in Unix seconds.
    pub timestamp: i64,
    /// Nonce carried by the request. Callers that track replays key on this.
    pub nonce: String,
    /// How the timestamp related to the verifier's clock.
    pub freshness: TimestampCheck,
}

/// Verifies incoming `MAC` headers against a set of known secrets.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
///
/// use lcp_auth::credentials::{Credentials, SharedSecret, StaticCredentialProvider};
/// use lcp_auth::signer::Signer;
/// use lcp_auth::verifier::{RequestFacts, Verifier};
///
/// let credentials = Credentials::new("k1", SharedSecret::from_bytes(b"secret".to_vec()));
/// let signer = Signer::new(credentials.clone());
/// let verifier = Verifier::new(Arc::new(StaticCredentialProvider::from(credentials)));
///
/// let url = "https://lcp.example.com/v1/orders/";
/// let header = signer.authorization_header("GET", url, None, None).unwrap();
/// let facts = RequestFacts::from_url("GET", url, None, None).unwrap();
///
/// let verified = verifier.verify(Some(header.as_str()), &facts).unwrap();
/// assert_eq!(verified.key_id, "k1");
/// ```
#[derive(Clone)]
pub struct Verifier {
    credentials: Arc<dyn CredentialProvider>,
    clock: Arc<dyn Clock>,
    observer: Arc<dyn AuthObserver>,
    max_skew: i64,
}

impl std::fmt::Debug for Verifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Verifier")
            .field("clock", &self.clock)
            .field("observer", &self.observer)
            .field("max_skew", &self.max_skew)
            .finish_non_exhaustive()
    }
}

impl Verifier {
    /// Create a verifier using the system clock, `tracing` output and a
    /// [`TIMESTAMP_MAX_SECONDS`] window.
    #[must_use]
    pub fn new(credentials: Arc<dyn CredentialProvider>) -> Self {
        Self {
            credentials,
            clock: Arc::new(SystemClock),
            observer: Arc::new(TracingObserver),
            max_skew: TIMESTAMP_MAX_SECONDS,
        }
    }

    /// Create a verifier whose timestamp window comes from `config`.
    #[must_use]
    pub fn from_config(config: &MacConfig, credentials: Arc<dyn CredentialProvider>) -> Self {
        Self::new(credentials).with_max_skew(config.max_skew_seconds)
    }

    /// Replace the clock.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Replace the observer.
    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn AuthObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Set the accepted timestamp distance, in seconds, in either direction.
    #[must_use]
    pub fn with_max_skew(mut self, max_skew: i64) -> Self {
        self.max_skew = max_skew;
        self
    }

    /// Verify an `Authorization` header value against the received request.
    ///
    /// `authorization` is `None` when the request carried no header.
    ///
    /// # Errors
    ///
    /// Returns the [`AuthError`] of the first failed check.
    pub fn verify(
        &self,
        authorization: Option<&str>,
        request: &RequestFacts<'_>,
    ) -> Result<Verified, AuthError> {
        let header = self.parse_header(authorization)?;
        let (timestamp, freshness) = self.check_timestamp(&header.ts)?;

        let Some(secret) = self.credentials.get_secret(&header.key_id) else {
            self.observer.unknown_key_id(&header.key_id);
            return Err(AuthError::InvalidSignature);
        };

        // The body is bound through ext; a mismatch means the payload changed.
        let ext = generate_ext(request.content_type, request.body);
        if ext != header.ext {
            self.observer.signature_mismatch(&header.key_id);
            return Err(AuthError::InvalidSignature);
        }

        let normalized = build_normalized_request_string(
            &header.ts,
            &header.nonce,
            request.method,
            &request.target.host,
            request.target.port,
            &request.target.path,
            &header.ext,
        );
        if !verify_signature(&header.mac, &secret, &normalized) {
            self.observer.signature_mismatch(&header.key_id);
            return Err(AuthError::InvalidSignature);
        }

        self.observer.verified(&header.key_id);
        Ok(Verified {
            key_id: header.key_id,
            timestamp,
            nonce: header.nonce,
            freshness,
        })
    }

    fn parse_header(&self, authorization: Option<&str>) -> Result<AuthHeader, AuthError> {
        authorization
            .ok_or(AuthError::InvalidAuthHeader)
            .and_then(AuthHeader::parse)
            .inspect_err(|_| self.observer.invalid_header(authorization))
    }

    fn check_timestamp(&self, ts: &str) -> Result<(i64, TimestampCheck), AuthError> {
        match verify_timestamp(ts, self.clock.now_unix(), self.max_skew) {
            Ok((timestamp, check)) => {
                if let TimestampCheck::Future { ahead } = check {
                    self.observer.future_timestamp_accepted(ahead);
                }
                Ok((timestamp, check))
            }
            Err(rejection) => {
                let age = match &rejection {
                    TimestampRejection::Malformed(_) => None,
                    TimestampRejection::TooOld { age } => Some(*age),
                    TimestampRejection::TooFarAhead { ahead } => Some(-ahead),
                };
                self.observer.timestamp_rejected(ts, age);
                Err(rejection.into())
            }
        }
    }
}
