//! Request-side header generation.
//!
//! [`Signer`] turns an outgoing request's method, URL, content type and body into
//! an `Authorization` header value:
//!
//! 1. Extract host, port (defaulting per scheme) and path from the URL.
//! 2. Read the clock and draw a nonce.
//! 3. Compute `ext` from the content type and body.
//! 4. Build the normalized request string and sign it.
//! 5. Serialize the five header fields.

use std::sync::Arc;

use crate::canonical::{RequestTarget, build_normalized_request_string};
use crate::credentials::{Credentials, SharedSecret};
use crate::error::SignError;
use crate::ext::generate_ext;
use crate::header::AuthHeader;
use crate::nonce::{NonceSource, RandomNonce};
use crate::observe::{AuthObserver, TracingObserver};
use crate::signature::generate_signature;
use crate::timestamp::{Clock, SystemClock};

/// Produces `MAC` `Authorization` headers for one set of credentials.
///
/// A `Signer` holds no per-request state and can be shared across threads.
///
/// # Examples
///
/// ```
/// use lcp_auth::credentials::{Credentials, KeyEncoding};
/// use lcp_auth::signer::Signer;
///
/// let credentials = Credentials::from_encoded("my-key", "c2VjcmV0", KeyEncoding::Base64Url).unwrap();
/// let signer = Signer::new(credentials);
///
/// let header = signer
///     .authorization_header("POST", "https://lcp.example.com/v1/orders/", Some("application/json"), Some(b"{}"))
///     .unwrap();
/// assert!(header.starts_with(r#"MAC id="my-key", ts=""#));
/// ```
#[derive(Debug, Clone)]
pub struct Signer {
    credentials: Credentials,
    clock: Arc<dyn Clock>,
    nonces: Arc<dyn NonceSource>,
    observer: Arc<dyn AuthObserver>,
}

impl Signer {
    /// Create a signer using the system clock, random nonces and `tracing` output.
    #[must_use]
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            clock: Arc::new(SystemClock),
            nonces: Arc::new(RandomNonce),
            observer: Arc::new(TracingObserver),
        }
    }

    /// Replace the clock.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Replace the nonce source.
    #[must_use]
    pub fn with_nonce_source(mut self, nonces: Arc<dyn NonceSource>) -> Self {
        self.nonces = nonces;
        self
    }

    /// Replace the observer.
    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn AuthObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// The key id placed in every header.
    #[must_use]
    pub fn key_id(&self) -> &str {
        &self.credentials.key_id
    }

    /// Sign a request addressed by an absolute URL.
    ///
    /// # Errors
    ///
    /// Returns a [`SignError`] when the URL cannot be parsed into a host, port and path.
    pub fn sign(
        &self,
        method: &str,
        url: &str,
        content_type: Option<&str>,
        body: Option<&[u8]>,
    ) -> Result<AuthHeader, SignError> {
        let target = RequestTarget::from_url(url)?;
        Ok(self.sign_target(method, &target, content_type, body))
    }

    /// Sign a request whose target has already been resolved.
    #[must_use]
    pub fn sign_target(
        &self,
        method: &str,
        target: &RequestTarget,
        content_type: Option<&str>,
        body: Option<&[u8]>,
    ) -> AuthHeader {
        let ts = self.clock.now_unix().to_string();
        let nonce = self.nonces.next_nonce();
        let ext = generate_ext(content_type, body);
        let normalized = build_normalized_request_string(
            &ts,
            &nonce,
            method,
            &target.host,
            target.port,
            &target.path,
            &ext,
        );
        let mac = generate_signature(&self.credentials.secret, &normalized);

        self.observer
            .header_issued(&self.credentials.key_id, method, &target.host);

        AuthHeader {
            key_id: self.credentials.key_id.clone(),
            ts,
            nonce,
            ext,
            mac,
        }
    }

    /// Sign a request and return the serialized header value.
    ///
    /// # Errors
    ///
    /// Same conditions as [`Signer::sign`].
    pub fn authorization_header(
        &self,
        method: &str,
        url: &str,
        content_type: Option<&str>,
        body: Option<&[u8]>,
    ) -> Result<String, SignError> {
        self.sign(method, url, content_type, body)
            .map(|header| header.to_string())
    }
}

/// One-shot helper: sign a request with the system clock and a random nonce.
///
/// # Errors
///
/// Returns a [`SignError`] when the URL cannot be parsed.
pub fn generate_authorization_header_value(
    method: &str,
    url: &str,
    key_id: &str,
    secret: &SharedSecret,
    content_type: Option<&str>,
    body: Option<&[u8]>,
) -> Result<String, SignError> {
    Signer::new(Credentials::new(key_id, secret.clone()))
        .authorization_header(method, url, content_type, body)
}
