//! Signing outgoing [`http::Request`]s.

use http::header::{AUTHORIZATION, CONTENT_TYPE};
use http::{HeaderValue, Method, Request};
use lcp_auth::canonical::RequestTarget;
use lcp_auth::{ConfigError, MacConfig, Signer};

use crate::error::ApplyError;
use crate::logging::log_request;
use crate::url::resolve_url;

const APPLICATION_JSON: &str = "application/json";

/// Attaches a `MAC` `Authorization` header to requests.
///
/// # Examples
///
/// ```
/// use http::Request;
/// use lcp_auth::{Credentials, SharedSecret, Signer};
/// use lcp_http::sign::MacAuth;
///
/// let signer = Signer::new(Credentials::new("k1", SharedSecret::from_bytes(b"secret".to_vec())));
/// let auth = MacAuth::new(signer);
///
/// let mut request = Request::get("https://lcp.example.com/v1/orders/")
///     .body(Vec::new())
///     .unwrap();
/// auth.apply(&mut request).unwrap();
///
/// let header = request.headers()["authorization"].to_str().unwrap();
/// assert!(header.starts_with(r#"MAC id="k1""#));
/// ```
#[derive(Debug, Clone)]
pub struct MacAuth {
    signer: Signer,
}

impl MacAuth {
    /// Wrap a signer.
    #[must_use]
    pub fn new(signer: Signer) -> Self {
        Self { signer }
    }

    /// The underlying signer.
    #[must_use]
    pub fn signer(&self) -> &Signer {
        &self.signer
    }

    /// Sign `request` and set its `Authorization` header, replacing any existing one.
    ///
    /// The request URI must be absolute. The `content-type` header and the body
    /// feed the `ext` digest.
    ///
    /// # Errors
    ///
    /// Returns [`ApplyError::Sign`] when the URI is not absolute or has no host,
    /// and [`ApplyError::InvalidHeaderValue`] when the key id cannot be sent in
    /// a header.
    pub fn apply<B: AsRef<[u8]>>(&self, request: &mut Request<B>) -> Result<(), ApplyError> {
        let target = RequestTarget::from_uri(request.uri())?;
        let content_type = request
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok());
        let header = self.signer.sign_target(
            request.method().as_str(),
            &target,
            content_type,
            Some(request.body().as_ref()),
        );

        let value = HeaderValue::try_from(header.to_string())?;
        request.headers_mut().insert(AUTHORIZATION, value);
        Ok(())
    }
}

/// Set the `content-type` header when the request has none.
///
/// `PATCH`, `POST` and `PUT` default to `application/json`; every other method
/// gets an empty value so that the signed `ext` is reproducible on both sides.
pub fn apply_default_content_type<B>(request: &mut Request<B>) {
    let method = request.method();
    let value = if [Method::PATCH, Method::POST, Method::PUT].contains(method) {
        HeaderValue::from_static(APPLICATION_JSON)
    } else {
        HeaderValue::from_static("")
    };
    request.headers_mut().entry(CONTENT_TYPE).or_insert(value);
}

/// Prepares requests for the platform: resolves relative URIs against the base
/// URL, applies the default content type, signs when credentials are
/// configured and logs the result.
#[derive(Debug, Clone, Default)]
pub struct RequestPreparer {
    base_url: Option<String>,
    auth: Option<MacAuth>,
}

impl RequestPreparer {
    /// Create a preparer. With `auth` set to `None` requests stay anonymous.
    #[must_use]
    pub fn new(base_url: Option<String>, auth: Option<MacAuth>) -> Self {
        Self { base_url, auth }
    }

    /// Build a preparer from configuration.
    ///
    /// # Errors
    ///
    /// Propagates [`MacConfig::credentials`] failures.
    pub fn from_config(config: &MacConfig) -> Result<Self, ConfigError> {
        let auth = config
            .credentials()?
            .map(|credentials| MacAuth::new(Signer::new(credentials)));
        Ok(Self::new(config.base_url.clone(), auth))
    }

    /// Whether requests are signed.
    #[must_use]
    pub fn is_signing(&self) -> bool {
        self.auth.is_some()
    }

    /// Resolve, default, sign and log `request`.
    ///
    /// # Errors
    ///
    /// Returns an [`ApplyError`] when the resolved URI is invalid or signing fails.
    pub fn prepare<B: AsRef<[u8]>>(&self, request: &mut Request<B>) -> Result<(), ApplyError> {
        if request.uri().scheme().is_none() {
            let resolved = resolve_url(self.base_url.as_deref(), &request.uri().to_string());
            *request.uri_mut() = resolved.parse()?;
        }
        apply_default_content_type(request);
        if let Some(auth) = &self.auth {
            auth.apply(request)?;
        }
        log_request(request);
        Ok(())
    }
}
