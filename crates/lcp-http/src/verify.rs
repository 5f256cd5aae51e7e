//! Verifying received [`http::Request`]s.

use http::header::{AUTHORIZATION, CONTENT_TYPE, HOST};
use http::request::Parts;
use http::uri::Authority;
use lcp_auth::canonical::{RequestTarget, default_port, path_with_query};
use lcp_auth::{AuthError, RequestFacts, Verified, Verifier};
use tracing::debug;

/// Verify the `Authorization` header of a received request.
///
/// Host and port come from the request URI when it is absolute, otherwise from
/// the `Host` header with the port defaulting from `default_scheme`. A request
/// whose host cannot be determined still runs through every check and fails
/// the signature comparison.
///
/// # Errors
///
/// Returns the [`AuthError`] of the first failed check. A missing
/// `Authorization` header is [`AuthError::InvalidAuthHeader`].
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
///
/// use http::Request;
/// use lcp_auth::{Credentials, SharedSecret, Signer, StaticCredentialProvider, Verifier};
/// use lcp_http::verify::verify_request;
///
/// let credentials = Credentials::new("k1", SharedSecret::from_bytes(b"secret".to_vec()));
/// let header = Signer::new(credentials.clone())
///     .authorization_header("GET", "http://api.example.com/orders/", None, None)
///     .unwrap();
///
/// let request = Request::get("/orders/")
///     .header("host", "api.example.com")
///     .header("authorization", header)
///     .body(())
///     .unwrap();
/// let (parts, ()) = request.into_parts();
///
/// let verifier = Verifier::new(Arc::new(StaticCredentialProvider::from(credentials)));
/// let verified = verify_request(&parts, &[], &verifier, "http").unwrap();
/// assert_eq!(verified.key_id, "k1");
/// ```
pub fn verify_request(
    parts: &Parts,
    body: &[u8],
    verifier: &Verifier,
    default_scheme: &str,
) -> Result<Verified, AuthError> {
    let target = resolve_target(parts, default_scheme).unwrap_or_else(|| {
        debug!(uri = %parts.uri, "Cannot resolve request host, signature will not match");
        RequestTarget::new("", 0, path_with_query(&parts.uri))
    });
    let content_type = parts
        .headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok());
    let authorization = parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    let facts = RequestFacts::new(parts.method.as_str(), target, content_type, Some(body));
    verifier.verify(authorization, &facts)
}

/// Determine host, port and path for a received request.
fn resolve_target(parts: &Parts, default_scheme: &str) -> Option<RequestTarget> {
    if parts.uri.authority().is_some() {
        return RequestTarget::from_uri(&parts.uri).ok();
    }

    let authority: Authority = parts.headers.get(HOST)?.to_str().ok()?.parse().ok()?;
    if authority.host().is_empty() {
        return None;
    }
    let scheme = parts.uri.scheme_str().unwrap_or(default_scheme);
    let port = match authority.port_u16() {
        Some(port) => port,
        None => default_port(scheme)?,
    };
    Some(RequestTarget::new(
        authority.host(),
        port,
        path_with_query(&parts.uri),
    ))
}
