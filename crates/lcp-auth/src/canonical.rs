//! Normalized request string construction.
//!
//! The normalized request string is the only input to the MAC. It is a fixed
//! sequence of request facts, each terminated by a newline:
//!
//! ```text
//! timestamp\n
//! nonce\n
//! HTTPMethod\n
//! RequestPathWithQuery\n
//! host\n
//! port\n
//! ext\n
//! ```
//!
//! Field order and the trailing newline per field are part of the wire contract;
//! any deviation produces a signature the peer cannot reproduce.

use std::fmt;

use http::Uri;

use crate::error::SignError;

/// Default port for the `http` scheme.
pub const HTTP_DEFAULT_PORT: u16 = 80;

/// Default port for the `https` scheme.
pub const HTTPS_DEFAULT_PORT: u16 = 443;

/// Build the normalized request string from its seven fields.
///
/// No field is validated. Malformed values flow into a signature that simply
/// fails to match on the other side.
///
/// # Examples
///
/// ```
/// use lcp_auth::canonical::build_normalized_request_string;
///
/// let nrs = build_normalized_request_string("42", "n0nce", "GET", "example.com", 443, "/", "");
/// assert_eq!(nrs, "42\nn0nce\nGET\n/\nexample.com\n443\n\n");
/// ```
#[must_use]
pub fn build_normalized_request_string(
    ts: &str,
    nonce: &str,
    method: &str,
    host: &str,
    port: impl fmt::Display,
    request_path: &str,
    ext: &str,
) -> String {
    format!("{ts}\n{nonce}\n{method}\n{request_path}\n{host}\n{port}\n{ext}\n")
}

/// Where a request is sent: the host, port and path facts of the normalized string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTarget {
    /// Lowercase host name.
    pub host: String,
    /// Explicit port, or the scheme's default.
    pub port: u16,
    /// Path plus query string, percent-encoding preserved verbatim.
    pub path: String,
}

impl RequestTarget {
    /// Create a target from already separated parts.
    ///
    /// The host is lowercased and an IPv6 literal loses its brackets; an empty
    /// path becomes `/`.
    #[must_use]
    pub fn new(host: impl AsRef<str>, port: u16, path: impl Into<String>) -> Self {
        let host = host.as_ref();
        let host = host
            .strip_prefix('[')
            .and_then(|h| h.strip_suffix(']'))
            .unwrap_or(host);
        let path = path.into();
        Self {
            host: host.to_ascii_lowercase(),
            port,
            path: if path.is_empty() { "/".to_owned() } else { path },
        }
    }

    /// Extract the target from an absolute URL.
    ///
    /// When the URL carries no explicit port, `http` maps to 80 and `https` to 443.
    ///
    /// # Errors
    ///
    /// Returns [`SignError::InvalidUrl`] when the URL does not parse or is not
    /// absolute, [`SignError::MissingHost`] when it has no host, and
    /// [`SignError::UnsupportedScheme`] when a default port is needed for a
    /// scheme other than `http`/`https`.
    ///
    /// # Examples
    ///
    /// ```
    /// use lcp_auth::canonical::RequestTarget;
    ///
    /// let target = RequestTarget::from_url("https://API.example.com/v1/orders?x=1").unwrap();
    /// assert_eq!(target.host, "api.example.com");
    /// assert_eq!(target.port, 443);
    /// assert_eq!(target.path, "/v1/orders?x=1");
    /// ```
    pub fn from_url(url: &str) -> Result<Self, SignError> {
        let uri: Uri = url
            .parse()
            .map_err(|_| SignError::InvalidUrl(url.to_owned()))?;
        Self::from_uri(&uri)
    }

    /// Extract the target from an already parsed absolute [`Uri`].
    ///
    /// # Errors
    ///
    /// Same conditions as [`RequestTarget::from_url`].
    pub fn from_uri(uri: &Uri) -> Result<Self, SignError> {
        let scheme = uri
            .scheme_str()
            .ok_or_else(|| SignError::InvalidUrl(uri.to_string()))?;
        let host = uri
            .host()
            .filter(|host| !host.is_empty())
            .ok_or_else(|| SignError::MissingHost(uri.to_string()))?;
        let port = match uri.port_u16() {
            Some(port) => port,
            None => default_port(scheme)
                .ok_or_else(|| SignError::UnsupportedScheme(scheme.to_owned()))?,
        };

        Ok(Self::new(host, port, path_with_query(uri)))
    }
}

/// Default port for a URL scheme, if it has one.
#[must_use]
pub fn default_port(scheme: &str) -> Option<u16> {
    if scheme.eq_ignore_ascii_case("http") {
        Some(HTTP_DEFAULT_PORT)
    } else if scheme.eq_ignore_ascii_case("https") {
        Some(HTTPS_DEFAULT_PORT)
    } else {
        None
    }
}

/// The request path including its query string, exactly as it appears on the wire.
#[must_use]
pub fn path_with_query(uri: &Uri) -> String {
    let path = if uri.path().is_empty() { "/" } else { uri.path() };
    match uri.query() {
        Some(query) => format!("{path}?{query}"),
        None => path.to_owned(),
    }
}
