//! Payload binding for the normalized request string.
//!
//! The `ext` field ties a signature to the request payload without putting the
//! payload itself into the normalized string:
//!
//! ```text
//! ext = hex(SHA1(content_type || body))
//! ```
//!
//! When either the content type or the body is absent or empty, `ext` is the
//! empty string.

use sha1::{Digest, Sha1};

/// Compute the `ext` digest for a request's content type and body.
///
/// Both inputs must be present and non-empty for a digest to be produced; any
/// other combination yields `""`. The content type is UTF-8 by construction, so
/// the digest is taken over its bytes followed by the raw body bytes.
///
/// # Examples
///
/// ```
/// use lcp_auth::ext::generate_ext;
///
/// assert_eq!(generate_ext(None, Some(b"{}")), "");
/// assert_eq!(
///     generate_ext(Some("application/json"), Some(br#"{"a":1}"#)),
///     "981c57ecc537e608fe65a8c332328364f5b02925"
/// );
/// ```
#[must_use]
pub fn generate_ext(content_type: Option<&str>, body: Option<&[u8]>) -> String {
    match (content_type, body) {
        (Some(content_type), Some(body)) if !content_type.is_empty() && !body.is_empty() => {
            let mut hasher = Sha1::new();
            hasher.update(content_type.as_bytes());
            hasher.update(body);
            hex::encode(hasher.finalize())
        }
        _ => String::new(),
    }
}
