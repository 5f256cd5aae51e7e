//! HMAC-SHA1 request signatures.
//!
//! ```text
//! mac = Base64(HMAC-SHA1(SharedSecret, NormalizedRequestString))
//! ```

use base64::Engine;
use base64::engine::general_purpose::{STANDARD as BASE64, URL_SAFE as BASE64_URL_SAFE};
use hmac::{Hmac, KeyInit, Mac};
use sha1::Sha1;
use subtle::ConstantTimeEq;

use crate::credentials::SharedSecret;

type HmacSha1 = Hmac<Sha1>;

/// Compute the base64-encoded MAC of a normalized request string.
///
/// # Examples
///
/// ```
/// use lcp_auth::credentials::SharedSecret;
/// use lcp_auth::signature::generate_signature;
///
/// let key = SharedSecret::from_bytes(b"secret".to_vec());
/// let mac = generate_signature(&key, "42\nnonce\nGET\n/\nexample.com\n80\n\n");
/// assert_eq!(mac.len(), 28);
/// ```
#[must_use]
pub fn generate_signature(secret: &SharedSecret, normalized_request_string: &str) -> String {
    BASE64.encode(hmac_sha1(secret, normalized_request_string))
}

/// Check a base64-encoded MAC against a normalized request string.
///
/// The provided signature is decoded and compared to the recomputed MAC in
/// constant time. A signature that is not valid base64 does not match.
#[must_use]
pub fn verify_signature(
    signature: &str,
    secret: &SharedSecret,
    normalized_request_string: &str,
) -> bool {
    let Some(provided) = decode_signature(signature) else {
        return false;
    };
    let expected = hmac_sha1(secret, normalized_request_string);
    provided.ct_eq(&expected).into()
}

/// Decode a signature, accepting the URL-safe alphabet as well as the standard one.
fn decode_signature(signature: &str) -> Option<Vec<u8>> {
    BASE64
        .decode(signature)
        .or_else(|_| BASE64_URL_SAFE.decode(signature))
        .ok()
}

/// Compute HMAC-SHA1 and return the raw bytes.
fn hmac_sha1(secret: &SharedSecret, data: &str) -> Vec<u8> {
    let mut mac =
        HmacSha1::new_from_slice(secret.as_bytes()).expect("HMAC can accept keys of any length");
    mac.update(data.as_bytes());
    mac.finalize().into_bytes().to_vec()
}
