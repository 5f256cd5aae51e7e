//! Error types for MAC signing and verification.
//!
//! Verification failures are represented by [`AuthError`], which has exactly one
//! variant per rejection reason. Problems detected while *producing* a header are
//! a separate class, [`SignError`], so a caller can never confuse a local input
//! mistake with a peer's bad credentials.

/// Reasons an incoming `Authorization` header is rejected.
///
/// The verifier checks header format, then timestamp freshness, then the
/// signature, and reports the first failure only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// The header is missing, does not match the `MAC` grammar, or has an
    /// empty required field.
    #[error("Invalid MAC Authorization header")]
    InvalidAuthHeader,

    /// The timestamp is too old, too far in the future, or not an integer.
    #[error("Invalid MAC timestamp")]
    InvalidTimeStamp,

    /// The recomputed signature does not match the one in the header.
    #[error("MAC signature does not match")]
    InvalidSignature,
}

/// Errors raised while building an `Authorization` header for an outgoing request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SignError {
    /// The request URL could not be parsed as an absolute URI.
    #[error("invalid request URL: {0}")]
    InvalidUrl(String),

    /// The request URL has no host component.
    #[error("request URL has no host: {0}")]
    MissingHost(String),

    /// The URL has no explicit port and its scheme has no default port.
    #[error("unsupported URL scheme: {0}")]
    UnsupportedScheme(String),
}

/// Errors raised while decoding a shared secret into MAC key material.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KeyError {
    /// The secret is not valid (URL-safe) base64.
    #[error("shared secret is not valid base64url")]
    InvalidBase64,

    /// The secret is empty.
    #[error("shared secret is empty")]
    Empty,
}

/// Errors raised while loading [`MacConfig`](crate::config::MacConfig).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// A variable holds a value that cannot be parsed.
    #[error("invalid value for {name}: {value}")]
    InvalidValue {
        /// Name of the offending setting.
        name: &'static str,
        /// The raw value that failed to parse.
        value: String,
    },

    /// A key id is configured but no shared secret accompanies it.
    #[error("key id {0} is configured without a shared secret")]
    MissingSecret(String),

    /// The configured shared secret could not be decoded.
    #[error(transparent)]
    Key(#[from] KeyError),
}
