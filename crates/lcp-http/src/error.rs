//! Error types for the HTTP glue.

use lcp_auth::SignError;

/// Errors raised while preparing or signing an outgoing [`http::Request`].
#[derive(Debug, thiserror::Error)]
pub enum ApplyError {
    /// The request URL could not be turned into signing facts.
    #[error(transparent)]
    Sign(#[from] SignError),

    /// A base URL joined with a relative request path is not a valid URI.
    #[error("invalid request URI: {0}")]
    InvalidUri(#[from] http::uri::InvalidUri),

    /// The generated header value contains bytes not allowed in a header.
    #[error("invalid Authorization header value: {0}")]
    InvalidHeaderValue(#[from] http::header::InvalidHeaderValue),
}

/// Errors raised while masking a payment card number.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MaskError {
    /// The number is too short to keep the required digits in the clear.
    #[error(
        "insufficient digits in number to complete masking: at least {required} digits must be present, found {found}"
    )]
    InsufficientDigits {
        /// Minimum number of digits for the masking rule.
        required: usize,
        /// Digits actually present.
        found: usize,
    },
}
