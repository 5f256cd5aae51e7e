//! Per-request nonces.
//!
//! A nonce is 8 bytes from a cryptographically secure generator, base64
//! encoded. It decorrelates otherwise identical requests signed within the same
//! second. Nonces are never cached or reused.

use std::fmt::Debug;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;

/// Number of random bytes in a nonce.
pub const NONCE_LEN: usize = 8;

/// Generate a fresh base64-encoded nonce.
///
/// # Examples
///
/// ```
/// use lcp_auth::nonce::generate_nonce;
///
/// let nonce = generate_nonce();
/// assert_eq!(nonce.len(), 12);
/// ```
#[must_use]
pub fn generate_nonce() -> String {
    let bytes: [u8; NONCE_LEN] = rand::random();
    BASE64.encode(bytes)
}

/// Source of nonces for the [`Signer`](crate::signer::Signer).
pub trait NonceSource: Debug + Send + Sync {
    /// Produce the nonce for the next request.
    fn next_nonce(&self) -> String;
}

/// Nonces drawn from the thread-local CSPRNG.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomNonce;

impl NonceSource for RandomNonce {
    fn next_nonce(&self) -> String {
        generate_nonce()
    }
}

/// Always returns the same nonce. Only meant for tests and fixture generation.
#[derive(Debug, Clone)]
pub struct FixedNonce(String);

impl FixedNonce {
    /// Create a source that always yields `nonce`.
    #[must_use]
    pub fn new(nonce: impl Into<String>) -> Self {
        Self(nonce.into())
    }
}

impl NonceSource for FixedNonce {
    fn next_nonce(&self) -> String {
        self.0.clone()
    }
}
