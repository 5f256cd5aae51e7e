//! Observability hooks for signing and verification.
//!
//! [`Signer`](crate::signer::Signer) and [`Verifier`](crate::verifier::Verifier)
//! report notable events through an [`AuthObserver`] passed in at construction.
//! [`TracingObserver`] forwards them to `tracing`. Secrets and signatures are
//! never handed to an observer.

use std::fmt::Debug;

use tracing::{debug, info, warn};

/// Receiver for signing and verification events.
///
/// Every method has an empty default, so implementations only override what
/// they care about.
pub trait AuthObserver: Debug + Send + Sync {
    /// An `Authorization` header was issued for an outgoing request.
    fn header_issued(&self, _key_id: &str, _method: &str, _host: &str) {}

    /// An incoming header was missing or did not match the `MAC` grammar.
    fn invalid_header(&self, _value: Option<&str>) {}

    /// A timestamp was rejected. `age` is negative for future timestamps and
    /// `None` when the timestamp was not an integer.
    fn timestamp_rejected(&self, _ts: &str, _age: Option<i64>) {}

    /// A timestamp slightly in the future was accepted.
    fn future_timestamp_accepted(&self, _ahead: i64) {}

    /// The header names a key id with no known secret.
    fn unknown_key_id(&self, _key_id: &str) {}

    /// The recomputed signature did not match the header.
    fn signature_mismatch(&self, _key_id: &str) {}

    /// The request passed every check.
    fn verified(&self, _key_id: &str) {}
}

/// Observer that emits `tracing` events.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl AuthObserver for TracingObserver {
    fn header_issued(&self, key_id: &str, method: &str, host: &str) {
        debug!(key_id, method, host, "Issued MAC authorization header");
    }

    fn invalid_header(&self, value: Option<&str>) {
        warn!(header = ?value, "Invalid format for authorization header");
    }

    fn timestamp_rejected(&self, ts: &str, age: Option<i64>) {
        match age {
            Some(age) if age < 0 => {
                warn!(ts, ahead = -age, "Rejecting timestamp in the future");
            }
            Some(age) => warn!(ts, age, "Rejecting timestamp in the past"),
            None => warn!(ts, "Rejecting malformed timestamp"),
        }
    }

    fn future_timestamp_accepted(&self, ahead: i64) {
        info!(ahead, "Accepting timestamp in the future");
    }

    fn unknown_key_id(&self, key_id: &str) {
        warn!(key_id, "Unknown MAC key id");
    }

    fn signature_mismatch(&self, key_id: &str) {
        debug!(key_id, "MAC signature mismatch");
    }

    fn verified(&self, key_id: &str) {
        debug!(key_id, "MAC verification succeeded");
    }
}

/// Observer that drops every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl AuthObserver for NoopObserver {}
