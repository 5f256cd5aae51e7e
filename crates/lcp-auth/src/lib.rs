//! HTTP MAC access authentication for the Loyalty Commerce Platform.
//!
//! Every request to the platform carries an `Authorization` header of the form
//!
//! ```text
//! MAC id="<key id>", ts="<unix seconds>", nonce="<base64>", ext="<hex>", mac="<base64>"
//! ```
//!
//! where `mac` is the HMAC-SHA1 of a normalized request string built from the
//! timestamp, nonce, method, path, host, port and a SHA-1 digest of the payload.
//!
//! The crate is transport-agnostic. [`signer::Signer`] produces headers for
//! outgoing requests and [`verifier::Verifier`] checks headers on received ones.
//! Both are built from small pure functions that are usable on their own:
//!
//! - [`ext::generate_ext`]: payload digest
//! - [`canonical::build_normalized_request_string`]: the signed string
//! - [`signature::generate_signature`] / [`signature::verify_signature`]
//! - [`header::AuthHeader`]: wire format serialization and parsing
//! - [`timestamp::verify_timestamp`]: freshness window
//! - [`nonce::generate_nonce`]: per-request nonce

pub mod canonical;
pub mod config;
pub mod credentials;
pub mod error;
pub mod ext;
pub mod header;
pub mod nonce;
pub mod observe;
pub mod signature;
pub mod signer;
pub mod timestamp;
pub mod verifier;

pub use config::MacConfig;
pub use credentials::{
    CredentialProvider, Credentials, KeyEncoding, SharedSecret, StaticCredentialProvider,
};
pub use error::{AuthError, ConfigError, KeyError, SignError};
pub use header::AuthHeader;
pub use signer::{Signer, generate_authorization_header_value};
pub use verifier::{RequestFacts, Verified, Verifier};
