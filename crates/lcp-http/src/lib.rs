//! `http` crate integration for LCP MAC authentication.
//!
//! - **Signing** ([`sign`]): [`MacAuth`](sign::MacAuth) attaches the
//!   `Authorization` header to an outgoing [`http::Request`];
//!   [`RequestPreparer`](sign::RequestPreparer) also resolves relative URIs,
//!   applies the default content type and logs the request.
//! - **Verification** ([`verify`]): [`verify_request`](verify::verify_request)
//!   checks a received request's parts and body.
//! - **Logging** ([`logging`]): debug logs of requests and responses with
//!   sensitive fields masked ([`redact`]).
//! - **URLs** ([`url`]): joining request paths onto a base URL.

pub mod error;
pub mod logging;
pub mod redact;
pub mod sign;
pub mod url;
pub mod verify;

pub use error::{ApplyError, MaskError};
pub use logging::{log_request, log_response};
pub use sign::{MacAuth, RequestPreparer, apply_default_content_type};
pub use url::url_path_join;
pub use verify::verify_request;
