//! Debug logging of requests and responses.
//!
//! Requests are logged under the [`REQUEST_TARGET`] target and responses under
//! [`RESPONSE_TARGET`], both at `debug` level. Nothing is formatted unless that
//! level is enabled for the target. A logged message looks like:
//!
//! ```text
//! ------------------------------------------------------------
//! POST https://lcp.example.com/v1/orders/ HTTP/1.1
//! content-type: application/json
//! authorization: <redacted>
//!
//! {
//!   "amount": 100
//! }
//! ```

use std::borrow::Cow;

use http::header::{AUTHORIZATION, CONTENT_TYPE};
use http::{HeaderMap, Request, Response};
use serde_json::{Map, Value};
use tracing::{Level, debug, enabled};

use crate::redact::mask_sensitive_data;

/// `tracing` target for request logs.
pub const REQUEST_TARGET: &str = "lcp_http::request";

/// `tracing` target for response logs.
pub const RESPONSE_TARGET: &str = "lcp_http::response";

const LOG_SEPARATOR: &str = "------------------------------------------------------------";

const REDACTED: &str = "<redacted>";

/// Log `request` at `debug` level, masking sensitive payload fields.
pub fn log_request<B: AsRef<[u8]>>(request: &Request<B>) {
    if enabled!(target: REQUEST_TARGET, Level::DEBUG) {
        debug!(target: REQUEST_TARGET, "{}", format_request(request));
    }
}

/// Log `response` at `debug` level.
pub fn log_response<B: AsRef<[u8]>>(response: &Response<B>) {
    if enabled!(target: RESPONSE_TARGET, Level::DEBUG) {
        debug!(target: RESPONSE_TARGET, "{}", format_response(response));
    }
}

/// Render a request the way [`log_request`] emits it.
#[must_use]
pub fn format_request<B: AsRef<[u8]>>(request: &Request<B>) -> String {
    format!(
        "{LOG_SEPARATOR}\n{} {} {:?}\n{}\n\n{}",
        request.method(),
        request.uri(),
        request.version(),
        format_headers(request.headers()),
        format_request_body(request.headers(), request.body().as_ref()),
    )
}

/// Render a response the way [`log_response`] emits it.
#[must_use]
pub fn format_response<B: AsRef<[u8]>>(response: &Response<B>) -> String {
    let status = response.status();
    format!(
        "{LOG_SEPARATOR}\n{:?} {} {}\n{}\n\n{}",
        response.version(),
        status.as_u16(),
        status.canonical_reason().unwrap_or(""),
        format_headers(response.headers()),
        prettify_alleged_json(response.body().as_ref()),
    )
}

/// One `name: value` line per header, with `Authorization` redacted.
fn format_headers(headers: &HeaderMap) -> String {
    headers
        .iter()
        .map(|(name, value)| {
            let value = if *name == AUTHORIZATION {
                Cow::Borrowed(REDACTED)
            } else {
                String::from_utf8_lossy(value.as_bytes())
            };
            format!("{name}: {value}")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// JSON request bodies are masked and pretty-printed; everything else is shown as text.
fn format_request_body(headers: &HeaderMap, body: &[u8]) -> String {
    if body.is_empty() || !is_json(headers) {
        return String::from_utf8_lossy(body).into_owned();
    }
    let Ok(data) = serde_json::from_slice::<Value>(body) else {
        return String::from_utf8_lossy(body).into_owned();
    };
    match mask_sensitive_data(&data) {
        Ok(masked) => pretty_json(masked),
        Err(err) => format!("<body withheld: {err}>"),
    }
}

fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse::<mime::Mime>().ok())
        .is_some_and(|media| media.essence_str() == mime::APPLICATION_JSON.essence_str())
}

/// Pretty-print `body` when it parses as JSON, otherwise return it as text.
fn prettify_alleged_json(body: &[u8]) -> String {
    serde_json::from_slice::<Value>(body).map_or_else(
        |_| String::from_utf8_lossy(body).into_owned(),
        pretty_json,
    )
}

fn pretty_json(value: Value) -> String {
    let sorted = sort_keys(value);
    serde_json::to_string_pretty(&sorted).unwrap_or_else(|_| sorted.to_string())
}

fn sort_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map.into_iter().collect();
            entries.sort_by(|(a, _), (b, _)| a.cmp(b));
            Value::Object(
                entries
                    .into_iter()
                    .map(|(key, value)| (key, sort_keys(value)))
                    .collect::<Map<_, _>>(),
            )
        }
        Value::Array(items) => Value::Array(items.into_iter().map(sort_keys).collect()),
        other => other,
    }
}
