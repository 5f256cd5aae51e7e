//! The `MAC` `Authorization` header.
//!
//! Wire format:
//!
//! ```text
//! MAC id="<key id>", ts="<unix seconds>", nonce="<base64>", ext="<hex or empty>", mac="<base64>"
//! ```
//!
//! Serialization always uses the exact spelling above. Parsing is case-insensitive
//! on the scheme and field labels and tolerates whitespace around `=` and `,`.
//! Field order is fixed in both directions.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::AuthError;

/// Authentication scheme token.
pub const MAC_SCHEME: &str = "MAC";

static AUTH_HEADER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?i)^\s*MAC\s+id\s*=\s*"(?P<id>[^"]+)"\s*,\s*ts\s*=\s*"(?P<ts>[^"]+)"\s*,\s*nonce\s*=\s*"(?P<nonce>[^"]+)"\s*,\s*ext\s*=\s*"(?P<ext>[^"]*)"\s*,\s*mac\s*=\s*"(?P<mac>[^"]+)"\s*$"#,
    )
    .expect("authorization header pattern is valid")
});

/// Parsed or to-be-serialized value of a `MAC` `Authorization` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthHeader {
    /// Identifier of the shared secret used to sign.
    pub key_id: String,
    /// Unix timestamp in whole seconds, as sent.
    pub ts: String,
    /// Base64 nonce.
    pub nonce: String,
    /// Hex payload digest, empty when the request has no typed body.
    pub ext: String,
    /// Base64 signature.
    pub mac: String,
}

impl AuthHeader {
    /// Assemble a header from its five fields.
    #[must_use]
    pub fn new(
        key_id: impl Into<String>,
        ts: impl Into<String>,
        nonce: impl Into<String>,
        ext: impl Into<String>,
        mac: impl Into<String>,
    ) -> Self {
        Self {
            key_id: key_id.into(),
            ts: ts.into(),
            nonce: nonce.into(),
            ext: ext.into(),
            mac: mac.into(),
        }
    }

    /// Parse an `Authorization` header value.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidAuthHeader`] when the value does not match the
    /// grammar or a field other than `ext` is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use lcp_auth::header::AuthHeader;
    ///
    /// let header = AuthHeader::parse(r#"mac ID="k", TS="1", Nonce="n", ext="", Mac="m""#).unwrap();
    /// assert_eq!(header.key_id, "k");
    /// assert_eq!(header.ext, "");
    /// ```
    pub fn parse(value: &str) -> Result<Self, AuthError> {
        let captures = AUTH_HEADER_RE
            .captures(value)
            .ok_or(AuthError::InvalidAuthHeader)?;
        let field = |name: &str| {
            captures
                .name(name)
                .map(|m| m.as_str().to_owned())
                .ok_or(AuthError::InvalidAuthHeader)
        };

        Ok(Self {
            key_id: field("id")?,
            ts: field("ts")?,
            nonce: field("nonce")?,
            ext: field("ext")?,
            mac: field("mac")?,
        })
    }
}

impl FromStr for AuthHeader {
    type Err = AuthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for AuthHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            r#"{MAC_SCHEME} id="{}", ts="{}", nonce="{}", ext="{}", mac="{}""#,
            self.key_id, self.ts, self.nonce, self.ext, self.mac
        )
    }
}
