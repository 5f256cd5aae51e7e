//! MAC client configuration.
//!
//! Provides [`MacConfig`], loaded from environment variables with
//! [`MacConfig::from_env`] or assembled with its builder.

use std::fmt;

use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

use crate::credentials::{Credentials, KeyEncoding};
use crate::error::ConfigError;
use crate::timestamp::TIMESTAMP_MAX_SECONDS;

/// Settings for signing requests to the Loyalty Commerce Platform.
///
/// When no key id is configured, requests are sent without an
/// `Authorization` header.
///
/// # Examples
///
/// ```
/// use lcp_auth::config::MacConfig;
/// use lcp_auth::credentials::KeyEncoding;
///
/// let config = MacConfig::builder()
///     .key_id("my-key")
///     .shared_secret("c2VjcmV0")
///     .build();
/// assert_eq!(config.key_encoding, KeyEncoding::Base64Url);
///
/// let credentials = config.credentials().unwrap().unwrap();
/// assert_eq!(credentials.secret.as_bytes(), b"secret");
/// ```
#[derive(Clone, Serialize, Deserialize, TypedBuilder)]
#[serde(rename_all = "camelCase")]
pub struct MacConfig {
    /// Base URL that relative request paths are joined onto.
    #[builder(default, setter(strip_option, into))]
    pub base_url: Option<String>,

    /// Identifier of the shared secret.
    #[builder(default, setter(strip_option, into))]
    pub key_id: Option<String>,

    /// Shared secret text, decoded according to `key_encoding`.
    #[serde(default, skip_serializing)]
    #[builder(default, setter(strip_option, into))]
    pub shared_secret: Option<String>,

    /// How `shared_secret` turns into key bytes.
    #[builder(default)]
    pub key_encoding: KeyEncoding,

    /// Accepted timestamp distance, in seconds, when verifying.
    #[builder(default = TIMESTAMP_MAX_SECONDS)]
    pub max_skew_seconds: i64,

    /// Log level filter string (e.g. `"info"`, `"debug"`).
    #[builder(default = String::from("info"))]
    pub log_level: String,
}

impl Default for MacConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            key_id: None,
            shared_secret: None,
            key_encoding: KeyEncoding::default(),
            max_skew_seconds: TIMESTAMP_MAX_SECONDS,
            log_level: String::from("info"),
        }
    }
}

impl fmt::Debug for MacConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MacConfig")
            .field("base_url", &self.base_url)
            .field("key_id", &self.key_id)
            .field(
                "shared_secret",
                &self.shared_secret.as_ref().map(|_| "<redacted>"),
            )
            .field("key_encoding", &self.key_encoding)
            .field("max_skew_seconds", &self.max_skew_seconds)
            .field("log_level", &self.log_level)
            .finish()
    }
}

impl MacConfig {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Default |
    /// |----------|---------|
    /// | `LCP_BASE_URL` | *(unset)* |
    /// | `LCP_MAC_KEY_ID` | *(unset)* |
    /// | `LCP_MAC_SHARED_SECRET` | *(unset)* |
    /// | `LCP_MAC_KEY_ENCODING` | `base64url` |
    /// | `LCP_MAC_MAX_SKEW_SECONDS` | `30` |
    /// | `LOG_LEVEL` | `info` |
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] when `LCP_MAC_KEY_ENCODING` or
    /// `LCP_MAC_MAX_SKEW_SECONDS` cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Same conditions as [`MacConfig::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(v) = lookup("LCP_BASE_URL") {
            config.base_url = Some(v);
        }
        if let Some(v) = lookup("LCP_MAC_KEY_ID").filter(|v| !v.is_empty()) {
            config.key_id = Some(v);
        }
        if let Some(v) = lookup("LCP_MAC_SHARED_SECRET") {
            config.shared_secret = Some(v);
        }
        if let Some(v) = lookup("LCP_MAC_KEY_ENCODING") {
            config.key_encoding = v.parse()?;
        }
        if let Some(v) = lookup("LCP_MAC_MAX_SKEW_SECONDS") {
            config.max_skew_seconds = v
                .trim()
                .parse::<i64>()
                .ok()
                .filter(|n| *n >= 0)
                .ok_or_else(|| ConfigError::InvalidValue {
                    name: "LCP_MAC_MAX_SKEW_SECONDS",
                    value: v.clone(),
                })?;
        }
        if let Some(v) = lookup("LOG_LEVEL") {
            config.log_level = v;
        }

        Ok(config)
    }

    /// Resolve the signing credentials.
    ///
    /// Returns `Ok(None)` when no key id is configured.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingSecret`] when a key id has no secret, and
    /// [`ConfigError::Key`] when the secret does not decode.
    pub fn credentials(&self) -> Result<Option<Credentials>, ConfigError> {
        let Some(key_id) = &self.key_id else {
            return Ok(None);
        };
        let secret = self
            .shared_secret
            .as_deref()
            .ok_or_else(|| ConfigError::MissingSecret(key_id.clone()))?;

        Ok(Some(Credentials::from_encoded(
            key_id.as_str(),
            secret,
            self.key_encoding,
        )?))
    }
}
