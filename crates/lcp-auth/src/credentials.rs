//! Shared secrets, credentials and credential lookup.
//!
//! A [`SharedSecret`] is the decoded HMAC key. How the configured secret text
//! turns into key bytes is selected by [`KeyEncoding`]; deployments have used
//! both the raw text and a URL-safe base64 encoding of the key material.
//!
//! The verifier resolves secrets through the [`CredentialProvider`] trait, with
//! [`StaticCredentialProvider`] as the in-memory implementation.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::{Engine, alphabet};
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, KeyError};

/// How shared secret text is turned into HMAC key bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyEncoding {
    /// The UTF-8 bytes of the secret are the key.
    Raw,
    /// The secret is URL-safe base64 (padding optional) of the key bytes.
    #[default]
    Base64Url,
}

impl KeyEncoding {
    /// Return the configuration spelling of this encoding.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Raw => "raw",
            Self::Base64Url => "base64url",
        }
    }
}

impl fmt::Display for KeyEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for KeyEncoding {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "raw" => Ok(Self::Raw),
            "base64url" => Ok(Self::Base64Url),
            _ => Err(ConfigError::InvalidValue {
                name: "key encoding",
                value: s.to_owned(),
            }),
        }
    }
}

/// Decoded HMAC key material.
///
/// The `Debug` output never contains the key.
#[derive(Clone, PartialEq, Eq)]
pub struct SharedSecret(Vec<u8>);

impl SharedSecret {
    /// Wrap raw key bytes.
    #[must_use]
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// Decode secret text with the given encoding.
    ///
    /// # Errors
    ///
    /// Returns [`KeyError::Empty`] for an empty secret and
    /// [`KeyError::InvalidBase64`] when a base64url secret does not decode.
    ///
    /// # Examples
    ///
    /// ```
    /// use lcp_auth::credentials::{KeyEncoding, SharedSecret};
    ///
    /// let secret = SharedSecret::decode("c2VjcmV0LWtleQ", KeyEncoding::Base64Url).unwrap();
    /// assert_eq!(secret.as_bytes(), b"secret-key");
    /// ```
    pub fn decode(secret: &str, encoding: KeyEncoding) -> Result<Self, KeyError> {
        if secret.is_empty() {
            return Err(KeyError::Empty);
        }
        match encoding {
            KeyEncoding::Raw => Ok(Self(secret.as_bytes().to_vec())),
            KeyEncoding::Base64Url => decode_base64url(secret).map(Self),
        }
    }

    /// The key bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for SharedSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SharedSecret(<redacted>)")
    }
}

/// URL-safe base64 that accepts secrets with or without `=` padding.
const BASE64_URL: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

fn decode_base64url(secret: &str) -> Result<Vec<u8>, KeyError> {
    BASE64_URL
        .decode(secret)
        .map_err(|_| KeyError::InvalidBase64)
}

/// A key id and the secret it names.
///
/// The key id is public; only the secret is sensitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Identifier sent in the `id` field of the header.
    pub key_id: String,
    /// The decoded shared secret.
    pub secret: SharedSecret,
}

impl Credentials {
    /// Pair a key id with an already decoded secret.
    #[must_use]
    pub fn new(key_id: impl Into<String>, secret: SharedSecret) -> Self {
        Self {
            key_id: key_id.into(),
            secret,
        }
    }

    /// Pair a key id with secret text decoded using `encoding`.
    ///
    /// # Errors
    ///
    /// Propagates any [`KeyError`] from [`SharedSecret::decode`].
    pub fn from_encoded(
        key_id: impl Into<String>,
        secret: &str,
        encoding: KeyEncoding,
    ) -> Result<Self, KeyError> {
        Ok(Self::new(key_id, SharedSecret::decode(secret, encoding)?))
    }
}

/// Trait for looking up shared secrets by key id.
///
/// Implementations may back this with a database, configuration file,
/// or any other credential store.
pub trait CredentialProvider: Send + Sync {
    /// Retrieve the secret for `key_id`, or `None` when the key id is unknown.
    fn get_secret(&self, key_id: &str) -> Option<SharedSecret>;
}

/// A simple in-memory credential provider backed by a `HashMap`.
///
/// # Examples
///
/// ```
/// use lcp_auth::credentials::{CredentialProvider, SharedSecret, StaticCredentialProvider};
///
/// let provider = StaticCredentialProvider::new(vec![(
///     "key-1".to_owned(),
///     SharedSecret::from_bytes(b"secret".to_vec()),
/// )]);
///
/// assert!(provider.get_secret("key-1").is_some());
/// assert!(provider.get_secret("key-2").is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct StaticCredentialProvider {
    secrets: HashMap<String, SharedSecret>,
}

impl StaticCredentialProvider {
    /// Create a provider from an iterable of `(key_id, secret)` pairs.
    pub fn new(secrets: impl IntoIterator<Item = (String, SharedSecret)>) -> Self {
        Self {
            secrets: secrets.into_iter().collect(),
        }
    }

    /// Create a provider from encoded secret text, decoding every entry with `encoding`.
    ///
    /// # Errors
    ///
    /// Returns the first [`KeyError`] encountered.
    pub fn from_encoded(
        secrets: impl IntoIterator<Item = (String, String)>,
        encoding: KeyEncoding,
    ) -> Result<Self, KeyError> {
        let secrets = secrets
            .into_iter()
            .map(|(key_id, secret)| Ok((key_id, SharedSecret::decode(&secret, encoding)?)))
            .collect::<Result<HashMap<_, _>, KeyError>>()?;
        Ok(Self { secrets })
    }

    /// Add or replace a credential.
    pub fn insert(&mut self, credentials: Credentials) {
        self.secrets.insert(credentials.key_id, credentials.secret);
    }
}

impl From<Credentials> for StaticCredentialProvider {
    fn from(credentials: Credentials) -> Self {
        let mut provider = Self::default();
        provider.insert(credentials);
        provider
    }
}

impl CredentialProvider for StaticCredentialProvider {
    fn get_secret(&self, key_id: &str) -> Option<SharedSecret> {
        self.secrets.get(key_id).cloned()
    }
}
