//! Identifier types for lightdeck.
//!
//! `LightId` is the remote backend's entity id (`light.kitchen`), kept as an
//! opaque string so that malformed ids can still be loaded and reported by
//! validation. `SessionToken` is a 256-bit random value, hex-encoded on the
//! wire.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Domain used for service calls when an id has no `.` separator.
pub const FALLBACK_DOMAIN: &str = "light";

/// A domain-qualified light identifier, e.g. `light.kitchen`.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LightId(String);

impl LightId {
    /// Wrap an identifier string without validating it.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Return the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The substring before the first `.`, or `light` when there is none.
    #[must_use]
    pub fn domain(&self) -> &str {
        match self.0.split_once('.') {
            Some((domain, _)) => domain,
            None => FALLBACK_DOMAIN,
        }
    }

    /// Whether the id matches `^[A-Za-z0-9_]+\.[A-Za-z0-9_]+$`.
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        let Some((domain, name)) = self.0.split_once('.') else {
            return false;
        };
        is_word(domain) && is_word(name)
    }
}

fn is_word(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_')
}

impl fmt::Debug for LightId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LightId({})", self.0)
    }
}

impl fmt::Display for LightId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for LightId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// A 32-byte session token, hex-encoded for cookies.
///
/// Tokens are generated from the operating system's CSPRNG and are only ever
/// compared against stored tokens by the session table.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct SessionToken([u8; 32]);

impl SessionToken {
    /// Length of the hex encoding.
    pub const HEX_LEN: usize = 64;

    /// Generate a fresh random token.
    #[must_use]
    pub fn generate() -> Self {
        Self(rand::random())
    }

    /// Create a token from raw bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Parse a token from its 64-character hex encoding.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not valid hex or not exactly 64 characters.
    pub fn from_hex(s: &str) -> Result<Self, IdError> {
        let bytes = hex::decode(s).map_err(|_| IdError::InvalidHex)?;
        let arr: [u8; 32] = bytes.try_into().map_err(|_| IdError::InvalidLength {
            expected: 32,
            got: s.len() / 2,
        })?;
        Ok(Self(arr))
    }

    /// Return the underlying bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Return the hex-encoded string representation.
    #[must_use]
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for SessionToken {
    // Never print the secret itself.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionToken(..)")
    }
}

impl FromStr for SessionToken {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

/// Errors that can occur when parsing identifiers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdError {
    /// The input is not valid hexadecimal.
    #[error("invalid hex encoding")]
    InvalidHex,

    /// The decoded bytes have the wrong length.
    #[error("invalid length: expected {expected} bytes, got {got}")]
    InvalidLength {
        /// Expected number of bytes.
        expected: usize,
        /// Actual number of bytes.
        got: usize,
    },
}
