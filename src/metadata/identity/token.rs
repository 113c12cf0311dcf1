//! Public key tokens (ECMA-335 II.6.2.1.3).

use std::{fmt, str::FromStr};

use sha1::{Digest, Sha1};

use crate::ParseError;

/// The 8-byte fingerprint of a strong-name public key.
///
/// The token is the last 8 bytes of the SHA-1 digest of the full public key, in reverse
/// order. Its textual form is 16 lowercase hex digits, as it appears in display names
/// and in the cache directory names (`<version>__<token>`).
///
/// # Examples
///
/// ```rust
/// use gacscope::metadata::identity::PublicKeyToken;
///
/// let ecma_key = [0u8, 0, 0, 0, 0, 0, 0, 0, 4, 0, 0, 0, 0, 0, 0, 0];
/// let token = PublicKeyToken::from_public_key(&ecma_key);
/// assert_eq!(token.to_string(), "b77a5c561934e089");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PublicKeyToken([u8; 8]);

impl PublicKeyToken {
    /// Wrap raw token bytes, in display order.
    #[must_use]
    pub const fn new(bytes: [u8; 8]) -> Self {
        PublicKeyToken(bytes)
    }

    /// Compute the token of a full public key blob.
    #[must_use]
    pub fn from_public_key(public_key: &[u8]) -> Self {
        let mut hasher = Sha1::new();
        hasher.update(public_key);
        let digest = hasher.finalize();

        let mut bytes = [0u8; 8];
        for (target, source) in bytes.iter_mut().zip(digest.iter().rev()) {
            *target = *source;
        }

        PublicKeyToken(bytes)
    }

    /// Parse 16 hex digits, either case.
    ///
    /// # Errors
    /// Returns [`ParseError::Malformed`] for non-hex input or a length other than 16 digits.
    pub fn from_hex(value: &str) -> Result<Self, ParseError> {
        let decoded = hex::decode(value).map_err(|error| {
            ParseError::Malformed(format!("Invalid hex in PublicKeyToken '{value}': {error}"))
        })?;

        let bytes: [u8; 8] = decoded.try_into().map_err(|bytes: Vec<u8>| {
            ParseError::Malformed(format!(
                "PublicKeyToken must be exactly 8 bytes (16 hex characters), got {} bytes from '{value}'",
                bytes.len()
            ))
        })?;

        Ok(PublicKeyToken(bytes))
    }

    /// The raw token bytes, in display order.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 8] {
        &self.0
    }

    /// Lowercase hex text of an optional token; `None` stays `None`.
    #[must_use]
    pub fn encode(token: Option<&Self>) -> Option<String> {
        token.map(|token| hex::encode(token.0))
    }
}

impl fmt::Display for PublicKeyToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl FromStr for PublicKeyToken {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}
