//! Token payload: the expiry and signature carried inside a token string.
//!
//! Wire layout: `<expires>.<signature>` where `expires` is a canonical
//! decimal Unix timestamp (no sign, no leading zeros) and `signature` is the
//! URL-safe, unpadded base64 HMAC-SHA256 tag. Neither alphabet contains `.`,
//! so the split is unambiguous.

use folio_crypto::{MacTag, SigningSecret};
use std::fmt;
use std::str::FromStr;

use crate::error::{TokenError, TokenResult};
use crate::resource::ResourceName;

/// Version of the signing data format.
/// Increment this when the signing data structure changes.
const SIGNING_DATA_VERSION: u8 = 0x01;

/// Separator between the expiry and signature fields.
pub const TOKEN_SEPARATOR: char = '.';

/// Longest token string accepted by [`TokenPayload::parse`].
///
/// A real token is at most 20 digits + 1 separator + 43 signature chars.
const MAX_TOKEN_LEN: usize = 128;

/// Write a length-prefixed byte slice to the output buffer.
///
/// Format: 4-byte little-endian length followed by the data.
#[allow(clippy::cast_possible_truncation)]
fn write_length_prefixed(data: &mut Vec<u8>, bytes: &[u8]) {
    // Resource names are capped far below u32::MAX.
    data.extend_from_slice(&(bytes.len() as u32).to_le_bytes());
    data.extend_from_slice(bytes);
}

/// The two logical fields of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenPayload {
    /// Unix timestamp (seconds) after which the token is invalid.
    pub expires: u64,
    /// HMAC over the resource name and `expires`.
    pub signature: MacTag,
}

impl TokenPayload {
    /// Sign a resource name and expiry.
    #[must_use]
    pub fn sign(resource: &ResourceName, expires: u64, secret: &SigningSecret) -> Self {
        let signature = secret.sign(&Self::signing_data(resource, expires));
        Self { expires, signature }
    }

    /// Get the data used for signing.
    ///
    /// Format (v1):
    /// - 1 byte: version (0x01)
    /// - Length-prefixed normalized resource name
    /// - 8 bytes: `expires` (u64 LE)
    #[must_use]
    pub fn signing_data(resource: &ResourceName, expires: u64) -> Vec<u8> {
        let name = resource.as_str().as_bytes();
        let mut data = Vec::with_capacity(name.len().saturating_add(13));

        data.push(SIGNING_DATA_VERSION);
        write_length_prefixed(&mut data, name);
        data.extend_from_slice(&expires.to_le_bytes());

        data
    }

    /// Check the signature against a resource name, in constant time.
    #[must_use]
    pub fn verify_signature(&self, resource: &ResourceName, secret: &SigningSecret) -> bool {
        secret
            .verify(&Self::signing_data(resource, self.expires), &self.signature)
            .is_ok()
    }

    /// Serialize to the wire layout.
    #[must_use]
    pub fn encode(&self) -> String {
        format!(
            "{}{TOKEN_SEPARATOR}{}",
            self.expires,
            self.signature.to_base64url()
        )
    }

    /// Parse the wire layout.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::Malformed`] if the string is too long, lacks the
    /// separator, has a non-canonical expiry, or carries an undecodable
    /// signature.
    pub fn parse(token: &str) -> TokenResult<Self> {
        if token.len() > MAX_TOKEN_LEN {
            return Err(TokenError::Malformed("token too long"));
        }

        let (expires, signature) = token
            .split_once(TOKEN_SEPARATOR)
            .ok_or(TokenError::Malformed("missing separator"))?;

        if expires.is_empty() || !expires.bytes().all(|b| b.is_ascii_digit()) {
            return Err(TokenError::Malformed("expiry is not a decimal number"));
        }
        if expires.len() > 1 && expires.starts_with('0') {
            return Err(TokenError::Malformed("expiry has leading zeros"));
        }
        let expires = expires
            .parse::<u64>()
            .map_err(|_| TokenError::Malformed("expiry out of range"))?;

        let signature = MacTag::from_base64url(signature)
            .map_err(|_| TokenError::Malformed("undecodable signature"))?;

        Ok(Self { expires, signature })
    }
}

impl fmt::Display for TokenPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl FromStr for TokenPayload {
    type Err = TokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
