//! HMAC-SHA256 tags.

use serde::{Deserialize, Serialize};
use std::fmt;
use subtle::ConstantTimeEq;

use crate::error::{CryptoError, CryptoResult};

/// Length of an HMAC-SHA256 tag in bytes.
pub const MAC_TAG_LEN: usize = 32;

/// An HMAC-SHA256 tag (32 bytes).
///
/// Equality is constant-time.
#[derive(Clone, Copy)]
pub struct MacTag([u8; MAC_TAG_LEN]);

impl MacTag {
    /// Create from raw bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; MAC_TAG_LEN]) -> Self {
        Self(bytes)
    }

    /// Try to create from a slice.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::InvalidTagLength`] if the slice is not exactly 32 bytes.
    pub fn try_from_slice(slice: &[u8]) -> CryptoResult<Self> {
        if slice.len() != MAC_TAG_LEN {
            return Err(CryptoError::InvalidTagLength {
                expected: MAC_TAG_LEN,
                actual: slice.len(),
            });
        }
        let mut bytes = [0u8; MAC_TAG_LEN];
        bytes.copy_from_slice(slice);
        Ok(Self(bytes))
    }

    /// Get the raw bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; MAC_TAG_LEN] {
        &self.0
    }

    /// Compare with another tag in constant time.
    #[must_use]
    pub fn ct_eq(&self, other: &Self) -> bool {
        bool::from(self.0.ct_eq(&other.0))
    }

    /// Encode as hex string.
    #[must_use]
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Decode from hex string.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not valid hex or not 32 bytes.
    pub fn from_hex(s: &str) -> CryptoResult<Self> {
        let bytes = hex::decode(s).map_err(|_| CryptoError::InvalidHexEncoding)?;
        Self::try_from_slice(&bytes)
    }

    /// Encode as URL-safe base64 without padding.
    #[must_use]
    pub fn to_base64url(&self) -> String {
        use base64::Engine;
        base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(self.0)
    }

    /// Decode from URL-safe base64 without padding.
    ///
    /// Padded or non-canonical encodings are rejected, so every tag has
    /// exactly one textual form.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not valid base64url or not 32 bytes.
    pub fn from_base64url(s: &str) -> CryptoResult<Self> {
        use base64::Engine;
        let bytes = base64::engine::general_purpose::URL_SAFE_NO_PAD
            .decode(s)
            .map_err(|_| CryptoError::InvalidBase64Encoding)?;
        Self::try_from_slice(&bytes)
    }
}

impl PartialEq for MacTag {
    fn eq(&self, other: &Self) -> bool {
        self.ct_eq(other)
    }
}

impl Eq for MacTag {}

impl fmt::Debug for MacTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MacTag({}...)", &self.to_hex()[..16])
    }
}

impl fmt::Display for MacTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_base64url())
    }
}

impl Serialize for MacTag {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_base64url())
    }
}

impl<'de> Deserialize<'de> for MacTag {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::from_base64url(&s).map_err(serde::de::Error::custom)
    }
}

impl From<[u8; MAC_TAG_LEN]> for MacTag {
    fn from(bytes: [u8; MAC_TAG_LEN]) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for MacTag {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base64url_has_no_padding_or_unsafe_chars() {
        let tag = MacTag::from_bytes([0xfb; MAC_TAG_LEN]);
        let encoded = tag.to_base64url();

        assert_eq!(encoded.len(), 43);
        assert!(!encoded.contains('='));
        assert!(!encoded.contains('+'));
        assert!(!encoded.contains('/'));
        assert_eq!(MacTag::from_base64url(&encoded).unwrap(), tag);
    }

    #[test]
    fn test_padded_base64_rejected() {
        let encoded = format!("{}=", MacTag::from_bytes([7; MAC_TAG_LEN]).to_base64url());
        assert!(matches!(
            MacTag::from_base64url(&encoded),
            Err(CryptoError::InvalidBase64Encoding)
        ));
    }

    #[test]
    fn test_wrong_length_rejected() {
        use base64::Engine;
        let short = base64::engine::general_purpose::URL_SAFE_NO_PAD.encode([1u8; 31]);
        assert!(matches!(
            MacTag::from_base64url(&short),
            Err(CryptoError::InvalidTagLength {
                expected: 32,
                actual: 31
            })
        ));
    }

    #[test]
    fn test_ct_eq() {
        let a = MacTag::from_bytes([1; MAC_TAG_LEN]);
        let mut other = [1; MAC_TAG_LEN];
        other[31] = 2;
        let b = MacTag::from_bytes(other);

        assert!(a.ct_eq(&a));
        assert!(!a.ct_eq(&b));
        assert_ne!(a, b);
    }

    #[test]
    fn test_serde_as_base64url() {
        let tag = MacTag::from_bytes([9; MAC_TAG_LEN]);
        let json = serde_json::to_string(&tag).unwrap();
        assert_eq!(json, format!("\"{}\"", tag.to_base64url()));

        let parsed: MacTag = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, tag);
    }

    #[test]
    fn test_hex_roundtrip() {
        let tag = MacTag::from_bytes([0xab; MAC_TAG_LEN]);
        assert_eq!(MacTag::from_hex(&tag.to_hex()).unwrap(), tag);
        assert!(MacTag::from_hex("zz").is_err());
    }
}
