//! Shared signing secrets with secure memory handling.
//!
//! A [`SigningSecret`] is opaque key material provided out of band (usually
//! through configuration). It is never embedded in a token and never logged;
//! use [`SigningSecret::fingerprint`] when a secret needs to be identified in
//! diagnostics.

use std::fmt;

use hmac::digest::{Key, KeyInit};
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};
use zeroize::ZeroizeOnDrop;

use crate::error::{CryptoError, CryptoResult};
use crate::mac::{MAC_TAG_LEN, MacTag};

type HmacSha256 = Hmac<Sha256>;

/// SHA-256 block size, the width of an HMAC key block.
const KEY_BLOCK_LEN: usize = 64;

/// HMAC-SHA256 key material.
///
/// Holds the key as an HMAC key block: keys up to the block size are
/// zero-padded, longer keys are replaced by their SHA-256 digest. This is
/// exactly what HMAC does internally, so tags match keying with the raw
/// bytes. The block is zeroized on drop. No keyed MAC state is cached; each
/// [`sign`](Self::sign) builds a short-lived one.
#[derive(Clone, ZeroizeOnDrop)]
pub struct SigningSecret {
    block: [u8; KEY_BLOCK_LEN],
}

impl SigningSecret {
    /// Create a secret from raw key material.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::EmptySecret`] if the key is empty.
    pub fn new(key: impl AsRef<[u8]>) -> CryptoResult<Self> {
        let key = key.as_ref();
        if key.is_empty() {
            return Err(CryptoError::EmptySecret);
        }

        let mut block = [0u8; KEY_BLOCK_LEN];
        if key.len() > KEY_BLOCK_LEN {
            block[..MAC_TAG_LEN].copy_from_slice(&Sha256::digest(key));
        } else {
            block[..key.len()].copy_from_slice(key);
        }

        Ok(Self { block })
    }

    /// Compute the HMAC-SHA256 tag of a message.
    #[must_use]
    pub fn sign(&self, message: &[u8]) -> MacTag {
        let mut mac = <HmacSha256 as KeyInit>::new(Key::<HmacSha256>::from_slice(&self.block));
        mac.update(message);
        let digest = mac.finalize().into_bytes();

        let mut bytes = [0u8; MAC_TAG_LEN];
        bytes.copy_from_slice(&digest);
        MacTag::from_bytes(bytes)
    }

    /// Verify a tag against a message in constant time.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::TagVerificationFailed`] if the tag does not match.
    pub fn verify(&self, message: &[u8], tag: &MacTag) -> CryptoResult<()> {
        let expected = self.sign(message);
        if expected.ct_eq(tag) {
            Ok(())
        } else {
            Err(CryptoError::TagVerificationFailed)
        }
    }

    /// Short identifier for this secret (first 4 bytes of its SHA-256, hex).
    ///
    /// Safe to log: it identifies which secret is in use (e.g. across a
    /// rotation) without revealing the key.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        let digest = Sha256::digest(self.block);
        hex::encode(&digest[..4])
    }
}

impl fmt::Debug for SigningSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SigningSecret({})", self.fingerprint())
    }
}
