//! Folio Crypto - Keyed message authentication for media access tokens.
//!
//! This crate provides:
//! - Shared signing secrets with secure memory handling
//! - HMAC-SHA256 tags with URL-safe base64 encoding
//! - Constant-time tag comparison
//!
//! # Example
//!
//! ```
//! use folio_crypto::{MacTag, SigningSecret};
//!
//! let secret = SigningSecret::new("secret123").unwrap();
//!
//! // Authenticate a message
//! let tag = secret.sign(b"game/cover.jpg");
//!
//! // Verify the tag
//! assert!(secret.verify(b"game/cover.jpg", &tag).is_ok());
//!
//! // Tags travel as URL-safe base64
//! let encoded = tag.to_base64url();
//! assert_eq!(MacTag::from_base64url(&encoded).unwrap(), tag);
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

mod error;
mod mac;
mod secret;

pub use error::{CryptoError, CryptoResult};
pub use mac::{MAC_TAG_LEN, MacTag};
pub use secret::SigningSecret;
