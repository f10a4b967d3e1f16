//! Folio Token - Signed, time-limited access tokens for private media.
//!
//! This crate provides:
//! - A stateless [`TokenCodec`] that issues and verifies tokens
//! - Resource-name normalization and validation
//! - Lifetime clamping and an injectable [`Clock`]
//! - Access URL assembly (`<base>/<resource>?token=<token>`)
//! - A caller-side [`TokenCache`] abstraction with [`CachingIssuer`]
//!
//! # Security Model
//!
//! A token is `<expires>.<signature>` where the signature is HMAC-SHA256 over
//! the normalized resource name and the expiry, keyed by a shared secret.
//! A token is valid only if the signature matches (constant-time compare)
//! for the resource it is presented with, and its expiry is in the future.
//! Nothing is stored: expiry is the only way a token stops working.
//!
//! # Example
//!
//! ```
//! use folio_token::{FailureReason, TokenCodec};
//!
//! let codec = TokenCodec::new("secret123")
//!     .unwrap()
//!     .with_base_url("https://media.example.com")
//!     .unwrap();
//!
//! let issued = codec.generate("/game/cover.jpg", 30).unwrap();
//! assert!(issued.url.unwrap().ends_with(&issued.token));
//!
//! assert!(codec.verify(&issued.token, "game/cover.jpg").is_valid());
//! assert_eq!(
//!     codec.verify(&issued.token, "game/other.jpg").reason(),
//!     Some(FailureReason::BadSignature)
//! );
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

mod access;
#[cfg(feature = "config")]
mod bridge;
mod cache;
mod clock;
mod codec;
mod error;
mod lifetime;
mod payload;
mod resource;

pub use access::{TOKEN_QUERY_PARAM, build_access_url, extract_token, parse_base_url};
pub use cache::{CachingIssuer, DEFAULT_REFRESH_MARGIN, MemoryTokenCache, TokenCache};
pub use clock::{Clock, ManualClock, SystemClock};
pub use codec::{
    FailureReason, IssuedToken, TokenCodec, ValidToken, Verification, batch_generate, generate,
    verify,
};
pub use error::{TokenError, TokenResult};
pub use lifetime::{
    DEFAULT_LIFETIME_MINUTES, Lifetime, MAX_LIFETIME_MINUTES, MIN_LIFETIME_MINUTES,
};
pub use payload::{TOKEN_SEPARATOR, TokenPayload};
pub use resource::{MAX_RESOURCE_NAME_LEN, ResourceName, normalize};
