//! Prelude module - commonly used types for convenient import.
//!
//! Use `use folio_crypto::prelude::*;` to import all essential types.
//!
//! # Example
//!
//! ```rust
//! use folio_crypto::prelude::*;
//!
//! let secret = SigningSecret::new("secret123").unwrap();
//! let tag = secret.sign(b"hello");
//! assert!(secret.verify(b"hello", &tag).is_ok());
//! ```

// Errors
pub use crate::{CryptoError, CryptoResult};

// Key material
pub use crate::SigningSecret;

// Tags
pub use crate::{MAC_TAG_LEN, MacTag};
