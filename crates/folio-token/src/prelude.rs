//! Prelude module - commonly used types for convenient import.
//!
//! Use `use folio_token::prelude::*;` to import all essential types.
//!
//! # Example
//!
//! ```rust
//! use folio_token::prelude::*;
//!
//! let codec = TokenCodec::new("secret123").unwrap();
//! let issued = codec.generate("a/b.jpg", 10).unwrap();
//! assert!(codec.verify(&issued.token, "/a/b.jpg").is_valid());
//! ```

// Errors
pub use crate::{TokenError, TokenResult};

// Codec
pub use crate::{FailureReason, IssuedToken, TokenCodec, ValidToken, Verification};

// Building blocks
pub use crate::{Lifetime, ResourceName, TokenPayload};

// Time
pub use crate::{Clock, ManualClock, SystemClock};

// Caching
pub use crate::{CachingIssuer, MemoryTokenCache, TokenCache};
