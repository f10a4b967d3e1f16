#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
//! Unified configuration system for Folio.
//!
//! This crate provides a single [`Config`] type holding the media token
//! settings (signing secret, media host, lifetimes) and logging settings.
//!
//! # Usage
//!
//! ```rust,no_run
//! use folio_config::Config;
//!
//! // Load with full precedence chain (defaults → env → system → user → file).
//! let resolved = Config::load(None).unwrap();
//! let media = &resolved.config.media;
//! println!("default lifetime: {} minutes", media.default_lifetime_minutes);
//! ```
//!
//! # Configuration Precedence
//!
//! From highest to lowest priority:
//!
//! 1. **Explicit file** passed by the caller
//! 2. **User** (`~/.folio/config.toml`, or `$FOLIO_HOME/config.toml`)
//! 3. **System** (`/etc/folio/config.toml`)
//! 4. **Environment variables** (`FOLIO_MEDIA_SECRET`, `FOLIO_MEDIA_BASE_URL`,
//!    `FOLIO_LOG_LEVEL`, `FOLIO_LOG_FORMAT`), fallback only
//! 5. **Embedded defaults** (`defaults.toml` compiled into binary)
//!
//! # Design
//!
//! This crate has **no dependencies on other internal folio crates**.
//! Conversion to domain types happens at the integration boundary
//! (`folio-token` and `folio-telemetry` behind their `config` features).

/// Environment variable fallback resolution.
pub mod env;
/// Configuration error types.
pub mod error;
/// Configuration file discovery and loading.
pub mod loader;
/// Layered configuration merging with provenance.
pub mod merge;
/// Configuration struct definitions.
pub mod types;
/// Configuration validation rules.
pub mod validate;

// Re-export primary types at the crate root.
pub use error::{ConfigError, ConfigResult};
pub use loader::ResolvedConfig;
pub use merge::{ConfigLayer, FieldSources};
pub use types::*;

impl Config {
    /// Load configuration with full precedence chain.
    ///
    /// See [`loader::load`] for the full algorithm.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if any config file is malformed or the final
    /// configuration fails validation.
    pub fn load(explicit: Option<&std::path::Path>) -> ConfigResult<ResolvedConfig> {
        loader::load(explicit, None)
    }

    /// Load configuration with an explicit `.folio` home directory.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if any config file is malformed or the final
    /// configuration fails validation.
    pub fn load_with_home(
        explicit: Option<&std::path::Path>,
        folio_home: &std::path::Path,
    ) -> ConfigResult<ResolvedConfig> {
        loader::load(explicit, Some(folio_home))
    }

    /// Load configuration from a single file (no layering).
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the file cannot be read, parsed, or fails
    /// validation.
    pub fn load_file(path: &std::path::Path) -> ConfigResult<Self> {
        loader::load_file(path)
    }
}
