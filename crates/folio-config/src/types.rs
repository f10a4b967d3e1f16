//! Configuration types for Folio.
//!
//! All types in this module are self-contained with no dependencies on other
//! internal folio crates. Domain bounds are mirrored here and converted at
//! the boundary. Every struct implements [`Default`] so that a bare
//! `[section]` header in TOML produces a working configuration.

use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};

// ---------------------------------------------------------------------------
// Top-level Config
// ---------------------------------------------------------------------------

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Media token signing and URL assembly.
    pub media: MediaSection,
    /// Logging level, format, and per-crate directives.
    pub logging: LoggingSection,
}

// ---------------------------------------------------------------------------
// MediaSection
// ---------------------------------------------------------------------------

/// Media access token settings.
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct MediaSection {
    /// HMAC key for media tokens. Prefer `FOLIO_MEDIA_SECRET` over storing
    /// this in a file.
    #[serde(skip_serializing)]
    pub secret: Option<String>,
    /// Media host used to assemble access URLs (e.g.
    /// `"https://media.example.com"`). Token-only deployments leave it unset.
    pub base_url: Option<String>,
    /// Lifetime used when a caller does not request one.
    pub default_lifetime_minutes: i64,
    /// Callers re-issue a cached token once fewer than this many seconds
    /// remain on it.
    pub refresh_margin_secs: u64,
}

impl MediaSection {
    /// The configured secret.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingSecret`] if the secret is unset or empty.
    pub fn require_secret(&self) -> ConfigResult<&str> {
        self.secret
            .as_deref()
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::MissingSecret)
    }
}

impl std::fmt::Debug for MediaSection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaSection")
            .field("has_secret", &self.secret.is_some())
            .field("base_url", &self.base_url)
            .field("default_lifetime_minutes", &self.default_lifetime_minutes)
            .field("refresh_margin_secs", &self.refresh_margin_secs)
            .finish()
    }
}

impl Serialize for MediaSection {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("MediaSection", 3)?;
        // secret is intentionally omitted.
        state.serialize_field("base_url", &self.base_url)?;
        state.serialize_field("default_lifetime_minutes", &self.default_lifetime_minutes)?;
        state.serialize_field("refresh_margin_secs", &self.refresh_margin_secs)?;
        state.end()
    }
}

impl Default for MediaSection {
    fn default() -> Self {
        Self {
            secret: None,
            base_url: None,
            default_lifetime_minutes: 60,
            refresh_margin_secs: 60,
        }
    }
}

// ---------------------------------------------------------------------------
// LoggingSection
// ---------------------------------------------------------------------------

/// Logging and tracing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Global log level filter (`"trace"`, `"debug"`, `"info"`, `"warn"`,
    /// `"error"`).
    pub level: String,
    /// Output format: `"pretty"` (human-friendly), `"compact"` (one-line),
    /// `"json"` (structured), or `"full"` (verbose).
    pub format: String,
    /// Per-crate tracing directives (e.g. `["folio_token=debug"]`).
    pub directives: Vec<String>,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            format: "compact".to_owned(),
            directives: Vec::new(),
        }
    }
}
