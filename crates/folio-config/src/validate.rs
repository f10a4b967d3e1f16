//! Post-merge configuration validation.
//!
//! Validates that deserialized [`Config`](crate::Config) values are within
//! acceptable ranges. The secret itself is not required here: token-free
//! tooling can load a config without one, and
//! [`MediaSection::require_secret`](crate::MediaSection::require_secret)
//! enforces it where tokens are issued.

use crate::error::{ConfigError, ConfigResult};
use crate::types::Config;

/// Shortest token lifetime the codec accepts, in minutes.
pub const MIN_LIFETIME_MINUTES: i64 = 1;

/// Longest token lifetime the codec accepts, in minutes.
pub const MAX_LIFETIME_MINUTES: i64 = 120;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error", "off"];
const LOG_FORMATS: &[&str] = &["pretty", "compact", "json", "full"];

/// Validate a fully-merged and deserialized configuration.
///
/// # Errors
///
/// Returns the first validation error found.
pub fn validate(config: &Config) -> ConfigResult<()> {
    validate_media(config)?;
    validate_logging(config)?;
    Ok(())
}

fn validate_media(config: &Config) -> ConfigResult<()> {
    let m = &config.media;

    if let Some(base_url) = m.base_url.as_deref().filter(|u| !u.is_empty()) {
        let parsed = url::Url::parse(base_url).map_err(|e| ConfigError::ValidationError {
            field: "media.base_url".to_owned(),
            message: format!("'{base_url}' is not a valid URL: {e}"),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") || parsed.host().is_none() {
            return Err(ConfigError::ValidationError {
                field: "media.base_url".to_owned(),
                message: format!("'{base_url}' must be an absolute http or https URL"),
            });
        }
    }

    if !(MIN_LIFETIME_MINUTES..=MAX_LIFETIME_MINUTES).contains(&m.default_lifetime_minutes) {
        return Err(ConfigError::ValidationError {
            field: "media.default_lifetime_minutes".to_owned(),
            message: format!(
                "{} is out of range; must be between {MIN_LIFETIME_MINUTES} and {MAX_LIFETIME_MINUTES}",
                m.default_lifetime_minutes
            ),
        });
    }

    let max_lifetime_secs = MAX_LIFETIME_MINUTES.unsigned_abs().saturating_mul(60);
    if m.refresh_margin_secs >= max_lifetime_secs {
        return Err(ConfigError::ValidationError {
            field: "media.refresh_margin_secs".to_owned(),
            message: format!("must be below the maximum token lifetime ({max_lifetime_secs}s)"),
        });
    }

    Ok(())
}

fn validate_logging(config: &Config) -> ConfigResult<()> {
    let l = &config.logging;

    if !LOG_LEVELS.contains(&l.level.to_ascii_lowercase().as_str()) {
        return Err(ConfigError::ValidationError {
            field: "logging.level".to_owned(),
            message: format!(
                "unsupported level '{}'; expected one of: {}",
                l.level,
                LOG_LEVELS.join(", ")
            ),
        });
    }

    if !LOG_FORMATS.contains(&l.format.to_ascii_lowercase().as_str()) {
        return Err(ConfigError::ValidationError {
            field: "logging.format".to_owned(),
            message: format!(
                "unsupported format '{}'; expected one of: {}",
                l.format,
                LOG_FORMATS.join(", ")
            ),
        });
    }

    if l.directives.iter().any(|d| d.trim().is_empty()) {
        return Err(ConfigError::ValidationError {
            field: "logging.directives".to_owned(),
            message: "directives must not be empty".to_owned(),
        });
    }

    Ok(())
}
