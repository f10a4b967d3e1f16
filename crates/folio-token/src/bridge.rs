//! Construction from `folio-config` sections.

use folio_config::MediaSection;
use std::time::Duration;

use crate::cache::{CachingIssuer, TokenCache};
use crate::codec::TokenCodec;
use crate::error::{TokenError, TokenResult};

impl TokenCodec {
    /// Build a codec from the `[media]` config section.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::MissingSecret`] if no secret is configured, or
    /// [`TokenError::InvalidBaseUrl`] if the base URL is unusable.
    pub fn from_media_config(media: &MediaSection) -> TokenResult<Self> {
        let secret = media
            .require_secret()
            .map_err(|_| TokenError::MissingSecret)?;

        let mut codec = Self::new(secret)?.with_default_lifetime(media.default_lifetime_minutes);
        if let Some(base_url) = media.base_url.as_deref().filter(|u| !u.is_empty()) {
            codec = codec.with_base_url(base_url)?;
        }

        tracing::info!(
            secret = %codec.secret_fingerprint(),
            base_url = media.base_url.as_deref().unwrap_or("-"),
            default_lifetime_minutes = codec.default_lifetime().minutes(),
            "media token codec ready"
        );
        Ok(codec)
    }
}

impl<C: TokenCache> CachingIssuer<C> {
    /// Build a caching issuer from the `[media]` config section.
    ///
    /// # Errors
    ///
    /// See [`TokenCodec::from_media_config`].
    pub fn from_media_config(media: &MediaSection, cache: C) -> TokenResult<Self> {
        let codec = TokenCodec::from_media_config(media)?;
        Ok(Self::new(codec, cache)
            .with_refresh_margin(Duration::from_secs(media.refresh_margin_secs)))
    }
}
