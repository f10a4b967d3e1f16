//! The token codec: issue and verify signed, time-limited access tokens.
//!
//! The codec is stateless apart from its injected configuration (secret,
//! optional base URL, clock), so one instance can be shared freely across
//! threads and request handlers.

use chrono::{DateTime, SecondsFormat, Utc};
use folio_crypto::SigningSecret;
use serde::Serialize;
use serde::ser::SerializeStruct;
use std::fmt;
use std::sync::Arc;
use tracing::debug;
use url::Url;

use crate::access::{build_access_url, parse_base_url};
use crate::clock::{Clock, SystemClock};
use crate::error::{TokenError, TokenResult};
use crate::lifetime::Lifetime;
use crate::payload::TokenPayload;
use crate::resource::ResourceName;

/// A freshly issued token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IssuedToken {
    /// The normalized resource the token is bound to.
    pub resource: ResourceName,
    /// The opaque, URL-safe token string.
    pub token: String,
    /// Unix timestamp (seconds) after which the token is invalid.
    pub expires: u64,
    /// ISO-8601 rendering of `expires`.
    #[serde(rename = "expiresAtISO")]
    pub expires_at_iso: String,
    /// Full access URL, when the codec has a base URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Details of a token that passed verification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidToken {
    /// Unix timestamp (seconds) after which the token is invalid.
    pub expires: u64,
    /// ISO-8601 rendering of `expires`.
    #[serde(rename = "expiresAtISO")]
    pub expires_at_iso: String,
    /// Seconds until `expires`.
    pub remaining_seconds: u64,
}

/// Why a token failed verification.
///
/// Meant for internal logging; untrusted clients should only ever learn
/// that the resource is unavailable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FailureReason {
    /// The token does not parse into expiry and signature.
    Malformed,
    /// The signature does not match this resource and secret.
    BadSignature,
    /// The token is authentic but its expiry has passed.
    Expired,
}

impl FailureReason {
    /// Stable taxonomy label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Malformed => "MALFORMED",
            Self::BadSignature => "BAD_SIGNATURE",
            Self::Expired => "EXPIRED",
        }
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of [`TokenCodec::verify`].
///
/// Serializes as `{"valid": true, "expires", "expiresAtISO",
/// "remainingSeconds"}` or `{"valid": false, "reason"}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verification {
    /// The token is authentic, bound to the resource, and unexpired.
    Valid(ValidToken),
    /// The token must not grant access.
    Invalid(FailureReason),
}

impl Verification {
    /// Whether the token grants access.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid(_))
    }

    /// The failure reason, if verification failed.
    #[must_use]
    pub fn reason(&self) -> Option<FailureReason> {
        match self {
            Self::Valid(_) => None,
            Self::Invalid(reason) => Some(*reason),
        }
    }

    /// Seconds of validity left, if verification succeeded.
    #[must_use]
    pub fn remaining_seconds(&self) -> Option<u64> {
        match self {
            Self::Valid(valid) => Some(valid.remaining_seconds),
            Self::Invalid(_) => None,
        }
    }
}

impl Serialize for Verification {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Valid(valid) => {
                let mut state = serializer.serialize_struct("Verification", 4)?;
                state.serialize_field("valid", &true)?;
                state.serialize_field("expires", &valid.expires)?;
                state.serialize_field("expiresAtISO", &valid.expires_at_iso)?;
                state.serialize_field("remainingSeconds", &valid.remaining_seconds)?;
                state.end()
            },
            Self::Invalid(reason) => {
                let mut state = serializer.serialize_struct("Verification", 2)?;
                state.serialize_field("valid", &false)?;
                state.serialize_field("reason", reason)?;
                state.end()
            },
        }
    }
}

/// Render a Unix timestamp as ISO-8601 UTC with second precision.
fn to_iso8601(secs: u64) -> String {
    i64::try_from(secs)
        .ok()
        .and_then(|s| DateTime::<Utc>::from_timestamp(s, 0))
        .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Secs, true))
        .unwrap_or_default()
}

/// Issues and verifies media access tokens under one shared secret.
#[derive(Clone)]
pub struct TokenCodec {
    secret: SigningSecret,
    base_url: Option<Url>,
    default_lifetime: Lifetime,
    clock: Arc<dyn Clock>,
}

impl TokenCodec {
    /// Create a codec keyed by `secret`, using the system clock.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::MissingSecret`] if the secret is empty.
    pub fn new(secret: impl AsRef<[u8]>) -> TokenResult<Self> {
        let secret = SigningSecret::new(secret).map_err(|_| TokenError::MissingSecret)?;
        Ok(Self {
            secret,
            base_url: None,
            default_lifetime: Lifetime::default(),
            clock: Arc::new(SystemClock),
        })
    }

    /// Assemble access URLs against this media host.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::InvalidBaseUrl`] if the URL is not an absolute
    /// `http`/`https` URL.
    pub fn with_base_url(mut self, base_url: &str) -> TokenResult<Self> {
        self.base_url = Some(parse_base_url(base_url)?);
        Ok(self)
    }

    /// Replace the time source.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Set the lifetime used by [`generate_default`](Self::generate_default).
    #[must_use]
    pub fn with_default_lifetime(mut self, minutes: i64) -> Self {
        self.default_lifetime = Lifetime::clamped(minutes);
        self
    }

    /// The configured media host, if any.
    #[must_use]
    pub fn base_url(&self) -> Option<&Url> {
        self.base_url.as_ref()
    }

    /// The lifetime used by [`generate_default`](Self::generate_default).
    #[must_use]
    pub fn default_lifetime(&self) -> Lifetime {
        self.default_lifetime
    }

    /// Log-safe identifier of the signing secret.
    #[must_use]
    pub fn secret_fingerprint(&self) -> String {
        self.secret.fingerprint()
    }

    /// Current time according to this codec's clock.
    #[must_use]
    pub fn now(&self) -> u64 {
        self.clock.now()
    }

    /// Issue a token for `resource` valid for `lifetime_minutes`.
    ///
    /// The lifetime is clamped into the allowed range. Leading slashes on the
    /// resource name are stripped before signing.
    ///
    /// # Errors
    ///
    /// Returns an `INVALID_INPUT` [`TokenError`] if the resource name is
    /// rejected.
    pub fn generate(&self, resource: &str, lifetime_minutes: i64) -> TokenResult<IssuedToken> {
        let resource = ResourceName::parse(resource)?;
        let lifetime = Lifetime::clamped(lifetime_minutes);
        if i64::try_from(lifetime.minutes()).ok() != Some(lifetime_minutes) {
            debug!(
                requested = lifetime_minutes,
                applied = lifetime.minutes(),
                "token lifetime clamped"
            );
        }
        Ok(self.issue(resource, lifetime))
    }

    /// Issue a token with the codec's default lifetime.
    ///
    /// # Errors
    ///
    /// Returns an `INVALID_INPUT` [`TokenError`] if the resource name is
    /// rejected.
    pub fn generate_default(&self, resource: &str) -> TokenResult<IssuedToken> {
        let resource = ResourceName::parse(resource)?;
        Ok(self.issue(resource, self.default_lifetime))
    }

    /// Issue one token per resource, preserving input order.
    ///
    /// Each entry succeeds or fails on its own; an invalid name never stops
    /// the rest of the batch.
    pub fn batch_generate<I, S>(
        &self,
        resources: I,
        lifetime_minutes: i64,
    ) -> Vec<TokenResult<IssuedToken>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        resources
            .into_iter()
            .map(|resource| self.generate(resource.as_ref(), lifetime_minutes))
            .collect()
    }

    fn issue(&self, resource: ResourceName, lifetime: Lifetime) -> IssuedToken {
        let expires = self.clock.now().saturating_add(lifetime.seconds());
        let token = TokenPayload::sign(&resource, expires, &self.secret).encode();
        let url = self
            .base_url
            .as_ref()
            .map(|base| build_access_url(base, &resource, &token));

        debug!(
            resource = %resource,
            expires,
            lifetime_minutes = lifetime.minutes(),
            "issued media token"
        );

        IssuedToken {
            resource,
            token,
            expires,
            expires_at_iso: to_iso8601(expires),
            url,
        }
    }

    /// Verify that `token` grants access to `resource` right now.
    ///
    /// Checks run in order: structure, signature (constant-time), expiry.
    /// Never fails; every problem maps to a [`FailureReason`].
    #[must_use]
    pub fn verify(&self, token: &str, resource: &str) -> Verification {
        let payload = match TokenPayload::parse(token) {
            Ok(payload) => payload,
            Err(e) => {
                debug!(error = %e, "token rejected");
                return Verification::Invalid(FailureReason::Malformed);
            },
        };

        // A name that could never be issued cannot carry a valid signature.
        let Ok(resource) = ResourceName::parse(resource) else {
            debug!("token rejected: resource name not signable");
            return Verification::Invalid(FailureReason::BadSignature);
        };

        if !payload.verify_signature(&resource, &self.secret) {
            debug!(resource = %resource, "token rejected: signature mismatch");
            return Verification::Invalid(FailureReason::BadSignature);
        }

        let now = self.clock.now();
        if payload.expires <= now {
            debug!(
                resource = %resource,
                expires = payload.expires,
                now,
                "token rejected: expired"
            );
            return Verification::Invalid(FailureReason::Expired);
        }

        Verification::Valid(ValidToken {
            expires: payload.expires,
            expires_at_iso: to_iso8601(payload.expires),
            remaining_seconds: payload.expires.saturating_sub(now),
        })
    }
}

impl fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenCodec")
            .field("secret", &self.secret)
            .field("base_url", &self.base_url.as_ref().map(Url::as_str))
            .field("default_lifetime", &self.default_lifetime)
            .field("clock", &self.clock)
            .finish()
    }
}

/// Issue a token for `name` under `secret` (no URL assembly).
///
/// # Errors
///
/// Returns [`TokenError::MissingSecret`] for an empty secret, or another
/// `INVALID_INPUT` error if the name is rejected.
pub fn generate(name: &str, secret: &str, minutes: i64) -> TokenResult<IssuedToken> {
    TokenCodec::new(secret)?.generate(name, minutes)
}

/// Verify `token` for `name` under `secret`.
///
/// # Errors
///
/// Returns [`TokenError::MissingSecret`] for an empty secret. Every
/// token-level failure is reported through [`Verification`] instead.
pub fn verify(token: &str, name: &str, secret: &str) -> TokenResult<Verification> {
    Ok(TokenCodec::new(secret)?.verify(token, name))
}

/// Issue one token per name under `secret`, preserving order.
///
/// # Errors
///
/// Returns [`TokenError::MissingSecret`] for an empty secret. Per-name
/// failures are reported in the returned entries.
pub fn batch_generate<S: AsRef<str>>(
    names: &[S],
    secret: &str,
    minutes: i64,
) -> TokenResult<Vec<TokenResult<IssuedToken>>> {
    Ok(TokenCodec::new(secret)?.batch_generate(names, minutes))
}
