//! Caller-side token caching.
//!
//! The codec never caches. Page loaders and request handlers that want to
//! avoid re-issuing a token on every render go through a [`TokenCache`],
//! usually via [`CachingIssuer`]. Entries are keyed by normalized resource
//! name and are replaced, never mutated in place.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;
use tracing::debug;

use crate::clock::{Clock, SystemClock};
use crate::codec::{IssuedToken, TokenCodec};
use crate::error::TokenResult;
use crate::lifetime::Lifetime;
use crate::resource::ResourceName;

/// Default window before expiry in which a cached token is re-issued.
pub const DEFAULT_REFRESH_MARGIN: Duration = Duration::from_secs(60);

/// A replaceable store of issued tokens.
pub trait TokenCache: Send + Sync {
    /// Fetch a live entry.
    fn get(&self, key: &str) -> Option<IssuedToken>;

    /// Store an entry for at most `ttl`, replacing any previous one.
    fn set(&self, key: &str, value: IssuedToken, ttl: Duration);

    /// Drop every entry.
    fn clear(&self);
}

struct CacheEntry {
    value: IssuedToken,
    evict_at: u64,
}

/// In-memory [`TokenCache`].
pub struct MemoryTokenCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
    clock: Arc<dyn Clock>,
}

impl MemoryTokenCache {
    /// Create an empty cache on the system clock.
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Create an empty cache on a custom clock.
    #[must_use]
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            clock,
        }
    }

    /// Number of stored entries, including ones past their TTL.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether the cache holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove entries past their TTL. Returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        let mut entries = self
            .entries
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let before = entries.len();
        entries.retain(|_, entry| entry.evict_at > now);
        before.saturating_sub(entries.len())
    }
}

impl Default for MemoryTokenCache {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenCache for MemoryTokenCache {
    fn get(&self, key: &str) -> Option<IssuedToken> {
        let now = self.clock.now();
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries
            .get(key)
            .filter(|entry| entry.evict_at > now)
            .map(|entry| entry.value.clone())
    }

    fn set(&self, key: &str, value: IssuedToken, ttl: Duration) {
        let now = self.clock.now();
        let evict_at = now.saturating_add(ttl.as_secs());
        let mut entries = self
            .entries
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        entries.retain(|_, entry| entry.evict_at > now);
        entries.insert(key.to_owned(), CacheEntry { value, evict_at });
    }

    fn clear(&self) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

/// Issues tokens through a cache, re-issuing shortly before expiry.
pub struct CachingIssuer<C: TokenCache> {
    codec: TokenCodec,
    cache: C,
    refresh_margin: Duration,
}

impl<C: TokenCache> CachingIssuer<C> {
    /// Wrap a codec and cache with the default refresh margin.
    #[must_use]
    pub fn new(codec: TokenCodec, cache: C) -> Self {
        Self {
            codec,
            cache,
            refresh_margin: DEFAULT_REFRESH_MARGIN,
        }
    }

    /// Re-issue tokens once fewer than `margin` remain on the cached one.
    #[must_use]
    pub fn with_refresh_margin(mut self, margin: Duration) -> Self {
        self.refresh_margin = margin;
        self
    }

    /// The wrapped codec.
    #[must_use]
    pub fn codec(&self) -> &TokenCodec {
        &self.codec
    }

    /// The backing cache.
    #[must_use]
    pub fn cache(&self) -> &C {
        &self.cache
    }

    /// Return a cached token for `resource` or issue and cache a new one.
    ///
    /// # Errors
    ///
    /// Returns an `INVALID_INPUT` [`TokenError`](crate::TokenError) if the
    /// resource name is rejected.
    pub fn issue(&self, resource: &str, lifetime_minutes: i64) -> TokenResult<IssuedToken> {
        let name = ResourceName::parse(resource)?;
        let margin = self.refresh_margin.as_secs();
        let lifetime = Lifetime::clamped(lifetime_minutes).seconds();

        if let Some(cached) = self.cache.get(name.as_str()) {
            let remaining = cached.expires.saturating_sub(self.codec.now());
            // A cached token may be shorter than asked for, never longer.
            if remaining > margin && remaining <= lifetime {
                debug!(resource = %name, remaining, "token cache hit");
                return Ok(cached);
            }
        }

        let issued = self.codec.generate(name.as_str(), lifetime_minutes)?;
        let ttl = issued
            .expires
            .saturating_sub(self.codec.now())
            .saturating_sub(margin);
        self.cache
            .set(name.as_str(), issued.clone(), Duration::from_secs(ttl));

        Ok(issued)
    }

    /// Issue through the cache with the codec's default lifetime.
    ///
    /// # Errors
    ///
    /// Returns an `INVALID_INPUT` [`TokenError`](crate::TokenError) if the
    /// resource name is rejected.
    pub fn issue_default(&self, resource: &str) -> TokenResult<IssuedToken> {
        let minutes = i64::try_from(self.codec.default_lifetime().minutes()).unwrap_or(i64::MAX);
        self.issue(resource, minutes)
    }

    /// Drop every cached token, e.g. after a secret rotation.
    pub fn invalidate_all(&self) {
        self.cache.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;

    const T: u64 = 1_700_000_000;

    fn setup() -> (CachingIssuer<MemoryTokenCache>, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(T));
        let shared: Arc<dyn Clock> = clock.clone();
        let codec = TokenCodec::new("secret123")
            .unwrap()
            .with_clock(Arc::clone(&shared));
        let issuer = CachingIssuer::new(codec, MemoryTokenCache::with_clock(shared));
        (issuer, clock)
    }

    #[test]
    fn test_memory_cache_ttl() {
        let clock = Arc::new(ManualClock::new(T));
        let cache = MemoryTokenCache::with_clock(clock.clone());
        let codec = TokenCodec::new("s").unwrap();
        let token = codec.generate("a.jpg", 5).unwrap();

        cache.set("a.jpg", token.clone(), Duration::from_secs(10));
        assert_eq!(cache.get("a.jpg"), Some(token));
        assert_eq!(cache.get("b.jpg"), None);

        clock.advance(10);
        assert_eq!(cache.get("a.jpg"), None);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.purge_expired(), 1);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_memory_cache_set_drops_stale_entries() {
        let clock = Arc::new(ManualClock::new(T));
        let cache = MemoryTokenCache::with_clock(clock.clone());
        let codec = TokenCodec::new("s").unwrap();

        for name in ["a.jpg", "b.jpg", "c.jpg"] {
            cache.set(name, codec.generate(name, 5).unwrap(), Duration::from_secs(10));
        }
        assert_eq!(cache.len(), 3);

        clock.advance(10);
        cache.set("d.jpg", codec.generate("d.jpg", 5).unwrap(), Duration::from_secs(10));
        assert_eq!(cache.len(), 1);
        assert!(cache.get("d.jpg").is_some());
    }

    #[test]
    fn test_memory_cache_clear() {
        let cache = MemoryTokenCache::new();
        let codec = TokenCodec::new("s").unwrap();
        cache.set("a", codec.generate("a", 5).unwrap(), Duration::from_secs(60));
        cache.set("b", codec.generate("b", 5).unwrap(), Duration::from_secs(60));
        assert_eq!(cache.len(), 2);

        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_issuer_reuses_until_margin() {
        let (issuer, clock) = setup();
        let first = issuer.issue("/a.jpg", 10).unwrap();

        clock.advance(60);
        let second = issuer.issue("a.jpg", 10).unwrap();
        assert_eq!(first, second);

        // 600s lifetime, 60s margin: past 540s a fresh token is issued.
        clock.set(T + 541);
        let third = issuer.issue("a.jpg", 10).unwrap();
        assert_ne!(first.token, third.token);
        assert_eq!(third.expires, T + 541 + 600);
        assert!(issuer.codec().verify(&third.token, "a.jpg").is_valid());
    }

    #[test]
    fn test_issuer_never_widens_requested_lifetime() {
        let (issuer, _) = setup();
        let long = issuer.issue("a.jpg", 120).unwrap();
        assert_eq!(long.expires, T + 7200);

        let short = issuer.issue("a.jpg", 2).unwrap();
        assert_ne!(long, short);
        assert_eq!(short.expires, T + 120);

        // The shorter token is good enough for a longer request.
        let again = issuer.issue("a.jpg", 120).unwrap();
        assert_eq!(again, short);
    }

    #[test]
    fn test_issuer_keys_by_resource() {
        let (issuer, _) = setup();
        let a = issuer.issue("a.jpg", 10).unwrap();
        let b = issuer.issue("b.jpg", 10).unwrap();

        assert_eq!(a.resource.as_str(), "a.jpg");
        assert_eq!(b.resource.as_str(), "b.jpg");
        assert!(!issuer.codec().verify(&a.token, "b.jpg").is_valid());
        assert_eq!(issuer.cache().len(), 2);
    }

    #[test]
    fn test_issuer_rejects_invalid_names() {
        let (issuer, _) = setup();
        assert!(issuer.issue("../x", 10).is_err());
        assert!(issuer.cache().is_empty());
    }

    #[test]
    fn test_invalidate_all() {
        let (issuer, clock) = setup();
        let first = issuer.issue("a.jpg", 10).unwrap();
        issuer.invalidate_all();

        clock.advance(1);
        let second = issuer.issue("a.jpg", 10).unwrap();
        assert_ne!(first.expires, second.expires);
    }

    #[test]
    fn test_issue_default() {
        let (issuer, _) = setup();
        let issued = issuer.issue_default("a.jpg").unwrap();
        assert_eq!(issued.expires, T + 3600);
    }
}
