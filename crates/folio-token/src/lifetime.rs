//! Token lifetimes.
//!
//! Requested lifetimes are clamped into `[MIN_LIFETIME_MINUTES,
//! MAX_LIFETIME_MINUTES]` rather than rejected, so a caller can never mint an
//! unbounded token by passing a large value.

use serde::Serialize;

/// Shortest lifetime a token can be issued with.
pub const MIN_LIFETIME_MINUTES: i64 = 1;

/// Longest lifetime a token can be issued with.
pub const MAX_LIFETIME_MINUTES: i64 = 120;

/// Lifetime used when a caller does not ask for one.
pub const DEFAULT_LIFETIME_MINUTES: i64 = 60;

/// A token validity window, always within the allowed bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Lifetime {
    minutes: u64,
}

impl Lifetime {
    /// Clamp a requested number of minutes into the allowed range.
    #[must_use]
    pub fn clamped(requested_minutes: i64) -> Self {
        let minutes = requested_minutes
            .clamp(MIN_LIFETIME_MINUTES, MAX_LIFETIME_MINUTES)
            .unsigned_abs();
        Self { minutes }
    }

    /// Lifetime in minutes.
    #[must_use]
    pub const fn minutes(self) -> u64 {
        self.minutes
    }

    /// Lifetime in seconds.
    #[must_use]
    pub const fn seconds(self) -> u64 {
        self.minutes.saturating_mul(60)
    }
}

impl Default for Lifetime {
    fn default() -> Self {
        Self::clamped(DEFAULT_LIFETIME_MINUTES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_range_kept() {
        assert_eq!(Lifetime::clamped(30).minutes(), 30);
        assert_eq!(Lifetime::clamped(30).seconds(), 1800);
    }

    #[test]
    fn test_clamped_to_bounds() {
        assert_eq!(Lifetime::clamped(99_999).minutes(), 120);
        assert_eq!(Lifetime::clamped(i64::MAX).minutes(), 120);
        assert_eq!(Lifetime::clamped(0).minutes(), 1);
        assert_eq!(Lifetime::clamped(-5).minutes(), 1);
        assert_eq!(Lifetime::clamped(i64::MIN).minutes(), 1);
    }

    #[test]
    fn test_default() {
        assert_eq!(Lifetime::default().minutes(), 60);
    }
}
