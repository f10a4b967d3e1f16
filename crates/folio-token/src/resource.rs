//! Resource identifiers.
//!
//! A resource name is a path-like string naming a media object on the media
//! host, independent of scheme and host. Leading slashes are stripped so that
//! `/a/b.jpg` and `a/b.jpg` sign as the same resource.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::error::{TokenError, TokenResult};

/// Maximum length of a normalized resource name in bytes.
pub const MAX_RESOURCE_NAME_LEN: usize = 512;

/// A normalized, validated resource name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ResourceName(String);

impl ResourceName {
    /// Normalize and validate a raw resource name.
    ///
    /// # Errors
    ///
    /// - [`TokenError::EmptyResource`] if nothing remains after normalization
    /// - [`TokenError::ResourceTooLong`] if longer than [`MAX_RESOURCE_NAME_LEN`]
    /// - [`TokenError::PathTraversal`] if any segment is `..`
    /// - [`TokenError::InvalidResource`] for a scheme/host, a query or
    ///   fragment, control characters, or an empty or `.` segment
    pub fn parse(raw: &str) -> TokenResult<Self> {
        let name = normalize(raw);

        if name.is_empty() {
            return Err(TokenError::EmptyResource);
        }
        if name.len() > MAX_RESOURCE_NAME_LEN {
            return Err(TokenError::ResourceTooLong {
                len: name.len(),
                max: MAX_RESOURCE_NAME_LEN,
            });
        }
        if name.contains("://") {
            return Err(TokenError::InvalidResource(
                "scheme and host are not part of a resource name".to_owned(),
            ));
        }
        if name.contains(['?', '#']) {
            return Err(TokenError::InvalidResource(
                "query strings and fragments are not allowed".to_owned(),
            ));
        }
        if name.chars().any(char::is_control) {
            return Err(TokenError::InvalidResource(
                "control characters are not allowed".to_owned(),
            ));
        }
        if name.split(['/', '\\']).any(|segment| segment == "..") {
            return Err(TokenError::PathTraversal);
        }
        if name.split('/').any(str::is_empty) {
            return Err(TokenError::InvalidResource(
                "empty path segments are not allowed".to_owned(),
            ));
        }
        if name.split(['/', '\\']).any(|segment| segment == ".") {
            return Err(TokenError::InvalidResource(
                "'.' path segments are not allowed".to_owned(),
            ));
        }

        Ok(Self(name.to_owned()))
    }

    /// The normalized name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume into the inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

/// Strip leading slashes. Idempotent.
#[must_use]
pub fn normalize(raw: &str) -> &str {
    raw.trim_start_matches('/')
}

impl fmt::Display for ResourceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ResourceName {
    type Err = TokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for ResourceName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leading_slashes_stripped() {
        assert_eq!(ResourceName::parse("/a/b.jpg").unwrap().as_str(), "a/b.jpg");
        assert_eq!(ResourceName::parse("///a/b.jpg").unwrap().as_str(), "a/b.jpg");
        assert_eq!(ResourceName::parse("a/b.jpg").unwrap().as_str(), "a/b.jpg");
    }

    #[test]
    fn test_normalize_idempotent() {
        for raw in ["/a/b.jpg", "a/b.jpg", "//x", "", "/"] {
            assert_eq!(normalize(normalize(raw)), normalize(raw));
        }
    }

    #[test]
    fn test_empty_rejected() {
        assert_eq!(ResourceName::parse(""), Err(TokenError::EmptyResource));
        assert_eq!(ResourceName::parse("///"), Err(TokenError::EmptyResource));
    }

    #[test]
    fn test_traversal_rejected() {
        assert_eq!(
            ResourceName::parse("a/../secret.jpg"),
            Err(TokenError::PathTraversal)
        );
        assert_eq!(ResourceName::parse(".."), Err(TokenError::PathTraversal));
        assert_eq!(
            ResourceName::parse("a\\..\\b"),
            Err(TokenError::PathTraversal)
        );
        // Dots inside a segment are fine.
        assert!(ResourceName::parse("a/b..c.jpg").is_ok());
        assert!(ResourceName::parse("a/.hidden").is_ok());
    }

    #[test]
    fn test_dot_and_empty_segments_rejected() {
        for raw in ["a/./b.jpg", "./a.jpg", "a/.", "a\\.\\b.jpg", "a//b.jpg", "a/b/", "."] {
            assert!(
                matches!(ResourceName::parse(raw), Err(TokenError::InvalidResource(_))),
                "expected rejection for {raw}"
            );
        }
    }

    #[test]
    fn test_length_cap() {
        let at_cap = "a".repeat(MAX_RESOURCE_NAME_LEN);
        assert!(ResourceName::parse(&at_cap).is_ok());

        let over = "a".repeat(MAX_RESOURCE_NAME_LEN + 1);
        assert_eq!(
            ResourceName::parse(&over),
            Err(TokenError::ResourceTooLong {
                len: MAX_RESOURCE_NAME_LEN + 1,
                max: MAX_RESOURCE_NAME_LEN
            })
        );
    }

    #[test]
    fn test_scheme_query_control_rejected() {
        assert!(matches!(
            ResourceName::parse("https://cdn.example.com/a.jpg"),
            Err(TokenError::InvalidResource(_))
        ));
        assert!(matches!(
            ResourceName::parse("a.jpg?token=abc"),
            Err(TokenError::InvalidResource(_))
        ));
        assert!(matches!(
            ResourceName::parse("a.jpg#frag"),
            Err(TokenError::InvalidResource(_))
        ));
        assert!(matches!(
            ResourceName::parse("a\n.jpg"),
            Err(TokenError::InvalidResource(_))
        ));
    }

    #[test]
    fn test_from_str() {
        let name: ResourceName = "/videos/intro.mp4".parse().unwrap();
        assert_eq!(name.to_string(), "videos/intro.mp4");
    }
}
