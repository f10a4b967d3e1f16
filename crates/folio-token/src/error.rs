//! Token error types.

use thiserror::Error;

/// Errors raised while issuing tokens or building a codec.
///
/// Verification never produces one of these; see
/// [`Verification`](crate::Verification) instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    /// Resource name was empty after normalization.
    #[error("resource name must not be empty")]
    EmptyResource,

    /// Resource name exceeds the length cap.
    #[error("resource name is {len} bytes, exceeding the {max} byte limit")]
    ResourceTooLong {
        /// Length of the normalized name in bytes.
        len: usize,
        /// Maximum allowed length in bytes.
        max: usize,
    },

    /// Resource name contains a `..` segment.
    #[error("resource name must not contain '..' segments")]
    PathTraversal,

    /// Resource name is otherwise unacceptable.
    #[error("invalid resource name: {0}")]
    InvalidResource(String),

    /// No signing secret was configured.
    #[error("signing secret is missing or empty")]
    MissingSecret,

    /// The media base URL could not be used for URL assembly.
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),

    /// A token string does not have the `<expires>.<signature>` layout.
    #[error("malformed token: {0}")]
    Malformed(&'static str),
}

impl TokenError {
    /// Stable taxonomy label for logs and diagnostics.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Malformed(_) => "MALFORMED",
            Self::EmptyResource
            | Self::ResourceTooLong { .. }
            | Self::PathTraversal
            | Self::InvalidResource(_)
            | Self::MissingSecret
            | Self::InvalidBaseUrl(_) => "INVALID_INPUT",
        }
    }
}

/// Result type for token operations.
pub type TokenResult<T> = Result<T, TokenError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes() {
        assert_eq!(TokenError::EmptyResource.code(), "INVALID_INPUT");
        assert_eq!(TokenError::MissingSecret.code(), "INVALID_INPUT");
        assert_eq!(TokenError::Malformed("x").code(), "MALFORMED");
    }
}
