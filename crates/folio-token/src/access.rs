//! Access URL assembly.
//!
//! An access URL is `<base>/<resource>?token=<token>`. Resource path
//! segments are percent-encoded by the `url` crate; the token needs no
//! encoding since its alphabet is URL-safe.

use url::Url;

use crate::error::{TokenError, TokenResult};
use crate::resource::ResourceName;

/// Query parameter carrying the token.
pub const TOKEN_QUERY_PARAM: &str = "token";

/// Parse and check a media host base URL.
///
/// # Errors
///
/// Returns [`TokenError::InvalidBaseUrl`] unless the URL is an absolute
/// `http`/`https` URL without a query or fragment.
pub fn parse_base_url(raw: &str) -> TokenResult<Url> {
    let url = Url::parse(raw).map_err(|e| TokenError::InvalidBaseUrl(e.to_string()))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(TokenError::InvalidBaseUrl(format!(
            "unsupported scheme '{}'",
            url.scheme()
        )));
    }
    if url.cannot_be_a_base() || url.host().is_none() {
        return Err(TokenError::InvalidBaseUrl("URL has no host".to_owned()));
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err(TokenError::InvalidBaseUrl(
            "base URL must not carry a query or fragment".to_owned(),
        ));
    }

    Ok(url)
}

/// Build the full access URL for a resource and token.
#[must_use]
pub fn build_access_url(base: &Url, resource: &ResourceName, token: &str) -> String {
    let mut url = base.clone();
    if let Ok(mut segments) = url.path_segments_mut() {
        segments.pop_if_empty();
        segments.extend(resource.as_str().split('/'));
    }
    url.query_pairs_mut().append_pair(TOKEN_QUERY_PARAM, token);
    url.into()
}

/// Pull the token query parameter out of an access URL.
///
/// Returns `None` if the URL does not parse or carries no token.
#[must_use]
pub fn extract_token(access_url: &str) -> Option<String> {
    let url = Url::parse(access_url).ok()?;
    url.query_pairs()
        .find(|(key, _)| key == TOKEN_QUERY_PARAM)
        .map(|(_, value)| value.into_owned())
}
