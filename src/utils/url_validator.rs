//! Target URL validation.
//!
//! Links store the URL exactly as submitted; this module only decides whether
//! it is acceptable as a redirect target.

use url::Url;

/// Reasons a target URL is rejected.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum UrlValidationError {
    #[error("Original URL is required")]
    Missing,

    #[error("Invalid URL format")]
    InvalidFormat(String),

    #[error("Only HTTP and HTTPS protocols are allowed")]
    UnsupportedProtocol,
}

/// Checks that `input` is an absolute `http` or `https` URL with a host.
///
/// Rejects redirect targets such as `javascript:` or `data:` that a browser
/// would execute instead of navigating to.
///
/// # Errors
///
/// Returns [`UrlValidationError::Missing`] for empty input.
/// Returns [`UrlValidationError::InvalidFormat`] for malformed or relative URLs.
/// Returns [`UrlValidationError::UnsupportedProtocol`] for non-HTTP(S) schemes.
pub fn validate_target_url(input: &str) -> Result<(), UrlValidationError> {
    if input.trim().is_empty() {
        return Err(UrlValidationError::Missing);
    }

    let url = Url::parse(input).map_err(|e| UrlValidationError::InvalidFormat(e.to_string()))?;

    match url.scheme() {
        "http" | "https" => {}
        _ => return Err(UrlValidationError::UnsupportedProtocol),
    }

    if url.host_str().is_none_or(str::is_empty) {
        return Err(UrlValidationError::InvalidFormat(
            "URL has no host".to_string(),
        ));
    }

    Ok(())
}
