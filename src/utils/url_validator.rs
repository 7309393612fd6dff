//! Validation of destination URLs submitted for shortening.

use url::Url;

/// Maximum accepted length of an original URL, in bytes.
pub const MAX_URL_LENGTH: usize = 2048;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum UrlValidationError {
    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("Only HTTP and HTTPS protocols are allowed")]
    UnsupportedProtocol,

    #[error("URL must include a host")]
    MissingHost,

    #[error("URL exceeds {MAX_URL_LENGTH} bytes")]
    TooLong,

    #[error("URL must not contain control characters")]
    ControlCharacter,
}

/// Checks that `input` is an absolute `http`/`https` URL of bounded length.
///
/// The URL is stored exactly as submitted; no normalization is applied, so
/// the redirect `Location` matches what the owner entered.
///
/// # Errors
///
/// Returns the first [`UrlValidationError`] that applies. Schemes such as
/// `javascript:`, `data:` and `file:` are rejected as unsupported.
///
/// Control characters are rejected even where the URL parser would strip
/// them; the stored value must stay a valid `Location` header.
pub fn validate_original_url(input: &str) -> Result<(), UrlValidationError> {
    if input.len() > MAX_URL_LENGTH {
        return Err(UrlValidationError::TooLong);
    }

    if input.chars().any(char::is_control) {
        return Err(UrlValidationError::ControlCharacter);
    }

    let url = Url::parse(input).map_err(|e| UrlValidationError::InvalidFormat(e.to_string()))?;

    match url.scheme() {
        "http" | "https" => {}
        _ => return Err(UrlValidationError::UnsupportedProtocol),
    }

    if url.host_str().is_none_or(str::is_empty) {
        return Err(UrlValidationError::MissingHost);
    }

    Ok(())
}
