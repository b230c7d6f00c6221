//! Target URL validation.
//!
//! Targets are stored exactly as submitted. Validation rejects input that is
//! not an absolute http(s) URL with a host, and input the URL parser would
//! silently rewrite (surrounding whitespace, embedded control characters).

use url::Url;

/// Errors that can occur during target URL validation.
#[derive(Debug, thiserror::Error)]
pub enum TargetUrlError {
    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("Only HTTP and HTTPS protocols are allowed")]
    UnsupportedProtocol,

    #[error("URL must include a host")]
    MissingHost,
}

/// Checks that `input` is a well-formed absolute http(s) URL.
///
/// # Security
///
/// Rejects potentially dangerous schemes like `javascript:`, `data:`, `file:`.
///
/// # Errors
///
/// Returns [`TargetUrlError::InvalidFormat`] for malformed or relative URLs,
/// and for input with surrounding whitespace or control characters.
/// Returns [`TargetUrlError::UnsupportedProtocol`] for non-HTTP(S) schemes.
/// Returns [`TargetUrlError::MissingHost`] when no host is present.
pub fn validate_target_url(input: &str) -> Result<(), TargetUrlError> {
    if input.trim() != input {
        return Err(TargetUrlError::InvalidFormat(
            "leading or trailing whitespace".to_string(),
        ));
    }

    // the parser drops tabs and newlines, so the stored target would not be
    // the URL redirected to
    if input.chars().any(char::is_control) {
        return Err(TargetUrlError::InvalidFormat(
            "control characters are not allowed".to_string(),
        ));
    }

    let url = Url::parse(input).map_err(|e| TargetUrlError::InvalidFormat(e.to_string()))?;

    match url.scheme() {
        "http" | "https" => {}
        _ => return Err(TargetUrlError::UnsupportedProtocol),
    }

    match url.host_str() {
        Some(host) if !host.is_empty() => Ok(()),
        _ => Err(TargetUrlError::MissingHost),
    }
}
