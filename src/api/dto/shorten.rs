//! DTOs for link shortening endpoint.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::application::services::ShortenedLink;

/// Request to shorten a single URL.
#[derive(Debug, Deserialize, Validate)]
pub struct ShortenRequest {
    /// The original URL to shorten (must be valid HTTP/HTTPS).
    #[validate(url(message = "Invalid URL format"))]
    pub url: String,

    /// Optional caller-chosen code. An empty string counts as absent.
    #[serde(default, alias = "customCode")]
    pub custom_code: Option<String>,
}

/// Successful shortening result.
#[derive(Debug, Serialize, Deserialize)]
pub struct ShortenResponse {
    pub code: String,
    pub short_url: String,
}

impl From<ShortenedLink> for ShortenResponse {
    fn from(link: ShortenedLink) -> Self {
        Self {
            code: link.code,
            short_url: link.short_url,
        }
    }
}
