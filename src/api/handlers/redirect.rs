//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::json;
use url::Url;

use crate::error::AppError;
use crate::state::AppState;

/// Redirects a short code to its original URL.
///
/// # Endpoint
///
/// `GET /{code}`
///
/// # Click Tracking
///
/// The click is queued for the background worker before the redirect is
/// returned. If the queue is full the click is dropped (fire-and-forget).
///
/// # Errors
///
/// Returns 404 Not Found if the short code doesn't exist.
pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<Response, AppError> {
    let target = state.resolve_service.resolve(&code).await?;

    let location = location_header(&target)?;

    Ok((StatusCode::TEMPORARY_REDIRECT, [(header::LOCATION, location)]).into_response())
}

/// Redirects the code `shorten`, whose path is shared with the POST endpoint.
///
/// # Endpoint
///
/// `GET /shorten`
pub async fn shorten_path_redirect_handler(
    State(state): State<AppState>,
) -> Result<Response, AppError> {
    redirect_handler(Path("shorten".to_string()), State(state)).await
}

/// Builds the `Location` value for a stored target.
///
/// Targets are sent as stored. Ones with characters a header cannot carry
/// are sent in their percent-encoded serialization.
fn location_header(target: &str) -> Result<HeaderValue, AppError> {
    if let Ok(value) = HeaderValue::from_str(target) {
        return Ok(value);
    }

    Url::parse(target)
        .ok()
        .and_then(|url| HeaderValue::from_str(url.as_str()).ok())
        .ok_or_else(|| {
            AppError::storage(
                "Stored target is not a valid redirect location",
                json!({ "target": target }),
            )
        })
}
