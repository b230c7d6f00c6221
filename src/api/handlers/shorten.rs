//! Handler for link shortening endpoint.

use axum::{Json, extract::State};
use validator::Validate;

use crate::api::dto::shorten::{ShortenRequest, ShortenResponse};
use crate::api::extract::ApiJson;
use crate::error::AppError;
use crate::state::AppState;

/// Creates a short code for a long URL.
///
/// # Endpoint
///
/// `POST /shorten`
///
/// # Request Body
///
/// ```json
/// {
///   "url": "https://example.com/some/long/path",
///   "custom_code": "promo1"
/// }
/// ```
///
/// `custom_code` is optional (`customCode` is accepted too).
///
/// # Response
///
/// ```json
/// {
///   "code": "promo1",
///   "short_url": "http://127.0.0.1:8000/promo1"
/// }
/// ```
///
/// # Errors
///
/// - 400 Bad Request if the body is malformed, or the URL or custom code is invalid
/// - 409 Conflict if the custom code is already taken
/// - 500 Internal Server Error if no free code could be generated
pub async fn shorten_handler(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<ShortenRequest>,
) -> Result<Json<ShortenResponse>, AppError> {
    payload.validate()?;

    let link = state
        .shorten_service
        .shorten(payload.url, payload.custom_code)
        .await?;

    Ok(Json(link.into()))
}
