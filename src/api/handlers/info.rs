//! Handler for record inspection.

use axum::{
    Json,
    extract::{Path, State},
};

use crate::api::dto::info::InfoResponse;
use crate::error::AppError;
use crate::state::AppState;

/// Returns the stored record for a short code without counting a click.
///
/// # Endpoint
///
/// `GET /info/{code}`
///
/// # Response
///
/// ```json
/// {
///   "code": "promo1",
///   "url": "https://example.com",
///   "clicks": 42,
///   "created_at": "2025-01-15T10:30:00Z"
/// }
/// ```
///
/// # Errors
///
/// Returns 404 Not Found if the short code doesn't exist.
pub async fn info_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<InfoResponse>, AppError> {
    let record = state.resolve_service.info(&code).await?;

    Ok(Json(record.into()))
}
