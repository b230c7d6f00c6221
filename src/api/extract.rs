//! Request extractors that report rejections in the API error format.

use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
};
use serde_json::json;
use tracing::debug;

use crate::error::AppError;

/// JSON body extractor whose rejections render as [`AppError::Validation`].
///
/// Malformed JSON, a missing `Content-Type` and bodies that do not match the
/// target type all answer 400 with the `{"error": {...}}` envelope instead of
/// axum's plain-text rejection.
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => {
                debug!(status = %rejection.status(), "Rejected request body");
                Err(AppError::bad_request(
                    "Invalid request body",
                    json!({ "reason": rejection.body_text() }),
                ))
            }
        }
    }
}
