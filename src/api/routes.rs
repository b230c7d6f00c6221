//! API route configuration.

use crate::api::handlers::{
    health_handler, info_handler, redirect_handler, shorten_handler,
    shorten_path_redirect_handler,
};
use crate::state::AppState;
use axum::{Router, routing::get};

/// All public routes.
///
/// # Endpoints
///
/// - `POST /shorten`      - Create a short code
/// - `GET  /shorten`      - Redirect for the code `shorten`
/// - `GET  /info/{code}`  - Stored record for a code
/// - `GET  /api/health`   - Store and click queue checks
/// - `GET  /{code}`       - Short link redirect
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/shorten",
            get(shorten_path_redirect_handler).post(shorten_handler),
        )
        .route("/info/{code}", get(info_handler))
        .route("/api/health", get(health_handler))
        .route("/{code}", get(redirect_handler))
}
