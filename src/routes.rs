//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `POST /shorten`      - Create a short code
//! - `GET  /{code}`       - Short link redirect
//! - `GET  /info/{code}`  - Record inspection
//! - `GET  /api/health`   - Health check: store, click queue
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::middleware::tracing;
use crate::state::AppState;
use axum::Router;
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Constructs the application router with all routes and middleware.
///
/// `state` is shared by all handlers. Path normalization wraps the router so
/// it runs before route matching.
pub fn app_router(state: AppState) -> NormalizePath<Router> {
    let router = api::routes::routes()
        .with_state(state)
        .layer(tracing::layer());

    NormalizePathLayer::trim_trailing_slash().layer(router)
}
