//! API router.
//!
//! Returns a composable `Router` that can be mounted on any axum server.
//! Routes are nested under `/api/`.
//!
//! Middleware stack (outermost → innermost):
//! 1. CORS → 2. Access logger

use axum::routing::{get, post, put};
use axum::Router;
use tower_http::cors::CorsLayer;

use crate::api::endpoints;
use crate::api::middleware;
use crate::api::types::ApiContext;

/// Build the report API router.
///
/// NOTE: Path params use `:param` syntax (matchit 0.7 / axum 0.7).
pub fn api_router(ctx: ApiContext) -> Router {
    let api = Router::new()
        .route("/health", get(endpoints::health::check))
        .route("/document-types", get(endpoints::document_types::list))
        .route("/sessions", post(endpoints::sessions::create))
        .route(
            "/sessions/:id",
            get(endpoints::sessions::detail).delete(endpoints::sessions::remove),
        )
        .route(
            "/sessions/:id/document-type",
            put(endpoints::sessions::select_document_type),
        )
        .route(
            "/sessions/:id/fields/:name",
            put(endpoints::sessions::set_field),
        )
        .route(
            "/sessions/:id/narrative",
            get(endpoints::sessions::narrative),
        )
        .route(
            "/sessions/:id/generate",
            post(endpoints::generate::generate),
        )
        .route("/feedback", post(endpoints::feedback::submit))
        .with_state(ctx)
        .layer(axum::middleware::from_fn(middleware::access_log::log_access));

    Router::new()
        .nest("/api", api)
        .layer(CorsLayer::permissive())
}
