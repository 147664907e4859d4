//! Router configuration for the API server.

use std::path::Path;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;

use super::handlers;
use super::AppState;

/// Create the main router with all routes.
///
/// When `public_dir` exists, unmatched paths fall through to static
/// front-end assets.
pub fn create_router(state: AppState, public_dir: &Path) -> Router {
    let router = Router::new()
        .route("/api/generate", post(handlers::generate))
        .route("/api/email", post(handlers::email_signup))
        .route("/api/email-count", get(handlers::email_count))
        .layer(CorsLayer::permissive())
        .with_state(state);

    if public_dir.is_dir() {
        router.fallback_service(ServeDir::new(public_dir))
    } else {
        router
    }
}
