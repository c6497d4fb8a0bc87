//! Authentication routes

use axum::{routing::get, Router};

use super::handlers;

/// Creates and returns the authentication router
///
/// # Routes
/// - `GET /api/v1/status` - Service status
/// - `GET /api/v1/me` - Get current user information
pub fn auth_routes() -> Router {
    Router::new()
        .route("/api/v1/status", get(handlers::status_handler))
        .route("/api/v1/me", get(handlers::me_handler))
}
