//! Single sign-on routes

use axum::{routing::get, Router};

use super::handlers;

/// Creates and returns the single sign-on router
///
/// # Routes
/// - `GET /api/v1/single-sign-on/:provider/sign-in` - Start the provider flow
/// - `GET /api/v1/single-sign-on/:provider/callback` - Provider redirect target
pub fn sso_routes() -> Router {
    Router::new()
        .route(
            "/api/v1/single-sign-on/:provider/sign-in",
            get(handlers::sign_in_handler),
        )
        .route(
            "/api/v1/single-sign-on/:provider/callback",
            get(handlers::callback_handler),
        )
}
