// src/app.rs
//! Router composition and provider wiring

use axum::{extract::Extension, http::HeaderValue, Router};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::auth::auth_routes;
use crate::common::{AppState, Config};
use crate::services::http::HttpClient;
use crate::sso::{
    sso_routes, FacebookIdentityProvider, GithubIdentityProvider, GoogleIdentityProvider,
    IdentityProvider,
};

/// The identity providers this service federates to
pub fn configured_providers(
    config: &Config,
    http: &HttpClient,
) -> Vec<Arc<dyn IdentityProvider>> {
    let google: Arc<dyn IdentityProvider> =
        Arc::new(GoogleIdentityProvider::new(config.google.clone(), http.clone()));
    let facebook: Arc<dyn IdentityProvider> =
        Arc::new(FacebookIdentityProvider::new(config.facebook.clone(), http.clone()));
    let github: Arc<dyn IdentityProvider> =
        Arc::new(GithubIdentityProvider::new(config.github.clone(), http.clone()));

    vec![google, facebook, github]
}

pub fn router(state: Arc<AppState>) -> Router {
    let origins: Vec<HeaderValue> = state
        .config
        .cors_origins
        .iter()
        .filter(|origin| origin.as_str() != "*")
        .filter_map(|origin| origin.parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([axum::http::Method::GET, axum::http::Method::OPTIONS])
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            axum::http::header::AUTHORIZATION,
        ])
        .allow_credentials(true);

    Router::new()
        .merge(auth_routes())
        .merge(sso_routes())
        .layer(Extension(state))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
