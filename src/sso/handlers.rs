//! Single sign-on handlers

use axum::{
    extract::{Extension, Path, Query},
    http::{header::SET_COOKIE, HeaderMap},
    response::{IntoResponse, Redirect},
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{error, info, warn};

use super::single_sign_on::SingleSignOn;
use crate::auth::bearer_token;
use crate::common::{ApiError, AppState};

/// Query parameters the provider appends to the redirect URI
#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    #[serde(default)]
    pub code: String,
    pub error: Option<String>,
}

fn lookup<'a>(state: &'a AppState, provider: &str) -> Result<&'a SingleSignOn, ApiError> {
    state.single_sign_on(provider).ok_or_else(|| {
        warn!(provider = %provider, "Unknown identity provider requested");
        ApiError::NotFound(format!("unknown identity provider: {}", provider))
    })
}

/// GET /api/v1/single-sign-on/:provider/sign-in
/// Redirects to the provider's authorization page, or straight to the
/// homepage when the caller already holds a valid session token
pub async fn sign_in_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(provider): Path<String>,
    headers: HeaderMap,
) -> Result<Redirect, ApiError> {
    let single_sign_on = lookup(&state, &provider)?;

    if single_sign_on.is_signed_in(&bearer_token(&headers)) {
        return Ok(Redirect::to(&state.config.homepage_url));
    }

    let authorization_url = single_sign_on.get_authorization_url().map_err(|e| {
        error!(error = %e, provider = %provider, "Failed to build authorization URL");
        ApiError::InternalServer(format!("invalid authorization url: {}", e))
    })?;

    info!(provider = %provider, "Starting single sign-on flow");
    Ok(Redirect::to(authorization_url.as_str()))
}

/// GET /api/v1/single-sign-on/:provider/callback?code=...
/// Completes sign-in, stores the session token in the `token` cookie
/// and redirects to the homepage
pub async fn callback_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(provider): Path<String>,
    Query(params): Query<CallbackParams>,
) -> Result<impl IntoResponse, ApiError> {
    let single_sign_on = lookup(&state, &provider)?;

    if let Some(oauth_error) = &params.error {
        warn!(provider = %provider, oauth_error = %oauth_error, "Provider returned error");
    }

    let token = single_sign_on.sign_in(&params.code).await.map_err(|e| {
        warn!(error = %e, provider = %provider, "Single sign-on failed");
        ApiError::from(e)
    })?;

    let cookie = format!("token={}; Path=/", token);
    Ok((
        [(SET_COOKIE, cookie)],
        Redirect::to(&state.config.homepage_url),
    ))
}
