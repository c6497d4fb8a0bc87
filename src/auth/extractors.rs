//! Authentication extractors for Axum

use async_trait::async_trait;
use axum::{
    extract::{Extension, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::common::{safe_email_log, ApiError, AppState};
use crate::users::{RepositoryError, User};

/// Reads the session token from `Authorization: Bearer <token>`.
///
/// Anything other than exactly two space-separated words starting with
/// `Bearer` yields an empty token.
pub fn bearer_token(headers: &HeaderMap) -> String {
    let Some(auth) = headers.get(AUTHORIZATION).and_then(|h| h.to_str().ok()) else {
        return String::new();
    };

    let words: Vec<&str> = auth.split(' ').collect();
    match words.as_slice() {
        ["Bearer", token] => token.to_string(),
        _ => String::new(),
    }
}

/// Authenticated user extractor
///
/// Validates the bearer token and loads the user it names.
#[derive(Debug)]
pub struct AuthedUser(pub User);

#[async_trait]
impl<S> FromRequestParts<S> for AuthedUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Extension(app_state): Extension<Arc<AppState>> =
            Extension::from_request_parts(parts, state)
                .await
                .map_err(|_| ApiError::InternalServer("missing app state".to_string()))?;

        let token = bearer_token(&parts.headers);

        let user_id = match app_state.authenticator.get_user_id(&token) {
            Ok(id) => id,
            Err(e) => {
                warn!(error = %e, "Session token validation failed");
                return Err(e.into());
            }
        };

        match app_state.user_manager.get_user_by_id(user_id).await {
            Ok(user) => {
                debug!(
                    user_id = user.id,
                    email = %safe_email_log(&user.email),
                    "User authentication successful via extractor"
                );
                Ok(AuthedUser(user))
            }
            Err(RepositoryError::UserNotFound(msg)) => {
                warn!(user_id, "Authentication failed: user not found in database");
                Err(ApiError::Unauthorized(format!(
                    "could not retrieve authorized user: {}",
                    msg
                )))
            }
            Err(e) => Err(e.into()),
        }
    }
}
