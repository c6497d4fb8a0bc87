// Error handling types for the API boundary

use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use std::fmt;
use tracing::error;

use crate::auth::AuthError;
use crate::sso::SsoError;
use crate::users::RepositoryError;

/// API error types
#[derive(Debug)]
pub enum ApiError {
    Unauthorized(String),
    BadRequest(String),
    NotFound(String),
    InternalServer(String),
    BadGateway(String),
    DatabaseError(sqlx::Error),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            ApiError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            ApiError::InternalServer(msg) => write!(f, "Internal Server Error: {}", msg),
            ApiError::BadGateway(msg) => write!(f, "Bad Gateway: {}", msg),
            ApiError::DatabaseError(e) => write!(f, "Database Error: {}", e),
        }
    }
}

/// JSON error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::InternalServer(_) | ApiError::DatabaseError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ApiError::BadGateway(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        let (error_message, code) = match self {
            ApiError::Unauthorized(msg) => (msg, "UNAUTHORIZED"),
            ApiError::BadRequest(msg) => (msg, "BAD_REQUEST"),
            ApiError::NotFound(msg) => (msg, "NOT_FOUND"),
            ApiError::InternalServer(msg) => (msg, "INTERNAL_SERVER_ERROR"),
            ApiError::BadGateway(msg) => (msg, "UPSTREAM_ERROR"),
            ApiError::DatabaseError(e) => {
                error!(error = %e, "Database error occurred");
                ("Database operation failed".to_string(), "DATABASE_ERROR")
            }
        };

        let error_response = ErrorResponse {
            error: error_message,
            code: code.to_string(),
        };

        (status, Json(error_response)).into_response()
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        ApiError::Unauthorized(format!("could not authorize user: {}", err))
    }
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::UserNotFound(msg) => ApiError::NotFound(msg),
            RepositoryError::Conflict(msg) => ApiError::InternalServer(msg),
            RepositoryError::DatabaseError(e) => ApiError::DatabaseError(e),
        }
    }
}

impl From<SsoError> for ApiError {
    fn from(err: SsoError) -> Self {
        match err {
            SsoError::EmptyCode | SsoError::EmptyEmail => {
                ApiError::BadRequest(format!("invalid authorization code: {}", err))
            }
            SsoError::Provider(e) => ApiError::BadGateway(e.to_string()),
            SsoError::Repository(e) => e.into(),
            SsoError::Token(e) => ApiError::InternalServer(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::TokenError;
    use crate::sso::provider::ProviderError;

    #[test]
    fn test_auth_errors_are_unauthorized() {
        let err: ApiError = AuthError::TokenExpired.into();
        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);

        let err: ApiError = AuthError::InvalidToken(TokenError::InvalidSignature).into();
        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_sso_errors_are_distinguishable() {
        let bad_request: ApiError = SsoError::EmptyCode.into();
        assert_eq!(bad_request.status(), StatusCode::BAD_REQUEST);

        let upstream: ApiError =
            SsoError::Provider(ProviderError::Request("503 Service Unavailable".into())).into();
        assert_eq!(upstream.status(), StatusCode::BAD_GATEWAY);

        let not_found: ApiError =
            SsoError::Repository(RepositoryError::UserNotFound("gone".into())).into();
        assert_eq!(not_found.status(), StatusCode::NOT_FOUND);
    }
}
