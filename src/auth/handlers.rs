//! Authentication handlers

use axum::Json;
use serde_json::json;

use super::extractors::AuthedUser;
use crate::common::ApiError;

/// GET /api/v1/status
/// Liveness probe
///
/// # Response
/// ```json
/// { "status": "OK" }
/// ```
pub async fn status_handler() -> Json<serde_json::Value> {
    Json(json!({ "status": "OK" }))
}

/// GET /api/v1/me
/// Returns the user the bearer token belongs to
///
/// # Response
/// ```json
/// {
///   "user": { "id": 1, "email": "...", "name": "...", "picture": "..." }
/// }
/// ```
pub async fn me_handler(
    AuthedUser(user): AuthedUser,
) -> Result<Json<serde_json::Value>, ApiError> {
    Ok(Json(json!({ "user": user })))
}
