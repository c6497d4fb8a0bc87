//! Session token issuance and validation policy

use chrono::{Duration, Utc};
use std::sync::Arc;
use tracing::debug;

use super::token::{TokenError, TokenPayload, Tokenizer};

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("invalid token: {0}")]
    InvalidToken(#[from] TokenError),

    #[error("invalid user id")]
    InvalidUser,

    #[error("token has expired")]
    TokenExpired,
}

/// Issues session tokens for a user id and validates presented tokens
/// against a fixed lifetime.
#[derive(Clone)]
pub struct Authenticator {
    tokenizer: Arc<dyn Tokenizer>,
    token_lifetime: Duration,
}

impl Authenticator {
    pub fn new(tokenizer: Arc<dyn Tokenizer>, token_lifetime: std::time::Duration) -> Self {
        Self {
            tokenizer,
            token_lifetime: Duration::from_std(token_lifetime).unwrap_or(Duration::MAX),
        }
    }

    pub fn create_token(&self, user_id: i64) -> Result<String, TokenError> {
        let payload = TokenPayload::new(user_id, Utc::now());
        self.tokenizer.encode(&payload)
    }

    pub fn get_user_id(&self, token: &str) -> Result<i64, AuthError> {
        let payload = self.tokenizer.decode(token)?;

        if payload.user_id < 1 {
            debug!(user_id = payload.user_id, "Rejecting token with invalid user id");
            return Err(AuthError::InvalidUser);
        }

        // Invalid from the instant issued_at + lifetime is reached.
        if let Some(expires_at) = payload.issued_at.checked_add_signed(self.token_lifetime) {
            if expires_at <= Utc::now() {
                debug!(user_id = payload.user_id, %expires_at, "Rejecting expired token");
                return Err(AuthError::TokenExpired);
            }
        }

        Ok(payload.user_id)
    }
}
