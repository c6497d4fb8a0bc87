//! Signed session token encoding

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::{DateTime, SecondsFormat, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("token signature is invalid")]
    InvalidSignature,

    #[error("malformed token: {0}")]
    MalformedToken(String),

    #[error("failed to sign token: {0}")]
    Encoding(String),
}

/// Claims carried by a session token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPayload {
    pub user_id: i64,
    pub issued_at: DateTime<Utc>,
}

impl TokenPayload {
    pub fn new(user_id: i64, issued_at: DateTime<Utc>) -> Self {
        Self { user_id, issued_at }
    }
}

/// Converts a [`TokenPayload`] to and from an opaque signed string.
pub trait Tokenizer: Send + Sync {
    fn encode(&self, payload: &TokenPayload) -> Result<String, TokenError>;
    fn decode(&self, token: &str) -> Result<TokenPayload, TokenError>;
}

/// JWT claims as they appear on the wire
#[derive(Serialize, Deserialize, Debug)]
struct Claims {
    user_id: i64,
    issued_at: String,
}

/// Header fields read before jsonwebtoken parses the header, which
/// rejects unknown algorithms such as `none` as a JSON error.
#[derive(Deserialize)]
struct RawHeader {
    alg: String,
}

fn header_algorithm(token: &str) -> Result<String, TokenError> {
    let segment = token.split('.').next().unwrap_or_default();
    let bytes = URL_SAFE_NO_PAD
        .decode(segment)
        .map_err(|e| TokenError::MalformedToken(format!("invalid header encoding: {}", e)))?;
    let header: RawHeader = serde_json::from_slice(&bytes)
        .map_err(|e| TokenError::MalformedToken(format!("invalid header: {}", e)))?;
    Ok(header.alg)
}

/// HS256 JWT tokenizer
#[derive(Clone)]
pub struct Jwt {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
}

impl Jwt {
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            algorithm: Algorithm::HS256,
        }
    }

    fn validation(&self) -> Validation {
        // Expiry belongs to the Authenticator, so no registered claim is required here.
        let mut validation = Validation::new(self.algorithm);
        validation.required_spec_claims.clear();
        validation.validate_exp = false;
        validation
    }
}

impl std::fmt::Debug for Jwt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Jwt")
            .field("algorithm", &self.algorithm)
            .finish_non_exhaustive()
    }
}

impl Tokenizer for Jwt {
    fn encode(&self, payload: &TokenPayload) -> Result<String, TokenError> {
        let claims = Claims {
            user_id: payload.user_id,
            issued_at: payload
                .issued_at
                .to_rfc3339_opts(SecondsFormat::Secs, true),
        };

        encode(&Header::new(self.algorithm), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Encoding(e.to_string()))
    }

    fn decode(&self, token: &str) -> Result<TokenPayload, TokenError> {
        if token.split('.').count() != 3 {
            return Err(TokenError::MalformedToken(
                "expected three dot-separated segments".to_string(),
            ));
        }

        // A token under any other algorithm, `none` included, cannot be trusted with this key.
        let alg = header_algorithm(token)?;
        if alg != "HS256" {
            return Err(TokenError::InvalidSignature);
        }

        let data = decode::<Claims>(token, &self.decoding_key, &self.validation()).map_err(
            |e| match e.kind() {
                ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
                    TokenError::InvalidSignature
                }
                _ => TokenError::MalformedToken(e.to_string()),
            },
        )?;

        let issued_at = DateTime::parse_from_rfc3339(&data.claims.issued_at)
            .map_err(|e| TokenError::MalformedToken(format!("invalid issued_at: {}", e)))?
            .with_timezone(&Utc);

        Ok(TokenPayload::new(data.claims.user_id, issued_at))
    }
}
