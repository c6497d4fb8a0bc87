//! Identity provider abstraction for the OAuth2 authorization-code flow

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde::Deserialize;
use thiserror::Error;
use url::Url;

use crate::services::http::HttpError;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("identity provider request failed: {0}")]
    Request(String),

    #[error("malformed identity provider response: {0}")]
    MalformedResponse(String),

    #[error("invalid provider url: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl From<HttpError> for ProviderError {
    fn from(err: HttpError) -> Self {
        match err {
            HttpError::Decode(msg) => ProviderError::MalformedResponse(msg),
            other => ProviderError::Request(other.to_string()),
        }
    }
}

/// Profile returned by a provider, normalized across providers
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SingleSignOnUser {
    pub email: String,
    pub name: String,
    pub picture: String,
}

/// Endpoints a provider talks to. Defaults point at the real service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderEndpoints {
    pub authorization_url: String,
    pub token_url: String,
    pub profile_url: String,
}

/// One external OAuth2 service.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Route segment and log label, e.g. `"google"`.
    fn name(&self) -> &'static str;

    /// Builds the URL the browser is sent to; no network call.
    fn get_authorization_url(&self) -> Result<Url, ProviderError>;

    /// Exchanges a one-time authorization code for an access token.
    async fn get_identity_token(&self, code: &str) -> Result<String, ProviderError>;

    /// Fetches and normalizes the profile behind an access token.
    async fn get_single_sign_on_user(
        &self,
        identity_token: &str,
    ) -> Result<SingleSignOnUser, ProviderError>;
}

/// Token endpoint response shared by every provider
#[derive(Debug, Deserialize)]
pub(crate) struct AccessTokenResponse {
    #[serde(default)]
    access_token: Option<String>,
}

impl AccessTokenResponse {
    pub(crate) fn into_token(self) -> Result<String, ProviderError> {
        match self.access_token {
            Some(token) if !token.is_empty() => Ok(token),
            _ => Err(ProviderError::MalformedResponse(
                "access_token missing from token response".to_string(),
            )),
        }
    }
}

/// Builds an `Authorization: <scheme> <token>` header set.
pub(crate) fn authorization_headers(
    scheme: &str,
    token: &str,
) -> Result<HeaderMap, ProviderError> {
    let value = HeaderValue::from_str(&format!("{} {}", scheme, token)).map_err(|_| {
        ProviderError::MalformedResponse("access token is not a valid header value".to_string())
    })?;
    let mut headers = HeaderMap::new();
    headers.insert(AUTHORIZATION, value);
    Ok(headers)
}
