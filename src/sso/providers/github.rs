// src/sso/providers/github.rs
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE, USER_AGENT};
use reqwest::Method;
use serde::Deserialize;
use tracing::debug;
use url::Url;

use crate::common::ProviderCredentials;
use crate::services::http::{HttpClient, RequestBody};
use crate::sso::provider::{
    authorization_headers, AccessTokenResponse, IdentityProvider, ProviderEndpoints,
    ProviderError, SingleSignOnUser,
};

#[derive(Debug, Deserialize)]
struct GithubUser {
    // GitHub sends explicit nulls for unset name / private email
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    avatar_url: Option<String>,
}

/// GitHub OAuth app sign-in
#[derive(Debug, Clone)]
pub struct GithubIdentityProvider {
    credentials: ProviderCredentials,
    endpoints: ProviderEndpoints,
    http: HttpClient,
}

impl GithubIdentityProvider {
    pub fn new(credentials: ProviderCredentials, http: HttpClient) -> Self {
        Self {
            credentials,
            endpoints: Self::default_endpoints(),
            http,
        }
    }

    pub fn default_endpoints() -> ProviderEndpoints {
        ProviderEndpoints {
            authorization_url: "https://github.com/login/oauth/authorize".to_string(),
            token_url: "https://github.com/login/oauth/access_token".to_string(),
            profile_url: "https://api.github.com/user".to_string(),
        }
    }

    #[cfg(test)]
    pub fn with_endpoints(mut self, endpoints: ProviderEndpoints) -> Self {
        self.endpoints = endpoints;
        self
    }
}

#[async_trait]
impl IdentityProvider for GithubIdentityProvider {
    fn name(&self) -> &'static str {
        "github"
    }

    fn get_authorization_url(&self) -> Result<Url, ProviderError> {
        let url = Url::parse_with_params(
            &self.endpoints.authorization_url,
            &[
                ("client_id", self.credentials.client_id.as_str()),
                ("redirect_uri", self.credentials.redirect_uri.as_str()),
                ("response_type", "code"),
                ("scope", "read:user user:email"),
            ],
        )?;
        Ok(url)
    }

    async fn get_identity_token(&self, code: &str) -> Result<String, ProviderError> {
        let url = Url::parse(&self.endpoints.token_url)?;

        let params = [
            ("client_id", self.credentials.client_id.as_str()),
            ("client_secret", self.credentials.client_secret.as_str()),
            ("code", code),
            ("redirect_uri", self.credentials.redirect_uri.as_str()),
        ];

        let mut headers = HeaderMap::new();
        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("application/x-www-form-urlencoded"),
        );

        debug!(provider = "github", "Exchanging authorization code for access token");
        let response: AccessTokenResponse = self
            .http
            .request_json(Method::POST, url, headers, RequestBody::Form(&params))
            .await?;

        response.into_token()
    }

    async fn get_single_sign_on_user(
        &self,
        identity_token: &str,
    ) -> Result<SingleSignOnUser, ProviderError> {
        let url = Url::parse(&self.endpoints.profile_url)?;
        let mut headers = authorization_headers("token", identity_token)?;
        // api.github.com rejects requests without a User-Agent
        headers.insert(USER_AGENT, HeaderValue::from_static("sso-api"));

        let user: GithubUser = self
            .http
            .request_json(Method::GET, url, headers, RequestBody::Empty)
            .await?;

        Ok(SingleSignOnUser {
            email: user.email.unwrap_or_default(),
            name: user.name.unwrap_or_default(),
            picture: user.avatar_url.unwrap_or_default(),
        })
    }
}
