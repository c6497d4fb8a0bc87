// src/sso/providers/google.rs
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
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
struct GoogleUserInfo {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    picture: Option<String>,
}

/// Google OpenID Connect sign-in
#[derive(Debug, Clone)]
pub struct GoogleIdentityProvider {
    credentials: ProviderCredentials,
    endpoints: ProviderEndpoints,
    http: HttpClient,
}

impl GoogleIdentityProvider {
    pub fn new(credentials: ProviderCredentials, http: HttpClient) -> Self {
        Self {
            credentials,
            endpoints: Self::default_endpoints(),
            http,
        }
    }

    pub fn default_endpoints() -> ProviderEndpoints {
        ProviderEndpoints {
            authorization_url: "https://accounts.google.com/o/oauth2/v2/auth".to_string(),
            token_url: "https://oauth2.googleapis.com/token".to_string(),
            profile_url: "https://openidconnect.googleapis.com/v1/userinfo".to_string(),
        }
    }

    #[cfg(test)]
    pub fn with_endpoints(mut self, endpoints: ProviderEndpoints) -> Self {
        self.endpoints = endpoints;
        self
    }
}

#[async_trait]
impl IdentityProvider for GoogleIdentityProvider {
    fn name(&self) -> &'static str {
        "google"
    }

    fn get_authorization_url(&self) -> Result<Url, ProviderError> {
        let url = Url::parse_with_params(
            &self.endpoints.authorization_url,
            &[
                ("client_id", self.credentials.client_id.as_str()),
                ("redirect_uri", self.credentials.redirect_uri.as_str()),
                ("response_type", "code"),
                ("scope", "email profile"),
                ("access_type", "online"),
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
            ("grant_type", "authorization_code"),
            ("redirect_uri", self.credentials.redirect_uri.as_str()),
        ];

        let mut headers = HeaderMap::new();
        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("application/x-www-form-urlencoded"),
        );

        debug!(provider = "google", "Exchanging authorization code for access token");
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
        let headers = authorization_headers("Bearer", identity_token)?;

        let info: GoogleUserInfo = self
            .http
            .request_json(Method::GET, url, headers, RequestBody::Empty)
            .await?;

        Ok(SingleSignOnUser {
            email: info.email.unwrap_or_default(),
            name: info.name.unwrap_or_default(),
            picture: info.picture.unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use wiremock::matchers::{body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn credentials() -> ProviderCredentials {
        ProviderCredentials {
            client_id: "google-client".to_string(),
            client_secret: "google-secret".to_string(),
            redirect_uri: "https://localhost/api/v1/single-sign-on/google/callback".to_string(),
        }
    }

    fn provider_for(server: &MockServer) -> GoogleIdentityProvider {
        let http = HttpClient::new(Duration::from_secs(5)).unwrap();
        GoogleIdentityProvider::new(credentials(), http).with_endpoints(ProviderEndpoints {
            authorization_url: format!("{}/auth", server.uri()),
            token_url: format!("{}/token", server.uri()),
            profile_url: format!("{}/userinfo", server.uri()),
        })
    }

    #[test]
    fn test_get_authorization_url() {
        let http = HttpClient::new(Duration::from_secs(5)).unwrap();
        let provider = GoogleIdentityProvider::new(credentials(), http);

        let url = provider.get_authorization_url().unwrap();
        let query: std::collections::HashMap<_, _> = url.query_pairs().into_owned().collect();

        assert!(url.as_str().starts_with("https://accounts.google.com/o/oauth2/v2/auth?"));
        assert_eq!(query["client_id"], "google-client");
        assert_eq!(
            query["redirect_uri"],
            "https://localhost/api/v1/single-sign-on/google/callback"
        );
        assert_eq!(query["response_type"], "code");
        assert_eq!(query["scope"], "email profile");
        assert_eq!(query["access_type"], "online");
    }

    #[tokio::test]
    async fn test_get_identity_token_posts_form() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .and(header("content-type", "application/x-www-form-urlencoded"))
            .and(body_string_contains("code=one-time-code"))
            .and(body_string_contains("grant_type=authorization_code"))
            .and(body_string_contains("client_secret=google-secret"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "access_token": "abc" })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let token = provider_for(&server)
            .get_identity_token("one-time-code")
            .await
            .unwrap();
        assert_eq!(token, "abc");
    }

    #[tokio::test]
    async fn test_missing_access_token_is_malformed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "token_type": "Bearer" })),
            )
            .mount(&server)
            .await;

        let result = provider_for(&server).get_identity_token("code").await;
        assert!(matches!(result, Err(ProviderError::MalformedResponse(_))));
    }

    #[tokio::test]
    async fn test_rejected_code_is_provider_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(ResponseTemplate::new(400).set_body_string("invalid_grant"))
            .mount(&server)
            .await;

        let result = provider_for(&server).get_identity_token("code").await;
        assert!(matches!(result, Err(ProviderError::Request(_))));
    }

    #[tokio::test]
    async fn test_get_single_sign_on_user_uses_bearer() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/userinfo"))
            .and(header("authorization", "Bearer abc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "sub": "1234",
                "email": "a@x.com",
                "name": "A",
                "picture": "http://x/p.png"
            })))
            .mount(&server)
            .await;

        let user = provider_for(&server)
            .get_single_sign_on_user("abc")
            .await
            .unwrap();
        assert_eq!(
            user,
            SingleSignOnUser {
                email: "a@x.com".to_string(),
                name: "A".to_string(),
                picture: "http://x/p.png".to_string(),
            }
        );
    }
}
