// src/sso/providers/facebook.rs
use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::Method;
use serde::Deserialize;
use tracing::debug;
use url::Url;

use crate::common::ProviderCredentials;
use crate::services::http::{HttpClient, RequestBody};
use crate::sso::provider::{
    AccessTokenResponse, IdentityProvider, ProviderEndpoints, ProviderError, SingleSignOnUser,
};

// Graph API nests the avatar: {"picture": {"data": {"url": "..."}}}
#[derive(Debug, Default, Deserialize)]
struct PictureData {
    #[serde(default)]
    url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct Picture {
    #[serde(default)]
    data: PictureData,
}

#[derive(Debug, Deserialize)]
struct FacebookProfile {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    picture: Picture,
}

/// Facebook Login via the Graph API
#[derive(Debug, Clone)]
pub struct FacebookIdentityProvider {
    credentials: ProviderCredentials,
    endpoints: ProviderEndpoints,
    http: HttpClient,
}

impl FacebookIdentityProvider {
    pub fn new(credentials: ProviderCredentials, http: HttpClient) -> Self {
        Self {
            credentials,
            endpoints: Self::default_endpoints(),
            http,
        }
    }

    pub fn default_endpoints() -> ProviderEndpoints {
        ProviderEndpoints {
            authorization_url: "https://www.facebook.com/v9.0/dialog/oauth".to_string(),
            token_url: "https://graph.facebook.com/v9.0/oauth/access_token".to_string(),
            profile_url: "https://graph.facebook.com/v9.0/me".to_string(),
        }
    }

    #[cfg(test)]
    pub fn with_endpoints(mut self, endpoints: ProviderEndpoints) -> Self {
        self.endpoints = endpoints;
        self
    }
}

#[async_trait]
impl IdentityProvider for FacebookIdentityProvider {
    fn name(&self) -> &'static str {
        "facebook"
    }

    fn get_authorization_url(&self) -> Result<Url, ProviderError> {
        let url = Url::parse_with_params(
            &self.endpoints.authorization_url,
            &[
                ("client_id", self.credentials.client_id.as_str()),
                ("scope", "public_profile,email"),
                ("redirect_uri", self.credentials.redirect_uri.as_str()),
                ("response_type", "code"),
            ],
        )?;
        Ok(url)
    }

    async fn get_identity_token(&self, code: &str) -> Result<String, ProviderError> {
        // Graph API takes the exchange as a GET with everything in the query string
        let url = Url::parse_with_params(
            &self.endpoints.token_url,
            &[
                ("client_id", self.credentials.client_id.as_str()),
                ("client_secret", self.credentials.client_secret.as_str()),
                ("code", code),
                ("redirect_uri", self.credentials.redirect_uri.as_str()),
            ],
        )?;

        debug!(provider = "facebook", "Exchanging authorization code for access token");
        let response: AccessTokenResponse = self
            .http
            .request_json(Method::GET, url, HeaderMap::new(), RequestBody::Empty)
            .await?;

        response.into_token()
    }

    async fn get_single_sign_on_user(
        &self,
        identity_token: &str,
    ) -> Result<SingleSignOnUser, ProviderError> {
        let url = Url::parse_with_params(
            &self.endpoints.profile_url,
            &[
                ("access_token", identity_token),
                ("fields", "name,email,picture"),
            ],
        )?;

        let profile: FacebookProfile = self
            .http
            .request_json(Method::GET, url, HeaderMap::new(), RequestBody::Empty)
            .await?;

        Ok(SingleSignOnUser {
            email: profile.email.unwrap_or_default(),
            name: profile.name.unwrap_or_default(),
            picture: profile.picture.data.url.unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn credentials() -> ProviderCredentials {
        ProviderCredentials {
            client_id: "fb-client".to_string(),
            client_secret: "fb-secret".to_string(),
            redirect_uri: "https://localhost/api/v1/single-sign-on/facebook/callback".to_string(),
        }
    }

    fn provider_for(server: &MockServer) -> FacebookIdentityProvider {
        let http = HttpClient::new(Duration::from_secs(5)).unwrap();
        FacebookIdentityProvider::new(credentials(), http).with_endpoints(ProviderEndpoints {
            authorization_url: format!("{}/dialog/oauth", server.uri()),
            token_url: format!("{}/oauth/access_token", server.uri()),
            profile_url: format!("{}/me", server.uri()),
        })
    }

    #[test]
    fn test_get_authorization_url() {
        let http = HttpClient::new(Duration::from_secs(5)).unwrap();
        let provider = FacebookIdentityProvider::new(credentials(), http);

        let url = provider.get_authorization_url().unwrap();
        let query: std::collections::HashMap<_, _> = url.query_pairs().into_owned().collect();

        assert_eq!(url.host_str(), Some("www.facebook.com"));
        assert_eq!(url.path(), "/v9.0/dialog/oauth");
        assert_eq!(query["client_id"], "fb-client");
        assert_eq!(query["scope"], "public_profile,email");
        assert_eq!(query["response_type"], "code");
    }

    #[tokio::test]
    async fn test_get_identity_token_uses_query_string() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/oauth/access_token"))
            .and(query_param("client_id", "fb-client"))
            .and(query_param("client_secret", "fb-secret"))
            .and(query_param("code", "one-time-code"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "access_token": "fb-token" })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let token = provider_for(&server)
            .get_identity_token("one-time-code")
            .await
            .unwrap();
        assert_eq!(token, "fb-token");
    }

    #[tokio::test]
    async fn test_profile_picture_is_unwrapped_from_data() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/me"))
            .and(query_param("access_token", "fb-token"))
            .and(query_param("fields", "name,email,picture"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "10",
                "name": "B",
                "email": "b@y.com",
                "picture": { "data": { "url": "http://fb/p.jpg", "height": 50 } }
            })))
            .mount(&server)
            .await;

        let user = provider_for(&server)
            .get_single_sign_on_user("fb-token")
            .await
            .unwrap();
        assert_eq!(user.email, "b@y.com");
        assert_eq!(user.name, "B");
        assert_eq!(user.picture, "http://fb/p.jpg");
    }

    #[tokio::test]
    async fn test_profile_without_email_maps_to_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/me"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "name": "B" })),
            )
            .mount(&server)
            .await;

        let user = provider_for(&server)
            .get_single_sign_on_user("fb-token")
            .await
            .unwrap();
        assert!(user.email.is_empty());
        assert!(user.picture.is_empty());
    }
}
