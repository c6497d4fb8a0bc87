// src/services/http.rs
//! Outbound JSON request helper shared by the identity providers

use reqwest::header::{HeaderMap, ACCEPT};
use reqwest::{Client, Method, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("invalid JSON response: {0}")]
    Decode(String),
}

/// Request body for [`HttpClient::request_json`]
#[derive(Debug, Clone, Copy)]
pub enum RequestBody<'a> {
    Empty,
    /// Sent as `application/x-www-form-urlencoded`.
    Form(&'a [(&'a str, &'a str)]),
}

/// JSON-over-HTTP client with a fixed per-request timeout.
///
/// One instance is built at startup and handed to every identity provider.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    pub fn new(timeout: Duration) -> Result<Self, HttpError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }

    /// Performs one request and decodes the JSON response into `T`.
    ///
    /// Any status >= 400 is an error. No retries.
    pub async fn request_json<T: DeserializeOwned>(
        &self,
        method: Method,
        url: Url,
        headers: HeaderMap,
        body: RequestBody<'_>,
    ) -> Result<T, HttpError> {
        debug!(method = %method, host = ?url.host_str(), path = %url.path(), "Outbound request");

        let mut request = self
            .client
            .request(method, url)
            .header(ACCEPT, "application/json")
            .headers(headers);

        if let RequestBody::Form(params) = body {
            request = request.form(params);
        }

        let response = request.send().await?;
        let status = response.status();

        if status.as_u16() >= 400 {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            warn!(status = %status, "Outbound request rejected");
            return Err(HttpError::Status { status, body });
        }

        let bytes = response.bytes().await?;
        serde_json::from_slice::<T>(&bytes).map_err(|e| HttpError::Decode(e.to_string()))
    }
}
