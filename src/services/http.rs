// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! HTTP client wrapper mapping transport, status and decode failures onto
//! [`AppError`].

use crate::error::{AppError, Result};
use bytes::Bytes;
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use std::time::Duration;
use url::Url;

/// Shared HTTP client. Cheap to clone.
#[derive(Clone, Debug)]
pub struct HttpClient {
    http: reqwest::Client,
}

impl HttpClient {
    /// Create a client whose requests time out after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { http })
    }

    pub fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.http.request(method, url)
    }

    pub fn get(&self, url: Url) -> RequestBuilder {
        self.request(Method::GET, url)
    }

    pub fn post(&self, url: Url) -> RequestBuilder {
        self.request(Method::POST, url)
    }

    pub fn delete(&self, url: Url) -> RequestBuilder {
        self.request(Method::DELETE, url)
    }

    /// Send a request and return the body of a 2xx response.
    pub async fn send(&self, request: RequestBuilder) -> Result<Bytes> {
        let response = request.send().await.map_err(|e| {
            tracing::warn!(error = %e, "HTTP request failed");
            AppError::Network(e.to_string())
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), body = %body, "Unexpected HTTP status");
            return Err(AppError::HttpStatus(status.as_u16()));
        }

        tracing::debug!(status = status.as_u16(), url = %response.url(), "HTTP request succeeded");
        response
            .bytes()
            .await
            .map_err(|e| AppError::Network(e.to_string()))
    }

    /// Send a request and decode its JSON body.
    pub async fn send_and_decode<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let body = self.send(request).await?;
        serde_json::from_slice(&body).map_err(|e| {
            tracing::warn!(
                error = %e,
                body = %String::from_utf8_lossy(&body),
                "Failed to decode response"
            );
            AppError::Decoding(e.to_string())
        })
    }
}

/// Join an API base URL and a path.
pub(crate) fn endpoint(base: &str, path: &str) -> Result<Url> {
    Ok(Url::parse(&format!("{}/{}", base.trim_end_matches('/'), path))?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_without_double_slash() {
        let url = endpoint("https://api.unsplash.com/", "photos/abc/like").unwrap();
        assert_eq!(url.as_str(), "https://api.unsplash.com/photos/abc/like");
    }

    #[test]
    fn test_endpoint_rejects_garbage_base() {
        let err = endpoint("not a url", "me").unwrap_err();
        assert!(matches!(err, AppError::InvalidUrl(_)));
    }
}
