// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Client configuration loaded from environment variables.
//!
//! A `.env` file in the working directory is honored for local development.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_API_URL: &str = "https://api.unsplash.com";
const DEFAULT_AUTH_URL: &str = "https://unsplash.com";
const DEFAULT_REDIRECT_URI: &str = "urn:ietf:wg:oauth:2.0:oob";
const DEFAULT_SCOPE: &str = "public+read_user+write_likes";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Client configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Unsplash application access key (OAuth client ID)
    pub access_key: String,
    /// Unsplash application secret key
    pub secret_key: String,
    /// Redirect URI registered with the provider
    pub redirect_uri: String,
    /// Requested OAuth scopes, `+`-separated
    pub access_scope: String,
    /// Base URL of the REST API
    pub api_base_url: String,
    /// Base URL of the OAuth endpoints
    pub auth_base_url: String,
    /// Per-request timeout
    pub request_timeout: Duration,
    /// Where `FileTokenStore` keeps the access token
    pub token_store_path: PathBuf,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            access_key: "test_access_key".to_string(),
            secret_key: "test_secret_key".to_string(),
            redirect_uri: DEFAULT_REDIRECT_URI.to_string(),
            access_scope: DEFAULT_SCOPE.to_string(),
            api_base_url: DEFAULT_API_URL.to_string(),
            auth_base_url: DEFAULT_AUTH_URL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            token_store_path: PathBuf::from(".image-feed/token.json"),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let timeout_secs = match env::var("REQUEST_TIMEOUT_SECS") {
            Ok(v) => v
                .trim()
                .parse()
                .map_err(|_| ConfigError::Invalid("REQUEST_TIMEOUT_SECS", v))?,
            Err(_) => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            access_key: env::var("UNSPLASH_ACCESS_KEY")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("UNSPLASH_ACCESS_KEY"))?,
            secret_key: env::var("UNSPLASH_SECRET_KEY")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("UNSPLASH_SECRET_KEY"))?,
            redirect_uri: env::var("UNSPLASH_REDIRECT_URI")
                .unwrap_or_else(|_| DEFAULT_REDIRECT_URI.to_string()),
            access_scope: env::var("UNSPLASH_ACCESS_SCOPE")
                .unwrap_or_else(|_| DEFAULT_SCOPE.to_string()),
            api_base_url: env::var("UNSPLASH_API_URL")
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
            auth_base_url: env::var("UNSPLASH_AUTH_URL")
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| DEFAULT_AUTH_URL.to_string()),
            request_timeout: Duration::from_secs(timeout_secs),
            token_store_path: env::var("TOKEN_STORE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(".image-feed/token.json")),
        })
    }

    /// Point both API and OAuth endpoints at one base URL (mock servers).
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        let base = base_url.trim_end_matches('/').to_string();
        self.api_base_url = base.clone();
        self.auth_base_url = base;
        self
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {0}: {1:?}")]
    Invalid(&'static str, String),
}
