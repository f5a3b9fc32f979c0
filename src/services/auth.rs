// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! OAuth2 authorization-code flow against the Unsplash provider.
//!
//! Handles:
//! - Building the authorization URL shown in the sign-in web view
//! - Recognizing the native redirect and pulling out the code
//! - Exchanging the code for an access token, at most once per code

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::task::AbortHandle;
use url::Url;

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::models::{AccessToken, OAuthTokenResponse};
use crate::services::http::{endpoint, HttpClient};
use crate::services::token_store::TokenStore;

/// Path the provider redirects to once the user approves access.
pub const NATIVE_REDIRECT_PATH: &str = "/oauth/authorize/native";

/// Where the sign-in flow currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    Idle,
    AwaitingCode,
    Exchanging,
    Authenticated,
    Failed,
}

/// Token exchange currently on the wire.
struct InFlight {
    code: String,
    generation: u64,
    abort: AbortHandle,
}

struct AuthInner {
    state: AuthState,
    /// Bumped for every new exchange; completions from older ones are stale.
    generation: u64,
    in_flight: Option<InFlight>,
    /// Last code traded for a token; never sent to the provider again.
    exchanged_code: Option<String>,
}

/// Drives the authorization-code exchange.
pub struct AuthFlow {
    http: HttpClient,
    token_store: Arc<dyn TokenStore>,
    client_id: String,
    client_secret: String,
    redirect_uri: String,
    scope: String,
    auth_base_url: String,
    inner: Mutex<AuthInner>,
}

impl AuthFlow {
    pub fn new(config: &Config, http: HttpClient, token_store: Arc<dyn TokenStore>) -> Self {
        Self {
            http,
            token_store,
            client_id: config.access_key.clone(),
            client_secret: config.secret_key.clone(),
            redirect_uri: config.redirect_uri.clone(),
            scope: config.access_scope.clone(),
            auth_base_url: config.auth_base_url.trim_end_matches('/').to_string(),
            inner: Mutex::new(AuthInner {
                state: AuthState::Idle,
                generation: 0,
                in_flight: None,
                exchanged_code: None,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, AuthInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn state(&self) -> AuthState {
        self.lock().state
    }

    /// Authorization page URL. Same inputs always give the same URL.
    pub fn authorization_url(&self) -> Result<Url> {
        // Scope is already `+`-joined in provider format, so it is not re-encoded
        let url = format!(
            "{}/oauth/authorize?\
             client_id={}&\
             redirect_uri={}&\
             response_type=code&\
             scope={}",
            self.auth_base_url,
            urlencoding::encode(&self.client_id),
            urlencoding::encode(&self.redirect_uri),
            self.scope
        );
        Ok(Url::parse(&url)?)
    }

    /// Start a sign-in attempt: returns the URL to load and waits for a code.
    pub fn begin(&self) -> Result<Url> {
        let url = self.authorization_url()?;
        self.lock().state = AuthState::AwaitingCode;
        tracing::info!(client_id = %self.client_id, "Starting OAuth flow");
        Ok(url)
    }

    /// Return to `Idle`, abandoning any exchange in flight.
    pub fn reset(&self) {
        let mut inner = self.lock();
        if let Some(in_flight) = inner.in_flight.take() {
            in_flight.abort.abort();
        }
        inner.generation += 1;
        inner.exchanged_code = None;
        inner.state = AuthState::Idle;
    }

    /// Exchange an authorization code for an access token.
    ///
    /// Returns `Ok(None)` when an exchange for the same code is already in
    /// flight or has already completed; no second request is made. A
    /// different code supersedes the in-flight exchange, whose caller gets
    /// [`AppError::Cancelled`].
    pub async fn exchange_code(&self, code: &str) -> Result<Option<AccessToken>> {
        let request = self.token_request(code)?;

        let (generation, handle) = {
            let mut inner = self.lock();

            if inner.exchanged_code.as_deref() == Some(code) {
                tracing::debug!("Authorization code already exchanged, ignoring");
                return Ok(None);
            }

            if let Some(in_flight) = &inner.in_flight {
                if in_flight.code == code && !in_flight.abort.is_finished() {
                    tracing::debug!("Token exchange for this code already in flight, ignoring");
                    return Ok(None);
                }
                tracing::info!("New authorization code received, cancelling previous exchange");
                in_flight.abort.abort();
            }

            inner.generation += 1;
            let generation = inner.generation;

            let http = self.http.clone();
            let handle = tokio::spawn(async move {
                http.send_and_decode::<OAuthTokenResponse>(request).await
            });

            inner.in_flight = Some(InFlight {
                code: code.to_string(),
                generation,
                abort: handle.abort_handle(),
            });
            inner.state = AuthState::Exchanging;
            (generation, handle)
        };

        let outcome = handle.await;

        let mut inner = self.lock();
        if inner.generation != generation {
            tracing::debug!("Discarding superseded token exchange result");
            return Err(AppError::Cancelled);
        }
        if inner.in_flight.as_ref().map(|f| f.generation) == Some(generation) {
            inner.in_flight = None;
        }

        match outcome {
            Ok(Ok(response)) => {
                tracing::info!(
                    token_type = %response.token_type,
                    scope = %response.scope,
                    "Authorization code exchanged for access token"
                );
                let token = AccessToken::from(response);
                self.token_store.set(token.as_str());
                inner.exchanged_code = Some(code.to_string());
                inner.state = AuthState::Authenticated;
                Ok(Some(token))
            }
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "Token exchange failed");
                inner.state = AuthState::Failed;
                Err(e)
            }
            Err(e) if e.is_cancelled() => Err(AppError::Cancelled),
            Err(e) => {
                inner.state = AuthState::Failed;
                Err(AppError::Internal(anyhow::anyhow!(
                    "Token exchange task failed: {}",
                    e
                )))
            }
        }
    }

    /// `POST /oauth/token` with the credentials as query parameters.
    fn token_request(&self, code: &str) -> Result<reqwest::RequestBuilder> {
        let url = endpoint(&self.auth_base_url, "oauth/token")?;
        Ok(self.http.post(url).query(&[
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("redirect_uri", self.redirect_uri.as_str()),
            ("code", code),
            ("grant_type", "authorization_code"),
        ]))
    }
}

/// Pull the authorization code out of a navigation target.
///
/// Only the provider's native redirect path counts; any other URL returns
/// `None`, meaning the web view should navigate normally.
pub fn extract_code(url: &Url) -> Option<String> {
    if url.path() != NATIVE_REDIRECT_PATH {
        return None;
    }
    url.query_pairs()
        .find(|(name, _)| name == "code")
        .map(|(_, value)| value.into_owned())
}
