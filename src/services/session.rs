// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session orchestration: startup, sign-in redirect handling, sign-out.

use std::sync::Arc;

use url::Url;

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::models::Profile;
use crate::services::auth::{extract_code, AuthFlow};
use crate::services::feed::FeedSync;
use crate::services::http::HttpClient;
use crate::services::profile::ProfileSync;
use crate::services::profile_image::ProfileImageSync;
use crate::services::token_store::TokenStore;

/// Browser state tied to the sign-in web view (cookies, site data).
pub trait WebSession: Send + Sync {
    /// Purge everything the web view stored for the provider.
    fn clear_session_data(&self);
}

/// For embedders without a web view.
#[derive(Debug, Default)]
pub struct NoopWebSession;

impl WebSession for NoopWebSession {
    fn clear_session_data(&self) {}
}

/// Result of [`SessionController::start`].
#[derive(Debug)]
pub enum SessionStart {
    /// A token is stored. The feed may be loaded whatever the profile
    /// fetch returned.
    Ready { profile: Result<Profile> },
    /// No usable token; show the authorization page.
    Unauthenticated { authorization_url: Url },
}

/// What the web view should do with a navigation.
#[derive(Debug)]
pub enum RedirectOutcome {
    /// Not the sign-in redirect; navigate normally.
    Allow,
    /// A redirect carrying a code that is being exchanged or was already
    /// exchanged.
    Ignored,
    /// Code exchanged; the session has been started.
    Authenticated(SessionStart),
}

/// Owns the sync components and wires them together.
pub struct SessionController {
    token_store: Arc<dyn TokenStore>,
    web_session: Arc<dyn WebSession>,
    auth: AuthFlow,
    profile: Arc<ProfileSync>,
    feed: Arc<FeedSync>,
}

impl SessionController {
    pub fn new(
        config: &Config,
        token_store: Arc<dyn TokenStore>,
        web_session: Arc<dyn WebSession>,
    ) -> Result<Self> {
        let http = HttpClient::new(config.request_timeout)?;

        let images = Arc::new(ProfileImageSync::new(
            config,
            http.clone(),
            Arc::clone(&token_store),
        ));
        let profile = Arc::new(ProfileSync::new(
            config,
            http.clone(),
            Arc::clone(&token_store),
            images,
        ));
        let feed = Arc::new(FeedSync::new(config, http.clone(), Arc::clone(&token_store)));
        let auth = AuthFlow::new(config, http, Arc::clone(&token_store));

        Ok(Self {
            token_store,
            web_session,
            auth,
            profile,
            feed,
        })
    }

    pub fn auth(&self) -> &AuthFlow {
        &self.auth
    }

    pub fn profile(&self) -> &Arc<ProfileSync> {
        &self.profile
    }

    pub fn images(&self) -> &Arc<ProfileImageSync> {
        self.profile.images()
    }

    pub fn feed(&self) -> &Arc<FeedSync> {
        &self.feed
    }

    pub fn is_authenticated(&self) -> bool {
        self.token_store.get().is_some()
    }

    /// Decide where the app starts.
    ///
    /// With a stored token the profile is fetched. A 401 means the token was
    /// revoked: it is dropped and the sign-in flow is offered instead. The
    /// sign-in flow is also offered when `logout()` ran during the fetch.
    pub async fn start(&self) -> Result<SessionStart> {
        if self.token_store.get().is_none() {
            tracing::info!("No stored token, starting authorization");
            return self.unauthenticated();
        }

        let profile = self.profile.fetch_profile().await;
        match &profile {
            Err(e) if e.is_unauthorized() => {
                tracing::warn!("Stored token rejected, signing out");
                self.drop_credentials();
                return self.unauthenticated();
            }
            Err(AppError::Cancelled) => {
                tracing::info!("Signed out while the profile was loading");
                return self.unauthenticated();
            }
            Err(e) => tracing::warn!(error = %e, "Profile fetch failed, continuing to feed"),
            Ok(_) => tracing::info!("Session started"),
        }

        Ok(SessionStart::Ready { profile })
    }

    /// Feed a navigation from the sign-in web view.
    pub async fn handle_redirect(&self, url: &Url) -> Result<RedirectOutcome> {
        let Some(code) = extract_code(url) else {
            return Ok(RedirectOutcome::Allow);
        };

        match self.auth.exchange_code(&code).await? {
            Some(_) => Ok(RedirectOutcome::Authenticated(self.start().await?)),
            None => Ok(RedirectOutcome::Ignored),
        }
    }

    /// Sign out: forget the token and all user data, purge web session data.
    pub fn logout(&self) {
        self.drop_credentials();
        self.web_session.clear_session_data();
        tracing::info!("Logged out");
    }

    fn drop_credentials(&self) {
        self.token_store.clear();
        self.feed.reset();
        self.profile.clear();
        self.auth.reset();
    }

    fn unauthenticated(&self) -> Result<SessionStart> {
        Ok(SessionStart::Unauthenticated {
            authorization_url: self.auth.begin()?,
        })
    }
}
