// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Profile of the signed-in user.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::models::{Profile, ProfileResult};
use crate::services::http::{endpoint, HttpClient};
use crate::services::latch::Latch;
use crate::services::profile_image::ProfileImageSync;
use crate::services::token_store::TokenStore;

/// Fetches `GET /me` and kicks off the avatar lookup.
pub struct ProfileSync {
    http: HttpClient,
    token_store: Arc<dyn TokenStore>,
    api_base_url: String,
    images: Arc<ProfileImageSync>,
    profile: Mutex<Option<Profile>>,
    /// Bumped by `clear()`; a profile fetched before that is dropped.
    generation: AtomicU64,
    latch: Latch,
}

impl ProfileSync {
    pub fn new(
        config: &Config,
        http: HttpClient,
        token_store: Arc<dyn TokenStore>,
        images: Arc<ProfileImageSync>,
    ) -> Self {
        Self {
            http,
            token_store,
            api_base_url: config.api_base_url.clone(),
            images,
            profile: Mutex::new(None),
            generation: AtomicU64::new(0),
            latch: Latch::new(),
        }
    }

    /// Last successfully fetched profile.
    pub fn profile(&self) -> Option<Profile> {
        self.profile
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn images(&self) -> &Arc<ProfileImageSync> {
        &self.images
    }

    /// Fetch the profile. Fails with [`AppError::RequestInProgress`] if a
    /// fetch is already outstanding.
    ///
    /// On success the avatar URL fetch is spawned in the background; its
    /// failure is logged and never fails the profile fetch. A response that
    /// arrives after `clear()` is dropped with [`AppError::Cancelled`].
    pub async fn fetch_profile(&self) -> Result<Profile> {
        let Some(_guard) = self.latch.try_acquire() else {
            tracing::debug!("Profile fetch already in progress");
            return Err(AppError::RequestInProgress);
        };
        let token = self
            .token_store
            .get()
            .ok_or(AppError::MissingCredential)?;
        let generation = self.generation.load(Ordering::Acquire);

        let url = endpoint(&self.api_base_url, "me")?;
        let result: ProfileResult = self
            .http
            .send_and_decode(self.http.get(url).bearer_auth(&token))
            .await?;
        let profile = Profile::from(result);

        {
            let mut cached = self.profile.lock().unwrap_or_else(PoisonError::into_inner);
            if self.generation.load(Ordering::Acquire) != generation {
                tracing::info!(
                    username = %profile.username,
                    "Discarding profile fetched before sign-out"
                );
                return Err(AppError::Cancelled);
            }
            *cached = Some(profile.clone());
        }
        tracing::info!(username = %profile.username, "Profile loaded");

        let images = Arc::clone(&self.images);
        let username = profile.username.clone();
        tokio::spawn(async move {
            match images.fetch_avatar_url(&username).await {
                Ok(url) => tracing::debug!(url = %url, "Avatar fetched"),
                Err(e) => tracing::warn!(error = %e, username = %username, "Failed to fetch avatar"),
            }
        });

        Ok(profile)
    }

    /// Forget the cached profile and avatar.
    pub fn clear(&self) {
        let mut cached = self.profile.lock().unwrap_or_else(PoisonError::into_inner);
        self.generation.fetch_add(1, Ordering::AcqRel);
        *cached = None;
        drop(cached);
        self.images.clear();
    }
}
