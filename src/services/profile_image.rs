// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Avatar URL lookup for the signed-in user.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::models::UserResult;
use crate::services::http::{endpoint, HttpClient};
use crate::services::latch::Latch;
use crate::services::observers::{Observers, Subscription};
use crate::services::token_store::TokenStore;

/// Fetches and caches the avatar URL. The `small` variant is always used.
pub struct ProfileImageSync {
    http: HttpClient,
    token_store: Arc<dyn TokenStore>,
    api_base_url: String,
    avatar_url: Mutex<Option<String>>,
    generation: AtomicU64,
    latch: Latch,
    observers: Observers<String>,
}

impl ProfileImageSync {
    pub fn new(config: &Config, http: HttpClient, token_store: Arc<dyn TokenStore>) -> Self {
        Self {
            http,
            token_store,
            api_base_url: config.api_base_url.clone(),
            avatar_url: Mutex::new(None),
            generation: AtomicU64::new(0),
            latch: Latch::new(),
            observers: Observers::new(),
        }
    }

    /// Most recently fetched avatar URL.
    pub fn avatar_url(&self) -> Option<String> {
        self.avatar_url
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Called with the new URL whenever it changes.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&String) + Send + Sync + 'static,
    {
        self.observers.subscribe(callback)
    }

    /// Fetch the avatar URL for `username` and make it current.
    pub async fn fetch_avatar_url(&self, username: &str) -> Result<String> {
        let Some(_guard) = self.latch.try_acquire() else {
            return Err(AppError::RequestInProgress);
        };
        let token = self
            .token_store
            .get()
            .ok_or(AppError::MissingCredential)?;
        let generation = self.generation.load(Ordering::Acquire);

        let url = endpoint(
            &self.api_base_url,
            &format!("users/{}", urlencoding::encode(username)),
        )?;
        let user: UserResult = self
            .http
            .send_and_decode(self.http.get(url).bearer_auth(&token))
            .await?;

        let avatar_url = user
            .profile_image
            .and_then(|image| image.small)
            .ok_or_else(|| AppError::InvalidResponse("profile_image.small missing".to_string()))?;

        {
            let mut current = self.avatar_url.lock().unwrap_or_else(PoisonError::into_inner);
            if self.generation.load(Ordering::Acquire) != generation {
                tracing::debug!("Discarding avatar fetched before sign-out");
                return Err(AppError::Cancelled);
            }
            *current = Some(avatar_url.clone());
        }

        tracing::info!(username, "Avatar URL updated");
        self.observers.notify(&avatar_url);
        Ok(avatar_url)
    }

    /// Forget the cached URL; late responses are discarded.
    pub fn clear(&self) {
        let mut current = self.avatar_url.lock().unwrap_or_else(PoisonError::into_inner);
        self.generation.fetch_add(1, Ordering::AcqRel);
        *current = None;
    }
}
