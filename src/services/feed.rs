// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Paginated photo feed with like toggling.
//!
//! Handles:
//! - Page-by-page loading with a cursor that only advances on success
//! - Dropping photos the feed already holds (server page overlap)
//! - Like/unlike with the stored record replaced after the server agrees
//! - Change notification to registered observers
//!
//! Page fetches and like toggles share one latch: at most one
//! feed-mutating request is outstanding at any time.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::models::{Photo, PhotoResult};
use crate::services::http::{endpoint, HttpClient};
use crate::services::latch::Latch;
use crate::services::observers::{Observers, Subscription};
use crate::services::token_store::TokenStore;

/// Photos requested per page.
pub const PHOTOS_PER_PAGE: u32 = 10;

/// What changed in the feed. Observers may ignore the payload and re-read
/// [`FeedSync::photos`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedEvent {
    PageAppended { page: u32, count: usize },
    PhotoUpdated { id: String },
    Reset,
}

#[derive(Default)]
struct FeedState {
    photos: Vec<Photo>,
    ids: HashSet<String>,
    /// Last successfully loaded page; 0 when nothing is loaded.
    last_page: u32,
    /// Bumped by `reset()`; responses tagged with an older value are dropped.
    generation: u64,
}

/// In-memory photo feed synchronized with the API.
pub struct FeedSync {
    http: HttpClient,
    token_store: Arc<dyn TokenStore>,
    api_base_url: String,
    state: Mutex<FeedState>,
    latch: Latch,
    observers: Observers<FeedEvent>,
}

impl FeedSync {
    pub fn new(config: &Config, http: HttpClient, token_store: Arc<dyn TokenStore>) -> Self {
        Self {
            http,
            token_store,
            api_base_url: config.api_base_url.clone(),
            state: Mutex::new(FeedState::default()),
            latch: Latch::new(),
            observers: Observers::new(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, FeedState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // ─── Reads ───────────────────────────────────────────────────────────────

    /// Snapshot of the feed in display order.
    pub fn photos(&self) -> Vec<Photo> {
        self.lock().photos.clone()
    }

    pub fn photo(&self, id: &str) -> Option<Photo> {
        self.lock().photos.iter().find(|p| p.id == id).cloned()
    }

    pub fn len(&self) -> usize {
        self.lock().photos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().photos.is_empty()
    }

    pub fn last_loaded_page(&self) -> u32 {
        self.lock().last_page
    }

    /// True while a page fetch or like toggle is outstanding.
    pub fn is_busy(&self) -> bool {
        self.latch.is_held()
    }

    /// Register for change notifications.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&FeedEvent) + Send + Sync + 'static,
    {
        self.observers.subscribe(callback)
    }

    // ─── Mutations ───────────────────────────────────────────────────────────

    /// Load the page after the last loaded one.
    ///
    /// Returns `Ok(None)` without touching the network when another feed
    /// request is outstanding, or when the response arrives after a
    /// `reset()`. Otherwise returns the photos actually appended, which
    /// excludes any the feed already held.
    pub async fn fetch_next_page(&self) -> Result<Option<Vec<Photo>>> {
        let Some(_guard) = self.latch.try_acquire() else {
            tracing::debug!("Feed request in progress, ignoring page fetch");
            return Ok(None);
        };
        let token = self
            .token_store
            .get()
            .ok_or(AppError::MissingCredential)?;

        let (page, generation) = {
            let state = self.lock();
            (state.last_page + 1, state.generation)
        };

        let url = endpoint(&self.api_base_url, "photos")?;
        let request = self.http.get(url).bearer_auth(&token).query(&[
            ("page", page.to_string()),
            ("per_page", PHOTOS_PER_PAGE.to_string()),
        ]);

        let results: Vec<PhotoResult> = match self.http.send_and_decode(request).await {
            Ok(results) => results,
            Err(e) => {
                tracing::warn!(page, error = %e, "Failed to load feed page");
                return Err(e);
            }
        };
        let received = results.len();

        let appended = {
            let mut state = self.lock();
            if state.generation != generation {
                tracing::info!(page, "Discarding feed page requested before reset");
                return Ok(None);
            }

            let mut appended = Vec::with_capacity(received);
            for photo in results.into_iter().map(Photo::from) {
                if state.ids.insert(photo.id.clone()) {
                    appended.push(photo);
                }
            }
            state.photos.extend(appended.iter().cloned());
            state.last_page = page;
            appended
        };

        tracing::info!(
            page,
            received,
            appended = appended.len(),
            "Feed page loaded"
        );
        self.observers.notify(&FeedEvent::PageAppended {
            page,
            count: appended.len(),
        });
        Ok(Some(appended))
    }

    /// Like (`liked = true`) or unlike a photo.
    ///
    /// Fails with [`AppError::RequestInProgress`] while another feed request
    /// is outstanding. The stored photo only changes after the server
    /// accepts the request, and then takes exactly the requested state.
    pub async fn toggle_like(&self, photo_id: &str, liked: bool) -> Result<()> {
        let Some(_guard) = self.latch.try_acquire() else {
            tracing::debug!(photo_id, "Feed request in progress, rejecting like toggle");
            return Err(AppError::RequestInProgress);
        };
        let token = self
            .token_store
            .get()
            .ok_or(AppError::MissingCredential)?;
        let generation = self.lock().generation;

        let url = endpoint(
            &self.api_base_url,
            &format!("photos/{}/like", urlencoding::encode(photo_id)),
        )?;
        let request = if liked {
            self.http.post(url)
        } else {
            self.http.delete(url)
        };

        if let Err(e) = self.http.send(request.bearer_auth(&token)).await {
            tracing::warn!(photo_id, liked, error = %e, "Failed to change like");
            return Err(e);
        }

        let updated = {
            let mut state = self.lock();
            if state.generation != generation {
                tracing::debug!(photo_id, "Discarding like result from before reset");
                return Ok(());
            }
            match state.photos.iter().position(|p| p.id == photo_id) {
                Some(index) => {
                    let replacement = state.photos[index].with_liked(liked);
                    state.photos[index] = replacement;
                    true
                }
                None => false,
            }
        };

        if updated {
            tracing::info!(photo_id, liked, "Like state updated");
            self.observers.notify(&FeedEvent::PhotoUpdated {
                id: photo_id.to_string(),
            });
        } else {
            tracing::debug!(photo_id, "Liked photo is not in the feed");
        }
        Ok(())
    }

    /// Empty the feed and rewind the cursor (sign-out).
    ///
    /// An in-flight request is not cancelled; its response is dropped.
    pub fn reset(&self) {
        {
            let mut state = self.lock();
            state.photos.clear();
            state.ids.clear();
            state.last_page = 0;
            state.generation += 1;
        }
        tracing::info!("Feed reset");
        self.observers.notify(&FeedEvent::Reset);
    }
}
