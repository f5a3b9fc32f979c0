// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - sync components talking to the photo API.

pub mod auth;
pub mod feed;
pub mod http;
pub mod latch;
pub mod observers;
pub mod profile;
pub mod profile_image;
pub mod session;
pub mod token_store;

pub use auth::{extract_code, AuthFlow, AuthState};
pub use feed::{FeedEvent, FeedSync, PHOTOS_PER_PAGE};
pub use http::HttpClient;
pub use observers::Subscription;
pub use profile::ProfileSync;
pub use profile_image::ProfileImageSync;
pub use session::{NoopWebSession, RedirectOutcome, SessionController, SessionStart, WebSession};
pub use token_store::{FileTokenStore, MemoryTokenStore, TokenStore};
