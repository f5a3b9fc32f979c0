// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! image-feed: client-side data access for an Unsplash photo feed
//!
//! This crate signs the user in through OAuth2, loads the paginated photo
//! feed, toggles likes and keeps the signed-in user's profile and avatar.

pub mod config;
pub mod error;
pub mod models;
pub mod services;

pub use error::{AppError, Result};
pub use services::SessionController;
