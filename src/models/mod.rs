// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models: wire formats and the client-side records built from them.

pub mod photo;
pub mod profile;
pub mod token;

pub use photo::{Photo, PhotoResult, UrlsResult};
pub use profile::{Profile, ProfileImage, ProfileResult, UserResult};
pub use token::{AccessToken, OAuthTokenResponse};
