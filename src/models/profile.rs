// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Profile models for the authenticated user.

use serde::Deserialize;

/// Response body of `GET /me`.
#[derive(Debug, Clone, Deserialize)]
pub struct ProfileResult {
    pub username: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    pub bio: Option<String>,
}

/// Response body of `GET /users/{username}` (only the fields we use).
#[derive(Debug, Clone, Deserialize)]
pub struct UserResult {
    pub profile_image: Option<ProfileImage>,
}

/// Avatar URL variants.
#[derive(Debug, Clone, Deserialize)]
pub struct ProfileImage {
    pub small: Option<String>,
    pub medium: Option<String>,
    pub large: Option<String>,
}

/// Authenticated user's profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub bio: Option<String>,
}

impl Profile {
    /// Display name, e.g. "Ada Lovelace".
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    /// Handle shown under the name, e.g. "@ada".
    pub fn login_handle(&self) -> String {
        format!("@{}", self.username)
    }
}

impl From<ProfileResult> for Profile {
    fn from(result: ProfileResult) -> Self {
        Self {
            username: result.username,
            first_name: result.first_name.unwrap_or_default(),
            last_name: result.last_name.unwrap_or_default(),
            bio: result.bio,
        }
    }
}
