// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use image_feed::config::Config;
use image_feed::services::{FeedSync, HttpClient, MemoryTokenStore, TokenStore};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{bearer_token, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TEST_TOKEN: &str = "test_access_token";

/// Config with every endpoint pointed at the mock server.
#[allow(dead_code)]
pub fn test_config(server: &MockServer) -> Config {
    Config::default().with_base_url(&server.uri())
}

#[allow(dead_code)]
pub fn test_http() -> HttpClient {
    HttpClient::new(Duration::from_secs(5)).expect("HTTP client should build")
}

/// Token store already holding [`TEST_TOKEN`].
#[allow(dead_code)]
pub fn signed_in_store() -> Arc<MemoryTokenStore> {
    Arc::new(MemoryTokenStore::with_token(TEST_TOKEN))
}

/// Feed backed by the mock server.
#[allow(dead_code)]
pub fn test_feed(server: &MockServer, store: Arc<dyn TokenStore>) -> FeedSync {
    FeedSync::new(&test_config(server), test_http(), store)
}

/// Wire representation of a photo.
#[allow(dead_code)]
pub fn photo_json(id: &str, liked: bool) -> Value {
    json!({
        "id": id,
        "width": 4000,
        "height": 3000,
        "created_at": "2024-01-01T10:00:00Z",
        "description": format!("Photo {}", id),
        "urls": {
            "raw": format!("https://images.example.com/{}/raw", id),
            "full": format!("https://images.example.com/{}/full", id),
            "regular": format!("https://images.example.com/{}/regular", id),
            "small": format!("https://images.example.com/{}/small", id),
            "thumb": format!("https://images.example.com/{}/thumb", id)
        },
        "liked_by_user": liked
    })
}

#[allow(dead_code)]
pub fn page_json(ids: &[&str]) -> Value {
    Value::Array(ids.iter().map(|id| photo_json(id, false)).collect())
}

/// Serve `ids` for `GET /photos?page=<page>`.
#[allow(dead_code)]
pub async fn mount_page(server: &MockServer, page: u32, ids: &[&str]) {
    Mock::given(method("GET"))
        .and(path("/photos"))
        .and(query_param("page", page.to_string()))
        .and(query_param("per_page", "10"))
        .and(bearer_token(TEST_TOKEN))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_json(ids)))
        .mount(server)
        .await;
}

/// Feed ids in display order.
#[allow(dead_code)]
pub fn ids(feed: &FeedSync) -> Vec<String> {
    feed.photos().into_iter().map(|p| p.id).collect()
}
