// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Profile and avatar fetch tests.

use image_feed::services::{MemoryTokenStore, ProfileImageSync, ProfileSync};
use image_feed::AppError;
use serde_json::json;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use wiremock::matchers::{bearer_token, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

mod common;
use common::{signed_in_store, test_config, test_http, TEST_TOKEN};

fn profile_sync(server: &MockServer, store: Arc<MemoryTokenStore>) -> ProfileSync {
    let config = test_config(server);
    let images = Arc::new(ProfileImageSync::new(&config, test_http(), store.clone()));
    ProfileSync::new(&config, test_http(), store, images)
}

fn me_body() -> serde_json::Value {
    json!({"username": "ada", "first_name": "Ada", "last_name": "Lovelace", "bio": null})
}

#[tokio::test]
async fn test_fetch_profile_sends_bearer_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/me"))
        .and(bearer_token(TEST_TOKEN))
        .respond_with(ResponseTemplate::new(200).set_body_json(me_body()))
        .expect(1)
        .mount(&server)
        .await;

    let sync = profile_sync(&server, signed_in_store());
    let profile = sync.fetch_profile().await.unwrap();

    assert_eq!(profile.username, "ada");
    assert_eq!(profile.bio, None);
    assert_eq!(sync.profile(), Some(profile));
}

#[tokio::test]
async fn test_concurrent_profile_fetch_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/me"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(me_body())
                .set_delay(Duration::from_millis(100)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let sync = profile_sync(&server, signed_in_store());
    let (first, second) = tokio::join!(sync.fetch_profile(), sync.fetch_profile());

    assert!(first.is_ok());
    assert!(second.unwrap_err().is_in_progress());
}

#[tokio::test]
async fn test_fetch_profile_without_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(me_body()))
        .expect(0)
        .mount(&server)
        .await;

    let sync = profile_sync(&server, Arc::new(MemoryTokenStore::new()));
    let err = sync.fetch_profile().await.unwrap_err();

    assert!(matches!(err, AppError::MissingCredential));

    // Latch was released
    let err = sync.fetch_profile().await.unwrap_err();
    assert!(matches!(err, AppError::MissingCredential));
}

#[tokio::test]
async fn test_avatar_failure_does_not_fail_profile() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(me_body()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/users/ada"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let sync = profile_sync(&server, signed_in_store());
    assert!(sync.fetch_profile().await.is_ok());

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(sync.images().avatar_url(), None);
}

#[tokio::test]
async fn test_avatar_missing_image_is_invalid_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/ada"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"username": "ada"})))
        .mount(&server)
        .await;

    let images = ProfileImageSync::new(&test_config(&server), test_http(), signed_in_store());
    let err = images.fetch_avatar_url("ada").await.unwrap_err();

    assert!(matches!(err, AppError::InvalidResponse(_)));
    assert_eq!(images.avatar_url(), None);
}

#[tokio::test]
async fn test_avatar_observers_receive_new_url() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/ada"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "profile_image": {"small": "https://img/s", "medium": "https://img/m", "large": "https://img/l"}
        })))
        .mount(&server)
        .await;

    let images = ProfileImageSync::new(&test_config(&server), test_http(), signed_in_store());
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let _subscription = images.subscribe(move |url| sink.lock().unwrap().push(url.clone()));

    let url = images.fetch_avatar_url("ada").await.unwrap();

    assert_eq!(url, "https://img/s");
    assert_eq!(images.avatar_url().as_deref(), Some("https://img/s"));
    assert_eq!(*seen.lock().unwrap(), vec!["https://img/s".to_string()]);

    images.clear();
    assert_eq!(images.avatar_url(), None);
}

#[tokio::test]
async fn test_profile_arriving_after_clear_is_dropped() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/me"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(me_body())
                .set_delay(Duration::from_millis(150)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let sync = profile_sync(&server, signed_in_store());
    let (result, ()) = tokio::join!(sync.fetch_profile(), async {
        tokio::time::sleep(Duration::from_millis(30)).await;
        sync.clear();
    });

    assert!(matches!(result, Err(AppError::Cancelled)));
    assert_eq!(sync.profile(), None);
}
