// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! image-feed command line client
//!
//! Signs in to Unsplash (prompting for the redirect URL on first run),
//! then loads the first page of the photo feed.

use image_feed::{
    config::Config,
    services::{FileTokenStore, NoopWebSession, RedirectOutcome, SessionStart},
    SessionController,
};
use std::io::BufRead;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    // Load configuration from environment
    let config = Config::from_env()?;
    tracing::info!(api = %config.api_base_url, "Starting image-feed client");

    let token_store = Arc::new(FileTokenStore::new(&config.token_store_path));
    let session = SessionController::new(&config, token_store, Arc::new(NoopWebSession))?;

    let mut start = session.start().await?;
    loop {
        let authorization_url = match start {
            SessionStart::Unauthenticated { authorization_url } => authorization_url,
            SessionStart::Ready { profile } => {
                match profile {
                    Ok(profile) => tracing::info!(
                        name = %profile.full_name(),
                        handle = %profile.login_handle(),
                        "Signed in"
                    ),
                    Err(e) => tracing::warn!(error = %e.user_message(), "Profile unavailable"),
                }
                break;
            }
        };

        println!("Open this URL and paste the page you are redirected to:");
        println!("{}", authorization_url);

        let mut line = String::new();
        if std::io::stdin().lock().read_line(&mut line)? == 0 {
            return Ok(());
        }
        let redirect = url::Url::parse(line.trim())?;

        start = match session.handle_redirect(&redirect).await? {
            RedirectOutcome::Authenticated(next) => next,
            RedirectOutcome::Allow | RedirectOutcome::Ignored => {
                tracing::warn!("URL did not carry an authorization code");
                session.start().await?
            }
        };
    }

    let _subscription = session.feed().subscribe(|event| {
        tracing::debug!(?event, "Feed changed");
    });

    if let Some(photos) = session.feed().fetch_next_page().await? {
        for photo in photos {
            tracing::info!(
                id = %photo.id,
                width = photo.width,
                height = photo.height,
                liked = photo.liked,
                url = %photo.thumbnail_url,
                "Photo"
            );
        }
    }

    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("image_feed=debug,info")),
        )
        .with(format)
        .init();
}
