// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Photo model for the feed.

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Photo as returned by `GET /photos`.
#[derive(Debug, Clone, Deserialize)]
pub struct PhotoResult {
    pub id: String,
    pub width: u32,
    pub height: u32,
    pub created_at: Option<String>,
    pub description: Option<String>,
    pub urls: UrlsResult,
    #[serde(default)]
    pub liked_by_user: bool,
}

/// Image URL variants for a photo.
#[derive(Debug, Clone, Deserialize)]
pub struct UrlsResult {
    pub full: String,
    pub thumb: String,
    pub small: Option<String>,
}

/// A photo in the in-memory feed.
///
/// Records are replaced wholesale in the feed, never mutated in place.
#[derive(Debug, Clone, PartialEq)]
pub struct Photo {
    pub id: String,
    pub width: u32,
    pub height: u32,
    pub created_at: Option<DateTime<Utc>>,
    pub description: Option<String>,
    pub thumbnail_url: String,
    pub full_url: String,
    pub liked: bool,
}

impl Photo {
    /// Pixel dimensions as `(width, height)`.
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Width divided by height, or 1.0 for degenerate sizes.
    pub fn aspect_ratio(&self) -> f64 {
        if self.height == 0 {
            return 1.0;
        }
        f64::from(self.width) / f64::from(self.height)
    }

    /// Copy of this photo with a different like state.
    pub fn with_liked(&self, liked: bool) -> Self {
        Self {
            liked,
            ..self.clone()
        }
    }
}

impl From<PhotoResult> for Photo {
    fn from(result: PhotoResult) -> Self {
        // Unparseable timestamps are dropped rather than failing the page
        let created_at = result.created_at.as_deref().and_then(|s| {
            DateTime::parse_from_rfc3339(s)
                .map(|dt| dt.with_timezone(&Utc))
                .ok()
        });

        Self {
            id: result.id,
            width: result.width,
            height: result.height,
            created_at,
            description: result.description,
            thumbnail_url: result.urls.thumb,
            full_url: result.urls.full,
            liked: result.liked_by_user,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PHOTO_JSON: &str = r#"{
        "id": "LBI7cgq3pbM",
        "created_at": "2016-05-03T11:00:28-04:00",
        "width": 5245,
        "height": 3497,
        "description": "A man drinking a coffee.",
        "urls": {
            "raw": "https://images.unsplash.com/raw",
            "full": "https://images.unsplash.com/full",
            "regular": "https://images.unsplash.com/regular",
            "small": "https://images.unsplash.com/small",
            "thumb": "https://images.unsplash.com/thumb"
        },
        "liked_by_user": true
    }"#;

    #[test]
    fn test_photo_from_result() {
        let result: PhotoResult = serde_json::from_str(PHOTO_JSON).unwrap();
        let photo = Photo::from(result);

        assert_eq!(photo.id, "LBI7cgq3pbM");
        assert_eq!(photo.size(), (5245, 3497));
        assert_eq!(photo.thumbnail_url, "https://images.unsplash.com/thumb");
        assert_eq!(photo.full_url, "https://images.unsplash.com/full");
        assert!(photo.liked);
        assert_eq!(
            photo.created_at.map(|dt| dt.to_rfc3339()),
            Some("2016-05-03T15:00:28+00:00".to_string())
        );
    }

    #[test]
    fn test_photo_bad_timestamp_is_none() {
        let json = PHOTO_JSON.replace("2016-05-03T11:00:28-04:00", "yesterday");
        let result: PhotoResult = serde_json::from_str(&json).unwrap();
        assert!(Photo::from(result).created_at.is_none());
    }

    #[test]
    fn test_with_liked_keeps_other_fields() {
        let result: PhotoResult = serde_json::from_str(PHOTO_JSON).unwrap();
        let photo = Photo::from(result);
        let unliked = photo.with_liked(false);

        assert!(!unliked.liked);
        assert_eq!(unliked.id, photo.id);
        assert_eq!(unliked.full_url, photo.full_url);
    }

    #[test]
    fn test_aspect_ratio_zero_height() {
        let result: PhotoResult = serde_json::from_str(PHOTO_JSON).unwrap();
        let mut photo = Photo::from(result);
        photo.height = 0;
        assert_eq!(photo.aspect_ratio(), 1.0);
    }
}
